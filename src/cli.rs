//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

use crate::commands;

/// MTA Config - Generate and update MTA deployment descriptors
#[derive(Parser, Debug)]
#[command(name = "mta-config")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Project directory containing mta.yaml (parents are searched too)
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = "MTA_CONFIG_DIR",
        default_value = "."
    )]
    dir: PathBuf,

    /// Set log level
    #[arg(long, global = true, value_name = "LEVEL", value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new mta.yaml
    Init(commands::init::InitArgs),
    /// Generate mta.yaml with the CAP `cds` tool and wire the router
    Cap(commands::cap::CapArgs),
    /// Add a standalone or managed approuter
    Router(commands::router::RouterArgs),
    /// Register an HTML5 application
    App(commands::app::AppArgs),
    /// Add an instance-based destination to the server API
    Destination(commands::destination::DestinationArgs),
    /// Bind an existing ABAP service instance
    AbapService(commands::abap::AbapServiceArgs),
    /// Add a destination with a header to the extension descriptor
    Extend(commands::extend::ExtendArgs),
    /// Show the classified content of mta.yaml
    Info(commands::info::InfoArgs),
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level.into()
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let dir = self.dir;
        match self.command {
            Commands::Init(args) => commands::init::execute(&dir, args),
            Commands::Cap(args) => commands::cap::execute(&dir, args),
            Commands::Router(args) => commands::router::execute(&dir, args),
            Commands::App(args) => commands::app::execute(&dir, args),
            Commands::Destination(args) => commands::destination::execute(&dir, args),
            Commands::AbapService(args) => commands::abap::execute(&dir, args),
            Commands::Extend(args) => commands::extend::execute(&dir, args),
            Commands::Info(args) => commands::info::execute(&dir, args),
        }
    }
}
