//! # MTA Config CLI
//!
//! This is the binary entry point for the `mta-config` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Installing the `env_logger` backend at the requested level.
//! - Executing the appropriate command and translating library errors into
//!   user-friendly output.
//!
//! The descriptor logic lives in the `mta_config` library crate; the binary
//! is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_target(false)
        .format_timestamp(None)
        .init();
    cli.execute()
}
