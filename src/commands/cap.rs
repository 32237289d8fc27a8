//! # CAP Command Implementation
//!
//! Runs `cds add` to generate the descriptor of a CAP project, then loads the
//! freshly written file (retrying, as it was produced by another process) and
//! reconciles the router wiring.

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::Path;

use mta_config::retry::RetryPolicy;
use mta_config::tools::{self, CapRouter};
use mta_config::{Logger, RoutingOptions};

use super::{finish, load_project};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouterKind {
    /// Generate an approuter module at app/router
    Standalone,
    /// Use the managed approuter
    Managed,
}

/// Generate mta.yaml with the CAP `cds` tool and wire the router
#[derive(Args, Debug)]
pub struct CapArgs {
    /// Which approuter to configure
    #[arg(long, value_enum, default_value = "standalone")]
    pub router: RouterKind,
}

/// Execute the `cap` command.
pub fn execute(dir: &Path, args: CapArgs) -> Result<()> {
    let router = match args.router {
        RouterKind::Standalone => CapRouter::Standalone,
        RouterKind::Managed => CapRouter::Managed,
    };
    tools::generate_cap_mta(dir, router, &Logger::global())?;

    let mut mta = load_project(dir, &RetryPolicy::default())?;
    mta.add_routing_modules(&RoutingOptions {
        managed: router == CapRouter::Managed,
        add_missing_modules: true,
    })?;
    mta.add_deploy_parameters()?;
    finish(&mut mta)
}
