//! # Router Command Implementation
//!
//! Adds a standalone approuter module (default) or the managed approuter
//! destination content, then reconciles missing resources.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use mta_config::{AbapServiceBinding, RoutingOptions, StandaloneRouterOptions};

use super::{finish, open_project};

/// Add a standalone or managed approuter
#[derive(Args, Debug)]
pub struct RouterArgs {
    /// Use the managed approuter instead of a router module
    #[arg(long, conflicts_with_all = ["connectivity", "abap_service"])]
    pub managed: bool,

    /// Bind the connectivity service to the router
    #[arg(long)]
    pub connectivity: bool,

    /// Existing ABAP service instance to bind to the router
    #[arg(long, value_name = "INSTANCE")]
    pub abap_service: Option<String>,

    /// BTP service of the ABAP instance
    #[arg(long, value_name = "SERVICE", default_value = "abap")]
    pub btp_service: String,

    /// Skip creating missing content modules and resources
    #[arg(long)]
    pub no_cleanup: bool,
}

/// Execute the `router` command.
pub fn execute(dir: &Path, args: RouterArgs) -> Result<()> {
    let mut mta = open_project(dir)?;
    if !args.managed {
        let options = StandaloneRouterOptions {
            connectivity: args.connectivity,
            abap_service: args.abap_service.map(|service_name| AbapServiceBinding {
                service_name,
                btp_service: args.btp_service,
            }),
        };
        mta.add_standalone_router(&options)?;
    }
    mta.add_routing_modules(&RoutingOptions {
        managed: args.managed,
        add_missing_modules: !args.no_cleanup,
    })?;
    finish(&mut mta)
}
