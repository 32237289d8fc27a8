//! # Destination Command Implementation
//!
//! Declares an instance-based destination pointing at the CAP server API and
//! secures the server module with XSUAA.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use mta_config::constants::DEFAULT_SERVICE_DESTINATION;

use super::{finish, open_project};

/// Add an instance-based destination to the server API
#[derive(Args, Debug)]
pub struct DestinationArgs {
    /// Destination name; the default resolves to `<ID>-srv-api`
    #[arg(default_value = DEFAULT_SERVICE_DESTINATION)]
    pub name: String,
}

/// Execute the `destination` command.
pub fn execute(dir: &Path, args: DestinationArgs) -> Result<()> {
    let mut mta = open_project(dir)?;
    mta.append_instance_based_destination(&args.name)?;
    finish(&mut mta)?;
    for name in mta.destination_names()? {
        println!("  destination: {}", name);
    }
    Ok(())
}
