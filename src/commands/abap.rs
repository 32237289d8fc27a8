//! # ABAP Service Command Implementation

use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::{finish, open_project};

/// Bind an existing ABAP service instance
#[derive(Args, Debug)]
pub struct AbapServiceArgs {
    /// Name of the existing service instance
    pub service_name: String,

    /// BTP service of the instance
    #[arg(long, value_name = "SERVICE", default_value = "abap")]
    pub btp_service: String,
}

/// Execute the `abap-service` command.
pub fn execute(dir: &Path, args: AbapServiceArgs) -> Result<()> {
    let mut mta = open_project(dir)?;
    mta.add_abap_service(&args.service_name, &args.btp_service)?;
    finish(&mut mta)
}
