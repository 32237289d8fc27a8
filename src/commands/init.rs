//! # Init Command Implementation
//!
//! Creates a minimal `mta.yaml` in the project directory. An existing
//! descriptor is never overwritten.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use mta_config::descriptor::create_mta;

/// Create a new mta.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// MTA ID; characters outside [A-Za-z0-9_-] are replaced with '_'
    pub id: String,

    /// Optional description
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Execute the `init` command.
pub fn execute(dir: &Path, args: InitArgs) -> Result<()> {
    let path = create_mta(dir, &args.id, args.description.as_deref())?;
    println!("Created {}", path.display());
    println!("Run `mta-config router` to add an approuter");
    Ok(())
}
