//! # App Command Implementation

use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::{finish, open_project};

/// Register an HTML5 application
#[derive(Args, Debug)]
pub struct AppArgs {
    /// Module name of the application
    pub name: String,

    /// Path of the application, relative to mta.yaml (defaults to the name)
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,
}

/// Execute the `app` command.
pub fn execute(dir: &Path, args: AppArgs) -> Result<()> {
    let mut mta = open_project(dir)?;
    let path = args.path.as_deref().unwrap_or(&args.name);
    mta.add_app(&args.name, path)?;
    finish(&mut mta)
}
