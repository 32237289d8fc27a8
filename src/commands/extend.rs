//! # Extend Command Implementation
//!
//! Adds a destination with a single header to `mta-ext.mtaext`, creating the
//! extension descriptor when needed. The base descriptor only changes when it
//! lacks a destination resource.

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use mta_config::{ExtensionOutcome, HeaderConfig};

use super::{finish, open_project};

/// Add a destination with a header to the extension descriptor
#[derive(Args, Debug)]
pub struct ExtendArgs {
    /// Destination name
    pub name: String,

    /// Destination URL
    pub url: String,

    /// Header attached to the destination, as KEY=VALUE
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_header)]
    pub header: HeaderConfig,
}

fn parse_header(value: &str) -> std::result::Result<HeaderConfig, String> {
    match value.split_once('=') {
        Some((key, val)) if !key.trim().is_empty() => Ok(HeaderConfig::new(key.trim(), val)),
        _ => Err(format!("expected KEY=VALUE, got '{}'", value)),
    }
}

/// Execute the `extend` command.
pub fn execute(dir: &Path, args: ExtendArgs) -> Result<()> {
    let mut mta = open_project(dir)?;
    let outcome = mta
        .add_mta_extension_config(&args.name, &args.url, &args.header)
        .with_context(|| format!("Failed to add destination '{}'", args.name))?;
    finish(&mut mta)?;
    match outcome {
        ExtensionOutcome::Created => println!("Created extension descriptor"),
        ExtensionOutcome::Appended => println!("Added destination {}", args.name),
        ExtensionOutcome::AlreadyPresent => {
            println!("Destination {} already declared", args.name)
        }
        ExtensionOutcome::ResourceMissing => anyhow::bail!(
            "The extension descriptor has no destination resource to extend\n\n\
             hint: Add a resource named like the destination resource of mta.yaml"
        ),
    }
    Ok(())
}
