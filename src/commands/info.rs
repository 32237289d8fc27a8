//! # Info Command Implementation
//!
//! Read-only overview of the descriptor: its ID, the router topology, and
//! which modules and resources were classified into which role.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use mta_config::MtaConfig;

use super::open_project;

/// Show the classified content of mta.yaml
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Also list the modules and resources without a role
    #[arg(short, long)]
    pub all: bool,
}

/// Execute the `info` command.
pub fn execute(dir: &Path, args: InfoArgs) -> Result<()> {
    let mta = open_project(dir)?;
    print!("{}", render(&mta, args.all)?);
    Ok(())
}

fn render(mta: &MtaConfig, all: bool) -> Result<String> {
    let mut out = String::new();
    let model = mta.model();
    out.push_str(&format!("MTA: {}\n", mta.prefix()));
    out.push_str(&format!("Descriptor: {}\n", mta.mta_path().display()));
    out.push_str(&format!("Router topology: {:?}\n", mta.topology()));

    out.push_str("Modules:\n");
    for (role, module) in model.module_roles() {
        out.push_str(&format!("  {:?}: {}\n", role, module.name));
    }
    out.push_str("Resources:\n");
    for (role, resource) in model.resource_roles() {
        out.push_str(&format!("  {:?}: {}\n", role, resource.name));
    }

    if all {
        let tracked_modules: Vec<_> = model.module_roles().map(|(_, m)| &m.name).collect();
        for module in mta.modules()? {
            if !tracked_modules.contains(&&module.name) {
                out.push_str(&format!("  other module: {} ({})\n", module.name, module.module_type));
            }
        }
        let tracked_resources: Vec<_> = model.resource_roles().map(|(_, r)| &r.name).collect();
        for resource in mta.resources()? {
            if !tracked_resources.contains(&&resource.name) {
                out.push_str(&format!("  other resource: {}\n", resource.name));
            }
        }
    }

    let destinations = mta.destination_names()?;
    if !destinations.is_empty() {
        out.push_str(&format!("Destinations: {}\n", destinations.join(", ")));
    }
    if mta.has_abap_service_binding() {
        out.push_str("ABAP service bound: yes\n");
    }
    Ok(out)
}
