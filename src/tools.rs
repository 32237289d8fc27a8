//! External tool preconditions and CAP descriptor generation.
//!
//! Tools are validated once, before any descriptor mutation runs. A missing
//! executable is reported as [`Error::ToolValidation`]; a tool that runs but
//! fails is reported as [`Error::ToolCommand`] with its stderr.

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};
use crate::logger::Logger;

/// The SAP CAP command line.
pub const CDS_TOOL: &str = "cds";

/// Which router `cds add` should generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapRouter {
    /// A standalone approuter module at `app/router`.
    Standalone,
    /// No router module; the managed approuter serves the apps.
    Managed,
}

impl CapRouter {
    /// Facets passed to `cds add`.
    pub fn facets(self) -> &'static str {
        match self {
            CapRouter::Standalone => "mta,xsuaa,destination,html5-repo,approuter",
            CapRouter::Managed => "mta,xsuaa,destination,html5-repo",
        }
    }
}

/// Check that `tool` can be executed by running `<tool> --version`.
pub fn ensure_available(tool: &str) -> Result<()> {
    let output = Command::new(tool)
        .arg("--version")
        .output()
        .map_err(|e| Error::ToolValidation {
            tool: tool.to_string(),
            message: if e.kind() == ErrorKind::NotFound {
                format!("'{}' was not found on PATH", tool)
            } else {
                e.to_string()
            },
        })?;

    if !output.status.success() {
        return Err(Error::ToolValidation {
            tool: tool.to_string(),
            message: format!(
                "'{} --version' exited with {}: {}",
                tool,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(())
}

/// Let CAP generate `mta.yaml` in `dir`.
///
/// The descriptor is written by a separate process, so callers should load
/// it with a retrying [`crate::MtaConfig::load`].
pub fn generate_cap_mta(dir: &Path, router: CapRouter, logger: &Logger) -> Result<()> {
    ensure_available(CDS_TOOL)?;
    let args = ["add", router.facets()];
    logger.info(format_args!(
        "Running {} {} in {}",
        CDS_TOOL,
        args.join(" "),
        dir.display()
    ));
    let output = run(CDS_TOOL, &args, dir)?;
    logger.debug(format_args!(
        "{}",
        String::from_utf8_lossy(&output.stdout).trim()
    ));
    Ok(())
}

fn run(tool: &str, args: &[&str], dir: &Path) -> Result<Output> {
    let command = format!("{} {}", tool, args.join(" "));
    let output = Command::new(tool)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::ToolCommand {
            command: command.clone(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::ToolCommand {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}
