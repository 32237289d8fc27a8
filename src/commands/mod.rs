//! # CLI Command Implementations
//!
//! Each subcommand of `mta-config` lives in its own file with:
//! - an `Args` struct derived with `clap`;
//! - an `execute` function that loads the project, calls into the
//!   `mta_config` library and saves the result.
//!
//! The helpers below are shared by every command that edits an existing
//! descriptor: locating it, loading it with a visible logger, and the error
//! messages (with hints) for when that fails.

pub mod abap;
pub mod app;
pub mod cap;
pub mod destination;
pub mod extend;
pub mod info;
pub mod init;
pub mod router;

use anyhow::Result;
use std::path::Path;

use mta_config::constants::MTA_FILE_NAME;
use mta_config::descriptor::find_mta_dir;
use mta_config::retry::{RetryPolicy, ThreadSleeper};
use mta_config::{Logger, MtaConfig};

/// Find `mta.yaml` at or above `dir` and load it.
pub fn open_project(dir: &Path) -> Result<MtaConfig> {
    let root = find_mta_dir(dir).ok_or_else(|| descriptor_not_found(dir))?;
    load_project(&root, &RetryPolicy::once())
}

/// Load `<dir>/mta.yaml` with `policy`, failing when it cannot be read.
pub fn load_project(dir: &Path, policy: &RetryPolicy) -> Result<MtaConfig> {
    let mta = MtaConfig::load(dir, policy, &ThreadSleeper, Logger::global());
    if mta.prefix().is_empty() {
        return Err(descriptor_not_loaded(&mta.mta_path()));
    }
    Ok(mta)
}

/// Write the descriptor if it changed and report what happened.
pub fn finish(mta: &mut MtaConfig) -> Result<()> {
    if mta.save()? {
        println!("Updated {}", mta.mta_path().display());
    } else {
        println!("{} is already up to date", mta.mta_path().display());
    }
    Ok(())
}

fn descriptor_not_found(dir: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "No {MTA_FILE_NAME} found in {dir} or any parent directory\n\n\
         hint: Run 'mta-config init <ID>' to create one\n\
         hint: Run 'mta-config cap' in a CAP project to generate one\n\
         hint: Use --dir or MTA_CONFIG_DIR to point at the project",
        dir = dir.display()
    )
}

fn descriptor_not_loaded(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Unable to load {path}\n\n\
         hint: Check that the file is valid YAML with a non-empty 'ID:'\n\
         hint: Re-run with --log-level debug for the parse error",
        path = path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_project_without_descriptor() {
        let temp = TempDir::new().unwrap();
        let err = open_project(temp.path()).unwrap_err().to_string();
        assert!(err.contains("No mta.yaml found"));
        assert!(err.contains("hint: Run 'mta-config init <ID>'"));
    }

    #[test]
    fn test_open_project_with_empty_id() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MTA_FILE_NAME), "ID: ''\n").unwrap();
        let err = open_project(temp.path()).unwrap_err().to_string();
        assert!(err.contains("Unable to load"));
    }

    #[test]
    fn test_open_project_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(MTA_FILE_NAME),
            "_schema-version: '3.2'\nID: demo\n",
        )
        .unwrap();
        let nested = temp.path().join("app");
        fs::create_dir_all(&nested).unwrap();

        let mta = open_project(&nested).unwrap();
        assert_eq!(mta.prefix(), "demo");
        assert_eq!(mta.dir(), temp.path());
    }
}
