//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_mta(descriptors::SERVER_ONLY);
//! let mta = fixture.engine();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

use mta_config::retry::RetryPolicy;
use mta_config::retry::Sleeper;
use mta_config::{Logger, MtaConfig};

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::descriptors;
    pub use super::TestFixture;
}

/// Descriptor snippets used across tests.
#[allow(dead_code)]
pub mod descriptors {
    /// A CAP project before any router wiring: one nodejs server module.
    pub const SERVER_ONLY: &str = r#"_schema-version: '3.2'
ID: bookshop
version: 1.0.0
description: A simple CAP project
parameters:
  enable-parallel-deployments: true
modules:
- name: bookshop-srv
  type: nodejs
  path: gen/srv
  parameters:
    buildpack: nodejs_buildpack
  build-parameters:
    builder: npm
  provides:
  - name: srv-api
    properties:
      srv-url: ${default-url}
"#;

    /// A managed router content module whose destination resource was
    /// removed by hand.
    pub const MANAGED_WITHOUT_DESTINATION: &str = r#"_schema-version: '3.2'
ID: managed
version: 0.0.1
modules:
- name: managed-router
  type: approuter.nodejs
  path: router
- name: managed-destination-content
  type: com.sap.application.content
  requires:
  - name: managed-repo-host
    parameters:
      service-key:
        name: managed-repo-host-key
  parameters:
    content:
      instance:
        destinations:
        - Name: managed_html_repo_host
          ServiceInstanceName: managed-html5-service
          ServiceKeyName: managed-repo-host-key
          sap.cloud.service: managed
        existing_destinations_policy: update
  build-parameters:
    no-source: true
resources:
- name: managed-repo-host
  type: org.cloudfoundry.managed-service
  parameters:
    service: html5-apps-repo
    service-plan: app-host
    service-name: managed-html5-service
"#;

    /// A descriptor whose ID exceeds every platform name limit.
    pub fn long_prefix() -> String {
        format!("_schema-version: '3.2'\nID: {}\nversion: 0.0.1\n", "x".repeat(60))
    }
}

/// A sleeper that returns immediately.
pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: std::time::Duration) {}
}

/// A temporary project directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `mta.yaml` with `content`.
    pub fn with_mta(self, content: &str) -> Self {
        self.with_file("mta.yaml", content)
    }

    /// Write a file relative to the project root.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    pub fn mta_path(&self) -> PathBuf {
        self.path().join("mta.yaml")
    }

    pub fn ext_path(&self) -> PathBuf {
        self.path().join("mta-ext.mtaext")
    }

    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Engine over this project, loaded without retry delays.
    pub fn engine(&self) -> MtaConfig {
        self.engine_with_logger(Logger::noop())
    }

    pub fn engine_with_logger(&self, logger: Logger) -> MtaConfig {
        MtaConfig::load(self.path(), &RetryPolicy::once(), &NoSleep, logger)
    }

    /// The saved descriptor, parsed.
    pub fn saved(&self) -> mta_config::descriptor::MtaDocument {
        serde_yaml::from_str(&self.read("mta.yaml")).expect("Saved descriptor is invalid")
    }

    /// A command running the binary against this project.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mta-config");
        cmd.current_dir(self.path());
        cmd.env_remove("MTA_CONFIG_DIR");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
