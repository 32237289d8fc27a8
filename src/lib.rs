//! # MTA Configuration Library
//!
//! This library generates and mutates MTA deployment descriptors
//! (`mta.yaml`). It is used by the `mta-config` command-line tool but can be
//! embedded in any build tool that needs to add approuter, security and
//! destination wiring without hand-editing YAML.
//!
//! ## Quick Example
//!
//! ```
//! use mta_config::descriptor::YamlDescriptor;
//! use mta_config::{Logger, MtaConfig, RoutingOptions, StandaloneRouterOptions};
//!
//! let yaml = "_schema-version: '3.2'\nID: demo\nversion: 0.0.1\n";
//! let store = YamlDescriptor::parse("mta.yaml", yaml).unwrap();
//! let mut mta = MtaConfig::from_store(".", Box::new(store), Logger::noop());
//!
//! mta.add_standalone_router(&StandaloneRouterOptions::default()).unwrap();
//! mta.add_routing_modules(&RoutingOptions::default()).unwrap();
//! mta.add_app("app1", "app1").unwrap();
//!
//! assert_eq!(mta.prefix(), "demo");
//! assert!(mta.is_dirty());
//! ```
//!
//! ## Core Concepts
//!
//! - **Descriptor store (`descriptor`)**: typed modules and resources behind
//!   the [`descriptor::DescriptorStore`] trait, with a file-backed YAML
//!   implementation.
//! - **Classification (`classify`)**: semantic roles for resources and
//!   modules, and the router topology derived from them.
//! - **Engine (`engine`)**: [`MtaConfig`], the idempotent mutation operations
//!   and the single save point.
//! - **Naming (`naming`)**: platform-safe, length-capped names derived from
//!   the descriptor ID.
//! - **Extension merge (`merge`)**: destinations layered over the base
//!   descriptor through `mta-ext.mtaext`.
//! - **Tools (`tools`)**: external tool preconditions and CAP generation.

pub mod classify;
pub mod constants;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod logger;
pub mod merge;
pub mod naming;
pub mod retry;
pub mod tools;

pub use classify::{ModuleRole, ResourceRole, RouterTopology};
pub use engine::{AbapServiceBinding, MtaConfig, RoutingOptions, StandaloneRouterOptions};
pub use error::{Error, Result};
pub use logger::Logger;
pub use merge::extension::{ExtensionOutcome, HeaderConfig};

#[cfg(test)]
mod naming_proptest;
