//! # Descriptor Store
//!
//! The engine never touches YAML text directly. It reads and writes modules,
//! resources and top-level parameters through the [`DescriptorStore`] trait,
//! which owns persistence. [`YamlDescriptor`] is the file-backed
//! implementation used by the application; tests may substitute their own.
//!
//! Updates are keyed by name and fail with `ModuleNotFound` /
//! `ResourceNotFound` when no entry with that name exists. Nothing reaches the
//! disk until [`DescriptorStore::save`] is called.

pub mod model;
pub mod yaml;

use serde_yaml::Mapping;

use crate::error::Result;
pub use model::{
    BuildParameters, BuildRequires, Destination, DestinationConfig, Module, Provides, Requires,
    Resource, ResourceParameters, XsuaaConfig,
};
pub use yaml::{create_mta, find_mta_dir, MtaDocument, YamlDescriptor};

/// Get/add/update access to an MTA descriptor.
pub trait DescriptorStore {
    /// The descriptor `ID`, used as the prefix of every generated name.
    fn id(&self) -> Result<String>;

    fn modules(&self) -> Result<Vec<Module>>;

    fn resources(&self) -> Result<Vec<Resource>>;

    fn add_module(&mut self, module: Module) -> Result<()>;

    /// Replace the module with the same name.
    fn update_module(&mut self, module: Module) -> Result<()>;

    fn add_resource(&mut self, resource: Resource) -> Result<()>;

    /// Replace the resource with the same name.
    fn update_resource(&mut self, resource: Resource) -> Result<()>;

    /// Top-level `parameters`.
    fn parameters(&self) -> Result<Mapping>;

    fn update_parameters(&mut self, parameters: Mapping) -> Result<()>;

    /// Commit the descriptor to its backing file.
    fn save(&mut self) -> Result<()>;
}
