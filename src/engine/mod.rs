//! # MTA Descriptor Engine
//!
//! [`MtaConfig`] loads a descriptor through a [`DescriptorStore`], classifies
//! its content, and exposes idempotent mutation operations. Mutations only
//! change the in-memory store and the classification maps and set the dirty
//! flag; [`MtaConfig::save`] is the single point that writes to disk.
//!
//! ## Lifecycle
//!
//! 1. Construct against a directory (`MtaConfig::new`, `with_logger`, `load`).
//!    Loading retries a bounded number of times; if the descriptor still
//!    cannot be read, the engine has an empty prefix and every mutation
//!    returns `Error::DescriptorNotLoaded`.
//! 2. Call mutation operations in sequence. Later operations rely on state
//!    left by earlier ones (e.g. a router before registering apps).
//! 3. Call `save`.
//!
//! The operations are implemented in submodules by concern: `router`,
//! `app`, `abap`, `destination`, `resources` and `params`.

mod abap;
mod app;
mod destination;
mod params;
mod resources;
mod router;

pub use router::{AbapServiceBinding, RoutingOptions, StandaloneRouterOptions};

use std::path::{Path, PathBuf};

use crate::classify::{Classification, ModuleRole, ResourceRole, RouterTopology};
use crate::constants::MTA_FILE_NAME;
use crate::descriptor::{DescriptorStore, Module, Resource, YamlDescriptor};
use crate::error::{Error, Result};
use crate::logger::Logger;
use crate::retry::{retry, RetryPolicy, Sleeper, ThreadSleeper};

/// The descriptor synthesis engine for one MTA project directory.
pub struct MtaConfig {
    dir: PathBuf,
    store: Option<Box<dyn DescriptorStore>>,
    prefix: String,
    model: Classification,
    dirty: bool,
    logger: Logger,
}

impl std::fmt::Debug for MtaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MtaConfig")
            .field("dir", &self.dir)
            .field("prefix", &self.prefix)
            .field("topology", &self.model.topology())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl MtaConfig {
    /// Load `<dir>/mta.yaml` with the default retry policy and no logging.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self::with_logger(dir, Logger::noop())
    }

    /// Load `<dir>/mta.yaml` with the default retry policy.
    pub fn with_logger<P: AsRef<Path>>(dir: P, logger: Logger) -> Self {
        Self::load(dir, &RetryPolicy::default(), &ThreadSleeper, logger)
    }

    /// Load `<dir>/mta.yaml`, retrying according to `policy`.
    pub fn load<P: AsRef<Path>>(
        dir: P,
        policy: &RetryPolicy,
        sleeper: &dyn Sleeper,
        logger: Logger,
    ) -> Self {
        let dir = dir.as_ref();
        let path = dir.join(MTA_FILE_NAME);
        let opened = retry(policy, sleeper, |attempt| {
            YamlDescriptor::open(&path).inspect_err(|err| {
                logger.debug(format_args!(
                    "Attempt {} to load {} failed: {}",
                    attempt,
                    path.display(),
                    err
                ));
            })
        });
        match opened {
            Ok(store) => Self::from_store(dir, Box::new(store), logger),
            Err(err) => {
                logger.warn(format_args!(
                    "Unable to load MTA descriptor {}: {}",
                    path.display(),
                    err
                ));
                Self::unloaded(dir, logger)
            }
        }
    }

    /// Classify the content of an already opened store.
    pub fn from_store<P: AsRef<Path>>(
        dir: P,
        store: Box<dyn DescriptorStore>,
        logger: Logger,
    ) -> Self {
        let dir = dir.as_ref();
        let loaded = store.id().and_then(|id| {
            let modules = store.modules()?;
            let resources = store.resources()?;
            Ok((id, Classification::build(&modules, &resources)))
        });
        match loaded {
            Ok((prefix, model)) => {
                logger.debug(format_args!(
                    "Loaded MTA '{}' with topology {:?}",
                    prefix,
                    model.topology()
                ));
                Self {
                    dir: dir.to_path_buf(),
                    store: Some(store),
                    prefix,
                    model,
                    dirty: false,
                    logger,
                }
            }
            Err(err) => {
                logger.warn(format_args!("Unable to read MTA descriptor: {}", err));
                Self::unloaded(dir, logger)
            }
        }
    }

    fn unloaded(dir: &Path, logger: Logger) -> Self {
        Self {
            dir: dir.to_path_buf(),
            store: None,
            prefix: String::new(),
            model: Classification::default(),
            dirty: false,
            logger,
        }
    }

    /// The descriptor ID; empty when no descriptor could be loaded.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_some()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn mta_path(&self) -> PathBuf {
        self.dir.join(MTA_FILE_NAME)
    }

    pub fn topology(&self) -> RouterTopology {
        self.model.topology()
    }

    pub fn model(&self) -> &Classification {
        &self.model
    }

    /// Whether any mutation changed the model since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// All modules currently in the descriptor.
    pub fn modules(&self) -> Result<Vec<Module>> {
        self.store()?.modules()
    }

    /// All resources currently in the descriptor.
    pub fn resources(&self) -> Result<Vec<Resource>> {
        self.store()?.resources()
    }

    /// Write the descriptor if any mutation changed it.
    ///
    /// Returns whether a write happened.
    pub fn save(&mut self) -> Result<bool> {
        if !self.dirty {
            self.logger
                .debug(format_args!("No changes to {}", self.mta_path().display()));
            return Ok(false);
        }
        self.store_mut()?.save()?;
        self.dirty = false;
        self.logger
            .info(format_args!("Saved {}", self.mta_path().display()));
        Ok(true)
    }

    fn store(&self) -> Result<&dyn DescriptorStore> {
        self.store
            .as_deref()
            .ok_or_else(|| Error::DescriptorNotLoaded {
                dir: self.dir.display().to_string(),
            })
    }

    fn store_mut(&mut self) -> Result<&mut dyn DescriptorStore> {
        let dir = &self.dir;
        match self.store.as_deref_mut() {
            Some(store) => Ok(store),
            None => Err(Error::DescriptorNotLoaded {
                dir: dir.display().to_string(),
            }),
        }
    }

    /// Add `module` and track it under `role`.
    ///
    /// A module with the same name and type is reused instead of duplicated;
    /// one with the same name but another type is a [`Error::NameConflict`].
    fn add_module(&mut self, role: Option<ModuleRole>, module: Module) -> Result<()> {
        let existing = self
            .store()?
            .modules()?
            .into_iter()
            .find(|m| m.name == module.name);
        if let Some(existing) = existing {
            if existing.module_type != module.module_type {
                return Err(Error::NameConflict {
                    name: module.name,
                    existing: format!("a module of type '{}'", existing.module_type),
                });
            }
            self.logger
                .warn(format_args!("Module {} already exists, reusing it", existing.name));
            if let Some(role) = role {
                self.model.track_module(role, existing);
            }
            return Ok(());
        }
        self.store_mut()?.add_module(module.clone())?;
        self.logger
            .info(format_args!("Added module {}", module.name));
        if let Some(role) = role {
            self.model.track_module(role, module);
        }
        self.dirty = true;
        Ok(())
    }

    fn update_module(&mut self, role: ModuleRole, module: Module) -> Result<()> {
        self.store_mut()?.update_module(module.clone())?;
        self.model.track_module(role, module);
        self.dirty = true;
        Ok(())
    }

    /// Add `resource` and track it under `role`.
    ///
    /// A resource with the same name and service is reused, whatever its
    /// resource type; one with the same name but another service is a
    /// [`Error::NameConflict`].
    fn add_resource(&mut self, role: Option<ResourceRole>, resource: Resource) -> Result<()> {
        let existing = self
            .store()?
            .resources()?
            .into_iter()
            .find(|r| r.name == resource.name);
        if let Some(existing) = existing {
            if existing.parameters.service != resource.parameters.service {
                return Err(Error::NameConflict {
                    name: resource.name,
                    existing: format!(
                        "a resource of service '{}'",
                        existing.parameters.service.as_deref().unwrap_or("none")
                    ),
                });
            }
            self.logger.warn(format_args!(
                "Resource {} already exists, reusing it",
                existing.name
            ));
            if let Some(role) = role {
                self.model.track_resource(role, existing);
            }
            return Ok(());
        }
        self.store_mut()?.add_resource(resource.clone())?;
        self.logger
            .info(format_args!("Added resource {}", resource.name));
        if let Some(role) = role {
            self.model.track_resource(role, resource);
        }
        self.dirty = true;
        Ok(())
    }

    fn update_resource(&mut self, role: ResourceRole, resource: Resource) -> Result<()> {
        self.store_mut()?.update_resource(resource.clone())?;
        self.model.track_resource(role, resource);
        self.dirty = true;
        Ok(())
    }

    /// Name of the resource tracked for `role`.
    fn resource_name(&self, role: ResourceRole) -> Option<String> {
        self.model.resource(role).map(|r| r.name.clone())
    }

    /// Ensure the module tracked for `role` requires `name`. No-op when the
    /// module is absent or the edge exists.
    fn ensure_module_requires(&mut self, role: ModuleRole, name: &str) -> Result<bool> {
        let Some(mut module) = self.model.module(role).cloned() else {
            return Ok(false);
        };
        if !module.add_requires(crate::descriptor::Requires::named(name)) {
            return Ok(false);
        }
        self.logger
            .debug(format_args!("Module {} now requires {}", module.name, name));
        self.update_module(role, module)?;
        Ok(true)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::logger::capture::CaptureLog;
    use std::sync::Arc;

    pub const SERVER_ONLY: &str = r#"_schema-version: '3.2'
ID: demo
version: 0.0.1
modules:
- name: demo-srv
  type: nodejs
  path: gen/srv
  provides:
  - name: srv-api
    properties:
      srv-url: ${default-url}
"#;

    /// Engine over an in-memory descriptor parsed from `yaml`.
    pub fn engine(yaml: &str) -> MtaConfig {
        let store = YamlDescriptor::parse("/virtual/mta.yaml", yaml).unwrap();
        MtaConfig::from_store("/virtual", Box::new(store), Logger::noop())
    }

    pub fn engine_with_capture(yaml: &str) -> (MtaConfig, Arc<CaptureLog>) {
        let sink = Arc::new(CaptureLog::default());
        let store = YamlDescriptor::parse("/virtual/mta.yaml", yaml).unwrap();
        let engine = MtaConfig::from_store("/virtual", Box::new(store), Logger::new(sink.clone()));
        (engine, sink)
    }

    pub fn snapshot(engine: &MtaConfig) -> (Vec<Module>, Vec<Resource>) {
        (engine.modules().unwrap(), engine.resources().unwrap())
    }

    /// Forget pending changes as if they had been saved.
    pub fn mark_clean(engine: &mut MtaConfig) {
        engine.dirty = false;
    }
}
