//! File-backed descriptor store.
//!
//! The whole `mta.yaml` is parsed into an [`MtaDocument`] on open and kept in
//! memory; [`DescriptorStore::save`] serializes it back in one write.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::model::{mapping, Module, Resource};
use super::DescriptorStore;
use crate::constants::{MTA_FILE_NAME, MTA_SCHEMA_VERSION, MTA_VERSION};
use crate::error::{Error, Result};
use crate::naming;

/// The top-level shape of `mta.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MtaDocument {
    #[serde(rename = "_schema-version")]
    pub schema_version: Value,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub parameters: Mapping,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<Module>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl MtaDocument {
    /// A minimal descriptor for a new project.
    pub fn new(id: &str, description: Option<&str>) -> Self {
        Self {
            schema_version: Value::String(MTA_SCHEMA_VERSION.to_string()),
            id: naming::mta_id(id),
            version: Some(MTA_VERSION.to_string()),
            description: description.map(str::to_string),
            parameters: mapping([("enable-parallel-deployments", true)]),
            modules: Vec::new(),
            resources: Vec::new(),
            extra: Mapping::new(),
        }
    }
}

/// A descriptor held in memory and written to `path` on save.
#[derive(Debug, Clone)]
pub struct YamlDescriptor {
    path: PathBuf,
    document: MtaDocument,
}

impl YamlDescriptor {
    /// Read and parse the descriptor at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::Filesystem {
            message: format!("Failed to read '{}': {}", path.display(), e),
        })?;
        Self::parse(path, &content)
    }

    /// Parse `content` as a descriptor that will be saved to `path`.
    pub fn parse<P: AsRef<Path>>(path: P, content: &str) -> Result<Self> {
        let document: MtaDocument =
            serde_yaml::from_str(content).map_err(|err| Error::DescriptorParse {
                message: format!("{}: {}", path.as_ref().display(), err),
                hint: None,
            })?;
        if document.id.trim().is_empty() {
            return Err(Error::DescriptorParse {
                message: format!("{}: empty ID", path.as_ref().display()),
                hint: Some("Set a non-empty 'ID:' at the top of the descriptor".to_string()),
            });
        }
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            document,
        })
    }

    /// Wrap an in-memory document that will be saved to `path`.
    pub fn from_document<P: AsRef<Path>>(path: P, document: MtaDocument) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            document,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &MtaDocument {
        &self.document
    }

    /// Serialized form of the current document.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(ensure_trailing_newline(serde_yaml::to_string(
            &self.document,
        )?))
    }
}

impl DescriptorStore for YamlDescriptor {
    fn id(&self) -> Result<String> {
        Ok(self.document.id.clone())
    }

    fn modules(&self) -> Result<Vec<Module>> {
        Ok(self.document.modules.clone())
    }

    fn resources(&self) -> Result<Vec<Resource>> {
        Ok(self.document.resources.clone())
    }

    fn add_module(&mut self, module: Module) -> Result<()> {
        self.document.modules.push(module);
        Ok(())
    }

    fn update_module(&mut self, module: Module) -> Result<()> {
        match self
            .document
            .modules
            .iter_mut()
            .find(|m| m.name == module.name)
        {
            Some(existing) => {
                *existing = module;
                Ok(())
            }
            None => Err(Error::ModuleNotFound { name: module.name }),
        }
    }

    fn add_resource(&mut self, resource: Resource) -> Result<()> {
        self.document.resources.push(resource);
        Ok(())
    }

    fn update_resource(&mut self, resource: Resource) -> Result<()> {
        match self
            .document
            .resources
            .iter_mut()
            .find(|r| r.name == resource.name)
        {
            Some(existing) => {
                *existing = resource;
                Ok(())
            }
            None => Err(Error::ResourceNotFound {
                name: resource.name,
            }),
        }
    }

    fn parameters(&self) -> Result<Mapping> {
        Ok(self.document.parameters.clone())
    }

    fn update_parameters(&mut self, parameters: Mapping) -> Result<()> {
        self.document.parameters = parameters;
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let content = self.to_yaml()?;
        fs::write(&self.path, content).map_err(|e| Error::Filesystem {
            message: format!("Failed to write '{}': {}", self.path.display(), e),
        })
    }
}

pub(crate) fn ensure_trailing_newline(mut content: String) -> String {
    if !content.ends_with('\n') {
        content.push('\n');
    }
    content
}

/// Walk up from `start` to the first directory containing `mta.yaml`.
pub fn find_mta_dir<P: AsRef<Path>>(start: P) -> Option<PathBuf> {
    start
        .as_ref()
        .ancestors()
        .find(|dir| dir.join(MTA_FILE_NAME).is_file())
        .map(Path::to_path_buf)
}

/// Write a new base descriptor into `dir`. Refuses to overwrite.
pub fn create_mta<P: AsRef<Path>>(dir: P, id: &str, description: Option<&str>) -> Result<PathBuf> {
    let path = dir.as_ref().join(MTA_FILE_NAME);
    if path.exists() {
        return Err(Error::Filesystem {
            message: format!("Descriptor already exists: {}", path.display()),
        });
    }
    if naming::mta_id(id).is_empty() {
        return Err(Error::DescriptorParse {
            message: "empty ID".to_string(),
            hint: Some("Pass a non-empty MTA ID".to_string()),
        });
    }
    fs::create_dir_all(dir.as_ref()).map_err(|e| Error::Filesystem {
        message: format!(
            "Failed to create directory '{}': {}",
            dir.as_ref().display(),
            e
        ),
    })?;
    let mut store = YamlDescriptor::from_document(&path, MtaDocument::new(id, description));
    store.save()?;
    Ok(path)
}
