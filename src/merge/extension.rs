//! Extension descriptor (`mta-ext.mtaext`) holding deployment-time
//! destinations layered over the base descriptor.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

use super::{navigate_yaml_value, parse_path, type_name};
use crate::constants::*;
use crate::descriptor::yaml::ensure_trailing_newline;
use crate::descriptor::{Destination, DestinationConfig};
use crate::error::{Error, Result};
use crate::logger::Logger;

/// A single HTTP header attached to a destination as `URL.headers.<key>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderConfig {
    pub key: String,
    pub value: String,
}

impl HeaderConfig {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// What a merge did to the extension descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionOutcome {
    /// The file did not exist (or could not be parsed) and was written fresh.
    Created,
    /// The destination was appended to the existing file.
    Appended,
    /// A destination with the same name was already declared.
    AlreadyPresent,
    /// The file has no resource named like the destination resource.
    ResourceMissing,
}

/// The shape written when no extension descriptor exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionDocument {
    #[serde(rename = "_schema-version")]
    pub schema_version: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub extends: String,
    pub version: String,
    #[serde(default)]
    pub resources: Vec<ExtensionResource>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// A resource override inside the extension descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionResource {
    pub name: String,
    #[serde(default)]
    pub parameters: ExtensionParameters,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionParameters {
    #[serde(default)]
    pub config: DestinationConfig,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl ExtensionDocument {
    /// An extension of `base_id` overriding the destinations of `resource_name`.
    pub fn new(base_id: &str, resource_name: &str, destinations: Vec<Destination>) -> Self {
        Self {
            schema_version: MTA_EXTENSION_SCHEMA_VERSION.to_string(),
            id: format!("{}-ext", base_id),
            extends: base_id.to_string(),
            version: MTA_EXTENSION_VERSION.to_string(),
            resources: vec![ExtensionResource {
                name: resource_name.to_string(),
                parameters: ExtensionParameters {
                    config: DestinationConfig::with_destinations(destinations),
                    extra: Mapping::new(),
                },
                extra: Mapping::new(),
            }],
            extra: Mapping::new(),
        }
    }
}

/// Add `destination` to the resource `resource_name` of the extension
/// descriptor in `dir`.
///
/// A missing or unparseable file is replaced by a fresh [`ExtensionDocument`]
/// holding the UI5 destination and `destination`. An existing file is edited
/// in place; when it has no matching resource the failure is logged and
/// nothing is written.
pub fn merge_destination(
    dir: &Path,
    base_id: &str,
    resource_name: &str,
    destination: Destination,
    logger: &Logger,
) -> Result<ExtensionOutcome> {
    let path = dir.join(MTA_EXTENSION_FILE_NAME);
    match read_document(&path, logger) {
        Some(document) => append(&path, document, resource_name, destination, logger),
        None => {
            let document =
                ExtensionDocument::new(base_id, resource_name, vec![Destination::ui5(), destination]);
            write(&path, &document)?;
            logger.info(format_args!("Created {}", path.display()));
            Ok(ExtensionOutcome::Created)
        }
    }
}

fn read_document(path: &Path, logger: &Logger) -> Option<Value> {
    let content = fs::read_to_string(path).ok()?;
    match serde_yaml::from_str::<Value>(&content) {
        Ok(document) if document.is_mapping() => Some(document),
        Ok(_) => {
            logger.warn(format_args!(
                "{} is not a mapping, recreating it",
                path.display()
            ));
            None
        }
        Err(err) => {
            logger.warn(format_args!(
                "Unable to parse {}, recreating it: {}",
                path.display(),
                err
            ));
            None
        }
    }
}

fn append(
    path: &Path,
    mut document: Value,
    resource_name: &str,
    destination: Destination,
    logger: &Logger,
) -> Result<ExtensionOutcome> {
    let index = document
        .get("resources")
        .and_then(Value::as_sequence)
        .and_then(|resources| {
            resources
                .iter()
                .position(|r| r.get("name").and_then(Value::as_str) == Some(resource_name))
        });
    let Some(index) = index else {
        logger.error(format_args!(
            "Resource {} not found in {}",
            resource_name,
            path.display()
        ));
        return Ok(ExtensionOutcome::ResourceMissing);
    };

    let location = format!(
        "resources[{}].parameters.config.init_data.instance.destinations",
        index
    );
    let target = navigate_yaml_value(&mut document, &parse_path(&location))?;
    if target.is_null() {
        *target = Value::Sequence(Vec::new());
    }
    let destinations = match target {
        Value::Sequence(seq) => seq,
        other => {
            return Err(Error::Merge {
                operation: "extension".to_string(),
                message: format!("{} is a {}, expected a sequence", location, type_name(other)),
            })
        }
    };
    let exists = destinations
        .iter()
        .any(|d| d.get("Name").and_then(Value::as_str) == Some(destination.name.as_str()));
    if exists {
        logger.debug(format_args!(
            "Destination {} already declared in {}",
            destination.name,
            path.display()
        ));
        return Ok(ExtensionOutcome::AlreadyPresent);
    }
    destinations.push(serde_yaml::to_value(&destination)?);

    write(path, &document)?;
    logger.info(format_args!(
        "Added destination {} to {}",
        destination.name,
        path.display()
    ));
    Ok(ExtensionOutcome::Appended)
}

fn write<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let content = ensure_trailing_newline(serde_yaml::to_string(document)?);
    fs::write(path, content).map_err(|e| Error::Filesystem {
        message: format!("Failed to write '{}': {}", path.display(), e),
    })
}
