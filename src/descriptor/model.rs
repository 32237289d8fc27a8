//! Typed view of MTA descriptor entries.
//!
//! Known keys are modelled as fields; anything else is kept in a flattened
//! `extra` mapping so that hand-written content survives a load/save cycle.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::constants::*;
use crate::error::{Error, Result};

/// A deployable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(rename = "type")]
    pub module_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Requires>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<Provides>,
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub parameters: Mapping,
    #[serde(
        default,
        rename = "build-parameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub build_parameters: Option<BuildParameters>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Module {
    pub fn new(name: impl Into<String>, module_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module_type: module_type.into(),
            path: None,
            requires: Vec::new(),
            provides: Vec::new(),
            parameters: Mapping::new(),
            build_parameters: None,
            extra: Mapping::new(),
        }
    }

    pub fn requires_name(&self, name: &str) -> bool {
        self.requires.iter().any(|r| r.name == name)
    }

    /// Add a `requires` edge unless one with the same name exists.
    /// Returns whether the module changed.
    pub fn add_requires(&mut self, requires: Requires) -> bool {
        if self.requires_name(&requires.name) {
            return false;
        }
        self.requires.push(requires);
        true
    }
}

/// An edge from a module or resource to a resource or provided API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requires {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Mapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Mapping>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Requires {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: None,
            properties: None,
            parameters: None,
            extra: Mapping::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Mapping) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// An API a module exposes to others, e.g. `srv-api`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provides {
    pub name: String,
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub properties: Mapping,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// `build-parameters` of a module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_platforms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_source: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<BuildRequires>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// An artifact reference inside `build-parameters.requires`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildRequires {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// A backing service binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub parameters: ResourceParameters,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Requires>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Resource {
    pub fn managed(name: impl Into<String>, parameters: ResourceParameters) -> Self {
        Self::new(name, MANAGED_SERVICE, parameters)
    }

    pub fn existing(name: impl Into<String>, parameters: ResourceParameters) -> Self {
        Self::new(name, EXISTING_SERVICE, parameters)
    }

    fn new(
        name: impl Into<String>,
        resource_type: &str,
        parameters: ResourceParameters,
    ) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.to_string(),
            parameters,
            requires: Vec::new(),
            extra: Mapping::new(),
        }
    }

    pub fn is_managed(&self) -> bool {
        self.resource_type == MANAGED_SERVICE
    }

    pub fn is_existing(&self) -> bool {
        self.resource_type == EXISTING_SERVICE
    }

    /// Add a `requires` edge unless one with the same name exists.
    pub fn add_requires(&mut self, requires: Requires) -> bool {
        if self.requires.iter().any(|r| r.name == requires.name) {
            return false;
        }
        self.requires.push(requires);
        true
    }

    /// Read the `config` block as a typed shape.
    pub fn config<T: DeserializeOwned + Default>(&self) -> Result<T> {
        match &self.parameters.config {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => {
                serde_yaml::from_value(value.clone()).map_err(|err| Error::InvalidParameters {
                    name: self.name.clone(),
                    message: err.to_string(),
                })
            }
        }
    }

    /// Replace the `config` block with a typed shape.
    pub fn set_config<T: Serialize>(&mut self, config: &T) -> Result<()> {
        self.parameters.config = Some(serde_yaml::to_value(config)?);
        Ok(())
    }
}

/// `parameters` of a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResourceParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl ResourceParameters {
    pub fn service(service: &str, plan: &str, service_name: impl Into<String>) -> Self {
        Self {
            service: Some(service.to_string()),
            service_plan: Some(plan.to_string()),
            service_name: Some(service_name.into()),
            ..Self::default()
        }
    }
}

/// `config` of the destination resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationConfig {
    #[serde(
        default,
        rename = "HTML5Runtime_enabled",
        skip_serializing_if = "Option::is_none"
    )]
    pub html5_runtime_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_data: Option<InitData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl DestinationConfig {
    /// Config of a fresh destination resource holding `destinations`.
    pub fn with_destinations(destinations: Vec<Destination>) -> Self {
        Self {
            html5_runtime_enabled: None,
            init_data: Some(InitData {
                instance: DestinationInstance {
                    destinations,
                    existing_destinations_policy: Some(EXISTING_DESTINATIONS_POLICY.to_string()),
                    extra: Mapping::new(),
                },
                extra: Mapping::new(),
            }),
            version: None,
            extra: Mapping::new(),
        }
    }

    pub fn destinations(&self) -> &[Destination] {
        self.init_data
            .as_ref()
            .map(|data| data.instance.destinations.as_slice())
            .unwrap_or_default()
    }

    /// Append `destination` unless one with the same name exists.
    pub fn add_destination(&mut self, destination: Destination) -> bool {
        let instance = &mut self
            .init_data
            .get_or_insert_with(|| InitData {
                instance: DestinationInstance {
                    destinations: Vec::new(),
                    existing_destinations_policy: Some(
                        EXISTING_DESTINATIONS_POLICY.to_string(),
                    ),
                    extra: Mapping::new(),
                },
                extra: Mapping::new(),
            })
            .instance;
        if instance.destinations.iter().any(|d| d.name == destination.name) {
            return false;
        }
        instance.destinations.push(destination);
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitData {
    #[serde(default)]
    pub instance: DestinationInstance,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationInstance {
    #[serde(default)]
    pub destinations: Vec<Destination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_destinations_policy: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// A single destination configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Authentication", default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
    #[serde(rename = "ProxyType", default, skip_serializing_if = "Option::is_none")]
    pub proxy_type: Option<String>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub destination_type: Option<String>,
    #[serde(rename = "URL", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Destination {
    /// An unauthenticated HTTP destination reachable over the internet.
    pub fn http(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            authentication: Some(NO_AUTHENTICATION.to_string()),
            proxy_type: Some(INTERNET_PROXY.to_string()),
            destination_type: Some(HTTP_DESTINATION.to_string()),
            url: Some(url.into()),
            extra: Mapping::new(),
        }
    }

    /// The default UI5 CDN destination.
    pub fn ui5() -> Self {
        Self::http(UI5_DESTINATION_NAME, UI5_DESTINATION_URL)
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(Value::String(key.into()), value.into());
        self
    }
}

/// `config` of the XSUAA resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct XsuaaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xsappname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_mode: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// Build a YAML mapping from string keys.
pub(crate) fn mapping<I, K, V>(entries: I) -> Mapping
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    entries
        .into_iter()
        .map(|(k, v)| (Value::String(k.into()), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_keeps_unknown_keys() {
        let yaml = r#"
name: srv
type: nodejs
path: gen/srv
deployed-after: [db]
parameters:
  buildpack: nodejs_buildpack
"#;
        let module: Module = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(module.module_type, NODEJS_MODULE_TYPE);
        assert_eq!(module.path.as_deref(), Some("gen/srv"));
        assert!(module.extra.contains_key("deployed-after"));

        let back = serde_yaml::to_string(&module).unwrap();
        assert!(back.contains("deployed-after"));
        assert!(back.contains("buildpack: nodejs_buildpack"));
    }

    #[test]
    fn test_add_requires_is_idempotent() {
        let mut module = Module::new("demo-router", APPROUTER_MODULE_TYPE);
        assert!(module.add_requires(Requires::named("demo-uaa")));
        assert!(!module.add_requires(Requires::named("demo-uaa")));
        assert_eq!(module.requires.len(), 1);
    }

    #[test]
    fn test_destination_config_roundtrip_through_resource() {
        let mut resource = Resource::managed(
            "demo-destination-service",
            ResourceParameters::service(DESTINATION_SERVICE, LITE_PLAN, "demo-destination-service"),
        );
        let mut config = DestinationConfig::with_destinations(vec![Destination::ui5()]);
        config.html5_runtime_enabled = Some(true);
        resource.set_config(&config).unwrap();

        let yaml = serde_yaml::to_string(&resource).unwrap();
        assert!(yaml.contains("HTML5Runtime_enabled: true"));
        assert!(yaml.contains("existing_destinations_policy: update"));

        let read: DestinationConfig = resource.config().unwrap();
        assert_eq!(read.destinations().len(), 1);
        assert_eq!(read.destinations()[0].name, UI5_DESTINATION_NAME);
    }

    #[test]
    fn test_malformed_config_is_invalid_parameters() {
        let mut resource = Resource::managed("dest", ResourceParameters::default());
        resource.parameters.config = Some(serde_yaml::from_str("init_data: 42").unwrap());
        let result: Result<DestinationConfig> = resource.config();
        assert!(matches!(result, Err(Error::InvalidParameters { .. })));
    }

    #[test]
    fn test_add_destination_skips_duplicates() {
        let mut config = DestinationConfig::default();
        assert!(config.add_destination(Destination::ui5()));
        assert!(!config.add_destination(Destination::ui5()));
        assert_eq!(config.destinations().len(), 1);
    }

    #[test]
    fn test_destination_extra_properties() {
        let destination = Destination::http("backend", "https://example.com")
            .with_property("URL.headers.apikey", "secret");
        let yaml = serde_yaml::to_string(&destination).unwrap();
        assert!(yaml.contains("URL.headers.apikey: secret"));
        assert!(yaml.contains("Authentication: NoAuthentication"));
    }
}
