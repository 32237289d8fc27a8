//! Approuter composition: standalone router, managed router content and the
//! reconciliation pass shared by every topology.

use serde::Serialize;
use serde_yaml::Value;

use super::MtaConfig;
use crate::classify::{ModuleRole, ResourceRole};
use crate::constants::*;
use crate::descriptor::model::mapping;
use crate::descriptor::{BuildParameters, Module, Requires};
use crate::error::Result;
use crate::naming::{app_host_destination, role_name, xsuaa_destination, NameRole};

/// Extra wiring for [`MtaConfig::add_standalone_router`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandaloneRouterOptions {
    /// Bind the connectivity service to the router.
    pub connectivity: bool,
    /// Bind an existing ABAP service to the router.
    pub abap_service: Option<AbapServiceBinding>,
}

/// An existing ABAP environment service instance to bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbapServiceBinding {
    pub service_name: String,
    pub btp_service: String,
}

/// Options for [`MtaConfig::add_routing_modules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingOptions {
    /// Add the managed approuter destination content.
    pub managed: bool,
    /// Run [`MtaConfig::cleanup_missing_resources`] afterwards.
    pub add_missing_modules: bool,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            managed: false,
            add_missing_modules: true,
        }
    }
}

#[derive(Serialize)]
struct ContentDestination {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Authentication", skip_serializing_if = "Option::is_none")]
    authentication: Option<&'static str>,
    #[serde(rename = "ServiceInstanceName")]
    service_instance_name: String,
    #[serde(rename = "ServiceKeyName")]
    service_key_name: String,
    #[serde(rename = "sap.cloud.service")]
    cloud_service: String,
}

#[derive(Serialize)]
struct ContentInstance {
    destinations: Vec<ContentDestination>,
    existing_destinations_policy: &'static str,
}

impl MtaConfig {
    /// Add the standalone approuter module and the resources it depends on.
    ///
    /// XSUAA, HTML5 app-runtime and destination resources are created when
    /// absent. A router that already exists only gains missing edges.
    pub fn add_standalone_router(&mut self, options: &StandaloneRouterOptions) -> Result<()> {
        self.store()?;
        self.ensure_xsuaa()?;
        self.ensure_html5_runtime()?;
        self.ensure_destination(false)?;

        let required: Vec<String> = [
            ResourceRole::Html5AppRuntime,
            ResourceRole::ManagedXsuaa,
            ResourceRole::Destination,
        ]
        .into_iter()
        .filter_map(|role| self.resource_name(role))
        .collect();

        if self.model.has_module(ModuleRole::StandaloneRouter) {
            for name in &required {
                self.ensure_module_requires(ModuleRole::StandaloneRouter, name)?;
            }
        } else {
            let mut router = Module::new(
                role_name(NameRole::Router, &self.prefix),
                APPROUTER_MODULE_TYPE,
            );
            router.path = Some(ROUTER_PATH.to_string());
            router.parameters =
                mapping([("disk-quota", ROUTER_MEMORY), ("memory", ROUTER_MEMORY)]);
            for name in required {
                router.add_requires(Requires::named(name));
            }
            self.add_module(Some(ModuleRole::StandaloneRouter), router)?;
        }

        if options.connectivity {
            self.add_connectivity_resource()?;
        }
        if let Some(binding) = &options.abap_service {
            self.add_abap_service(&binding.service_name, &binding.btp_service)?;
        }
        Ok(())
    }

    /// Add the destination content module that configures the managed
    /// approuter, together with the resources it references.
    pub fn add_managed_router(&mut self) -> Result<()> {
        self.store()?;
        self.ensure_destination(true)?;
        self.ensure_xsuaa()?;
        self.ensure_app_host()?;
        if self.model.has_module(ModuleRole::DestinationContent) {
            return self.wire_destination_edges();
        }

        let (Some(destination), Some(app_host), Some(xsuaa)) = (
            self.model.resource(ResourceRole::Destination),
            self.model.resource(ResourceRole::Html5AppHost),
            self.model.resource(ResourceRole::ManagedXsuaa),
        ) else {
            return Ok(());
        };

        let cloud_service = role_name(NameRole::CloudService, &self.prefix);
        let app_host_key = role_name(NameRole::AppHostServiceKey, &self.prefix);
        let xsuaa_key = role_name(NameRole::XsuaaServiceKey, &self.prefix);
        let instance = ContentInstance {
            destinations: vec![
                ContentDestination {
                    name: app_host_destination(&self.prefix),
                    authentication: None,
                    service_instance_name: app_host
                        .parameters
                        .service_name
                        .clone()
                        .unwrap_or_else(|| role_name(NameRole::AppHostService, &self.prefix)),
                    service_key_name: app_host_key.clone(),
                    cloud_service: cloud_service.clone(),
                },
                ContentDestination {
                    name: xsuaa_destination(&self.prefix),
                    authentication: Some(TOKEN_EXCHANGE_AUTHENTICATION),
                    service_instance_name: xsuaa
                        .parameters
                        .service_name
                        .clone()
                        .unwrap_or_else(|| role_name(NameRole::XsuaaService, &self.prefix)),
                    service_key_name: xsuaa_key.clone(),
                    cloud_service,
                },
            ],
            existing_destinations_policy: EXISTING_DESTINATIONS_POLICY,
        };

        let mut content = Module::new(
            role_name(NameRole::DestinationContent, &self.prefix),
            CONTENT_MODULE_TYPE,
        );
        content.add_requires(
            Requires::named(destination.name.clone())
                .with_parameters(mapping([("content-target", true)])),
        );
        content.add_requires(
            Requires::named(app_host.name.clone()).with_parameters(service_key(app_host_key)),
        );
        content.add_requires(
            Requires::named(xsuaa.name.clone()).with_parameters(service_key(xsuaa_key)),
        );
        content.parameters = mapping([(
            "content",
            Value::Mapping(mapping([("instance", serde_yaml::to_value(&instance)?)])),
        )]);
        content.build_parameters = Some(BuildParameters {
            no_source: Some(true),
            ..BuildParameters::default()
        });

        self.add_module(Some(ModuleRole::DestinationContent), content)?;
        self.wire_destination_edges()
    }

    /// Add the managed router when requested, then reconcile missing
    /// resources and edges.
    pub fn add_routing_modules(&mut self, options: &RoutingOptions) -> Result<()> {
        self.store()?;
        if options.managed {
            self.add_managed_router()?;
        }
        if options.add_missing_modules {
            self.cleanup_missing_resources()?;
        }
        Ok(())
    }

    /// Reconcile a partially hand-edited descriptor: create the resource
    /// content module if absent, create or update the destination resource,
    /// then wire every router and content module to it.
    pub fn cleanup_missing_resources(&mut self) -> Result<()> {
        self.store()?;
        if !self.model.has_module(ModuleRole::ResourceContent) {
            self.add_app_content()?;
        }
        self.ensure_destination(false)?;
        self.wire_destination_edges()
    }
}

fn service_key(name: String) -> serde_yaml::Mapping {
    mapping([("service-key", Value::Mapping(mapping([("name", name)])))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::RouterTopology;
    use crate::descriptor::DestinationConfig;
    use crate::engine::test_support::*;

    fn router(engine: &MtaConfig) -> Module {
        engine
            .model()
            .module(ModuleRole::StandaloneRouter)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_standalone_router_requires_all_three() {
        let mut engine = engine(SERVER_ONLY);
        engine
            .add_standalone_router(&StandaloneRouterOptions::default())
            .unwrap();

        let router = router(&engine);
        assert_eq!(router.name, "demo-router");
        assert_eq!(router.path.as_deref(), Some(ROUTER_PATH));
        assert_eq!(
            router.parameters.get("memory"),
            Some(&Value::String(ROUTER_MEMORY.to_string()))
        );
        for name in ["demo-uaa", "demo-html5-repo-runtime", "demo-destination-service"] {
            assert!(router.requires_name(name), "missing {}", name);
        }
        assert_eq!(engine.topology(), RouterTopology::Standalone);
    }

    #[test]
    fn test_standalone_router_is_idempotent() {
        let mut engine = engine(SERVER_ONLY);
        let options = StandaloneRouterOptions {
            connectivity: true,
            abap_service: Some(AbapServiceBinding {
                service_name: "backend".to_string(),
                btp_service: "abap".to_string(),
            }),
        };
        engine.add_standalone_router(&options).unwrap();
        let first = snapshot(&engine);
        engine.add_standalone_router(&options).unwrap();
        assert_eq!(snapshot(&engine), first);

        let router = router(&engine);
        assert!(router.requires_name("demo-connectivity"));
        assert!(router.requires_name("demo-abap-backend"));
        assert_eq!(router.requires.len(), 5);
    }

    #[test]
    fn test_existing_router_gains_missing_edges() {
        let yaml = format!(
            "{}- name: my-router\n  type: approuter.nodejs\n  path: router\n",
            SERVER_ONLY
        );
        let mut engine = engine(&yaml);
        engine
            .add_standalone_router(&StandaloneRouterOptions::default())
            .unwrap();

        let modules = engine.modules().unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(router(&engine).name, "my-router");
        assert_eq!(router(&engine).requires.len(), 3);
    }

    #[test]
    fn test_managed_router_content_module() {
        let mut engine = engine(SERVER_ONLY);
        engine.add_managed_router().unwrap();

        assert_eq!(engine.topology(), RouterTopology::Managed);
        let content = engine
            .model()
            .module(ModuleRole::DestinationContent)
            .cloned()
            .unwrap();
        assert_eq!(content.name, "demo-destination-content");
        assert!(content.requires_name("demo-destination-service"));
        assert!(content.requires_name("demo-repo-host"));
        assert!(content.requires_name("demo-uaa"));
        assert_eq!(
            content.build_parameters.as_ref().and_then(|b| b.no_source),
            Some(true)
        );

        let yaml = serde_yaml::to_string(&content).unwrap();
        assert!(yaml.contains("Name: demo_html_repo_host"));
        assert!(yaml.contains("ServiceKeyName: demo-repo-host-key"));
        assert!(yaml.contains("Name: demo_uaa"));
        assert!(yaml.contains("Authentication: OAuth2UserTokenExchange"));
        assert!(yaml.contains("ServiceInstanceName: demo-xsuaa-service"));
        assert!(yaml.contains("sap.cloud.service: demo"));

        let destination = engine.model().resource(ResourceRole::Destination).unwrap();
        let config: DestinationConfig = destination.config().unwrap();
        assert_eq!(config.html5_runtime_enabled, Some(true));
    }

    #[test]
    fn test_managed_router_is_idempotent() {
        let mut engine = engine(SERVER_ONLY);
        engine.add_managed_router().unwrap();
        let first = snapshot(&engine);
        engine.add_managed_router().unwrap();
        assert_eq!(snapshot(&engine), first);
    }

    #[test]
    fn test_managed_wins_when_both_routers_present() {
        let mut engine = engine(SERVER_ONLY);
        engine
            .add_standalone_router(&StandaloneRouterOptions::default())
            .unwrap();
        engine
            .add_routing_modules(&RoutingOptions {
                managed: true,
                add_missing_modules: true,
            })
            .unwrap();

        assert_eq!(engine.topology(), RouterTopology::Managed);
        let destination = engine.model().resource(ResourceRole::Destination).unwrap();
        let config: DestinationConfig = destination.config().unwrap();
        assert_eq!(config.html5_runtime_enabled, Some(true));
        assert!(router(&engine).requires_name("demo-destination-service"));
    }

    #[test]
    fn test_routing_options_default_adds_missing_modules() {
        let options = RoutingOptions::default();
        assert!(!options.managed);
        assert!(options.add_missing_modules);
    }

    #[test]
    fn test_routing_without_cleanup_leaves_descriptor_alone() {
        let mut engine = engine(SERVER_ONLY);
        engine
            .add_routing_modules(&RoutingOptions {
                managed: false,
                add_missing_modules: false,
            })
            .unwrap();
        assert!(!engine.is_dirty());
    }

    #[test]
    fn test_cleanup_creates_content_and_destination() {
        let mut engine = engine(SERVER_ONLY);
        engine.cleanup_missing_resources().unwrap();

        assert!(engine.model().has_module(ModuleRole::ResourceContent));
        assert!(engine.model().has_resource(ResourceRole::Html5AppHost));
        assert!(engine.model().has_resource(ResourceRole::Destination));
        assert_eq!(engine.destination_names().unwrap(), vec![UI5_DESTINATION_NAME]);

        let first = snapshot(&engine);
        engine.cleanup_missing_resources().unwrap();
        assert_eq!(snapshot(&engine), first);
    }

    #[test]
    fn test_cap_generated_router_is_wired() {
        let yaml = format!(
            "{}- name: demo\n  type: approuter.nodejs\n  path: app/router\n",
            SERVER_ONLY
        );
        let mut engine = engine(&yaml);
        assert_eq!(engine.topology(), RouterTopology::CapGenerated);
        engine
            .add_routing_modules(&RoutingOptions::default())
            .unwrap();
        assert!(router(&engine).requires_name("demo-destination-service"));
        assert_eq!(engine.topology(), RouterTopology::CapGenerated);
    }
}
