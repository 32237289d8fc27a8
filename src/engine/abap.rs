//! Binding of existing ABAP environment services.

use serde_yaml::Value;

use super::MtaConfig;
use crate::classify::{ModuleRole, ResourceRole};
use crate::constants::*;
use crate::descriptor::{Resource, ResourceParameters};
use crate::error::Result;
use crate::naming::{abap_service_marker, abap_service_name};

impl MtaConfig {
    /// Bind the existing service instance `service_name` of the BTP service
    /// `btp_service` and wire the standalone router to it.
    pub fn add_abap_service(&mut self, service_name: &str, btp_service: &str) -> Result<()> {
        self.store()?;
        let name = abap_service_name(&self.prefix, service_name);
        let exists = self.resources()?.iter().any(|r| r.name == name);
        if !exists {
            let mut parameters = ResourceParameters {
                service: Some(btp_service.to_string()),
                service_name: Some(service_name.to_string()),
                ..ResourceParameters::default()
            };
            parameters.extra.insert(
                Value::String("protocol".to_string()),
                Value::Sequence(vec![Value::String(ABAP_PROTOCOL.to_string())]),
            );
            let role = (!self.model.has_resource(ResourceRole::AbapService))
                .then_some(ResourceRole::AbapService);
            self.add_resource(role, Resource::existing(name.clone(), parameters))?;
        }
        self.ensure_module_requires(ModuleRole::StandaloneRouter, &name)?;
        Ok(())
    }

    /// Whether any resource binds an ABAP service for this prefix.
    pub fn has_abap_service_binding(&self) -> bool {
        let marker = abap_service_marker(&self.prefix);
        self.store()
            .and_then(|store| store.resources())
            .map(|resources| resources.iter().any(|r| r.name.starts_with(&marker)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::engine::StandaloneRouterOptions;

    #[test]
    fn test_abap_service_resource_shape() {
        let mut engine = engine(SERVER_ONLY);
        assert!(!engine.has_abap_service_binding());
        engine.add_abap_service("backend", "abap").unwrap();

        let resource = engine.model().resource(ResourceRole::AbapService).unwrap();
        assert_eq!(resource.name, "demo-abap-backend");
        assert!(resource.is_existing());
        assert_eq!(resource.parameters.service.as_deref(), Some("abap"));
        assert_eq!(resource.parameters.service_name.as_deref(), Some("backend"));
        let yaml = serde_yaml::to_string(resource).unwrap();
        assert!(yaml.contains("- ODataV2"));
        assert!(engine.has_abap_service_binding());
    }

    #[test]
    fn test_abap_service_is_idempotent() {
        let mut engine = engine(SERVER_ONLY);
        engine
            .add_standalone_router(&StandaloneRouterOptions::default())
            .unwrap();
        engine.add_abap_service("backend", "abap").unwrap();
        let first = snapshot(&engine);
        engine.add_abap_service("backend", "abap").unwrap();
        assert_eq!(snapshot(&engine), first);

        let router = engine.model().module(ModuleRole::StandaloneRouter).unwrap();
        assert!(router.requires_name("demo-abap-backend"));
    }

    #[test]
    fn test_abap_names_are_capped() {
        let prefix = "p".repeat(40);
        let yaml = format!("_schema-version: '3.2'\nID: {}\n", prefix);
        let mut engine = engine(&yaml);
        engine
            .add_abap_service("a-very-long-abap-service-instance", "abap")
            .unwrap();

        let name = &engine.resources().unwrap()[0].name;
        assert_eq!(name.len(), 24 + crate::naming::ABAP_MARKER.len() + 20);
        assert!(name.starts_with(&"p".repeat(24)));
    }

    #[test]
    fn test_unloaded_engine_has_no_binding() {
        let engine = crate::engine::MtaConfig::load(
            "/nonexistent/mta-config",
            &crate::retry::RetryPolicy::once(),
            &crate::retry::fake::FakeSleeper::default(),
            crate::logger::Logger::noop(),
        );
        assert!(!engine.has_abap_service_binding());
    }
}
