//! Backing service resources shared by the router topologies.

use super::MtaConfig;
use crate::classify::{ModuleRole, ResourceRole};
use crate::constants::*;
use crate::descriptor::{Resource, ResourceParameters, XsuaaConfig};
use crate::error::Result;
use crate::naming::{role_name, NameRole};

impl MtaConfig {
    /// Add the managed XSUAA resource unless one is tracked.
    pub(crate) fn ensure_xsuaa(&mut self) -> Result<()> {
        if self.model.has_resource(ResourceRole::ManagedXsuaa) {
            return Ok(());
        }
        let mut parameters = ResourceParameters::service(
            XSUAA_SERVICE,
            XSUAA_PLAN,
            role_name(NameRole::XsuaaService, &self.prefix),
        );
        parameters.path = Some(XSUAA_CONFIG_PATH.to_string());
        let mut resource = Resource::managed(role_name(NameRole::Xsuaa, &self.prefix), parameters);
        resource.set_config(&XsuaaConfig {
            xsappname: Some(format!(
                "{}-${{org}}-${{space}}",
                role_name(NameRole::CloudService, &self.prefix)
            )),
            tenant_mode: Some("dedicated".to_string()),
            ..XsuaaConfig::default()
        })?;
        self.add_resource(Some(ResourceRole::ManagedXsuaa), resource)
    }

    /// Add the HTML5 app-runtime resource unless one is tracked.
    pub(crate) fn ensure_html5_runtime(&mut self) -> Result<()> {
        if self.model.has_resource(ResourceRole::Html5AppRuntime) {
            return Ok(());
        }
        let resource = Resource::managed(
            role_name(NameRole::Html5Runtime, &self.prefix),
            ResourceParameters::service(
                HTML5_REPO_SERVICE,
                APP_RUNTIME_PLAN,
                role_name(NameRole::Html5RuntimeService, &self.prefix),
            ),
        );
        self.add_resource(Some(ResourceRole::Html5AppRuntime), resource)
    }

    /// Add the HTML5 app-host resource unless one is tracked.
    pub(crate) fn ensure_app_host(&mut self) -> Result<()> {
        if self.model.has_resource(ResourceRole::Html5AppHost) {
            return Ok(());
        }
        let resource = Resource::managed(
            role_name(NameRole::AppHost, &self.prefix),
            ResourceParameters::service(
                HTML5_REPO_SERVICE,
                APP_HOST_PLAN,
                role_name(NameRole::AppHostService, &self.prefix),
            ),
        );
        self.add_resource(Some(ResourceRole::Html5AppHost), resource)
    }

    /// Add the connectivity resource if missing and wire the standalone
    /// router to it when a router exists.
    pub fn add_connectivity_resource(&mut self) -> Result<()> {
        self.store()?;
        if !self.model.has_resource(ResourceRole::Connectivity) {
            let name = role_name(NameRole::Connectivity, &self.prefix);
            let resource = Resource::managed(
                name.clone(),
                ResourceParameters::service(CONNECTIVITY_SERVICE, LITE_PLAN, name),
            );
            self.add_resource(Some(ResourceRole::Connectivity), resource)?;
        }
        if let Some(name) = self.resource_name(ResourceRole::Connectivity) {
            self.ensure_module_requires(ModuleRole::StandaloneRouter, &name)?;
        }
        Ok(())
    }
}
