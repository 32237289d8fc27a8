//! Destination service resource and the destinations it declares.

use serde_yaml::Value;

use super::MtaConfig;
use crate::classify::{ModuleRole, ResourceRole, RouterTopology};
use crate::constants::*;
use crate::descriptor::{Destination, DestinationConfig, Requires, Resource, ResourceParameters};
use crate::error::{Error, Result};
use crate::merge::extension::{self, ExtensionOutcome, HeaderConfig};
use crate::naming::{role_name, NameRole};

impl MtaConfig {
    /// Create the destination resource, or bring the existing one up to date.
    ///
    /// `HTML5Runtime_enabled` is true whenever the managed topology is in use
    /// or `html5_runtime` is requested.
    pub(crate) fn ensure_destination(&mut self, html5_runtime: bool) -> Result<()> {
        if self.model.has_resource(ResourceRole::Destination) {
            self.update_destination(html5_runtime)
        } else {
            self.add_destination_resource(html5_runtime)
        }
    }

    fn add_destination_resource(&mut self, html5_runtime: bool) -> Result<()> {
        let name = role_name(NameRole::Destination, &self.prefix);
        let mut resource = Resource::managed(
            name.clone(),
            ResourceParameters::service(DESTINATION_SERVICE, LITE_PLAN, name),
        );
        let mut config = DestinationConfig::with_destinations(vec![Destination::ui5()]);
        config.html5_runtime_enabled =
            Some(html5_runtime || self.topology() == RouterTopology::Managed);
        config.version = Some(DESTINATION_CONFIG_VERSION.to_string());
        resource.set_config(&config)?;
        self.add_resource(Some(ResourceRole::Destination), resource)
    }

    /// Set `HTML5Runtime_enabled` from the topology, switching it off again
    /// outside the managed router, and make sure the UI5 CDN destination
    /// exists. Only writes when something changed.
    fn update_destination(&mut self, html5_runtime: bool) -> Result<()> {
        let Some(mut resource) = self.model.resource(ResourceRole::Destination).cloned() else {
            return Ok(());
        };
        let mut config: DestinationConfig = resource.config()?;
        let before = config.clone();

        config.html5_runtime_enabled =
            Some(html5_runtime || self.topology() == RouterTopology::Managed);
        config.add_destination(Destination::ui5());

        if config == before {
            return Ok(());
        }
        self.logger.debug(format_args!(
            "Updating destination resource {}",
            resource.name
        ));
        resource.set_config(&config)?;
        self.update_resource(ResourceRole::Destination, resource)
    }

    /// Every router-like or content-like module must require the destination
    /// resource.
    pub(crate) fn wire_destination_edges(&mut self) -> Result<()> {
        let Some(destination) = self.resource_name(ResourceRole::Destination) else {
            return Ok(());
        };
        for role in [ModuleRole::StandaloneRouter, ModuleRole::DestinationContent] {
            self.ensure_module_requires(role, &destination)?;
        }
        Ok(())
    }

    /// Declare an instance-based destination pointing at the server module's
    /// own URL, and let the server module bind XSUAA.
    ///
    /// Passing [`DEFAULT_SERVICE_DESTINATION`] resolves to `<prefix>-srv-api`.
    pub fn append_instance_based_destination(&mut self, name: &str) -> Result<()> {
        self.store()?;
        self.ensure_destination(false)?;
        let Some(mut resource) = self.model.resource(ResourceRole::Destination).cloned() else {
            return Ok(());
        };

        let mut changed = resource.add_requires(Requires::named(SRV_API));
        let destination_name = if name == DEFAULT_SERVICE_DESTINATION {
            role_name(NameRole::SrvApiDestination, &self.prefix)
        } else {
            name.to_string()
        };

        let mut config: DestinationConfig = resource.config()?;
        let destination = Destination::http(destination_name, SRV_URL_REFERENCE)
            .with_property("HTML5.DynamicDestination", true)
            .with_property("HTML5.ForwardAuthToken", true);
        if config.add_destination(destination) {
            resource.set_config(&config)?;
            changed = true;
        }
        if changed {
            self.update_resource(ResourceRole::Destination, resource)?;
        }

        self.secure_server_module()
    }

    /// Attach the XSUAA requirement to the server runtime module, nodejs
    /// first, then java. Tolerates absence of either.
    fn secure_server_module(&mut self) -> Result<()> {
        let Some(xsuaa) = self.resource_name(ResourceRole::ManagedXsuaa) else {
            self.logger.debug(format_args!(
                "No XSUAA resource, server module left unsecured"
            ));
            return Ok(());
        };
        for role in [ModuleRole::ServerNodejs, ModuleRole::ServerJava] {
            if self.model.has_module(role) {
                self.ensure_module_requires(role, &xsuaa)?;
                return Ok(());
            }
        }
        self.logger
            .debug(format_args!("No server module to secure with {}", xsuaa));
        Ok(())
    }

    /// Names of the destinations declared by the destination resource.
    pub fn destination_names(&self) -> Result<Vec<String>> {
        match self.model.resource(ResourceRole::Destination) {
            Some(resource) => {
                let config: DestinationConfig = resource.config()?;
                Ok(config
                    .destinations()
                    .iter()
                    .map(|d| d.name.clone())
                    .collect())
            }
            None => Ok(Vec::new()),
        }
    }

    /// Layer a destination onto the destination resource via the extension
    /// descriptor next to `mta.yaml`.
    ///
    /// The extension file is written immediately. The base descriptor is only
    /// touched if it lacks a destination resource: that resource is added in
    /// memory and the engine becomes dirty, so callers must [`MtaConfig::save`]
    /// afterwards or the extension refers to a resource missing from disk.
    pub fn add_mta_extension_config(
        &mut self,
        name: &str,
        url: &str,
        header: &HeaderConfig,
    ) -> Result<ExtensionOutcome> {
        url::Url::parse(url)?;
        self.store()?;
        if !self.model.has_resource(ResourceRole::Destination) {
            self.add_destination_resource(false)?;
        }
        let resource_name =
            self.resource_name(ResourceRole::Destination)
                .ok_or_else(|| Error::ResourceNotFound {
                    name: role_name(NameRole::Destination, &self.prefix),
                })?;
        let destination = Destination::http(name, url).with_property(
            format!("URL.headers.{}", header.key),
            Value::String(header.value.clone()),
        );
        extension::merge_destination(
            &self.dir,
            &self.prefix,
            &resource_name,
            destination,
            &self.logger,
        )
    }
}
