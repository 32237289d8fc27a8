//! # Semantic Classification
//!
//! Descriptor entries are grouped into semantic roles so that mutation
//! operations can ask "is there already a destination resource?" instead of
//! searching by name. Classification is first-match-wins: at most one module
//! and one resource is tracked per role, which is what makes every mutation
//! idempotent.
//!
//! The router topology of the descriptor is derived from the tracked module
//! roles and kept as a single [`RouterTopology`] value.

use std::collections::BTreeMap;

use crate::constants::*;
use crate::descriptor::{Module, Resource};
use crate::naming::ABAP_MARKER;

/// Role of a resource in the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceRole {
    ManagedXsuaa,
    Html5AppHost,
    Html5AppRuntime,
    Destination,
    Connectivity,
    AbapService,
}

impl ResourceRole {
    /// Role of `resource`, or `None` for resources this engine does not manage.
    ///
    /// Destination and connectivity resources are recognised by their
    /// service whether they are managed or existing services.
    pub fn classify(resource: &Resource) -> Option<Self> {
        if resource.is_existing() && resource.name.contains(ABAP_MARKER) {
            return Some(ResourceRole::AbapService);
        }
        let params = &resource.parameters;
        match params.service.as_deref()? {
            XSUAA_SERVICE if resource.is_managed() => Some(ResourceRole::ManagedXsuaa),
            HTML5_REPO_SERVICE if resource.is_managed() => match params.service_plan.as_deref() {
                Some(APP_HOST_PLAN) => Some(ResourceRole::Html5AppHost),
                Some(APP_RUNTIME_PLAN) => Some(ResourceRole::Html5AppRuntime),
                _ => None,
            },
            DESTINATION_SERVICE => Some(ResourceRole::Destination),
            CONNECTIVITY_SERVICE => Some(ResourceRole::Connectivity),
            _ => None,
        }
    }
}

/// Role of a module in the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleRole {
    Html5App,
    StandaloneRouter,
    /// Content module publishing destinations for the managed router.
    DestinationContent,
    /// Content module packaging HTML5 app bundles into the repository.
    ResourceContent,
    ServerNodejs,
    ServerJava,
}

impl ModuleRole {
    /// Role of `module`. Content modules are told apart by the resources they
    /// require, so the resource classification must be complete already.
    /// A content module that declares its own destinations is destination
    /// content regardless of its requires.
    pub fn classify(module: &Module, resources: &BTreeMap<ResourceRole, Resource>) -> Option<Self> {
        let requires_role = |role: ResourceRole| {
            resources
                .get(&role)
                .is_some_and(|resource| module.requires_name(&resource.name))
        };
        match module.module_type.as_str() {
            HTML5_MODULE_TYPE => Some(ModuleRole::Html5App),
            APPROUTER_MODULE_TYPE => Some(ModuleRole::StandaloneRouter),
            NODEJS_MODULE_TYPE => Some(ModuleRole::ServerNodejs),
            JAVA_MODULE_TYPE => Some(ModuleRole::ServerJava),
            CONTENT_MODULE_TYPE => {
                if requires_role(ResourceRole::Destination) || publishes_destinations(module) {
                    Some(ModuleRole::DestinationContent)
                } else if requires_role(ResourceRole::Html5AppHost) {
                    Some(ModuleRole::ResourceContent)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// A content module declaring `content.instance.destinations` publishes
/// destinations even before the destination resource exists.
fn publishes_destinations(module: &Module) -> bool {
    module
        .parameters
        .get("content")
        .and_then(|content| content.get("instance"))
        .and_then(|instance| instance.get("destinations"))
        .is_some()
}

/// Which approuter setup the descriptor uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouterTopology {
    #[default]
    None,
    Standalone,
    Managed,
    CapGenerated,
}

impl RouterTopology {
    /// Derive the topology from the tracked modules. A destination-content
    /// module wins over a standalone router when both are present.
    pub fn from_modules(modules: &BTreeMap<ModuleRole, Module>) -> Self {
        if modules.contains_key(&ModuleRole::DestinationContent) {
            return RouterTopology::Managed;
        }
        match modules.get(&ModuleRole::StandaloneRouter) {
            Some(router) if router.path.as_deref() == Some(CAP_ROUTER_PATH) => {
                RouterTopology::CapGenerated
            }
            Some(_) => RouterTopology::Standalone,
            None => RouterTopology::None,
        }
    }
}

/// The classified in-memory model.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    resources: BTreeMap<ResourceRole, Resource>,
    modules: BTreeMap<ModuleRole, Module>,
    topology: RouterTopology,
}

impl Classification {
    /// Classify every resource, then every module. First match wins.
    pub fn build(modules: &[Module], resources: &[Resource]) -> Self {
        let mut model = Self::default();
        for resource in resources {
            if let Some(role) = ResourceRole::classify(resource) {
                model.resources.entry(role).or_insert_with(|| resource.clone());
            }
        }
        for module in modules {
            if let Some(role) = ModuleRole::classify(module, &model.resources) {
                model.modules.entry(role).or_insert_with(|| module.clone());
            }
        }
        model.topology = RouterTopology::from_modules(&model.modules);
        model
    }

    pub fn resource(&self, role: ResourceRole) -> Option<&Resource> {
        self.resources.get(&role)
    }

    pub fn module(&self, role: ModuleRole) -> Option<&Module> {
        self.modules.get(&role)
    }

    pub fn has_resource(&self, role: ResourceRole) -> bool {
        self.resources.contains_key(&role)
    }

    pub fn has_module(&self, role: ModuleRole) -> bool {
        self.modules.contains_key(&role)
    }

    pub fn topology(&self) -> RouterTopology {
        self.topology
    }

    pub fn resource_roles(&self) -> impl Iterator<Item = (ResourceRole, &Resource)> {
        self.resources.iter().map(|(role, r)| (*role, r))
    }

    pub fn module_roles(&self) -> impl Iterator<Item = (ModuleRole, &Module)> {
        self.modules.iter().map(|(role, m)| (*role, m))
    }

    pub(crate) fn track_resource(&mut self, role: ResourceRole, resource: Resource) {
        self.resources.insert(role, resource);
    }

    pub(crate) fn track_module(&mut self, role: ModuleRole, module: Module) {
        self.modules.insert(role, module);
        self.topology = RouterTopology::from_modules(&self.modules);
    }
}
