//! HTML5 application registration.

use super::MtaConfig;
use crate::classify::{ModuleRole, ResourceRole};
use crate::constants::*;
use crate::descriptor::model::mapping;
use crate::descriptor::{BuildParameters, BuildRequires, Module, Requires};
use crate::error::Result;
use crate::naming::{role_name, sanitize, NameRole};

fn artifact(module_name: &str) -> BuildRequires {
    BuildRequires {
        name: module_name.to_string(),
        artifacts: vec![format!("{}.zip", module_name)],
        target_path: Some(APP_CONTENT_TARGET_PATH.to_string()),
        extra: Default::default(),
    }
}

impl MtaConfig {
    /// Register an HTML5 application.
    ///
    /// The app is packaged by the resource content module (when there is one)
    /// and built by an `html5` module named after it. Each half is skipped
    /// when already present.
    pub fn add_app(&mut self, name: &str, path: &str) -> Result<()> {
        self.store()?;
        let module_name = sanitize(name);

        if let Some(mut content) = self.model.module(ModuleRole::ResourceContent).cloned() {
            let build = content.build_parameters.get_or_insert_with(Default::default);
            if !build.requires.iter().any(|r| r.name == module_name) {
                build.requires.push(artifact(&module_name));
                self.logger.debug(format_args!(
                    "Packaging {} into {}",
                    module_name, content.name
                ));
                self.update_module(ModuleRole::ResourceContent, content)?;
            }
        }

        let exists = self
            .modules()?
            .iter()
            .any(|m| m.module_type == HTML5_MODULE_TYPE && m.name == module_name);
        if exists {
            return Ok(());
        }

        let mut module = Module::new(module_name, HTML5_MODULE_TYPE);
        module.path = Some(path.to_string());
        module.build_parameters = Some(BuildParameters {
            build_result: Some(HTML5_BUILD_RESULT.to_string()),
            builder: Some(HTML5_BUILDER.to_string()),
            commands: HTML5_BUILD_COMMANDS.iter().map(|c| c.to_string()).collect(),
            supported_platforms: Some(Vec::new()),
            ..BuildParameters::default()
        });
        let role = (!self.model.has_module(ModuleRole::Html5App)).then_some(ModuleRole::Html5App);
        self.add_module(role, module)
    }

    /// Add the content module that uploads HTML5 app bundles to the app-host
    /// repository. Apps already in the descriptor are packaged right away.
    pub fn add_app_content(&mut self) -> Result<()> {
        self.store()?;
        if self.model.has_module(ModuleRole::ResourceContent) {
            return Ok(());
        }
        self.ensure_app_host()?;
        let Some(app_host) = self.resource_name(ResourceRole::Html5AppHost) else {
            return Ok(());
        };

        let apps = self
            .modules()?
            .into_iter()
            .filter(|m| m.module_type == HTML5_MODULE_TYPE)
            .map(|m| artifact(&m.name))
            .collect();

        let mut module = Module::new(
            role_name(NameRole::AppContent, &self.prefix),
            CONTENT_MODULE_TYPE,
        );
        module.path = Some(".".to_string());
        module.add_requires(
            Requires::named(app_host).with_parameters(mapping([("content-target", true)])),
        );
        module.build_parameters = Some(BuildParameters {
            build_result: Some(APP_CONTENT_BUILD_RESULT.to_string()),
            requires: apps,
            ..BuildParameters::default()
        });
        self.add_module(Some(ModuleRole::ResourceContent), module)
    }
}
