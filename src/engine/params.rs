//! Top-level descriptor parameters.

use serde_yaml::Value;

use super::MtaConfig;
use crate::constants::DEPLOY_MODE;
use crate::error::Result;

impl MtaConfig {
    /// Deploy HTML5 content through the repository and allow parallel
    /// deployments.
    pub fn add_deploy_parameters(&mut self) -> Result<()> {
        let store = self.store()?;
        let mut parameters = store.parameters()?;
        let before = parameters.clone();
        parameters.insert(
            Value::String("deploy_mode".to_string()),
            Value::String(DEPLOY_MODE.to_string()),
        );
        parameters.insert(
            Value::String("enable-parallel-deployments".to_string()),
            Value::Bool(true),
        );
        if parameters == before {
            return Ok(());
        }
        self.store_mut()?.update_parameters(parameters)?;
        self.logger
            .debug(format_args!("Updated deploy parameters of {}", self.prefix));
        self.dirty = true;
        Ok(())
    }
}
