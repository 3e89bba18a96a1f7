use std::cell::{
    RefCell,
    RefMut
};
use std::fs::File;
use std::io::BufReader;

use serde::Deserialize;
use tracing::info;

use crate::manager::managererror::ManagerError;
use crate::manager::manager::{
    IManager,
    Manager
};
use crate::math::integration::integrationsettings::IntegrationSettings;
use crate::math::integration::integrationsettingsmanager::IntegrationSettingsManager;


#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    integration: Vec<serde_json::Value>
}

/// Named integration presets, typically loaded once from a JSON file:
///
/// ```json
/// { "integration": [ { "name": "precise", "relative_tolerance": 1e-12, "rule": "GaussKronrod61" } ] }
/// ```
pub struct Configuration {
    integration_settings_manager_cell: RefCell<Manager<IntegrationSettings>>
}


impl Configuration {
    pub fn new() -> Configuration {
        let integration_settings_manager = IntegrationSettingsManager::new();
        Configuration {
            integration_settings_manager_cell: RefCell::new(integration_settings_manager)
        }
    }

    pub fn integration_settings_manager(&self) -> RefMut<'_, Manager<IntegrationSettings>> {
        self.integration_settings_manager_cell.borrow_mut()
    }

    /// Settings registered under `name`.
    pub fn settings(&self, name: &str) -> Result<IntegrationSettings, ManagerError> {
        self.integration_settings_manager().get(name)
    }

    pub fn from_reader(&self, file_path: &str) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_prop: ConfigurationJsonProp = serde_json::from_reader(reader)?;
        let integration_settings_manager = self.integration_settings_manager_cell.borrow_mut();
        integration_settings_manager.insert_obj_from_json_vec(&json_prop.integration, &())?;
        info!(path = file_path, presets = json_prop.integration.len(), "loaded integration presets");
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}
