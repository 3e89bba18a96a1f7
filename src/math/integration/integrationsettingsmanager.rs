use serde::de::Unexpected;

use crate::manager::manager::Manager;
use crate::manager::managererror::ManagerError;
use super::integrationsettings::IntegrationSettings;


fn get_integration_settings_from_json(json_value: serde_json::Value) -> Result<IntegrationSettings, ManagerError> {
    let settings: IntegrationSettings = ManagerError::from_json_or_json_parse_error(json_value)?;
    if settings.max_subdivisions() == 0 {
        return Err(ManagerError::json_invalid_value(
            Unexpected::Unsigned(0),
            &"a positive number of subdivisions"
        ));
    }
    for tolerance in [settings.absolute_tolerance(), settings.relative_tolerance()] {
        if !(tolerance >= 0.0) {
            return Err(ManagerError::json_invalid_value(
                Unexpected::Float(tolerance),
                &"a non-negative tolerance"
            ));
        }
    }
    Ok(settings)
}


pub struct IntegrationSettingsManager;


impl IntegrationSettingsManager {
    pub fn new() -> Manager<IntegrationSettings> {
        Manager::new(get_integration_settings_from_json)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::manager::manager::IManager;
    use crate::math::integration::quadraturerule::QuadratureRule;

    #[test]
    fn named_presets_are_registered() {
        let manager = IntegrationSettingsManager::new();
        let presets = vec![
            json!({"name": "fast", "rule": "GaussKronrod15", "max_subdivisions": 20}),
            json!({"name": "default"})
        ];
        manager.insert_obj_from_json_vec(&presets, &()).unwrap();

        assert_eq!(manager.names(), vec!["default".to_string(), "fast".to_string()]);
        let fast = manager.get("fast").unwrap();
        assert_eq!(fast.rule(), QuadratureRule::GaussKronrod15);
        assert_eq!(fast.max_subdivisions(), 20);
        assert_eq!(manager.get("default").unwrap(), IntegrationSettings::default());
    }

    #[test]
    fn unknown_name_is_reported() {
        let manager = IntegrationSettingsManager::new();
        let error = manager.get("precise").unwrap_err();
        assert!(matches!(error, ManagerError::NameNotFoundError(ref name) if name == "precise"));
        assert_eq!(error.to_string(), "key 'precise' not found");
    }

    #[test]
    fn entries_without_name_are_rejected() {
        let manager = IntegrationSettingsManager::new();
        let error = manager.insert_obj_from_json(json!({"rule": "GaussKronrod21"}), &()).unwrap_err();
        assert!(matches!(error, ManagerError::JsonParseError(_)));
    }

    #[test]
    fn unusable_settings_are_rejected() {
        let manager = IntegrationSettingsManager::new();
        for bad in [
            json!({"name": "a", "max_subdivisions": 0}),
            json!({"name": "b", "absolute_tolerance": -1.0}),
            json!({"name": "c", "rule": "GaussKronrod17"})
        ] {
            let error = manager.insert_obj_from_json(bad, &()).unwrap_err();
            assert!(matches!(error, ManagerError::JsonParseError(_)));
        }
        assert!(manager.names().is_empty());
    }

    #[test]
    fn file_with_single_object_or_array_is_loaded() {
        use std::io::Write;

        let mut single = tempfile::NamedTempFile::new().unwrap();
        write!(single, r#"{{"name": "single", "rule": "GaussKronrod31"}}"#).unwrap();
        let mut array = tempfile::NamedTempFile::new().unwrap();
        write!(array, r#"[{{"name": "one"}}, {{"name": "two", "max_subdivisions": 500}}]"#).unwrap();

        let manager = IntegrationSettingsManager::new();
        manager.from_reader(single.path().to_str().unwrap(), &()).unwrap();
        manager.from_reader(array.path().to_str().unwrap(), &()).unwrap();

        assert!(manager.contains("single"));
        assert!(manager.contains("one"));
        assert_eq!(manager.get("two").unwrap().max_subdivisions(), 500);
        assert_eq!(manager.get("single").unwrap().rule(), QuadratureRule::GaussKronrod31);
    }
}
