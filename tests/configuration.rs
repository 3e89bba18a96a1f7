use std::io::Write;

use numint::configuration::Configuration;
use numint::manager::managererror::ManagerError;
use numint::{
    integrate,
    IntegrationSettings,
    QuadratureRule
};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn presets_load_from_json_file() {
    let file = write_config(r#"{
        "integration": [
            {"name": "coarse", "rule": "GaussKronrod15", "max_subdivisions": 10},
            {"name": "precise", "absolute_tolerance": 1e-13, "relative_tolerance": 1e-12, "rule": "GaussKronrod61"}
        ]
    }"#);
    let config = Configuration::new();
    config.from_reader(file.path().to_str().unwrap()).unwrap();

    let coarse = config.settings("coarse").unwrap();
    assert_eq!(coarse, IntegrationSettings::new(10, 1e-8, 1e-6, QuadratureRule::GaussKronrod15));

    let precise = config.settings("precise").unwrap();
    let result = integrate(|x| x.exp(), 0.0, 1.0, &precise).unwrap();
    assert!((result.value() - (std::f64::consts::E - 1.0)).abs() < 1e-13);
    assert!(result.is_converged());
}

#[test]
fn missing_preset_is_name_not_found() {
    let file = write_config(r#"{"integration": []}"#);
    let config = Configuration::new();
    config.from_reader(file.path().to_str().unwrap()).unwrap();
    assert!(matches!(config.settings("coarse"), Err(ManagerError::NameNotFoundError(_))));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let file = write_config(r#"{"integration": [ {"name": "x", "rule": 41} ]}"#);
    let config = Configuration::new();
    let error = config.from_reader(file.path().to_str().unwrap()).unwrap_err();
    assert!(matches!(error, ManagerError::JsonParseError(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let config = Configuration::new();
    let error = config.from_reader(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(error, ManagerError::IOError(_)));
}
