//! Integration tests for config loading from fixture files.

use std::fs;
use std::path::Path;

use dater::date_rename::{DaterConfig, RenameConfig};

/// Read the sample config file content.
fn read_sample_config() -> String {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    fs::read_to_string(config_path).expect("Failed to read sample config file")
}

#[test]
fn sample_config_file_exists() {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    assert!(config_path.exists(), "Sample config file should exist");
}

#[test]
fn sample_config_is_valid_toml() {
    let config_content = read_sample_config();
    let result: Result<toml::Value, _> = toml::from_str(&config_content);
    assert!(result.is_ok(), "Sample config should be valid TOML: {:?}", result.err());
}

#[test]
fn dater_section_has_expected_structure() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let dater = value.get("dater").expect("should have dater section");

    for key in [
        "pattern",
        "format",
        "delimiter",
        "pad_delimiter",
        "titleize",
        "check_prenamed",
        "force",
        "recursive",
        "dryrun",
        "verbose",
    ] {
        assert!(dater.get(key).is_some(), "dater section should have '{key}'");
    }
}

#[test]
fn config_values_have_correct_types() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");
    let dater = value.get("dater").expect("should have dater section");

    assert!(dater.get("pattern").unwrap().is_str());
    assert!(dater.get("format").unwrap().is_str());
    assert!(dater.get("delimiter").unwrap().is_str());
    assert!(dater.get("pad_delimiter").unwrap().is_bool());
    assert!(dater.get("titleize").unwrap().is_bool());
    assert!(dater.get("recursive").unwrap().is_bool());
}

#[test]
fn sample_config_parses_into_dater_config() {
    let config = DaterConfig::from_toml_str(&read_sample_config()).expect("should parse");

    assert_eq!(config.pattern.as_deref(), Some("*.jpg"));
    assert_eq!(config.format.as_deref(), Some("%Y-%m-%d"));
    assert_eq!(config.delimiter.as_deref(), Some("_"));
    assert_eq!(config.pad_delimiter, Some(false));
    assert_eq!(config.check_prenamed, Some(true));
    assert!(config.titleize);
    assert!(config.recursive);
    assert!(config.verbose);
    assert!(!config.force);
    assert!(!config.dryrun);
}

#[test]
fn sample_config_values_are_valid() {
    let config = DaterConfig::from_toml_str(&read_sample_config()).expect("should parse");
    let rename = RenameConfig {
        date_format: config.format.expect("should have format"),
        delimiter: config.delimiter.expect("should have delimiter"),
        ..Default::default()
    };
    assert!(rename.validate().is_ok());
}
