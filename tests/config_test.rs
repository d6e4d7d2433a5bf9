//! Unit tests for config.rs module

use std::fs;

use reservili::calendar::WeekStart;
use reservili::config::AppConfig;
use reservili::models::OutputFormat;
use tempfile::tempdir;

#[test]
fn test_default_config_values() {
    let config = AppConfig::default();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.log_dir, None);
    assert_eq!(config.logging.format, "text");
    assert_eq!(config.data.catalog_path, None);
    assert_eq!(config.output.default_format, "txt");
    assert_eq!(config.search.max_query_length, 100);
}

#[test]
fn test_default_typed_values() {
    let config = AppConfig::default();
    assert_eq!(config.week_start().unwrap(), WeekStart::Sunday);
    assert_eq!(config.output_format().unwrap(), OutputFormat::Txt);
}

#[test]
fn test_config_validation_success() {
    assert!(AppConfig::default().validate().is_ok());
}

#[test]
fn test_config_validation_invalid_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_invalid_log_format() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_invalid_output_format() {
    let mut config = AppConfig::default();
    config.output.default_format = "pdf".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_zero_query_length() {
    let mut config = AppConfig::default();
    config.search.max_query_length = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_monday_week() {
    let mut config = AppConfig::default();
    config.calendar.week_start = "monday".to_string();
    assert!(config.validate().is_ok());
    assert_eq!(config.week_start().unwrap(), WeekStart::Monday);
}

#[test]
fn test_load_from_toml_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("reservili.toml");
    fs::write(
        &path,
        r#"
[calendar]
week_start = "monday"

[output]
default_format = "csv"

[data]
catalog_path = "data/catalog.json"

[logging]
log_dir = "logs"
"#,
    )
    .unwrap();

    let config = AppConfig::load_from(Some(&path)).expect("Failed to load config");
    assert_eq!(config.week_start().unwrap(), WeekStart::Monday);
    assert_eq!(config.output_format().unwrap(), OutputFormat::Csv);
    assert_eq!(config.data.catalog_path.as_deref(), Some("data/catalog.json"));
    assert_eq!(config.logging.log_dir.as_deref(), Some("logs"));
    // untouched keys keep their defaults
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_load_from_rejects_invalid_values() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("reservili.json");
    fs::write(&path, r#"{ "calendar": { "week_start": "friday" } }"#).unwrap();
    assert!(AppConfig::load_from(Some(&path)).is_err());
}

#[test]
fn test_load_from_missing_file_fails() {
    let temp_dir = tempdir().unwrap();
    assert!(AppConfig::load_from(Some(&temp_dir.path().join("absent.toml"))).is_err());
}

#[test]
fn test_config_serialization() {
    let config = AppConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: AppConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.calendar.week_start, config.calendar.week_start);
    assert_eq!(back.search.max_query_length, config.search.max_query_length);
}
