// Integration tests for configuration file support

use resup::config::SupervisorConfig;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_toml_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
        repeat = 10
        retries_on_failure = 3
        metrics_host = "127.0.0.1"
        metrics_port = 9100
        verbose = true
    "#;

    fs::write(&config_path, toml_content).unwrap();

    let config = SupervisorConfig::from_file(&config_path).unwrap();
    assert_eq!(config.repeat, 10);
    assert_eq!(config.retries_on_failure, 3);
    assert_eq!(config.metrics_host.as_deref(), Some("127.0.0.1"));
    assert_eq!(config.metrics_port, 9100);
    assert!(config.verbose);
}

#[test]
fn test_load_toml_config_partial_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(&config_path, "retries_on_failure = 2").unwrap();

    let config = SupervisorConfig::from_file(&config_path).unwrap();
    assert_eq!(config.repeat, -1);
    assert_eq!(config.retries_on_failure, 2);
    assert!(config.metrics_host.is_none());
    assert_eq!(config.metrics_port, 3535);
    assert!(!config.verbose);
}

#[test]
fn test_load_json_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");

    let json_content = r#"
        {
            "repeat": 5,
            "metrics_host": "0.0.0.0"
        }
    "#;

    fs::write(&config_path, json_content).unwrap();

    let config = SupervisorConfig::from_file(&config_path).unwrap();
    assert_eq!(config.repeat, 5);
    assert_eq!(config.metrics_host.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.metrics_port, 3535);
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");

    fs::write(&config_path, "repeat: 5").unwrap();

    let result = SupervisorConfig::from_file(&config_path);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Unsupported file format"));
}

#[test]
fn test_malformed_toml_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(&config_path, "repeat = = 10").unwrap();

    assert!(SupervisorConfig::from_file(&config_path).is_err());
}

#[test]
fn test_missing_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("does-not-exist.toml");

    let result = SupervisorConfig::from_file(&config_path);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Failed to read config file"));
}
