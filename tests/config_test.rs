//! Settings loading from TOML files.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use oxo::Settings;
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.endpoint(), "http://localhost:3001/api");
    assert_eq!(settings.timeout(), Duration::from_secs(10));
    assert_eq!(settings.log_file(), &PathBuf::from("oxo.log"));
}

#[test]
fn test_full_file() {
    let file = config_file(
        r#"
endpoint = "https://predict.example.com/api"
timeout_ms = 1500
log_file = "/tmp/oxo-test.log"
"#,
    );
    let settings = Settings::from_file(file.path()).expect("valid config");
    assert_eq!(settings.endpoint(), "https://predict.example.com/api");
    assert_eq!(*settings.timeout_ms(), 1500);
    assert_eq!(settings.log_file(), &PathBuf::from("/tmp/oxo-test.log"));
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = config_file("timeout_ms = 250\n");
    let settings = Settings::from_file(file.path()).expect("valid config");
    assert_eq!(settings.endpoint(), Settings::default().endpoint());
    assert_eq!(settings.timeout(), Duration::from_millis(250));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let file = config_file("endpoint = [not toml");
    let err = Settings::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"), "{err}");
}

#[test]
fn test_wrong_type_is_config_error() {
    let file = config_file("timeout_ms = \"fast\"\n");
    assert!(Settings::from_file(file.path()).is_err());
}

#[test]
fn test_missing_file_is_error_for_from_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = Settings::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.contains("Failed to read config file"), "{err}");
}

#[test]
fn test_env_overrides_file() {
    let file = config_file("endpoint = \"http://from-file/api\"\ntimeout_ms = 100\n");
    let settings = Settings::from_file(file.path())
        .expect("valid config")
        .with_env(|key| (key == oxo::ENDPOINT_VAR).then(|| "http://from-env/api".to_string()))
        .expect("valid overrides");
    assert_eq!(settings.endpoint(), "http://from-env/api");
    assert_eq!(*settings.timeout_ms(), 100);
}

#[test]
fn test_zero_timeout_rejected() {
    let file = config_file("timeout_ms = 0\n");
    let settings = Settings::from_file(file.path()).expect("parses");
    assert!(settings.validate().is_err());
}
