//! Tests for configuration precedence order

use crate::{ConfigProvider, FormsmithConfig};
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_each_file_format_is_read() {
    let cases = [
        ("formsmith.toml", "[upload]\npublic_prefix = \"/media\"\n"),
        ("formsmith.yaml", "upload:\n  public_prefix: /media\n"),
        ("formsmith.json", r#"{"upload": {"public_prefix": "/media"}}"#),
    ];
    for (name, content) in cases {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(name), content).unwrap();
        let config = ConfigProvider::new()
            .with_base_dir(temp.path())
            .with_env_prefix("FORMSMITH_TEST_FORMATS_")
            .load()
            .unwrap();
        assert_eq!(config.upload.public_prefix, "/media", "{name}");
        // untouched keys keep their defaults
        assert_eq!(config.upload.max_bytes, FormsmithConfig::default().upload.max_bytes);
    }
}

#[test]
fn test_json_overrides_toml() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("formsmith.toml"),
        "[store]\ndir = \"from-toml\"\n[upload]\nmax_bytes = 100\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("formsmith.json"),
        r#"{"store": {"dir": "from-json"}}"#,
    )
    .unwrap();

    let config = ConfigProvider::new()
        .with_base_dir(temp.path())
        .with_env_prefix("FORMSMITH_TEST_ORDER_")
        .load()
        .unwrap();
    assert_eq!(config.store.dir, PathBuf::from("from-json"));
    assert_eq!(config.upload.max_bytes, 100);
}

#[test]
#[serial]
fn test_environment_overrides_files() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("formsmith.toml"),
        "[upload]\nmax_bytes = 100\npublic_prefix = \"/files\"\n",
    )
    .unwrap();

    std::env::set_var("FORMSMITH_UPLOAD__MAX_BYTES", "2048");
    std::env::set_var("FORMSMITH_STORE__DIR", "/var/lib/formsmith");

    let result = ConfigProvider::new().with_base_dir(temp.path()).load();

    std::env::remove_var("FORMSMITH_UPLOAD__MAX_BYTES");
    std::env::remove_var("FORMSMITH_STORE__DIR");

    let config = result.unwrap();
    assert_eq!(config.upload.max_bytes, 2048);
    assert_eq!(config.upload.public_prefix, "/files");
    assert_eq!(config.store.dir, PathBuf::from("/var/lib/formsmith"));
}

#[test]
#[serial]
fn test_invalid_environment_value_fails_validation() {
    let temp = TempDir::new().unwrap();
    std::env::set_var("FORMSMITH_UPLOAD__MAX_BYTES", "0");

    let result = ConfigProvider::new().with_base_dir(temp.path()).load();

    std::env::remove_var("FORMSMITH_UPLOAD__MAX_BYTES");
    assert!(matches!(result, Err(crate::ConfigError::InvalidValue { .. })));
}
