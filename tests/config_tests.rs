//! Tests for loading `AppConfig` from YAML files

use invoices::core::error::ConfigError;
use invoices::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_load_full_config_file() {
    let file = write_config(
        r#"
database:
  url: postgres://app:secret@db:5432/invoices
  ssl_mode: prefer
  max_connections: 10
  acquire_timeout_secs: 5
server:
  bind: 0.0.0.0:8080
routes:
  invoices: /billing/invoices
  after_login: /billing
"#,
    );

    let config = AppConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();

    assert_eq!(
        config.database.url.as_deref(),
        Some("postgres://app:secret@db:5432/invoices")
    );
    assert_eq!(config.database.ssl_mode, SslMode::Prefer);
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.database.acquire_timeout_secs, 5);
    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.routes.invoices, "/billing/invoices");
    assert_eq!(config.routes.after_login, "/billing");
}

#[test]
fn test_empty_sections_use_defaults() {
    let file = write_config("routes:\n  after_login: /home\n");

    let config = AppConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.database, DatabaseConfig::default());
    assert_eq!(config.routes.invoices, "/dashboard/invoices");
    assert_eq!(config.routes.after_login, "/home");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let err = AppConfig::from_yaml_file(path.to_str().unwrap()).unwrap_err();

    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn test_parse_error_names_the_file() {
    let file = write_config("database:\n  max_connections: many\n");
    let path = file.path().to_str().unwrap().to_string();

    let err = AppConfig::from_yaml_file(&path).unwrap_err();

    match err {
        ConfigError::ParseError { file, .. } => assert_eq!(file, Some(path)),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_file_then_environment() {
    let file = write_config("server:\n  bind: 127.0.0.1:4000\n");

    let config = AppConfig::from_yaml_file(file.path().to_str().unwrap())
        .unwrap()
        .with_overrides(|key| (key == "POSTGRES_URL").then(|| "postgres://env/db".to_string()));

    assert_eq!(config.database.url.as_deref(), Some("postgres://env/db"));
    assert_eq!(config.server.bind, "127.0.0.1:4000");
}
