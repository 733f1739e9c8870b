//! Tests for TOML loading and CLI/file precedence

use crate::app::cli::api::{load_config_file, ConfigError};
use crate::app::cli::args::Args;
use crate::app::cli::config::KNOWN_KEYS;
use crate::core::error_handling::ContextualError;
use crate::relay::api::{FullPolicy, RelayConfig};
use clap::Parser;
use std::path::PathBuf;
use tempfile::TempDir;

fn table(contents: &str) -> toml::Table {
    toml::from_str(contents).expect("test TOML should parse")
}

#[test]
fn test_file_values_fill_unset_options() {
    let mut args = Args::new();
    args.apply_toml_values(&table(
        r#"
        capacity = 3
        policy = "wait"
        endpoint-name = "keys.txt"
        log-level = "debug"
        log-format = "ext"
        "#,
    ))
    .unwrap();

    let settings = args.into_settings().unwrap();
    assert_eq!(
        settings.relay,
        RelayConfig::new(3)
            .with_full_policy(FullPolicy::Wait)
            .with_endpoint_name("keys.txt")
    );
    assert_eq!(settings.log_level.as_deref(), Some("debug"));
    assert_eq!(settings.log_format.as_deref(), Some("ext"));
    assert!(settings.output_dir.is_none());
}

#[test]
fn test_command_line_overrides_file() {
    let mut args = Args::try_parse_from(["keystream", "--capacity", "7", "--policy", "drop"]).unwrap();
    args.apply_toml_values(&table("capacity = 2\npolicy = \"wait\"")).unwrap();

    let settings = args.into_settings().unwrap();
    assert_eq!(settings.relay.capacity, 7);
    assert_eq!(settings.relay.full_policy, FullPolicy::Drop);
}

#[test]
fn test_defaults_without_any_configuration() {
    let settings = Args::new().into_settings().unwrap();
    assert_eq!(settings.relay, RelayConfig::default());
    assert_eq!(settings.relay.endpoint_name, "keyloggerdata.txt");
}

#[test]
fn test_invalid_file_values() {
    let cases = [
        ("capacity = 0", "capacity"),
        ("capacity = \"ten\"", "capacity"),
        ("policy = \"block\"", "policy"),
        ("endpoint-name = \"a/b\"", "endpoint-name"),
        ("log-level = 3", "log-level"),
    ];

    for (contents, expected_key) in cases {
        let mut args = Args::new();
        match args.apply_toml_values(&table(contents)) {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, expected_key, "for {}", contents),
            other => panic!("expected invalid {} for {}, got {:?}", expected_key, contents, other),
        }
    }
}

#[test]
fn test_unknown_key_is_rejected() {
    let mut args = Args::new();
    let result = args.apply_toml_values(&table("buffer-size = 4"));
    assert!(matches!(result, Err(ConfigError::UnknownKey { key }) if key == "buffer-size"));
}

#[test]
fn test_missing_output_dir_fails_validation() {
    let dir = TempDir::new().unwrap();
    let mut args = Args::new();
    args.output_dir = Some(dir.path().join("missing"));

    assert!(matches!(
        args.into_settings(),
        Err(ConfigError::InvalidValue { key, .. }) if key == "output-dir"
    ));
}

#[tokio::test]
async fn test_load_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keystream.toml");
    std::fs::write(&path, format!("output-dir = {:?}\n", dir.path().display().to_string())).unwrap();

    let config = load_config_file(Some(&path)).await.unwrap().unwrap();
    let mut args = Args::new();
    args.apply_toml_values(&config).unwrap();

    let settings = args.into_settings().unwrap();
    assert_eq!(settings.output_dir, Some(PathBuf::from(dir.path())));
}

#[tokio::test]
async fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = load_config_file(Some(&dir.path().join("absent.toml"))).await;
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[tokio::test]
async fn test_malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "capacity = [").unwrap();

    let result = load_config_file(Some(&path)).await;
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_unknown_key_hint_lists_every_known_key() {
    let error = ConfigError::UnknownKey {
        key: "buffer-size".to_string(),
    };
    assert!(error.is_user_actionable());
    let hint = error.user_message().unwrap();
    for key in KNOWN_KEYS {
        assert!(hint.contains(key), "hint is missing {}: {}", key, hint);
    }
}

#[test]
fn test_invalid_value_hint_is_its_message() {
    let error = ConfigError::invalid("capacity", "must be greater than 0");
    assert!(error.is_user_actionable());
    assert_eq!(error.user_message(), Some("must be greater than 0"));
}

#[tokio::test]
async fn test_file_errors_classify_by_cause() {
    let dir = TempDir::new().unwrap();
    let missing = load_config_file(Some(&dir.path().join("absent.toml")))
        .await
        .unwrap_err();
    assert!(missing.is_user_actionable());
    assert_eq!(missing.user_message(), Some("Check the --config-file path"));

    // A directory exists but cannot be read as a file
    let unreadable = load_config_file(Some(dir.path())).await.unwrap_err();
    assert!(matches!(unreadable, ConfigError::Read { .. }), "got: {:?}", unreadable);
    assert!(!unreadable.is_user_actionable());
    assert!(unreadable.user_message().is_none());
}
