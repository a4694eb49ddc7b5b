//! Configuration loading integration tests.
//!
//! Tests the config loading APIs:
//! - from_file() with TOML/YAML/JSON
//! - validation of out-of-range values
//! - loaded limits taking effect in a feed

use decanter::core::config::{AttributeChunkPolicy, DecanterConfig};
use decanter::types::Data;
use decanter::{DecanterError, Feeder};
use std::fs;
use tempfile::TempDir;

mod helpers;

use helpers::build_tar;

#[test]
fn test_from_file_toml_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("decanter.toml");

    fs::write(
        &config_path,
        r#"
max_depth = 4
max_total_bytes = 1048576
attribute_chunks = "overwrite"

[remote]
url = "http://localhost:20080/extraction.json"
extensions = ["pdf", "csv"]
"#,
    )
    .unwrap();

    let config = DecanterConfig::from_file(&config_path).expect("Should load TOML config successfully");
    assert_eq!(config.max_depth, 4);
    assert_eq!(config.max_total_bytes, 1_048_576);
    assert_eq!(config.attribute_chunks, AttributeChunkPolicy::Overwrite);

    let remote = config.remote.expect("Should have remote config");
    assert_eq!(remote.url, "http://localhost:20080/extraction.json");
    assert_eq!(remote.timeout_secs, 30);
    assert_eq!(remote.extensions, vec!["pdf", "csv"]);
    assert!(remote.mime_types.is_empty());
}

#[test]
fn test_from_file_yaml_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yml");

    fs::write(&config_path, "max_depth: 2\nattribute_chunks: concatenate\n").unwrap();

    let config = DecanterConfig::from_file(&config_path).expect("Should load YAML config successfully");
    assert_eq!(config.max_depth, 2);
    assert_eq!(config.max_total_bytes, DecanterConfig::default().max_total_bytes);
    assert_eq!(config.attribute_chunks, AttributeChunkPolicy::Concatenate);
}

#[test]
fn test_from_file_json_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");

    fs::write(&config_path, r#"{"max_total_bytes": 2048}"#).unwrap();

    let config = DecanterConfig::from_file(&config_path).expect("Should load JSON config successfully");
    assert_eq!(config.max_total_bytes, 2048);
    assert_eq!(config.max_depth, 16);
    assert!(config.remote.is_none());
}

#[test]
fn test_from_file_missing_fails() {
    let result = DecanterConfig::from_file("/nonexistent/decanter.toml");
    assert!(matches!(result, Err(DecanterError::Validation { .. })));
}

#[test]
fn test_from_file_invalid_toml_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("decanter.toml");
    fs::write(&config_path, "max_depth = \"deep\"").unwrap();

    let result = DecanterConfig::from_file(&config_path);
    assert!(matches!(result, Err(DecanterError::Validation { .. })));
}

#[test]
fn test_from_file_rejects_zero_limits() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("decanter.toml");
    fs::write(&config_path, "max_depth = 0").unwrap();

    let result = DecanterConfig::from_file(&config_path);
    assert!(matches!(result, Err(DecanterError::Validation { .. })));
}

#[test]
fn test_unknown_chunk_policy_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    fs::write(&config_path, r#"{"attribute_chunks": "merge"}"#).unwrap();

    assert!(DecanterConfig::from_file(&config_path).is_err());
}

#[test]
fn test_loaded_depth_limit_applies() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("decanter.toml");
    fs::write(&config_path, "max_depth = 1").unwrap();
    let config = DecanterConfig::from_file(&config_path).unwrap();

    let leaf = build_tar(&[("a.txt", b"A".as_slice())]);
    let middle = build_tar(&[("leaf.tar", leaf.as_slice())]);
    let top = build_tar(&[("middle.tar", middle.as_slice())]);

    let result = Feeder::with_default_decomposers(config)
        .unwrap()
        .extract(Data::from_bytes(top).with_path("top.tar"));
    assert!(matches!(result, Err(DecanterError::LimitExceeded(_))));
}
