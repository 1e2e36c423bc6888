//! Snapshot persistence integration tests.

use std::fs;

use rolegate_core::{Client, PolicyModel};
use rolegate_storage::{
    export_model, load_declaration, load_snapshot, resolve_from_path, save_snapshot,
    DocumentFormat, StorageConfig, StorageError,
};

const POLICY_YAML: &str = r#"
metadata:
  name: roundtrip
permissions:
  - metadata:
      label: user
    resources:
      - label: user.read_basic
      - label: user.read_all
    rules:
      - when: user.read_all
        then: [user.read_basic]
organizations:
  - metadata:
      label: acme
    permissions:
      - label: acme.user.read_all
roles:
  - metadata:
      label: client
      organization: acme
    permissions:
      - label: acme.user.read_basic
"#;

fn write_policy(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("policy.yml");
    fs::write(&path, POLICY_YAML).unwrap();
    path
}

#[test]
fn test_load_declaration_from_yaml_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let yml_path = write_policy(dir.path());
    let from_yaml = load_declaration(&yml_path).unwrap();

    let json_path = dir.path().join("policy.json");
    fs::write(
        &json_path,
        serde_json::to_string(&from_yaml).unwrap(),
    )
    .unwrap();
    let from_json = load_declaration(&json_path).unwrap();

    assert_eq!(from_yaml, from_json);
}

#[test]
fn test_snapshot_round_trip_is_structurally_equal() {
    let dir = tempfile::tempdir().unwrap();
    let model = resolve_from_path(write_policy(dir.path())).unwrap();

    let config = StorageConfig::default().with_cache_dir(dir.path().join("cache"));
    let written = save_snapshot(&model, &config).unwrap();
    assert!(written.exists());

    let restored = load_snapshot(&config).unwrap();
    assert_eq!(restored, model);

    // The restored model answers checks without re-resolution.
    let mut client = Client::new();
    client.add_organization("acme", Some(&restored)).unwrap();
    assert_eq!(restored.check("acme.user.read_basic", &client), Ok(true));
    assert_eq!(restored.check("other.user.read_basic", &client), Ok(false));
}

#[test]
fn test_snapshot_version_mismatch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let model = resolve_from_path(write_policy(dir.path())).unwrap();

    let config = StorageConfig::default().with_cache_dir(dir.path().join("cache"));
    let path = save_snapshot(&model, &config).unwrap();

    // Rewrite the version field only; the body stays valid.
    let mut value: serde_json::Value =
        serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    value["version"] = serde_json::json!(99);
    fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

    match load_snapshot(&config) {
        Err(StorageError::VersionMismatch { found, expected }) => {
            assert_eq!(found, 99);
            assert_eq!(expected, rolegate_storage::SNAPSHOT_VERSION);
        }
        other => panic!("expected version mismatch, got {other:?}"),
    }
}

#[test]
fn test_missing_snapshot_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::default().with_cache_dir(dir.path().join("nothing_here"));
    assert!(matches!(
        load_snapshot(&config),
        Err(StorageError::Io(_))
    ));
}

#[test]
fn test_export_round_trips_through_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let model = resolve_from_path(write_policy(dir.path())).unwrap();

    let yaml_path = dir.path().join("export/model.yml");
    export_model(&model, &yaml_path, DocumentFormat::Yaml).unwrap();
    let restored: PolicyModel =
        serde_yaml::from_str(&fs::read_to_string(&yaml_path).unwrap()).unwrap();
    assert_eq!(restored, model);

    let json_path = dir.path().join("export/model.json");
    export_model(&model, &json_path, DocumentFormat::Json).unwrap();
    let restored: PolicyModel =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(restored, model);
}

#[test]
fn test_invalid_document_reports_model_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yml");
    fs::write(
        &path,
        r#"
metadata: {name: bad}
permissions:
  - metadata: {label: user}
    resources: [{label: user.read}]
organizations:
  - metadata: {label: acme}
    permissions: [{label: acme.user.missing}]
"#,
    )
    .unwrap();

    match resolve_from_path(&path) {
        Err(StorageError::Model(err)) => {
            assert_eq!(err.section(), rolegate_core::Section::Organizations);
            assert_eq!(err.label(), Some("acme.user.missing"));
        }
        other => panic!("expected model error, got {other:?}"),
    }
}
