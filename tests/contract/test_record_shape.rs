//! Contract tests for the JSON documents under `.freight`
//!
//! Other tooling reads these files directly, so field names and the
//! timestamp format are load-bearing.

use freight::io::store;
use freight::models::{
    CleanRecord, MigrateRecord, RecordStatus, RootConfig, ScanRecord, timestamp_now,
};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_scan_record_fields() {
    let record = ScanRecord::new(Path::new("/mnt/projects/alpha"), 4096, 12, 1_700_000_000);
    let json = serde_json::to_string(&record).unwrap();

    assert!(json.contains("\"scan_id\""));
    assert!(json.contains("\"directory\""));
    assert!(json.contains("\"scan_time\""));
    assert!(json.contains("\"size_bytes\":4096"));
    assert!(json.contains("\"file_count\":12"));
    assert!(json.contains("\"directory_mtime\":1700000000"));
    assert!(json.contains("\"status\":\"completed\""));
    assert!(json.contains("\"tool\":\"freight-scan\""));
    assert!(json.contains("\"version\""));
    assert!(record.scan_id.starts_with("scan-"));
}

#[test]
fn test_clean_record_fields() {
    let targets = vec!["node_modules".to_string(), "tmp".to_string()];
    let record = CleanRecord::begin(Path::new("/mnt/projects/alpha"), &targets, true);
    let json = serde_json::to_string(&record).unwrap();

    assert!(json.contains("\"clean_id\""));
    assert!(json.contains("\"directory\""));
    assert!(json.contains("\"clean_time\""));
    assert!(json.contains("\"bytes_cleaned\":0"));
    assert!(json.contains("\"items_cleaned\":0"));
    assert!(json.contains("\"cleaned_items\":[]"));
    assert!(json.contains("\"patterns_used\":[\"node_modules\",\"tmp\"]"));
    assert!(json.contains("\"patterns\":[]"));
    assert!(json.contains("\"tool\":\"freight-clean\""));
    assert!(json.contains("\"dry_run\":true"));
    assert!(record.clean_id.starts_with("clean-"));
}

#[test]
fn test_migrate_record_fields() {
    let record = MigrateRecord {
        start_time: timestamp_now(),
        end_time: timestamp_now(),
        bytes_transferred: 1024,
        files_transferred: 3,
        status: RecordStatus::Completed,
        error_message: String::new(),
        version: "1.3.0".to_string(),
    };
    let json = serde_json::to_string(&record).unwrap();

    assert!(json.contains("\"start_time\""));
    assert!(json.contains("\"end_time\""));
    assert!(json.contains("\"bytes_transferred\":1024"));
    assert!(json.contains("\"files_transferred\":3"));
    assert!(json.contains("\"status\":\"completed\""));
    assert!(json.contains("\"error_message\":\"\""));
}

#[test]
fn test_record_status_spelling() {
    assert_eq!(
        serde_json::to_string(&RecordStatus::Completed).unwrap(),
        "\"completed\""
    );
    assert_eq!(
        serde_json::to_string(&RecordStatus::Failed).unwrap(),
        "\"failed\""
    );
}

#[test]
fn test_config_defaults() {
    let config = RootConfig::default();
    let json = serde_json::to_string(&config).unwrap();

    assert!(json.contains("\"config_version\""));
    assert!(json.contains("\"migration_root\""));
    assert!(json.contains("\"dest_path\":null"));
    assert!(json.contains("\"created_time\""));
    assert!(json.contains("\"last_scan_time\":null"));
    assert!(json.contains("\"total_directories\":0"));
    assert!(json.contains("\"target_directories\":[]"));
    assert!(json.contains("\"shared_directory_threshold\":2"));
    assert!(json.contains("\"shared_directory_ignore\":[\".freight\",\".ssh\"]"));
    assert!(json.contains("\"count_failed_deletes\":true"));
    assert!(json.contains("-avxHAX"));
    assert!(json.contains("\"large_dir_threshold_bytes\":3221225472"));
}

#[test]
fn test_config_keeps_unknown_keys() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let raw = serde_json::json!({
        "config_version": "1.3.0",
        "migration_root": "/mnt/projects",
        "custom_note": "added by hand",
        "scan": {"total_directories": 4}
    });
    store::write(&store::config_path(root), &raw).unwrap();

    let config = store::load_config(root).unwrap().unwrap();
    assert_eq!(
        config.extra.get("custom_note").and_then(|v| v.as_str()),
        Some("added by hand")
    );
    assert_eq!(config.scan.total_directories, 4);

    // The unknown key survives a save
    store::save_config(root, &config).unwrap();
    let text = std::fs::read_to_string(store::config_path(root)).unwrap();
    assert!(text.contains("custom_note"));
    assert!(text.contains("added by hand"));
}

#[test]
fn test_legacy_version_key_is_recognized() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let raw = serde_json::json!({
        "freight_version": "0.9",
        "migration_root": "/mnt/projects"
    });
    store::write(&store::config_path(root), &raw).unwrap();

    let config = store::load_config(root).unwrap().unwrap();
    assert_eq!(config.version_mismatch(), Some("0.9"));
}

#[test]
fn test_missing_version_reads_as_unknown() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    store::write(
        &store::config_path(root),
        &serde_json::json!({"migration_root": "/mnt/projects"}),
    )
    .unwrap();

    let config = store::load_config(root).unwrap().unwrap();
    assert_eq!(config.version_mismatch(), Some("unknown"));
}

#[test]
fn test_timestamp_format() {
    // 2026-08-25T14:03:07Z
    let stamp = timestamp_now();
    assert_eq!(stamp.len(), 20);
    assert!(stamp.ends_with('Z'));
    assert_eq!(stamp.chars().nth(4), Some('-'));
    assert_eq!(stamp.chars().nth(7), Some('-'));
    assert_eq!(stamp.chars().nth(10), Some('T'));
    assert_eq!(stamp.chars().nth(13), Some(':'));
    assert_eq!(stamp.chars().nth(16), Some(':'));
}
