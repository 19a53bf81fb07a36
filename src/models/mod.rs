//! Data models for scan, clean, and migrate records plus the root config

use crate::FREIGHT_VERSION;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Timestamp format used in every record (`2026-08-25T14:03:07Z`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Default rsync flag set for migrations
pub const DEFAULT_RSYNC_FLAGS: &str =
    "-avxHAX --numeric-ids --compress --partial --info=progress2";

/// Directories at or above this size get a warning in the migration plan
pub const DEFAULT_LARGE_DIR_THRESHOLD: u64 = 3 * 1024 * 1024 * 1024;

/// Current UTC wall-clock in record form
#[must_use]
pub fn timestamp_now() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Unique-enough identifier for a record, e.g. `scan-20260825T140307Z`
#[must_use]
pub fn record_id(prefix: &str) -> String {
    format!("{prefix}-{}", Utc::now().format("%Y%m%dT%H%M%SZ"))
}

/// Outcome marker shared by all record types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Completed,
    Failed,
}

impl Default for RecordStatus {
    fn default() -> Self {
        Self::Completed
    }
}

/// Result of probing one directory, written to `.freight/scan.json`
///
/// `directory_mtime` of 0 means "unknown", never "epoch start".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanRecord {
    pub scan_id: String,
    pub directory: String,
    pub scan_time: String,
    pub size_bytes: u64,
    pub file_count: u64,
    pub directory_mtime: i64,
    pub status: RecordStatus,
    pub tool: String,
    pub version: String,
}

impl ScanRecord {
    #[must_use]
    pub fn new(directory: &Path, size_bytes: u64, file_count: u64, directory_mtime: i64) -> Self {
        Self {
            scan_id: record_id("scan"),
            directory: directory.display().to_string(),
            scan_time: timestamp_now(),
            size_bytes,
            file_count,
            directory_mtime,
            status: RecordStatus::Completed,
            tool: "freight-scan".to_string(),
            version: FREIGHT_VERSION.to_string(),
        }
    }
}

/// Per-name savings detail inside a [`CleanRecord`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternSavings {
    pub pattern: String,
    pub bytes_saved: u64,
}

/// Result of one cleanup pass, written to `.freight/clean.json`
///
/// When `dry_run` is set, `bytes_cleaned` reflects measured-but-not-deleted
/// size and nothing under the directory was touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanRecord {
    pub clean_id: String,
    pub directory: String,
    pub clean_time: String,
    pub bytes_cleaned: u64,
    pub items_cleaned: u64,
    pub cleaned_items: Vec<String>,
    pub patterns_used: Vec<String>,
    pub patterns: Vec<PatternSavings>,
    pub status: RecordStatus,
    pub tool: String,
    pub version: String,
    pub dry_run: bool,
}

impl CleanRecord {
    #[must_use]
    pub fn begin(directory: &Path, names: &[String], dry_run: bool) -> Self {
        Self {
            clean_id: record_id("clean"),
            directory: directory.display().to_string(),
            clean_time: timestamp_now(),
            patterns_used: names.to_vec(),
            status: RecordStatus::Completed,
            tool: "freight-clean".to_string(),
            version: FREIGHT_VERSION.to_string(),
            dry_run,
            ..Self::default()
        }
    }
}

/// Result of one transfer, written to `.freight/migrate.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateRecord {
    pub start_time: String,
    pub end_time: String,
    pub bytes_transferred: u64,
    pub files_transferred: u64,
    pub status: RecordStatus,
    /// Empty when `status` is `completed`
    pub error_message: String,
    pub version: String,
}

/// Root-level configuration stored at `.freight/config.json`
///
/// Typed fields cover everything the tools consume; unrecognized keys are
/// kept in `extra` and survive a load/save round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootConfig {
    #[serde(default)]
    pub config_version: String,
    #[serde(default)]
    pub migration_root: String,
    #[serde(default)]
    pub dest_path: Option<String>,
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub clean: CleanSettings,
    #[serde(default)]
    pub migrate: MigrateSettings,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub last_scan_time: Option<String>,
    pub total_directories: u64,
    pub total_size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanSettings {
    pub last_clean_time: Option<String>,
    /// Literal child names to delete, in order. Not globs.
    pub target_directories: Vec<String>,
    pub shared_directory_threshold: usize,
    pub shared_directory_ignore: Vec<String>,
    /// When set, a failed deletion still counts its measured size toward
    /// `bytes_cleaned` (the historical accounting). The item is never
    /// listed as cleaned in either mode.
    pub count_failed_deletes: bool,
}

impl Default for CleanSettings {
    fn default() -> Self {
        Self {
            last_clean_time: None,
            target_directories: Vec::new(),
            shared_directory_threshold: 2,
            shared_directory_ignore: vec![".freight".to_string(), ".ssh".to_string()],
            count_failed_deletes: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateSettings {
    pub last_migrate_time: Option<String>,
    pub rsync_flags: String,
    pub large_dir_threshold_bytes: u64,
}

impl Default for MigrateSettings {
    fn default() -> Self {
        Self {
            last_migrate_time: None,
            rsync_flags: DEFAULT_RSYNC_FLAGS.to_string(),
            large_dir_threshold_bytes: DEFAULT_LARGE_DIR_THRESHOLD,
        }
    }
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            config_version: FREIGHT_VERSION.to_string(),
            migration_root: String::new(),
            dest_path: None,
            created_time: timestamp_now(),
            scan: ScanSettings::default(),
            clean: CleanSettings::default(),
            migrate: MigrateSettings::default(),
            extra: Map::new(),
        }
    }
}

impl RootConfig {
    #[must_use]
    pub fn new(migration_root: &str, dest_path: Option<&str>) -> Self {
        Self {
            migration_root: migration_root.to_string(),
            dest_path: dest_path.map(ToString::to_string),
            ..Self::default()
        }
    }

    /// Stored version when it differs from the running tool.
    ///
    /// Very old configs carried the version under `freight_version`; an
    /// absent version reads as "unknown".
    #[must_use]
    pub fn version_mismatch(&self) -> Option<&str> {
        let version = match self.config_version.as_str() {
            "" => self
                .extra
                .get("freight_version")
                .and_then(Value::as_str)
                .unwrap_or("unknown"),
            v => v,
        };
        (version != FREIGHT_VERSION).then_some(version)
    }
}

/// One row of the overview: a subdirectory and whatever records it has
#[derive(Debug, Clone)]
pub struct DirectoryStatus {
    pub name: String,
    pub directory: String,
    pub scan: Option<ScanRecord>,
    pub clean: Option<CleanRecord>,
}

impl DirectoryStatus {
    #[must_use]
    pub fn has_scan(&self) -> bool {
        self.scan.is_some()
    }

    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.scan.as_ref().map_or(0, |s| s.size_bytes)
    }

    #[must_use]
    pub fn file_count(&self) -> u64 {
        self.scan.as_ref().map_or(0, |s| s.file_count)
    }

    #[must_use]
    pub fn scan_time(&self) -> Option<&str> {
        self.scan.as_ref().map(|s| s.scan_time.as_str())
    }

    #[must_use]
    pub fn bytes_cleaned(&self) -> u64 {
        self.clean.as_ref().map_or(0, |c| c.bytes_cleaned)
    }

    #[must_use]
    pub fn has_clean_data(&self) -> bool {
        self.clean.is_some()
    }

    /// Patterns from the clean record that actually hold reclaimable bytes
    #[must_use]
    pub fn problem_directories(&self) -> Vec<&PatternSavings> {
        self.clean
            .as_ref()
            .map(|c| c.patterns.iter().filter(|p| p.bytes_saved > 0).collect())
            .unwrap_or_default()
    }
}

/// Aggregate statistics over a migration root
#[derive(Debug, Clone, Default, Serialize)]
pub struct RootStats {
    pub total_directories: usize,
    pub scanned_directories: usize,
    pub unscanned_directories: usize,
    pub completion_rate: f64,
    pub total_size_bytes: u64,
    pub total_files: u64,
    pub total_cleanable_bytes: u64,
}

impl RootStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_rows(rows: &[DirectoryStatus]) -> Self {
        let total_directories = rows.len();
        let scanned_directories = rows.iter().filter(|r| r.has_scan()).count();
        let completion_rate = if total_directories > 0 {
            scanned_directories as f64 / total_directories as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_directories,
            scanned_directories,
            unscanned_directories: total_directories - scanned_directories,
            completion_rate,
            total_size_bytes: rows.iter().map(DirectoryStatus::size_bytes).sum(),
            total_files: rows.iter().map(DirectoryStatus::file_count).sum(),
            total_cleanable_bytes: rows.iter().map(DirectoryStatus::bytes_cleaned).sum(),
        }
    }
}
