//! JSON status store for the `.freight` metadata layout
//!
//! Every record and the root config live as small JSON documents under a
//! hidden `.freight` folder. Writes go to a temp sibling and are renamed
//! into place so a crash never leaves partial JSON behind. Merges coerce
//! string values into numbers and booleans the way the historical tooling
//! expected, and accept dotted keys (`scan.total_size_bytes`) that descend
//! into nested objects.

use crate::models::RootConfig;
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Hidden per-directory metadata folder
pub const META_DIR: &str = ".freight";
/// Presence-only marker designating a migration root
pub const ROOT_MARKER: &str = ".freight-root";
pub const SCAN_FILE: &str = "scan.json";
pub const CLEAN_FILE: &str = "clean.json";
pub const MIGRATE_FILE: &str = "migrate.json";
pub const CONFIG_FILE: &str = "config.json";

#[must_use]
pub fn meta_dir(directory: &Path) -> PathBuf {
    directory.join(META_DIR)
}

#[must_use]
pub fn scan_path(directory: &Path) -> PathBuf {
    meta_dir(directory).join(SCAN_FILE)
}

#[must_use]
pub fn clean_path(directory: &Path) -> PathBuf {
    meta_dir(directory).join(CLEAN_FILE)
}

#[must_use]
pub fn migrate_path(directory: &Path) -> PathBuf {
    meta_dir(directory).join(MIGRATE_FILE)
}

#[must_use]
pub fn config_path(root: &Path) -> PathBuf {
    meta_dir(root).join(CONFIG_FILE)
}

#[must_use]
pub fn root_marker_path(root: &Path) -> PathBuf {
    root.join(ROOT_MARKER)
}

/// Whether a directory has ever been probed (its metadata folder exists)
#[must_use]
pub fn has_metadata(directory: &Path) -> bool {
    meta_dir(directory).is_dir()
}

#[must_use]
pub fn is_migration_root(directory: &Path) -> bool {
    root_marker_path(directory).is_file()
}

/// Read a JSON document as a raw object map. A missing file is `None`.
pub fn read(path: &Path) -> Result<Option<Map<String, Value>>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io(e)),
    };

    let value: Value = serde_json::from_str(&text)
        .map_err(|e| Error::Store(format!("{}: {e}", path.display())))?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(Error::Store(format!(
            "{}: expected a JSON object",
            path.display()
        ))),
    }
}

/// Read and deserialize a typed record. A missing file is `None`.
pub fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io(e)),
    };

    let record = serde_json::from_str(&text)
        .map_err(|e| Error::Store(format!("{}: {e}", path.display())))?;
    Ok(Some(record))
}

/// Write a document atomically, creating parent directories as needed.
pub fn write<T: Serialize + ?Sized>(path: &Path, document: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let text = serde_json::to_string_pretty(document)
        .map_err(|e| Error::Store(format!("{}: {e}", path.display())))?;

    let tmp = tmp_sibling(path);
    fs::write(&tmp, text.as_bytes())?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::Io(e));
    }
    Ok(())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("status"), ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}

/// Coerce a raw string the way the historical tooling did: `"true"` and
/// `"false"` become booleans, integral and decimal strings become numbers,
/// everything else stays a string.
#[must_use]
pub fn coerce_scalar(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = raw.parse::<i64>() {
                Value::Number(n.into())
            } else if let Ok(f) = raw.parse::<f64>()
                && let Some(number) = serde_json::Number::from_f64(f)
            {
                Value::Number(number)
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

/// Read-modify-write a document: coerce each value, overwrite the keyed
/// slots, write back atomically, and return the merged map. Keys may be
/// dotted paths that descend into (or create) nested objects.
///
/// Merges are not transactional across processes; callers serialize runs
/// per root.
pub fn merge(path: &Path, updates: &[(&str, String)]) -> Result<Map<String, Value>> {
    let mut document = read(path)?.unwrap_or_default();

    for (key, raw) in updates {
        set_path(&mut document, key, coerce_scalar(raw));
    }

    write(path, &document)?;
    Ok(document)
}

fn set_path(map: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            map.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let slot = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                set_path(child, rest, value);
            }
        }
    }
}

/// Load the typed config for a root. A missing config is `None`.
pub fn load_config(root: &Path) -> Result<Option<RootConfig>> {
    read_record(&config_path(root))
}

pub fn save_config(root: &Path, config: &RootConfig) -> Result<()> {
    write(&config_path(root), config)
}

/// Create the config skeleton if the root has none yet.
/// Returns whether a new config was written.
pub fn ensure_config(root: &Path, dest_path: Option<&str>) -> Result<bool> {
    let path = config_path(root);
    if path.exists() {
        return Ok(false);
    }
    let config = RootConfig::new(&root.display().to_string(), dest_path);
    write(&path, &config)?;
    Ok(true)
}

/// Materialize a migration root: metadata folder, root marker, and config
/// skeleton. Returns whether the config was newly created.
pub fn init_root(root: &Path, dest_path: Option<&str>) -> Result<bool> {
    fs::create_dir_all(meta_dir(root))?;
    let created = ensure_config(root, dest_path)?;
    let marker = root_marker_path(root);
    if !marker.exists() {
        fs::write(&marker, b"")?;
    }
    Ok(created)
}
