//! Directory probing: recursive sizing and regular-file counting
//!
//! Replaces the `du`/`find`/`stat` pipeline with a native walk. The probe
//! root's own `.freight` folder is excluded from the totals; deeper entries
//! named `.freight` belong to whatever is being measured and count as data.

use crate::io::store;
use crate::{Error, Result, SizeBasis};
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// What a probe learned about one directory
#[derive(Debug, Clone, Copy)]
pub struct ProbeOutcome {
    pub size_bytes: u64,
    pub file_count: u64,
    /// The directory's own mtime (not recursive), 0 when unknown
    pub mtime: i64,
}

/// Measure a directory tree.
///
/// An unreadable probe root is an error; unreadable entries deeper in the
/// tree are logged and skipped, and the totals reflect the readable
/// remainder. Symlinks are never followed.
pub fn probe(directory: &Path, basis: SizeBasis) -> Result<ProbeOutcome> {
    let metadata = fs::symlink_metadata(directory).map_err(|e| unreadable(directory, &e))?;
    if !metadata.is_dir() {
        return Err(Error::Probe {
            path: directory.display().to_string(),
            message: "not a directory".to_string(),
        });
    }

    let mtime = mtime_epoch(&metadata);
    let (size_bytes, file_count) =
        walk(directory, true, basis).map_err(|e| unreadable(directory, &e))?;

    Ok(ProbeOutcome {
        size_bytes,
        file_count,
        mtime,
    })
}

/// Modification time of a directory itself, 0 when unavailable
#[must_use]
pub fn dir_mtime(directory: &Path) -> i64 {
    fs::symlink_metadata(directory).map_or(0, |metadata| mtime_epoch(&metadata))
}

#[must_use]
pub fn mtime_epoch(metadata: &fs::Metadata) -> i64 {
    let Ok(modified) = metadata.modified() else {
        return 0;
    };
    match modified.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(0),
        Err(_) => 0,
    }
}

fn unreadable(directory: &Path, error: &std::io::Error) -> Error {
    Error::Probe {
        path: directory.display().to_string(),
        message: error.to_string(),
    }
}

fn walk(directory: &Path, exclude_meta: bool, basis: SizeBasis) -> std::io::Result<(u64, u64)> {
    let mut size_bytes = 0u64;
    let mut file_count = 0u64;

    for entry in fs::read_dir(directory)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry under {}: {e}", directory.display());
                continue;
            }
        };

        if exclude_meta && entry.file_name() == store::META_DIR {
            continue;
        }

        let path = entry.path();
        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("cannot stat {}: {e}", path.display());
                continue;
            }
        };

        if metadata.is_symlink() {
            continue;
        }

        if metadata.is_file() {
            size_bytes += entry_size(&metadata, basis);
            file_count += 1;
        } else if metadata.is_dir() {
            match walk(&path, false, basis) {
                Ok((nested_size, nested_files)) => {
                    size_bytes += nested_size;
                    file_count += nested_files;
                }
                Err(e) => {
                    log::warn!("skipping unreadable directory {}: {e}", path.display());
                }
            }
        }
    }

    Ok((size_bytes, file_count))
}

fn entry_size(metadata: &fs::Metadata, basis: SizeBasis) -> u64 {
    match basis {
        SizeBasis::Apparent => metadata.len(),
        SizeBasis::Allocated => allocated_size(metadata),
    }
}

// Block counts are in 512-byte units regardless of the filesystem block size
#[cfg(unix)]
fn allocated_size(metadata: &fs::Metadata) -> u64 {
    metadata.blocks() * 512
}

#[cfg(not(unix))]
fn allocated_size(metadata: &fs::Metadata) -> u64 {
    metadata.len()
}
