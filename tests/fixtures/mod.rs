//! Test fixtures for deterministic testing

use std::fs;
use std::io::Write;
use std::path::Path;

/// Write a file with the given contents, creating parent directories,
/// and flush it to disk
pub fn write_file_sync<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(contents.as_ref())?;
    file.sync_all()
}

/// Create a file with an exact apparent size without writing the bytes.
/// Keeps multi-megabyte fixtures cheap.
pub fn sparse_file<P: AsRef<Path>>(path: P, len: u64) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    file.set_len(len)?;
    file.sync_all()
}
