//! Bulk transfer via rsync
//!
//! The copy itself is rsync's job; this module owns the invocation, the
//! live echo of its output, the extraction of summary statistics, and the
//! zero/non-zero exit classification. A trailing slash on the source gives
//! contents-into-destination semantics.

use crate::io::store;
use crate::models::{MigrateRecord, RecordStatus, timestamp_now};
use crate::{Error, FREIGHT_VERSION, Result};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

const BYTES_LABELS: [&str; 1] = ["Total transferred file size:"];
// Older rsync releases print the second form
const FILES_LABELS: [&str; 2] = [
    "Number of regular files transferred:",
    "Number of files transferred:",
];

#[derive(Debug, Clone)]
pub struct TransferOptions {
    /// Flag string handed to rsync, split on whitespace.
    /// `--stats` is appended when missing; the summary parse needs it.
    pub flags: String,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            flags: crate::models::DEFAULT_RSYNC_FLAGS.to_string(),
        }
    }
}

/// Counters extracted from rsync's `--stats` block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    pub bytes_transferred: u64,
    pub files_transferred: u64,
}

/// Copy `source`'s contents into `destination` and record the outcome in
/// the source's metadata store.
///
/// Fails fast, before any copy, when the source is missing or was never
/// probed, when the destination parent does not exist, or when rsync is
/// not on `PATH`. A non-zero rsync exit is not an `Err`: it comes back as
/// a record with `status: failed` and the error summary filled in.
pub fn transfer(
    source: &Path,
    destination: &Path,
    options: &TransferOptions,
) -> Result<MigrateRecord> {
    if !source.is_dir() {
        return Err(Error::Validation(format!(
            "source directory does not exist: {}",
            source.display()
        )));
    }
    if !store::has_metadata(source) {
        return Err(Error::Precondition(format!(
            "source has not been scanned yet: {} (run a scan first)",
            source.display()
        )));
    }
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        return Err(Error::Validation(format!(
            "destination parent does not exist: {}",
            parent.display()
        )));
    }
    ensure_rsync()?;

    let mut args: Vec<&str> = options.flags.split_whitespace().collect();
    if !args.contains(&"--stats") {
        args.push("--stats");
    }

    let mut source_arg = source.display().to_string();
    if !source_arg.ends_with('/') {
        source_arg.push('/');
    }

    let start_time = timestamp_now();
    let mut child = Command::new("rsync")
        .args(&args)
        .arg(&source_arg)
        .arg(destination)
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| Error::Transfer(format!("failed to start rsync: {e}")))?;

    // Echo rsync's output live while keeping a copy for the stats parse
    let mut captured = String::new();
    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines() {
            match line {
                Ok(line) => {
                    println!("{line}");
                    captured.push_str(&line);
                    captured.push('\n');
                }
                Err(e) => {
                    log::warn!("error reading rsync output: {e}");
                    break;
                }
            }
        }
    }

    let status = child
        .wait()
        .map_err(|e| Error::Transfer(format!("failed waiting for rsync: {e}")))?;
    let end_time = timestamp_now();

    let stats = parse_transfer_stats(&captured);
    let record = MigrateRecord {
        start_time,
        end_time,
        bytes_transferred: stats.bytes_transferred,
        files_transferred: stats.files_transferred,
        status: if status.success() {
            RecordStatus::Completed
        } else {
            RecordStatus::Failed
        },
        error_message: if status.success() {
            String::new()
        } else {
            format!("rsync exited with {status}")
        },
        version: FREIGHT_VERSION.to_string(),
    };

    store::write(&store::migrate_path(source), &record)?;
    Ok(record)
}

/// Extract byte and file counters from rsync's summary output.
/// An absent label parses as 0: "not reported", not "confirmed zero".
#[must_use]
pub fn parse_transfer_stats(output: &str) -> TransferStats {
    TransferStats {
        bytes_transferred: parse_labeled_count(output, &BYTES_LABELS),
        files_transferred: parse_labeled_count(output, &FILES_LABELS),
    }
}

fn parse_labeled_count(output: &str, labels: &[&str]) -> u64 {
    for line in output.lines() {
        for label in labels {
            if let Some(rest) = line.trim_start().strip_prefix(label) {
                let token = rest.split_whitespace().next().unwrap_or("");
                let digits: String = token.chars().filter(|c| *c != ',').collect();
                if let Ok(value) = digits.parse::<u64>() {
                    return value;
                }
            }
        }
    }
    0
}

/// Fail fast when rsync is absent; transfers are impossible without it.
pub fn ensure_rsync() -> Result<()> {
    if rsync_available() {
        Ok(())
    } else {
        Err(Error::Validation(
            "rsync not found on PATH; install it and retry".to_string(),
        ))
    }
}

#[must_use]
pub fn rsync_available() -> bool {
    let path = std::env::var_os("PATH").unwrap_or_default();
    std::env::split_paths(&path).any(|dir| dir.join("rsync").is_file())
}
