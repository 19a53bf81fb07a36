//! Rescan decision based on directory modification times
//!
//! A directory's mtime changes when a direct child is added or removed,
//! not on deeper mutations. That approximation is accepted: it avoids
//! re-walking unchanged multi-terabyte trees, and anything it misses is
//! picked up by a forced rescan.

use crate::models::ScanRecord;
use crate::services::probe;
use std::path::Path;

/// Whether a rescan is needed and why, for progress display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub needed: bool,
    pub reason: &'static str,
}

impl Decision {
    fn rescan(reason: &'static str) -> Self {
        Self {
            needed: true,
            reason,
        }
    }

    fn fresh(reason: &'static str) -> Self {
        Self {
            needed: false,
            reason,
        }
    }
}

/// Decide whether `directory` needs rescanning given its last record.
///
/// Rescans when there is no prior record, no stored mtime (0 means
/// unknown), or the directory changed since the record was written. A
/// failed stat never skips.
#[must_use]
pub fn needs_scan(directory: &Path, prior: Option<&ScanRecord>) -> Decision {
    let Some(prior) = prior else {
        return Decision::rescan("no prior scan");
    };

    if prior.directory_mtime == 0 {
        return Decision::rescan("no recorded mtime");
    }

    let current = probe::dir_mtime(directory);
    if current == 0 {
        return Decision::rescan("mtime unreadable");
    }

    if current > prior.directory_mtime {
        Decision::rescan("directory modified")
    } else {
        Decision::fresh("no changes")
    }
}
