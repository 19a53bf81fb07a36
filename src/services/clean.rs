//! Cleanup of configured directory names inside a target directory
//!
//! Matches are direct children by exact name, never globs and never
//! recursive. Dry-run measures what would go; confirmed mode measures and
//! then deletes. Either way the record lands in the target's metadata
//! store so the overview can show reclaimable space.

use crate::io::store;
use crate::models::{CleanRecord, PatternSavings};
use crate::services::{format, probe};
use crate::{Result, SizeBasis};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub dry_run: bool,
    /// Count a failed deletion's measured size toward `bytes_cleaned`
    pub count_failed_deletes: bool,
    pub basis: SizeBasis,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            dry_run: true,
            count_failed_deletes: true,
            basis: SizeBasis::Apparent,
        }
    }
}

/// Process each configured name in order against `directory` and write the
/// resulting record to its metadata store.
pub fn clean(directory: &Path, names: &[String], options: &CleanOptions) -> Result<CleanRecord> {
    let mut record = CleanRecord::begin(directory, names, options.dry_run);

    for name in names {
        let target = directory.join(name);
        let Ok(metadata) = fs::symlink_metadata(&target) else {
            continue;
        };
        if !metadata.is_dir() {
            continue;
        }

        let measured = match probe::probe(&target, options.basis) {
            Ok(outcome) => outcome.size_bytes,
            Err(e) => {
                log::warn!("could not measure {}: {e}", target.display());
                0
            }
        };

        if options.dry_run {
            record.bytes_cleaned += measured;
            record.items_cleaned += 1;
            record
                .cleaned_items
                .push(format!("{name} ({})", format::format_size(measured)));
            record.patterns.push(PatternSavings {
                pattern: name.clone(),
                bytes_saved: measured,
            });
            continue;
        }

        match fs::remove_dir_all(&target) {
            Ok(()) => {
                record.bytes_cleaned += measured;
                record.items_cleaned += 1;
                record.cleaned_items.push(name.clone());
                record.patterns.push(PatternSavings {
                    pattern: name.clone(),
                    bytes_saved: measured,
                });
            }
            Err(e) => {
                log::warn!("failed to delete {}: {e}", target.display());
                if options.count_failed_deletes {
                    record.bytes_cleaned += measured;
                }
            }
        }
    }

    store::write(&store::clean_path(directory), &record)?;
    Ok(record)
}
