//! Per-root orchestration of scan, clean, and migrate passes
//!
//! An [`Orchestrator`] loads a root's config once and drives each
//! operation over the root's immediate subdirectories in sorted order,
//! excluding the metadata folder. One subdirectory failing is counted and
//! reported but never aborts the rest of the pass; fatal validation
//! problems surface before any work starts. Progress is reported to the
//! terminal as each subdirectory is processed.

use crate::cli::output;
use crate::io::store;
use crate::models::{
    CleanRecord, DirectoryStatus, RecordStatus, RootConfig, RootStats, ScanRecord, timestamp_now,
};
use crate::services::freshness::{self, Decision};
use crate::services::{clean, probe, transfer};
use crate::{Error, Result, ScanOptions, SizeBasis};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Totals from an orchestrated scan pass
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub total: usize,
    pub scanned: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total_size_bytes: u64,
    pub total_files: u64,
    pub failures: Vec<(String, String)>,
}

/// Totals from an orchestrated clean pass
#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    pub total: usize,
    pub processed: usize,
    pub failed: usize,
    pub bytes_cleaned: u64,
    pub items_cleaned: u64,
    pub failures: Vec<(String, String)>,
}

/// One subdirectory in a migration plan
#[derive(Debug, Clone)]
pub struct MigrateEntry {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub size_bytes: u64,
    /// Sits at or above the configured large-directory threshold
    pub large: bool,
}

/// The per-subdirectory migration plan for a root
#[derive(Debug, Clone)]
pub struct MigratePlan {
    pub dest_root: PathBuf,
    pub entries: Vec<MigrateEntry>,
    /// Subdirectories refused for lacking a scan record
    pub unscanned: Vec<String>,
    pub total_bytes: u64,
}

/// Totals from an executed migration pass
#[derive(Debug, Clone, Default)]
pub struct MigrateReport {
    pub migrated: usize,
    pub failed: usize,
    pub skipped: usize,
    pub bytes_transferred: u64,
    pub files_transferred: u64,
    pub failures: Vec<(String, String)>,
}

/// Shared-directory occurrence counts across a root's subdirectories
#[derive(Debug, Clone, Default)]
pub struct SharedAnalysis {
    pub counts: BTreeMap<String, usize>,
    pub total_subdirs: usize,
}

/// What `init` materialized
#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub root: PathBuf,
    pub dest: Option<String>,
    pub config_path: PathBuf,
}

/// Initialize a directory as a migration root: metadata folder, root
/// marker, and config skeleton. Refuses to clobber an existing config.
pub fn init(root: &Path, dest: Option<&str>) -> Result<InitOutcome> {
    if !root.exists() {
        return Err(Error::Validation(format!(
            "source directory does not exist: {}",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(Error::Validation(format!(
            "source path is not a directory: {}",
            root.display()
        )));
    }

    let root = root.canonicalize()?;
    let config_path = store::config_path(&root);
    if config_path.exists() {
        return Err(Error::Validation(format!(
            "already initialized: {} exists; edit it, or move it aside and rerun init",
            config_path.display()
        )));
    }

    store::init_root(&root, dest)?;
    Ok(InitOutcome {
        root,
        dest: dest.map(ToString::to_string),
        config_path,
    })
}

#[derive(Debug)]
pub struct Orchestrator {
    root: PathBuf,
    config: RootConfig,
    config_created: bool,
}

impl Orchestrator {
    /// Open a migration root, creating the config skeleton when the root
    /// has none yet.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(Error::Validation(format!(
                "migration root not found: {}",
                root.display()
            )));
        }
        if !root.is_dir() {
            return Err(Error::Validation(format!(
                "migration root is not a directory: {}",
                root.display()
            )));
        }

        let root = root.canonicalize()?;
        let config_created = store::ensure_config(&root, None)?;
        let config = store::load_config(&root)?.ok_or_else(|| {
            Error::Store(format!(
                "config disappeared after creation: {}",
                store::config_path(&root).display()
            ))
        })?;

        Ok(Self {
            root,
            config,
            config_created,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn config(&self) -> &RootConfig {
        &self.config
    }

    /// Whether `open` had to create the config skeleton
    #[must_use]
    pub fn config_created(&self) -> bool {
        self.config_created
    }

    /// Immediate subdirectories of the root in sorted order, excluding
    /// the metadata folder
    fn subdirectories(&self) -> Result<Vec<PathBuf>> {
        let mut subdirs = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_name() == store::META_DIR {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                subdirs.push(path);
            }
        }
        subdirs.sort();
        Ok(subdirs)
    }

    fn reload_config(&mut self) -> Result<()> {
        self.config = store::load_config(&self.root)?.ok_or_else(|| {
            Error::Store(format!(
                "config missing: {}",
                store::config_path(&self.root).display()
            ))
        })?;
        Ok(())
    }

    /// Scan every subdirectory that the freshness check says is stale,
    /// reusing recorded totals for the rest, and merge the aggregate into
    /// the root config.
    pub fn run_scan(&mut self, options: &ScanOptions) -> Result<ScanReport> {
        let subdirs = self.subdirectories()?;
        let mut report = ScanReport {
            total: subdirs.len(),
            ..ScanReport::default()
        };

        if subdirs.is_empty() {
            output::no_subdirectories(&self.root);
            self.merge_scan_totals(&report)?;
            return Ok(report);
        }

        output::scan_banner(&self.root, subdirs.len());

        for (index, subdir) in subdirs.iter().enumerate() {
            let name = dir_name(subdir);
            let prior = if options.force {
                None
            } else {
                self.read_scan_record(subdir, &name)
            };

            let decision = if options.force {
                Decision {
                    needed: true,
                    reason: "forced",
                }
            } else {
                freshness::needs_scan(subdir, prior.as_ref())
            };
            log::debug!("{name}: rescan={} ({})", decision.needed, decision.reason);

            if !decision.needed {
                output::scan_skip(index + 1, report.total, &name, decision.reason);
                report.skipped += 1;
                if let Some(prior) = &prior {
                    report.total_size_bytes += prior.size_bytes;
                    report.total_files += prior.file_count;
                }
                continue;
            }

            output::scan_step(index + 1, report.total, &name);
            match Self::scan_one(subdir, options.basis) {
                Ok(outcome) => {
                    output::scan_ok();
                    report.scanned += 1;
                    report.total_size_bytes += outcome.size_bytes;
                    report.total_files += outcome.file_count;
                }
                Err(e) => {
                    output::scan_fail();
                    report.failed += 1;
                    report.failures.push((name, e.to_string()));
                }
            }
        }

        output::scan_summary(&report);
        self.merge_scan_totals(&report)?;
        Ok(report)
    }

    /// Probe one subdirectory and persist its record.
    ///
    /// The metadata folder is created before the mtime is captured;
    /// creating it afterwards would mark the directory modified and waste
    /// the next freshness check.
    fn scan_one(subdir: &Path, basis: SizeBasis) -> Result<probe::ProbeOutcome> {
        fs::create_dir_all(store::meta_dir(subdir))?;
        let outcome = probe::probe(subdir, basis)?;
        let record = ScanRecord::new(subdir, outcome.size_bytes, outcome.file_count, outcome.mtime);
        store::write(&store::scan_path(subdir), &record)?;
        Ok(outcome)
    }

    fn read_scan_record(&self, subdir: &Path, name: &str) -> Option<ScanRecord> {
        match store::read_record::<ScanRecord>(&store::scan_path(subdir)) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("unreadable scan record for {name}: {e}");
                None
            }
        }
    }

    fn merge_scan_totals(&mut self, report: &ScanReport) -> Result<()> {
        let updates = [
            ("scan.last_scan_time", timestamp_now()),
            ("scan.total_directories", report.total.to_string()),
            (
                "scan.total_size_bytes",
                report.total_size_bytes.to_string(),
            ),
        ];
        store::merge(&store::config_path(&self.root), &updates)?;
        self.reload_config()
    }

    /// Clean every subdirectory with the configured target names.
    /// Dry-run by default at the CLI; this takes the resolved mode.
    pub fn run_clean(&mut self, dry_run: bool) -> Result<CleanReport> {
        let targets = self.config.clean.target_directories.clone();
        if targets.is_empty() {
            return Err(Error::Validation(format!(
                "no clean targets configured; add clean.target_directories to {}",
                store::config_path(&self.root).display()
            )));
        }

        let options = clean::CleanOptions {
            dry_run,
            count_failed_deletes: self.config.clean.count_failed_deletes,
            basis: SizeBasis::Apparent,
        };

        let subdirs = self.subdirectories()?;
        let mut report = CleanReport {
            total: subdirs.len(),
            ..CleanReport::default()
        };

        if subdirs.is_empty() {
            output::no_subdirectories(&self.root);
            return Ok(report);
        }

        output::clean_banner(&self.root, dry_run, &targets);

        for subdir in &subdirs {
            let name = dir_name(subdir);
            match clean::clean(subdir, &targets, &options) {
                Ok(record) => {
                    output::clean_line(&name, &record);
                    report.processed += 1;
                    report.bytes_cleaned += record.bytes_cleaned;
                    report.items_cleaned += record.items_cleaned;
                }
                Err(e) => {
                    output::clean_fail(&name);
                    report.failed += 1;
                    report.failures.push((name, e.to_string()));
                }
            }
        }

        output::clean_summary(&report, dry_run);

        if !dry_run {
            store::merge(
                &store::config_path(&self.root),
                &[("clean.last_clean_time", timestamp_now())],
            )?;
            self.reload_config()?;
        }
        Ok(report)
    }

    /// Build the migration plan without touching anything: one entry per
    /// scanned subdirectory, with unscanned ones listed for refusal.
    pub fn plan_migrate(&self, dest_override: Option<&Path>) -> Result<MigratePlan> {
        let dest_root = self.resolve_dest(dest_override)?;
        let threshold = self.config.migrate.large_dir_threshold_bytes;

        let mut plan = MigratePlan {
            dest_root: dest_root.clone(),
            entries: Vec::new(),
            unscanned: Vec::new(),
            total_bytes: 0,
        };

        for subdir in self.subdirectories()? {
            let name = dir_name(&subdir);
            match self.read_scan_record(&subdir, &name) {
                Some(record) => {
                    plan.total_bytes += record.size_bytes;
                    plan.entries.push(MigrateEntry {
                        destination: dest_root.join(&name),
                        name,
                        source: subdir,
                        size_bytes: record.size_bytes,
                        large: record.size_bytes >= threshold,
                    });
                }
                None => plan.unscanned.push(name),
            }
        }
        Ok(plan)
    }

    /// Execute the migration plan, one rsync per subdirectory. Individual
    /// failures are collected; the pass keeps going.
    pub fn run_migrate(&mut self, dest_override: Option<&Path>) -> Result<MigrateReport> {
        let plan = self.plan_migrate(dest_override)?;
        if !plan.dest_root.is_dir() {
            return Err(Error::Validation(format!(
                "destination root does not exist: {}",
                plan.dest_root.display()
            )));
        }
        transfer::ensure_rsync()?;

        output::migrate_banner(&self.root, &plan.dest_root);

        let options = transfer::TransferOptions {
            flags: self.config.migrate.rsync_flags.clone(),
        };
        let mut report = MigrateReport {
            skipped: plan.unscanned.len(),
            ..MigrateReport::default()
        };

        let total = plan.entries.len();
        for (index, entry) in plan.entries.iter().enumerate() {
            output::migrate_step(index + 1, total, &entry.name, entry.size_bytes);
            match transfer::transfer(&entry.source, &entry.destination, &options) {
                Ok(record) if record.status == RecordStatus::Completed => {
                    report.migrated += 1;
                    report.bytes_transferred += record.bytes_transferred;
                    report.files_transferred += record.files_transferred;
                }
                Ok(record) => {
                    report.failed += 1;
                    report.failures.push((entry.name.clone(), record.error_message));
                }
                Err(e) => {
                    report.failed += 1;
                    report.failures.push((entry.name.clone(), e.to_string()));
                }
            }
        }

        for name in &plan.unscanned {
            log::warn!("{name}: skipped, no scan record");
        }

        output::migrate_summary(&report);
        store::merge(
            &store::config_path(&self.root),
            &[("migrate.last_migrate_time", timestamp_now())],
        )?;
        self.reload_config()?;
        Ok(report)
    }

    fn resolve_dest(&self, dest_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(dest) = dest_override {
            return Ok(dest.to_path_buf());
        }
        match self.config.dest_path.as_deref() {
            Some(dest) if !dest.is_empty() => Ok(PathBuf::from(dest)),
            _ => Err(Error::Validation(
                "no destination configured; pass --dest or set dest_path in the root config"
                    .to_string(),
            )),
        }
    }

    /// Load whatever records each subdirectory has, without scanning
    pub fn collect_overview(&self) -> Result<Vec<DirectoryStatus>> {
        let mut rows = Vec::new();
        for subdir in self.subdirectories()? {
            let name = dir_name(&subdir);
            let scan = self.read_scan_record(&subdir, &name);
            let clean = match store::read_record::<CleanRecord>(&store::clean_path(&subdir)) {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("unreadable clean record for {name}: {e}");
                    None
                }
            };
            rows.push(DirectoryStatus {
                name,
                directory: subdir.display().to_string(),
                scan,
                clean,
            });
        }
        Ok(rows)
    }

    /// Overview rows plus aggregate stats, with the totals merged back
    /// into the root config.
    pub fn overview(&mut self) -> Result<(Vec<DirectoryStatus>, RootStats)> {
        let rows = self.collect_overview()?;
        let stats = RootStats::from_rows(&rows);
        let updates = [
            (
                "scan.total_directories",
                stats.total_directories.to_string(),
            ),
            ("scan.total_size_bytes", stats.total_size_bytes.to_string()),
        ];
        store::merge(&store::config_path(&self.root), &updates)?;
        self.reload_config()?;
        Ok((rows, stats))
    }

    /// Count immediate child directory names across all subdirectories,
    /// skipping the configured ignore list. High counts point at shared
    /// content worth adding to the clean targets.
    pub fn shared_directories(&self) -> Result<SharedAnalysis> {
        let ignore = &self.config.clean.shared_directory_ignore;
        let mut analysis = SharedAnalysis::default();

        for subdir in self.subdirectories()? {
            analysis.total_subdirs += 1;
            let entries = match fs::read_dir(&subdir) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("could not access {}: {e}", subdir.display());
                    continue;
                }
            };
            for entry in entries {
                let Ok(entry) = entry else { continue };
                if !entry.path().is_dir() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().to_string();
                if ignore.iter().any(|ignored| *ignored == name) {
                    continue;
                }
                *analysis.counts.entry(name).or_insert(0) += 1;
            }
        }
        Ok(analysis)
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().to_string(),
    )
}
