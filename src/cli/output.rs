//! Output formatting for CLI
//!
//! All terminal rendering lives here: progress lines, pass summaries,
//! the overview grid, and the shared-directory table. The orchestrator
//! calls into these as it works so the binaries stay thin.

use crate::models::{CleanRecord, DirectoryStatus, MigrateRecord, RecordStatus, RootStats};
use crate::orchestrator::{
    CleanReport, InitOutcome, MigratePlan, MigrateReport, ScanReport, SharedAnalysis,
};
use crate::services::format::{format_count, format_size};
use std::env;
use std::io::{self, Write};
use std::path::Path;

pub const GREEN: &str = "\x1b[92m";
pub const RED: &str = "\x1b[91m";
pub const YELLOW: &str = "\x1b[93m";
pub const CYAN: &str = "\x1b[96m";
pub const WHITE: &str = "\x1b[97m";
pub const BOLD: &str = "\x1b[1m";
pub const END: &str = "\x1b[0m";

const RULE_WIDTH: usize = 60;
/// Narrowest a directory block may render in the overview grid
const MIN_BLOCK_WIDTH: usize = 35;
const BLOCK_SEPARATOR: usize = 2;

/// Count visible characters, skipping ANSI escape sequences
#[must_use]
pub fn visible_len(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip to the terminating letter of the CSI sequence
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            count += 1;
        }
    }
    count
}

/// Pad to a target width, counting only visible characters
#[must_use]
pub fn pad_line(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(visible_len(text));
    format!("{text}{}", " ".repeat(padding))
}

fn terminal_width() -> usize {
    env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(80)
}

fn rule() -> String {
    format!("{CYAN}{}{END}", "=".repeat(RULE_WIDTH))
}

fn banner(title: &str, root: &Path) {
    println!("\n{BOLD}{CYAN}{title}{END}");
    println!("{}", rule());
    println!("Root: {WHITE}{}{END}", root.display());
}

pub fn config_created_notice(path: &Path) {
    println!("Created config skeleton: {WHITE}{}{END}", path.display());
}

pub fn version_warning(found: &str, expected: &str) {
    println!(
        "{YELLOW}Warning: config version {found} does not match tool version {expected}{END}"
    );
}

pub fn no_subdirectories(root: &Path) {
    println!(
        "{YELLOW}No subdirectories found in migration root: {}{END}",
        root.display()
    );
}

pub fn init_done(outcome: &InitOutcome) {
    banner("Freight Init", &outcome.root);
    println!("Config: {WHITE}{}{END}", outcome.config_path.display());
    match &outcome.dest {
        Some(dest) => println!("Destination: {WHITE}{dest}{END}"),
        None => println!("Destination: {YELLOW}not set (pass --dest or edit the config){END}"),
    }
    println!("{}", rule());
}

pub fn scan_banner(root: &Path, total: usize) {
    banner("Freight Orchestrated Scan", root);
    println!("Found {WHITE}{total}{END} subdirectories to scan\n");
}

pub fn scan_step(index: usize, total: usize, name: &str) {
    print!("[{index:3}/{total}] Scanning {name}... ");
    let _ = io::stdout().flush();
}

pub fn scan_ok() {
    println!("{GREEN}\u{2713}{END}");
}

pub fn scan_fail() {
    println!("{RED}\u{2717}{END}");
}

pub fn scan_skip(index: usize, total: usize, name: &str, reason: &str) {
    println!("[{index:3}/{total}] Scanning {name}... {YELLOW}(skipped - {reason}){END}");
}

pub fn scan_summary(report: &ScanReport) {
    println!("\n{BOLD}Scan Summary:{END}");
    println!("  Successful: {GREEN}{}{END}", report.scanned);
    println!("  Skipped: {YELLOW}{}{END}", report.skipped);
    println!("  Failed: {RED}{}{END}", report.failed);
    println!("  Total: {WHITE}{}{END}", report.total);
    println!(
        "  Total size: {WHITE}{}{END}",
        format_size(report.total_size_bytes)
    );
    failures("Failed Directories:", &report.failures);
    println!("{}", rule());
}

fn failures(heading: &str, entries: &[(String, String)]) {
    if entries.is_empty() {
        return;
    }
    println!("\n{BOLD}{RED}{heading}{END}");
    for (name, error) in entries {
        println!("  \u{2022} {name}: {error}");
    }
}

pub fn clean_banner(root: &Path, dry_run: bool, targets: &[String]) {
    let title = if dry_run {
        "Freight Orchestrated Clean (dry run)"
    } else {
        "Freight Orchestrated Clean"
    };
    banner(title, root);
    println!("Targets: {WHITE}{}{END}\n", targets.join(", "));
}

pub fn clean_line(name: &str, record: &CleanRecord) {
    if record.items_cleaned == 0 {
        println!("  {name}: {YELLOW}nothing to clean{END}");
        return;
    }
    let verb = if record.dry_run { "would free" } else { "freed" };
    println!(
        "  {name}: {verb} {WHITE}{}{END} ({} items: {})",
        format_size(record.bytes_cleaned),
        record.items_cleaned,
        record.cleaned_items.join(", ")
    );
}

pub fn clean_fail(name: &str) {
    println!("  {name}: {RED}\u{2717}{END}");
}

pub fn clean_summary(report: &CleanReport, dry_run: bool) {
    println!("\n{BOLD}Clean Summary:{END}");
    let label = if dry_run { "Reclaimable" } else { "Reclaimed" };
    println!(
        "  {label}: {WHITE}{}{END} across {WHITE}{}{END} items",
        format_size(report.bytes_cleaned),
        report.items_cleaned
    );
    println!("  Directories processed: {GREEN}{}{END}", report.processed);
    println!("  Failed: {RED}{}{END}", report.failed);
    if dry_run {
        println!("\nRe-run with {WHITE}--confirm{END} to delete.");
    }
    failures("Failed Directories:", &report.failures);
    println!("{}", rule());
}

pub fn migrate_banner(root: &Path, dest: &Path) {
    banner("Freight Orchestrated Migrate", root);
    println!("Destination: {WHITE}{}{END}\n", dest.display());
}

pub fn migrate_step(index: usize, total: usize, name: &str, size_bytes: u64) {
    println!(
        "[{index:3}/{total}] Migrating {name} ({WHITE}{}{END})",
        format_size(size_bytes)
    );
}

pub fn migrate_summary(report: &MigrateReport) {
    println!("\n{BOLD}Migrate Summary:{END}");
    println!("  Migrated: {GREEN}{}{END}", report.migrated);
    println!("  Failed: {RED}{}{END}", report.failed);
    println!("  Skipped (no scan): {YELLOW}{}{END}", report.skipped);
    println!(
        "  Transferred: {WHITE}{}{END} in {WHITE}{}{END} files",
        format_size(report.bytes_transferred),
        format_count(report.files_transferred)
    );
    failures("Failed Directories:", &report.failures);
    println!("{}", rule());
}

/// Render a migration plan without executing it
pub fn migrate_plan(root: &Path, plan: &MigratePlan, threshold: u64) {
    banner("Freight Migration Plan", root);
    println!("Destination: {WHITE}{}{END}\n", plan.dest_root.display());

    if plan.entries.is_empty() && plan.unscanned.is_empty() {
        no_subdirectories(root);
        return;
    }

    for entry in &plan.entries {
        let marker = if entry.large {
            format!(" {YELLOW}[large]{END}")
        } else {
            String::new()
        };
        println!(
            "  {} -> {} ({WHITE}{}{END}){marker}",
            entry.name,
            entry.destination.display(),
            format_size(entry.size_bytes)
        );
    }
    for name in &plan.unscanned {
        println!("  {name}: {RED}refused, no scan record{END}");
    }

    println!(
        "\nTotal planned: {WHITE}{}{END} across {WHITE}{}{END} directories",
        format_size(plan.total_bytes),
        plan.entries.len()
    );
    let large = plan.entries.iter().filter(|e| e.large).count();
    if large > 0 {
        println!(
            "{YELLOW}{large} directories at or above {} may take a while{END}",
            format_size(threshold)
        );
    }
    println!("{}", rule());
}

pub fn transfer_summary(record: &MigrateRecord) {
    println!("\n{BOLD}Transfer Summary:{END}");
    if record.status == RecordStatus::Completed {
        println!("  Status: {GREEN}completed{END}");
    } else {
        println!("  Status: {RED}failed{END} ({})", record.error_message);
    }
    println!(
        "  Transferred: {WHITE}{}{END} in {WHITE}{}{END} files",
        format_size(record.bytes_transferred),
        format_count(record.files_transferred)
    );
}

/// Render the overview: summary stats, the three largest directories,
/// then every directory as a block in a terminal-width grid.
pub fn overview(root: &Path, rows: &[DirectoryStatus], stats: &RootStats) {
    banner("Freight Scanner Overview", root);

    println!("\n{BOLD}Summary:{END}");
    println!(
        "  Scan status: {GREEN}{}{END}/{WHITE}{}{END} ({YELLOW}{:.1}%{END})",
        stats.scanned_directories, stats.total_directories, stats.completion_rate
    );
    if stats.scanned_directories > 0 {
        println!(
            "  Total size: {WHITE}{}{END}",
            format_size(stats.total_size_bytes)
        );
        println!(
            "  Total files: {WHITE}{}{END}",
            format_count(stats.total_files)
        );
    }
    if stats.total_cleanable_bytes > 0 {
        println!(
            "  Potential space savings: {YELLOW}{}{END}",
            format_size(stats.total_cleanable_bytes)
        );
    }

    largest_directories(rows);

    println!("\n{BOLD}Directory Status:{END}");
    println!("{}", rule());
    directory_grid(rows);
    println!("{}", rule());
}

fn largest_directories(rows: &[DirectoryStatus]) {
    let mut scanned: Vec<&DirectoryStatus> = rows
        .iter()
        .filter(|row| row.has_scan() && row.size_bytes() > 0)
        .collect();
    if scanned.is_empty() {
        return;
    }
    scanned.sort_by(|a, b| b.size_bytes().cmp(&a.size_bytes()));

    println!("\n{BOLD}Largest Directories:{END}");
    let medals = ["\u{1f947}", "\u{1f948}", "\u{1f949}"];
    for (row, medal) in scanned.iter().zip(medals) {
        println!(
            "  {medal} {}: {WHITE}{}{END}",
            row.name,
            format_size(row.size_bytes())
        );
    }
}

fn directory_grid(rows: &[DirectoryStatus]) {
    let terminal_width = terminal_width();
    let per_row = (terminal_width / MIN_BLOCK_WIDTH).max(1);

    for chunk in rows.chunks(per_row) {
        directory_row(chunk, terminal_width);
    }
}

fn directory_row(rows: &[DirectoryStatus], terminal_width: usize) {
    if rows.is_empty() {
        return;
    }
    let separators = (rows.len() - 1) * BLOCK_SEPARATOR;
    let available = terminal_width.saturating_sub(separators);
    let block_width = (available / rows.len()).max(30);

    let mut blocks: Vec<Vec<String>> = rows
        .iter()
        .map(|row| directory_block(row, block_width))
        .collect();

    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
    for block in &mut blocks {
        while block.len() < height {
            block.push(" ".repeat(block_width));
        }
    }

    for line_idx in 0..height {
        let mut line = String::new();
        for (i, block) in blocks.iter().enumerate() {
            line.push_str(&block[line_idx]);
            if i < blocks.len() - 1 {
                line.push_str(&" ".repeat(BLOCK_SEPARATOR));
            }
        }
        println!("{line}");
    }
    println!();
}

fn directory_block(row: &DirectoryStatus, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    let mut display_name = row.name.clone();
    if display_name.chars().count() > width.saturating_sub(3) {
        display_name = truncate(&display_name, width.saturating_sub(6));
    }
    let icon = if row.has_scan() {
        format!("{GREEN}\u{2713}{END}")
    } else {
        format!("{RED}\u{2717}{END}")
    };
    lines.push(pad_line(&format!("{display_name} {icon}"), width));

    if row.has_scan() {
        lines.push(pad_line(
            &format!("Size: {}", format_size(row.size_bytes())),
            width,
        ));
        lines.push(pad_line(
            &format!("Files: {}", format_count(row.file_count())),
            width,
        ));
        if let Some(scan_time) = row.scan_time() {
            // Just the date part of the timestamp
            let date: String = scan_time.chars().take(10).collect();
            lines.push(pad_line(&format!("Scanned: {date}"), width));
        }

        let problems = row.problem_directories();
        if !problems.is_empty() {
            let savings: u64 = problems.iter().map(|p| p.bytes_saved).sum();
            lines.push(pad_line(
                &format!("Savings: {}", format_size(savings)),
                width,
            ));
            for problem in problems.iter().take(2) {
                let size = format_size(problem.bytes_saved);
                let max_pattern = width.saturating_sub(size.chars().count() + 4);
                let mut pattern = problem.pattern.clone();
                if pattern.chars().count() > max_pattern {
                    pattern = truncate(&pattern, max_pattern);
                }
                lines.push(pad_line(&format!("\u{2022} {pattern} ({size})"), width));
            }
            if problems.len() > 2 {
                lines.push(pad_line(&format!("+ {} more...", problems.len() - 2), width));
            }
        }
    } else {
        lines.push(pad_line(&format!("{RED}Not scanned{END}"), width));
    }

    lines
}

fn truncate(text: &str, max: usize) -> String {
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Machine-readable overview: summary stats plus one flattened row per
/// subdirectory. Unscanned rows report zero sizes and a null `scan_time`.
#[must_use]
pub fn overview_json(root: &Path, rows: &[DirectoryStatus], stats: &RootStats) -> String {
    let directories: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            serde_json::json!({
                "name": row.name,
                "directory": row.directory,
                "has_scan": row.has_scan(),
                "size_bytes": row.size_bytes(),
                "file_count": row.file_count(),
                "has_clean_data": row.has_clean_data(),
                "bytes_cleaned": row.bytes_cleaned(),
                "scan_time": row.scan_time(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "stats": stats,
        "directories": directories,
        "migration_root": root.display().to_string(),
    });
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Render the shared-directory analysis table
pub fn shared_directories(
    root: &Path,
    analysis: &SharedAnalysis,
    threshold: usize,
    ignore: &[String],
) {
    banner("Freight Shared Directory Analysis", root);
    if !ignore.is_empty() {
        println!("Ignoring: {YELLOW}{}{END}", ignore.join(", "));
    }

    if analysis.counts.is_empty() {
        println!("\n{YELLOW}No directories found in subdirectories.{END}");
        return;
    }

    let mut shared: Vec<(&String, usize)> = analysis
        .counts
        .iter()
        .filter(|(_, count)| **count >= threshold)
        .map(|(name, count)| (name, *count))
        .collect();

    if shared.is_empty() {
        println!("\n{YELLOW}No shared directories found with threshold >= {threshold}.{END}");
        println!("Total unique directory names: {}", analysis.counts.len());
        return;
    }

    // Highest count first, ties by name
    shared.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    println!("\nThreshold: {WHITE}{threshold}{END} or more occurrences");
    println!("Found {GREEN}{}{END} shared directories:", shared.len());
    println!("\n{:<30} {:<8} {}", "Directory Name", "Count", "Percentage");
    println!("{}", "-".repeat(50));

    for (name, count) in &shared {
        let percentage = if analysis.total_subdirs > 0 {
            #[allow(clippy::cast_precision_loss)]
            {
                *count as f64 / analysis.total_subdirs as f64 * 100.0
            }
        } else {
            0.0
        };
        println!("{name:<30} {count:<8} {percentage:.1}%");
    }

    println!("\n{BOLD}Analysis Summary:{END}");
    println!(
        "  Total subdirectories scanned: {WHITE}{}{END}",
        analysis.total_subdirs
    );
    println!(
        "  Unique directory names found: {WHITE}{}{END}",
        analysis.counts.len()
    );
    println!(
        "  Shared directories (>= {threshold}): {GREEN}{}{END}",
        shared.len()
    );

    let high_frequency: Vec<&(&String, usize)> = shared
        .iter()
        .filter(|(_, count)| *count >= threshold.saturating_add(1).max(3))
        .collect();
    if !high_frequency.is_empty() {
        println!("\n{BOLD}High-frequency directories (potential cleanup candidates):{END}");
        for (name, count) in high_frequency.iter().take(10) {
            println!("  \u{2022} {YELLOW}{name}{END} ({count} occurrences)");
        }
    }

    println!("\n{}", rule());
}
