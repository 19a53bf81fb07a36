//! Freight NFS migration suite - main binary entry point

use freight::cli::args::{Command, parse_args};
use freight::cli::output;
use freight::io::store;
use freight::orchestrator::{self, Orchestrator};
use freight::services::transfer;
use freight::{ScanOptions, SizeBasis};
use std::path::Path;
use std::process;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=debug freight scan /mnt/projects
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help();
            return;
        }
        "--version" | "-v" => {
            print_version();
            return;
        }
        _ => {}
    }

    // Parse arguments
    let cli_args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(1);
        }
    };

    // Execute command
    let exit_code = match &cli_args.command {
        Command::Init(init_args) => handle_init(init_args),
        Command::Scan(scan_args) => handle_scan(scan_args),
        Command::Overview(overview_args) => handle_overview(overview_args),
        Command::Clean(clean_args) => handle_clean(clean_args),
        Command::Migrate(migrate_args) => handle_migrate(migrate_args),
        Command::Transfer(transfer_args) => handle_transfer(transfer_args),
        Command::Shared(shared_args) => handle_shared(shared_args),
    };

    process::exit(exit_code);
}

/// Open a root and surface the usual notices. `quiet` routes them to the
/// log so machine-readable output stays clean.
fn open_orchestrator(root: &str, quiet: bool) -> Option<Orchestrator> {
    match Orchestrator::open(root) {
        Ok(orchestrator) => {
            if orchestrator.config_created() {
                let path = store::config_path(orchestrator.root());
                if quiet {
                    log::info!("created config skeleton: {}", path.display());
                } else {
                    output::config_created_notice(&path);
                }
            }
            if let Some(found) = orchestrator.config().version_mismatch() {
                if quiet {
                    log::warn!(
                        "config version {found} does not match tool version {}",
                        freight::FREIGHT_VERSION
                    );
                } else {
                    output::version_warning(found, freight::FREIGHT_VERSION);
                }
            }
            Some(orchestrator)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            None
        }
    }
}

fn handle_init(args: &freight::cli::args::InitArgs) -> i32 {
    match orchestrator::init(Path::new(&args.root), args.dest.as_deref()) {
        Ok(outcome) => {
            output::init_done(&outcome);
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn handle_scan(args: &freight::cli::args::ScanArgs) -> i32 {
    let basis = match args.basis.as_str() {
        "apparent" => SizeBasis::Apparent,
        "allocated" => SizeBasis::Allocated,
        _ => {
            eprintln!(
                "Invalid basis: {}. Use 'apparent' or 'allocated'",
                args.basis
            );
            return 1;
        }
    };

    let Some(mut orchestrator) = open_orchestrator(&args.root, false) else {
        return 1;
    };

    let options = ScanOptions {
        basis,
        force: args.force,
    };

    // Per-directory failures are reported in the summary; only a failure
    // of the pass itself is fatal.
    match orchestrator.run_scan(&options) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn handle_overview(args: &freight::cli::args::OverviewArgs) -> i32 {
    let Some(mut orchestrator) = open_orchestrator(&args.root, args.json) else {
        return 1;
    };

    match orchestrator.overview() {
        Ok((rows, stats)) => {
            if args.json {
                println!(
                    "{}",
                    output::overview_json(orchestrator.root(), &rows, &stats)
                );
            } else {
                output::overview(orchestrator.root(), &rows, &stats);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn handle_clean(args: &freight::cli::args::CleanArgs) -> i32 {
    let Some(mut orchestrator) = open_orchestrator(&args.root, false) else {
        return 1;
    };

    // Deletion requires --confirm; the default pass only reports.
    match orchestrator.run_clean(!args.confirm) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn handle_migrate(args: &freight::cli::args::MigrateArgs) -> i32 {
    let Some(mut orchestrator) = open_orchestrator(&args.root, false) else {
        return 1;
    };
    let dest_override = args.dest.as_deref().map(Path::new);

    // Copying requires --confirm; the default pass only shows the plan.
    if !args.confirm {
        return match orchestrator.plan_migrate(dest_override) {
            Ok(plan) => {
                let threshold = orchestrator.config().migrate.large_dir_threshold_bytes;
                output::migrate_plan(orchestrator.root(), &plan, threshold);
                0
            }
            Err(e) => {
                eprintln!("Error: {e}");
                1
            }
        };
    }

    match orchestrator.run_migrate(dest_override) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn handle_transfer(args: &freight::cli::args::TransferArgs) -> i32 {
    // An explicit root supplies the configured rsync flags; without one
    // the defaults apply.
    let options = match &args.root {
        Some(root) => match store::load_config(Path::new(root)) {
            Ok(Some(config)) => transfer::TransferOptions {
                flags: config.migrate.rsync_flags,
            },
            Ok(None) => {
                log::warn!("no config under {root}, using default rsync flags");
                transfer::TransferOptions::default()
            }
            Err(e) => {
                eprintln!("Error: {e}");
                return 1;
            }
        },
        None => transfer::TransferOptions::default(),
    };

    match transfer::transfer(
        Path::new(&args.source),
        Path::new(&args.destination),
        &options,
    ) {
        Ok(record) => {
            output::transfer_summary(&record);
            i32::from(record.status != freight::models::RecordStatus::Completed)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn handle_shared(args: &freight::cli::args::SharedArgs) -> i32 {
    let Some(orchestrator) = open_orchestrator(&args.root, false) else {
        return 1;
    };

    match orchestrator.shared_directories() {
        Ok(analysis) => {
            let clean = &orchestrator.config().clean;
            let threshold = args.threshold.unwrap_or(clean.shared_directory_threshold);
            output::shared_directories(
                orchestrator.root(),
                &analysis,
                threshold,
                &clean.shared_directory_ignore,
            );
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn print_help() {
    println!("Freight - scan, clean, and migrate directory trees across NFS mounts");
    println!();
    println!("USAGE:");
    println!("    freight <COMMAND> [ROOT] [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    init      Mark a directory as a migration root and write its config");
    println!("    scan      Measure every subdirectory and record scan.json files");
    println!("    overview  Show recorded scan/clean status for every subdirectory");
    println!("    clean     Delete configured target directories (dry-run by default)");
    println!("    migrate   rsync every scanned subdirectory to the destination");
    println!("    transfer  rsync a single directory: transfer SOURCE DEST [ROOT]");
    println!("    shared    Count directory names shared across subdirectories");
    println!();
    println!("ROOT defaults to the FREIGHT_ROOT environment variable.");
    println!();
    println!("GLOBAL OPTIONS:");
    println!("    -h, --help                Show this help message");
    println!("    -v, --version             Show version information");
    println!();
    println!("INIT OPTIONS:");
    println!("    --dest <PATH>             Record the migration destination");
    println!();
    println!("SCAN OPTIONS:");
    println!("    --force                   Rescan even when nothing changed");
    println!("    --basis <BASIS>           'apparent' file sizes or 'allocated' blocks");
    println!();
    println!("OVERVIEW OPTIONS:");
    println!("    --json                    Emit machine-readable output");
    println!();
    println!("CLEAN OPTIONS:");
    println!("    --confirm                 Actually delete (default is a dry run)");
    println!();
    println!("MIGRATE OPTIONS:");
    println!("    --dest <PATH>             Override the configured destination root");
    println!("    --confirm                 Actually copy (default shows the plan)");
    println!();
    println!("SHARED OPTIONS:");
    println!("    --threshold <N>           Highlight names appearing in at least N subdirectories");
    println!();
    println!("WORKFLOW:");
    println!("    1. Initialize:  freight init /mnt/projects --dest /mnt/archive");
    println!("    2. Measure:     freight scan /mnt/projects");
    println!("    3. Inspect:     freight overview /mnt/projects");
    println!("    4. Trim:        freight clean /mnt/projects --confirm");
    println!("    5. Move:        freight migrate /mnt/projects --confirm");
    println!();
    println!("EXAMPLES:");
    println!("    freight scan /mnt/projects --force");
    println!("    freight overview /mnt/projects --json");
    println!("    freight transfer /mnt/projects/alpha /mnt/archive/alpha");
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_TARGET: &str = env!("BUILD_TARGET");

    println!("freight {VERSION}");
    println!("Commit: {GIT_HASH}");
    println!("Target: {BUILD_TARGET}");

    #[cfg(debug_assertions)]
    println!("Build: debug");
    #[cfg(not(debug_assertions))]
    println!("Build: release");
}
