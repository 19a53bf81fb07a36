//! CLI argument parsing

use std::env;

/// Environment variable consulted when no root argument is given
pub const ROOT_ENV: &str = "FREIGHT_ROOT";

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Init(InitArgs),
    Scan(ScanArgs),
    Overview(OverviewArgs),
    Clean(CleanArgs),
    Migrate(MigrateArgs),
    Transfer(TransferArgs),
    Shared(SharedArgs),
}

#[derive(Debug, Clone)]
pub struct InitArgs {
    pub root: String,
    pub dest: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScanArgs {
    pub root: String,
    pub force: bool,
    /// Raw `--basis` value; the handler maps it onto [`crate::SizeBasis`]
    pub basis: String,
}

#[derive(Debug, Clone)]
pub struct OverviewArgs {
    pub root: String,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct CleanArgs {
    pub root: String,
    pub confirm: bool,
}

#[derive(Debug, Clone)]
pub struct MigrateArgs {
    pub root: String,
    pub dest: Option<String>,
    pub confirm: bool,
}

#[derive(Debug, Clone)]
pub struct TransferArgs {
    pub source: String,
    pub destination: String,
    pub root: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SharedArgs {
    pub root: String,
    /// Overrides the configured `clean.shared_directory_threshold`
    pub threshold: Option<usize>,
}

/// Parse command line arguments
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    let command = match args[1].as_str() {
        "init" => Command::Init(parse_init_args(&args[2..])?),
        "scan" => Command::Scan(parse_scan_args(&args[2..])?),
        "overview" => Command::Overview(parse_overview_args(&args[2..])?),
        "clean" => Command::Clean(parse_clean_args(&args[2..])?),
        "migrate" => Command::Migrate(parse_migrate_args(&args[2..])?),
        "transfer" => Command::Transfer(parse_transfer_args(&args[2..])?),
        "shared" => Command::Shared(parse_shared_args(&args[2..])?),
        _ => return Err(format!("Unknown command: {}", args[1])),
    };

    Ok(CliArgs { command })
}

/// Resolve a migration root: positional argument first, then the
/// FREIGHT_ROOT environment variable.
fn resolve_root(positional: Option<String>) -> Result<String, String> {
    if let Some(root) = positional {
        return Ok(root);
    }
    match env::var(ROOT_ENV) {
        Ok(root) if !root.is_empty() => Ok(root),
        _ => Err(format!(
            "Missing required argument: ROOT (or set {ROOT_ENV})"
        )),
    }
}

fn parse_init_args(args: &[String]) -> Result<InitArgs, String> {
    let mut root = None;
    let mut dest = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--dest" => {
                i += 1;
                if i >= args.len() {
                    return Err("--dest requires a value".to_string());
                }
                dest = Some(args[i].clone());
            }
            arg if !arg.starts_with("--") => {
                if root.is_none() {
                    root = Some(arg.to_string());
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    Ok(InitArgs {
        root: resolve_root(root)?,
        dest,
    })
}

fn parse_scan_args(args: &[String]) -> Result<ScanArgs, String> {
    let mut root = None;
    let mut force = false;
    let mut basis = "apparent".to_string();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--force" => {
                force = true;
            }
            "--basis" => {
                i += 1;
                if i >= args.len() {
                    return Err("--basis requires a value".to_string());
                }
                basis.clone_from(&args[i]);
            }
            arg if !arg.starts_with("--") => {
                if root.is_none() {
                    root = Some(arg.to_string());
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    Ok(ScanArgs {
        root: resolve_root(root)?,
        force,
        basis,
    })
}

fn parse_overview_args(args: &[String]) -> Result<OverviewArgs, String> {
    let mut root = None;
    let mut json = false;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--json" => {
                json = true;
            }
            arg if !arg.starts_with("--") => {
                if root.is_none() {
                    root = Some(arg.to_string());
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    Ok(OverviewArgs {
        root: resolve_root(root)?,
        json,
    })
}

fn parse_clean_args(args: &[String]) -> Result<CleanArgs, String> {
    let mut root = None;
    let mut confirm = false;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--confirm" => {
                confirm = true;
            }
            arg if !arg.starts_with("--") => {
                if root.is_none() {
                    root = Some(arg.to_string());
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    Ok(CleanArgs {
        root: resolve_root(root)?,
        confirm,
    })
}

fn parse_migrate_args(args: &[String]) -> Result<MigrateArgs, String> {
    let mut root = None;
    let mut dest = None;
    let mut confirm = false;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--dest" => {
                i += 1;
                if i >= args.len() {
                    return Err("--dest requires a value".to_string());
                }
                dest = Some(args[i].clone());
            }
            "--confirm" => {
                confirm = true;
            }
            arg if !arg.starts_with("--") => {
                if root.is_none() {
                    root = Some(arg.to_string());
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    Ok(MigrateArgs {
        root: resolve_root(root)?,
        dest,
        confirm,
    })
}

fn parse_transfer_args(args: &[String]) -> Result<TransferArgs, String> {
    let mut positionals = Vec::new();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            arg if !arg.starts_with("--") => {
                positionals.push(arg.to_string());
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if positionals.len() < 2 {
        return Err("Missing required arguments: SOURCE DEST".to_string());
    }
    if positionals.len() > 3 {
        return Err(format!("Unexpected argument: {}", positionals[3]));
    }

    let mut positionals = positionals.into_iter();
    let source = positionals.next().unwrap_or_default();
    let destination = positionals.next().unwrap_or_default();
    Ok(TransferArgs {
        source,
        destination,
        root: positionals.next(),
    })
}

fn parse_shared_args(args: &[String]) -> Result<SharedArgs, String> {
    let mut root = None;
    let mut threshold = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--threshold" => {
                i += 1;
                if i >= args.len() {
                    return Err("--threshold requires a value".to_string());
                }
                threshold = Some(
                    args[i]
                        .parse()
                        .map_err(|_| "--threshold must be a number".to_string())?,
                );
            }
            arg if !arg.starts_with("--") => {
                if root.is_none() {
                    root = Some(arg.to_string());
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    Ok(SharedArgs {
        root: resolve_root(root)?,
        threshold,
    })
}
