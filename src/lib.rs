//! Freight NFS Migration Suite
//!
//! Scans, cleans, and migrates large directory trees across NFS mounts,
//! recording JSON status records under a per-directory `.freight` metadata
//! folder plus a root-level config. Sizing and file counting are native;
//! bulk copies delegate to `rsync`.

pub mod cli;
pub mod io;
pub mod models;
pub mod orchestrator;
pub mod services;

pub use models::{CleanRecord, MigrateRecord, RootConfig, ScanRecord};

use std::result;

/// Tool version, stamped into every record and compared against the
/// `config_version` stored in a root's config.
pub const FREIGHT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Validation(String),
    Precondition(String),
    Probe { path: String, message: String },
    Transfer(String),
    Store(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Validation(msg) => write!(f, "Validation error: {msg}"),
            Error::Precondition(msg) => write!(f, "Precondition failed: {msg}"),
            Error::Probe { path, message } => write!(f, "Probe failed for {path}: {message}"),
            Error::Transfer(msg) => write!(f, "Transfer error: {msg}"),
            Error::Store(msg) => write!(f, "Status store error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// How file sizes are measured during a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeBasis {
    /// Bytes the files claim to hold (`stat` size)
    Apparent,
    /// Bytes actually allocated on disk (block count)
    Allocated,
}

/// Options for an orchestrated scan pass
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub basis: SizeBasis,
    /// Rescan every subdirectory even when the freshness check says skip
    pub force: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            basis: SizeBasis::Apparent,
            force: false,
        }
    }
}
