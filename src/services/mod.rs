//! Core services for probing, freshness decisions, cleanup, and transfer

pub mod clean;
pub mod format;
pub mod freshness;
pub mod probe;
pub mod transfer;
