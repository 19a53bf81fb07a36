//! Metadata layout and JSON status storage

pub mod store;
