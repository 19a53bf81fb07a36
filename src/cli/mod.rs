//! Command line parsing and terminal output

pub mod args;
pub mod output;
