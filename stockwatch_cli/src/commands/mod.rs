//! CLI subcommand implementations.

pub mod serve;
pub mod snapshot;
