//! CLI subcommand implementations.

pub mod demo;
pub mod send;
