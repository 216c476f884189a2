//! CLI module - Command-line interface for cms-admin.

pub mod args;

pub use args::{Cli, Commands};
