//! Pagetrail CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (recent, search)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::run;
