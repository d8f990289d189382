//! Pagetrail
//!
//! Local web-memory search over pages, visits, bookmarks and
//! annotations.
//!
//! # Usage
//!
//! ```bash
//! pagetrail --snapshot trail.json recent [--days N] [--all]
//! pagetrail --snapshot trail.json search "rust \"borrow checker\""
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/pagetrail/config.toml)
//! 3. Environment variables (PAGETRAIL_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use pagetrail_cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
