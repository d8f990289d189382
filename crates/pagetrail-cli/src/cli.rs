//! CLI argument parsing for pagetrail.

use clap::{Parser, Subcommand};

/// Pagetrail
///
/// Local web-memory search over pages, visits, bookmarks and
/// annotations.
#[derive(Parser, Debug)]
#[command(name = "pagetrail")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/pagetrail/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// JSON snapshot file to load the store from
    #[arg(short, long, global = true)]
    pub snapshot: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Search commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Most recent activity, paged backward in day windows
    Recent {
        /// Exclusive upper bound (Unix ms, default: now)
        #[arg(long)]
        until: Option<i64>,

        /// Inclusive lower bound (Unix ms, default: 0)
        #[arg(long)]
        from: Option<i64>,

        /// Window size in days (default from config)
        #[arg(short, long)]
        days: Option<u32>,

        /// Keep paging until results are exhausted
        #[arg(long)]
        all: bool,
    },

    /// Term and phrase search (AND semantics, recency ranked)
    Search {
        /// Query string; wrap phrases in double quotes
        query: String,

        /// Restrict results to a domain (repeatable)
        #[arg(short = 'd', long = "domain")]
        domains: Vec<String>,

        /// Inclusive lower activity bound (Unix ms)
        #[arg(long)]
        from: Option<i64>,

        /// Exclusive upper activity bound (Unix ms)
        #[arg(long)]
        until: Option<i64>,

        /// Prefix-match terms (incremental search)
        #[arg(long)]
        prefix: bool,
    },
}
