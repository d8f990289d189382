//! Command implementations for the pagetrail CLI.
//!
//! Loads config and the snapshot store, then runs the requested search
//! and prints ranked pages to stdout.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use tracing::debug;

use pagetrail_search::{
    split_query, BlankSearchParams, MatchMode, SearchEngine, SearchFilters, TermsSearchParams,
    MS_PER_DAY,
};
use pagetrail_storage::{MemoryStore, Snapshot, StoreReader};
use pagetrail_types::{PageResult, PagetrailConfig};

use crate::cli::{Cli, Commands};

/// Parse config, set up logging and dispatch the command.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = PagetrailConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    init_logging(&config.log_level)?;

    let snapshot_path = cli
        .snapshot
        .context("no snapshot given; pass --snapshot FILE")?;
    let store = Arc::new(Snapshot::read_from(Path::new(&snapshot_path))?.into_store());
    let engine = SearchEngine::new(store.clone());

    match cli.command {
        Commands::Recent {
            until,
            from,
            days,
            all,
        } => {
            let days = days.unwrap_or(config.search.days_to_search);
            handle_recent(&engine, &store, until, from, days, all).await
        }
        Commands::Search {
            query,
            domains,
            from,
            until,
            prefix,
        } => handle_search(&engine, &store, &query, domains, from, until, prefix).await,
    }
}

fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

async fn handle_recent(
    engine: &SearchEngine<MemoryStore>,
    store: &MemoryStore,
    until: Option<i64>,
    from: Option<i64>,
    days: u32,
    all: bool,
) -> Result<()> {
    let mut until_ms = until.unwrap_or_else(|| Utc::now().timestamp_millis());
    let from_ms = from.unwrap_or(0);

    loop {
        let params = BlankSearchParams::new()
            .with_until(until_ms)
            .with_from(from_ms)
            .with_days(days);
        let results = engine.unified_blank_search(&params).await?;
        print_pages(store, &results.pages).await?;

        if results.results_exhausted {
            println!("-- end of history --");
            break;
        }
        if !all {
            println!("-- more available; re-run with --until {} --", window_lower(until_ms, days));
            break;
        }
        until_ms = window_lower(until_ms, days);
        debug!(until_ms, "Paging to next window");
    }
    Ok(())
}

fn window_lower(until_ms: i64, days: u32) -> i64 {
    until_ms - i64::from(days) * MS_PER_DAY
}

async fn handle_search(
    engine: &SearchEngine<MemoryStore>,
    store: &MemoryStore,
    query: &str,
    domains: Vec<String>,
    from: Option<i64>,
    until: Option<i64>,
    prefix: bool,
) -> Result<()> {
    // A query with no searchable content falls back to recency order.
    if split_query(query).is_empty() {
        let results = engine
            .unified_blank_search(&BlankSearchParams::new())
            .await?;
        return print_pages(store, &results.pages).await;
    }

    let match_mode = if prefix {
        MatchMode::Prefix
    } else {
        MatchMode::Exact
    };
    let params = TermsSearchParams::new(query)
        .with_match_mode(match_mode)
        .with_filters(SearchFilters {
            from_ms: from,
            until_ms: until,
            domains,
        });

    let results = engine.unified_terms_search(&params).await?;
    print_pages(store, &results.pages).await
}

/// Print ranked pages with titles and matching-annotation counts.
async fn print_pages(store: &MemoryStore, pages: &[(String, PageResult)]) -> Result<()> {
    if pages.is_empty() {
        println!("(no results)");
        return Ok(());
    }

    let urls: Vec<String> = pages.iter().map(|(url, _)| url.clone()).collect();
    let titles: HashMap<String, String> = store
        .pages_by_url(&urls)
        .await?
        .into_iter()
        .map(|p| (p.url, p.title))
        .collect();

    for (url, entry) in pages {
        let title = titles.get(url).map(String::as_str).unwrap_or("(untitled)");
        println!("{}  {}  {}", format_ms(entry.last_activity_ms), url, title);
        if !entry.annotations.is_empty() {
            println!("    {} matching annotation(s)", entry.annotations.len());
            for id in &entry.annotations {
                println!("      - {}", id);
            }
        }
    }
    Ok(())
}

fn format_ms(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(when) => when.format("%Y-%m-%d %H:%M").to_string(),
        None => format!("t={}", ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(0), "1970-01-01 00:00");
    }

    #[test]
    fn test_window_lower() {
        assert_eq!(window_lower(10 * MS_PER_DAY, 3), 7 * MS_PER_DAY);
    }
}
