//! End-to-end test infrastructure for pagetrail.
//!
//! Provides a shared TestHarness and fixture builders for tests
//! covering the full store-to-ranking search pipeline.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use pagetrail_search::{FixedClock, SearchEngine};
use pagetrail_storage::MemoryStore;
use pagetrail_types::{Annotation, Bookmark, Page, SearchSettings, Visit};

/// Shared test harness: a reference store and an engine with a fixed
/// clock so "now" is deterministic.
pub struct TestHarness {
    /// Shared store instance, also held by the engine
    pub store: Arc<MemoryStore>,
    /// Engine under test
    pub engine: SearchEngine<MemoryStore, FixedClock>,
}

impl TestHarness {
    /// Create a harness whose clock reads `now_ms`.
    pub fn at(now_ms: i64) -> Self {
        let store = Arc::new(MemoryStore::new());
        let engine = SearchEngine::with_parts(
            store.clone(),
            FixedClock::new(now_ms),
            SearchSettings::default(),
        );
        Self { store, engine }
    }
}

/// Epoch-millisecond timestamp as a chrono instant.
pub fn ts(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).unwrap()
}

/// Page fixture; the full URL gains an https scheme.
pub fn page(url: &str, title: &str, text: &str) -> Page {
    Page::new(url, &format!("https://{}", url), title, text)
}

/// Visit fixture at the given epoch-ms time.
pub fn visit(url: &str, at_ms: i64) -> Visit {
    Visit::new(url, ts(at_ms))
}

/// Bookmark fixture at the given epoch-ms time.
pub fn bookmark(url: &str, at_ms: i64) -> Bookmark {
    Bookmark::new(url, ts(at_ms))
}

/// Annotation fixture with an explicit id and last-edited time.
pub fn annotation(
    id: &str,
    page_url: &str,
    body: Option<&str>,
    comment: Option<&str>,
    edited_ms: i64,
) -> Annotation {
    Annotation::from_parts(
        id,
        page_url,
        body.map(str::to_string),
        comment.map(str::to_string),
        ts(edited_ms),
    )
}
