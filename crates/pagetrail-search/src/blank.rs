//! Blank (queryless) search: reverse-chronological pagination over
//! fixed-size day windows.
//!
//! Each call scans one window `[until - days, until)` and reports
//! whether older data remains. The paginator is stateless across calls;
//! the caller pages by passing the previous window's lower bound as the
//! next upper bound. A page with activity on several distinct days
//! surfaces once per window it was active in, each time carrying only
//! that window's annotations and timestamp.

use std::collections::BTreeMap;

use tracing::{debug, info};

use pagetrail_storage::{StoreReader, TimeRange};
use pagetrail_types::{BlankSearchResults, PageResult};

use crate::error::SearchError;
use crate::rank::rank_by_recency;

/// Milliseconds in one pagination day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Parameters for one blank-search pagination step.
///
/// Unset fields fall back to engine defaults: `until_ms` to the injected
/// clock's now, `from_ms` to 0, `days_to_search` to the configured
/// window size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlankSearchParams {
    /// Exclusive upper timestamp bound
    pub until_ms: Option<i64>,

    /// Inclusive absolute lower bound for the whole pagination walk
    pub from_ms: Option<i64>,

    /// Window size in days
    pub days_to_search: Option<u32>,
}

impl BlankSearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_until(mut self, until_ms: i64) -> Self {
        self.until_ms = Some(until_ms);
        self
    }

    pub fn with_from(mut self, from_ms: i64) -> Self {
        self.from_ms = Some(from_ms);
        self
    }

    pub fn with_days(mut self, days_to_search: u32) -> Self {
        self.days_to_search = Some(days_to_search);
        self
    }
}

/// Scan one pagination window and aggregate activity per page.
pub(crate) async fn blank_search<S: StoreReader>(
    store: &S,
    until_ms: i64,
    from_ms: i64,
    days_to_search: u32,
) -> Result<BlankSearchResults, SearchError> {
    let raw_lower_ms = until_ms - i64::from(days_to_search) * MS_PER_DAY;
    let lower_ms = raw_lower_ms.max(from_ms);
    debug!(until_ms, lower_ms, "Scanning blank-search window");

    let window = TimeRange::new(lower_ms, until_ms);
    let (visits, bookmarks, annotations) = tokio::try_join!(
        store.visits_in_range(window),
        store.bookmarks_in_range(window),
        store.annotations_in_range(window),
    )?;

    let mut entries: BTreeMap<String, PageResult> = BTreeMap::new();

    let page_times = visits
        .iter()
        .map(|v| (&v.url, v.time_ms()))
        .chain(bookmarks.iter().map(|b| (&b.url, b.time_ms())));
    for (url, ms) in page_times {
        let entry = entries.entry(url.clone()).or_default();
        entry.last_activity_ms = entry.last_activity_ms.max(ms);
    }

    let mut per_page: BTreeMap<String, Vec<(i64, String)>> = BTreeMap::new();
    for annotation in &annotations {
        per_page
            .entry(annotation.page_url.clone())
            .or_default()
            .push((annotation.last_edited_ms(), annotation.id.clone()));
    }
    for (url, mut edits) in per_page {
        edits.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        let entry = entries.entry(url).or_default();
        if let Some((newest_ms, _)) = edits.first() {
            entry.last_activity_ms = entry.last_activity_ms.max(*newest_ms);
        }
        entry.annotations = edits.into_iter().map(|(_, id)| id).collect();
    }

    // Exhausted once the window reaches the floor, or when nothing older
    // than the window remains above it.
    let results_exhausted = raw_lower_ms <= from_ms
        || !store
            .any_activity_in(TimeRange::new(from_ms, lower_ms))
            .await?;

    let pages = rank_by_recency(entries);
    info!(
        pages = pages.len(),
        results_exhausted, "Blank search window complete"
    );
    Ok(BlankSearchResults {
        pages,
        results_exhausted,
    })
}
