//! Page-level timestamp reconciliation.

use std::collections::HashMap;

use pagetrail_storage::StoreReader;

use crate::error::SearchError;

/// Latest visit/bookmark timestamp per page.
///
/// Both collections are read concurrently and the per-page maximum is
/// kept. Pages with no rows are absent from the map; callers treat
/// absent as 0.
pub async fn latest_page_activity<S: StoreReader>(
    store: &S,
    urls: &[String],
) -> Result<HashMap<String, i64>, SearchError> {
    if urls.is_empty() {
        return Ok(HashMap::new());
    }

    let (visits, bookmarks) = tokio::try_join!(
        store.visits_for_pages(urls),
        store.bookmarks_for_pages(urls),
    )?;

    let mut latest: HashMap<String, i64> = HashMap::new();
    let times = visits
        .iter()
        .map(|v| (&v.url, v.time_ms()))
        .chain(bookmarks.iter().map(|b| (&b.url, b.time_ms())));
    for (url, ms) in times {
        let entry = latest.entry(url.clone()).or_insert(ms);
        *entry = (*entry).max(ms);
    }
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pagetrail_storage::MemoryStore;
    use pagetrail_types::{Bookmark, Visit};

    fn ts(ms: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[tokio::test]
    async fn test_max_across_visits_and_bookmarks() {
        let store = MemoryStore::new();
        store.add_visit(Visit::new("a.com", ts(100)));
        store.add_visit(Visit::new("a.com", ts(300)));
        store.add_bookmark(Bookmark::new("a.com", ts(200)));
        store.add_bookmark(Bookmark::new("b.com", ts(400)));

        let latest = latest_page_activity(
            &store,
            &["a.com".to_string(), "b.com".to_string(), "c.com".to_string()],
        )
        .await
        .unwrap();

        assert_eq!(latest.get("a.com"), Some(&300));
        assert_eq!(latest.get("b.com"), Some(&400));
        assert_eq!(latest.get("c.com"), None);
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let store = MemoryStore::new();
        let latest = latest_page_activity(&store, &[]).await.unwrap();
        assert!(latest.is_empty());
    }
}
