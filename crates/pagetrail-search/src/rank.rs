//! Recency ranking of per-page results.

use std::collections::BTreeMap;

use pagetrail_types::PageResult;

/// Order entries by most recent activity, descending.
///
/// The input map is URL-ordered and the sort is stable, so ties break by
/// page URL and the output is fully deterministic.
pub fn rank_by_recency(entries: BTreeMap<String, PageResult>) -> Vec<(String, PageResult)> {
    let mut pages: Vec<(String, PageResult)> = entries.into_iter().collect();
    pages.sort_by(|a, b| b.1.last_activity_ms.cmp(&a.1.last_activity_ms));
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ms: i64) -> PageResult {
        PageResult {
            annotations: Vec::new(),
            last_activity_ms: ms,
        }
    }

    #[test]
    fn test_orders_descending() {
        let mut entries = BTreeMap::new();
        entries.insert("a.com".to_string(), entry(100));
        entries.insert("b.com".to_string(), entry(50));
        entries.insert("c.com".to_string(), entry(200));

        let ranked = rank_by_recency(entries);
        let times: Vec<i64> = ranked.iter().map(|(_, e)| e.last_activity_ms).collect();
        assert_eq!(times, vec![200, 100, 50]);
    }

    #[test]
    fn test_ties_break_by_url() {
        let mut entries = BTreeMap::new();
        entries.insert("b.com".to_string(), entry(100));
        entries.insert("a.com".to_string(), entry(100));

        let ranked = rank_by_recency(entries);
        assert_eq!(ranked[0].0, "a.com");
        assert_eq!(ranked[1].0, "b.com");
    }
}
