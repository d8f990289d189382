//! Derived result types assembled by the search core.
//!
//! These structures are rebuilt per call and never persisted.

use serde::{Deserialize, Serialize};

/// Per-page search outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PageResult {
    /// Matching annotation identifiers, newest edit first
    pub annotations: Vec<String>,

    /// Most recent moment of relevance for the page: max of its
    /// visit/bookmark time and its newest matching annotation edit
    pub last_activity_ms: i64,
}

/// Result of one blank-search pagination step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlankSearchResults {
    /// Ranked (page url, result) pairs, most recent activity first
    pub pages: Vec<(String, PageResult)>,

    /// True when no older qualifying data remains above the caller's
    /// floor bound
    pub results_exhausted: bool,
}

impl BlankSearchResults {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Result of a terms search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsSearchResults {
    /// Ranked (page url, result) pairs, most recent activity first
    pub pages: Vec<(String, PageResult)>,
}

impl TermsSearchResults {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
