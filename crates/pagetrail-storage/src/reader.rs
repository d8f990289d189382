//! Read capability the search core depends on.

use std::collections::HashSet;

use async_trait::async_trait;

use pagetrail_types::{Annotation, Bookmark, Page, Visit};

use crate::error::StoreError;
use crate::query::{PhraseScan, TermLookup, TimeRange};

/// Read-side capability of the storage collaborator.
///
/// The search core receives this as an explicit parameter; there is no
/// process-wide store handle. A single logical search issues several of
/// these reads concurrently and expects them to observe one consistent
/// point-in-time view of the store. Consistency across separate calls is
/// not guaranteed.
#[async_trait]
pub trait StoreReader: Send + Sync {
    /// Evaluate one term lookup against its index.
    ///
    /// Returns page URLs for page fields, annotation ids for annotation
    /// fields.
    async fn term_lookup(&self, lookup: TermLookup) -> Result<HashSet<String>, StoreError>;

    /// Evaluate one phrase scan over a raw text field.
    async fn phrase_scan(&self, scan: PhraseScan) -> Result<HashSet<String>, StoreError>;

    /// Visits with `time` in the given range, ordered by time.
    async fn visits_in_range(&self, range: TimeRange) -> Result<Vec<Visit>, StoreError>;

    /// Bookmarks with `time` in the given range, ordered by time.
    async fn bookmarks_in_range(&self, range: TimeRange) -> Result<Vec<Bookmark>, StoreError>;

    /// Annotations with `last_edited` in the given range, ordered by
    /// edit time.
    async fn annotations_in_range(&self, range: TimeRange) -> Result<Vec<Annotation>, StoreError>;

    /// Whether any visit, bookmark or annotation timestamp falls in the
    /// given range. Backs exhaustion detection without materializing
    /// rows.
    async fn any_activity_in(&self, range: TimeRange) -> Result<bool, StoreError>;

    /// All visits belonging to the given pages.
    async fn visits_for_pages(&self, urls: &[String]) -> Result<Vec<Visit>, StoreError>;

    /// All bookmarks belonging to the given pages.
    async fn bookmarks_for_pages(&self, urls: &[String]) -> Result<Vec<Bookmark>, StoreError>;

    /// Bulk annotation fetch by id. Missing ids are skipped.
    async fn annotations_by_id(&self, ids: &[String]) -> Result<Vec<Annotation>, StoreError>;

    /// Bulk page fetch by normalized URL. Missing URLs are skipped.
    async fn pages_by_url(&self, urls: &[String]) -> Result<Vec<Page>, StoreError>;

    /// Page URLs whose domain is in the given set (case-insensitive).
    async fn pages_in_domains(&self, domains: &[String]) -> Result<HashSet<String>, StoreError>;
}
