//! In-memory reference store.
//!
//! Provides the secondary indexes the search core depends on:
//! - `BTreeMap` term indexes per field (exact get, prefix range scan)
//! - `BTreeMap` time indexes keyed `(epoch_ms, id)` for `[from, until)`
//!   scans
//! - primary rows by id, plus a domain index for filter narrowing
//!
//! Writes are owned by this store; the search core only reads. Lock
//! guards are never held across an await point.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use pagetrail_types::{Annotation, Bookmark, Page, Visit};

use crate::error::StoreError;
use crate::query::{MatchMode, PhraseScan, TermField, TermLookup, TextField, TimeRange};
use crate::reader::StoreReader;

/// Term index: term -> set of entity ids.
type TermIndex = BTreeMap<String, BTreeSet<String>>;

#[derive(Default)]
struct Inner {
    pages: HashMap<String, Page>,
    pages_by_domain: HashMap<String, BTreeSet<String>>,
    page_body_terms: TermIndex,
    page_url_terms: TermIndex,
    page_title_terms: TermIndex,

    annotations: HashMap<String, Annotation>,
    ann_body_terms: TermIndex,
    ann_comment_terms: TermIndex,
    /// (last_edited_ms, annotation id) -> ()
    annotations_by_time: BTreeMap<(i64, String), ()>,

    visits_by_page: HashMap<String, Vec<Visit>>,
    /// (time_ms, insertion seq) -> visit
    visits_by_time: BTreeMap<(i64, u64), Visit>,
    visit_seq: u64,

    /// One bookmark per page, keyed by page URL
    bookmarks: HashMap<String, Bookmark>,
    /// (time_ms, page url) -> ()
    bookmarks_by_time: BTreeMap<(i64, String), ()>,
}

/// Shared in-memory store with the index surface of a real backend.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a page, (re)indexing its term sets.
    pub fn add_page(&self, page: Page) {
        let mut inner = self.inner.write();
        if let Some(old) = inner.pages.remove(&page.url) {
            debug!(url = %page.url, "Replacing existing page");
            unindex_terms(&mut inner.page_body_terms, &old.url, &old.terms);
            unindex_terms(&mut inner.page_url_terms, &old.url, &old.url_terms);
            unindex_terms(&mut inner.page_title_terms, &old.url, &old.title_terms);
            if let Some(set) = inner.pages_by_domain.get_mut(&old.domain) {
                set.remove(&old.url);
            }
        }
        index_terms(&mut inner.page_body_terms, &page.url, &page.terms);
        index_terms(&mut inner.page_url_terms, &page.url, &page.url_terms);
        index_terms(&mut inner.page_title_terms, &page.url, &page.title_terms);
        inner
            .pages_by_domain
            .entry(page.domain.clone())
            .or_default()
            .insert(page.url.clone());
        inner.pages.insert(page.url.clone(), page);
    }

    /// Record a visit.
    pub fn add_visit(&self, visit: Visit) {
        let mut inner = self.inner.write();
        let seq = inner.visit_seq;
        inner.visit_seq += 1;
        inner
            .visits_by_page
            .entry(visit.url.clone())
            .or_default()
            .push(visit.clone());
        inner.visits_by_time.insert((visit.time_ms(), seq), visit);
    }

    /// Insert or replace the bookmark on a page.
    pub fn add_bookmark(&self, bookmark: Bookmark) {
        let mut inner = self.inner.write();
        if let Some(old) = inner.bookmarks.remove(&bookmark.url) {
            inner
                .bookmarks_by_time
                .remove(&(old.time_ms(), old.url.clone()));
        }
        inner
            .bookmarks_by_time
            .insert((bookmark.time_ms(), bookmark.url.clone()), ());
        inner.bookmarks.insert(bookmark.url.clone(), bookmark);
    }

    /// Insert or replace an annotation, (re)indexing its term sets.
    pub fn add_annotation(&self, annotation: Annotation) {
        let mut inner = self.inner.write();
        if let Some(old) = inner.annotations.remove(&annotation.id) {
            unindex_terms(&mut inner.ann_body_terms, &old.id, &old.body_terms);
            unindex_terms(&mut inner.ann_comment_terms, &old.id, &old.comment_terms);
            inner
                .annotations_by_time
                .remove(&(old.last_edited_ms(), old.id.clone()));
        }
        index_terms(&mut inner.ann_body_terms, &annotation.id, &annotation.body_terms);
        index_terms(
            &mut inner.ann_comment_terms,
            &annotation.id,
            &annotation.comment_terms,
        );
        inner
            .annotations_by_time
            .insert((annotation.last_edited_ms(), annotation.id.clone()), ());
        inner
            .annotations
            .insert(annotation.id.clone(), annotation);
    }

    /// Replace an annotation's comment, re-indexing its comment terms and
    /// bumping `last_edited`.
    pub fn edit_annotation_comment(
        &self,
        id: &str,
        comment: Option<String>,
        edited_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let mut annotation = inner
            .annotations
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("annotation {}", id)))?;

        unindex_terms(&mut inner.ann_comment_terms, id, &annotation.comment_terms);
        inner
            .annotations_by_time
            .remove(&(annotation.last_edited_ms(), id.to_string()));

        annotation.set_comment(comment, edited_at);

        index_terms(&mut inner.ann_comment_terms, id, &annotation.comment_terms);
        inner
            .annotations_by_time
            .insert((annotation.last_edited_ms(), id.to_string()), ());
        inner.annotations.insert(id.to_string(), annotation);
        Ok(())
    }

    /// Remove an annotation and all its index entries.
    pub fn delete_annotation(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let annotation = inner
            .annotations
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("annotation {}", id)))?;
        unindex_terms(&mut inner.ann_body_terms, id, &annotation.body_terms);
        unindex_terms(&mut inner.ann_comment_terms, id, &annotation.comment_terms);
        inner
            .annotations_by_time
            .remove(&(annotation.last_edited_ms(), id.to_string()));
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.inner.read().pages.len()
    }

    pub fn visit_count(&self) -> usize {
        self.inner.read().visits_by_time.len()
    }

    pub fn bookmark_count(&self) -> usize {
        self.inner.read().bookmarks.len()
    }

    pub fn annotation_count(&self) -> usize {
        self.inner.read().annotations.len()
    }
}

fn index_terms(index: &mut TermIndex, id: &str, terms: &BTreeSet<String>) {
    for term in terms {
        index.entry(term.clone()).or_default().insert(id.to_string());
    }
}

fn unindex_terms(index: &mut TermIndex, id: &str, terms: &BTreeSet<String>) {
    for term in terms {
        if let Some(ids) = index.get_mut(term) {
            ids.remove(id);
            if ids.is_empty() {
                index.remove(term);
            }
        }
    }
}

/// Collect ids from a term index for one lookup.
fn lookup_in(index: &TermIndex, term: &str, mode: MatchMode) -> HashSet<String> {
    let mut ids = HashSet::new();
    match mode {
        MatchMode::Exact => {
            if let Some(set) = index.get(term) {
                ids.extend(set.iter().cloned());
            }
        }
        MatchMode::Prefix => {
            for (indexed, set) in index.range(term.to_string()..) {
                if !indexed.starts_with(term) {
                    break;
                }
                ids.extend(set.iter().cloned());
            }
        }
    }
    ids
}

#[async_trait]
impl StoreReader for MemoryStore {
    async fn term_lookup(&self, lookup: TermLookup) -> Result<HashSet<String>, StoreError> {
        let inner = self.inner.read();
        let index = match lookup.field {
            TermField::PageBody => &inner.page_body_terms,
            TermField::PageUrl => &inner.page_url_terms,
            TermField::PageTitle => &inner.page_title_terms,
            TermField::AnnotationBody => &inner.ann_body_terms,
            TermField::AnnotationComment => &inner.ann_comment_terms,
        };
        Ok(lookup_in(index, &lookup.term, lookup.mode))
    }

    async fn phrase_scan(&self, scan: PhraseScan) -> Result<HashSet<String>, StoreError> {
        let needle = scan.phrase.to_lowercase();
        let inner = self.inner.read();
        let ids = match scan.field {
            TextField::PageBody => inner
                .pages
                .values()
                .filter(|p| p.text.to_lowercase().contains(&needle))
                .map(|p| p.url.clone())
                .collect(),
            TextField::AnnotationBody => inner
                .annotations
                .values()
                .filter(|a| {
                    a.body
                        .as_deref()
                        .is_some_and(|b| b.to_lowercase().contains(&needle))
                })
                .map(|a| a.id.clone())
                .collect(),
            TextField::AnnotationComment => inner
                .annotations
                .values()
                .filter(|a| {
                    a.comment
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&needle))
                })
                .map(|a| a.id.clone())
                .collect(),
        };
        Ok(ids)
    }

    async fn visits_in_range(&self, range: TimeRange) -> Result<Vec<Visit>, StoreError> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let inner = self.inner.read();
        Ok(inner
            .visits_by_time
            .range((range.from_ms, 0)..(range.until_ms, 0))
            .map(|(_, visit)| visit.clone())
            .collect())
    }

    async fn bookmarks_in_range(&self, range: TimeRange) -> Result<Vec<Bookmark>, StoreError> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let inner = self.inner.read();
        Ok(inner
            .bookmarks_by_time
            .range((range.from_ms, String::new())..(range.until_ms, String::new()))
            .filter_map(|((_, url), _)| inner.bookmarks.get(url).cloned())
            .collect())
    }

    async fn annotations_in_range(&self, range: TimeRange) -> Result<Vec<Annotation>, StoreError> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let inner = self.inner.read();
        Ok(inner
            .annotations_by_time
            .range((range.from_ms, String::new())..(range.until_ms, String::new()))
            .filter_map(|((_, id), _)| inner.annotations.get(id).cloned())
            .collect())
    }

    async fn any_activity_in(&self, range: TimeRange) -> Result<bool, StoreError> {
        if range.is_empty() {
            return Ok(false);
        }
        let inner = self.inner.read();
        let has_visit = inner
            .visits_by_time
            .range((range.from_ms, 0)..(range.until_ms, 0))
            .next()
            .is_some();
        let has_bookmark = inner
            .bookmarks_by_time
            .range((range.from_ms, String::new())..(range.until_ms, String::new()))
            .next()
            .is_some();
        let has_annotation = inner
            .annotations_by_time
            .range((range.from_ms, String::new())..(range.until_ms, String::new()))
            .next()
            .is_some();
        Ok(has_visit || has_bookmark || has_annotation)
    }

    async fn visits_for_pages(&self, urls: &[String]) -> Result<Vec<Visit>, StoreError> {
        let inner = self.inner.read();
        Ok(urls
            .iter()
            .filter_map(|url| inner.visits_by_page.get(url))
            .flatten()
            .cloned()
            .collect())
    }

    async fn bookmarks_for_pages(&self, urls: &[String]) -> Result<Vec<Bookmark>, StoreError> {
        let inner = self.inner.read();
        Ok(urls
            .iter()
            .filter_map(|url| inner.bookmarks.get(url).cloned())
            .collect())
    }

    async fn annotations_by_id(&self, ids: &[String]) -> Result<Vec<Annotation>, StoreError> {
        let inner = self.inner.read();
        Ok(ids
            .iter()
            .filter_map(|id| inner.annotations.get(id).cloned())
            .collect())
    }

    async fn pages_by_url(&self, urls: &[String]) -> Result<Vec<Page>, StoreError> {
        let inner = self.inner.read();
        Ok(urls
            .iter()
            .filter_map(|url| inner.pages.get(url).cloned())
            .collect())
    }

    async fn pages_in_domains(&self, domains: &[String]) -> Result<HashSet<String>, StoreError> {
        let inner = self.inner.read();
        let mut urls = HashSet::new();
        for domain in domains {
            if let Some(set) = inner.pages_by_domain.get(&domain.to_lowercase()) {
                urls.extend(set.iter().cloned());
            }
        }
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn sample_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_page(Page::new(
            "rust-lang.org/learn",
            "https://rust-lang.org/learn",
            "Learn Rust",
            "Rust ownership and borrowing explained",
        ));
        store.add_page(Page::new(
            "example.com/post",
            "https://example.com/post",
            "Async patterns",
            "Concurrency with futures in async Rust",
        ));
        store
    }

    #[tokio::test]
    async fn test_exact_term_lookup() {
        let store = sample_store();
        let ids = store
            .term_lookup(TermLookup::new(
                TermField::PageBody,
                "ownership",
                MatchMode::Exact,
            ))
            .await
            .unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("rust-lang.org/learn"));
    }

    #[tokio::test]
    async fn test_prefix_term_lookup() {
        let store = sample_store();
        // "own" should prefix-match "ownership"
        let ids = store
            .term_lookup(TermLookup::new(
                TermField::PageBody,
                "own",
                MatchMode::Prefix,
            ))
            .await
            .unwrap();
        assert!(ids.contains("rust-lang.org/learn"));

        let exact = store
            .term_lookup(TermLookup::new(
                TermField::PageBody,
                "own",
                MatchMode::Exact,
            ))
            .await
            .unwrap();
        assert!(exact.is_empty());
    }

    #[tokio::test]
    async fn test_phrase_scan_is_case_insensitive() {
        let store = sample_store();
        let ids = store
            .phrase_scan(PhraseScan::new(TextField::PageBody, "OWNERSHIP AND"))
            .await
            .unwrap();
        assert!(ids.contains("rust-lang.org/learn"));
    }

    #[tokio::test]
    async fn test_visits_in_range_half_open() {
        let store = sample_store();
        store.add_visit(Visit::new("rust-lang.org/learn", ts(100)));
        store.add_visit(Visit::new("example.com/post", ts(200)));
        store.add_visit(Visit::new("example.com/post", ts(300)));

        let visits = store
            .visits_in_range(TimeRange::new(100, 300))
            .await
            .unwrap();
        let times: Vec<i64> = visits.iter().map(|v| v.time_ms()).collect();
        assert_eq!(times, vec![100, 200]);
    }

    #[tokio::test]
    async fn test_bookmark_replace_updates_time_index() {
        let store = sample_store();
        store.add_bookmark(Bookmark::new("example.com/post", ts(100)));
        store.add_bookmark(Bookmark::new("example.com/post", ts(500)));

        let old = store
            .bookmarks_in_range(TimeRange::new(0, 200))
            .await
            .unwrap();
        assert!(old.is_empty());

        let new = store
            .bookmarks_in_range(TimeRange::new(0, 1_000))
            .await
            .unwrap();
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].time_ms(), 500);
    }

    #[tokio::test]
    async fn test_annotation_edit_reindexes() {
        let store = sample_store();
        let ann = Annotation::from_parts(
            "example.com/post/#1",
            "example.com/post",
            None,
            Some("tokio runtime".into()),
            ts(100),
        );
        store.add_annotation(ann);

        store
            .edit_annotation_comment("example.com/post/#1", Some("smol runtime".into()), ts(200))
            .unwrap();

        let old = store
            .term_lookup(TermLookup::new(
                TermField::AnnotationComment,
                "tokio",
                MatchMode::Exact,
            ))
            .await
            .unwrap();
        assert!(old.is_empty());

        let new = store
            .term_lookup(TermLookup::new(
                TermField::AnnotationComment,
                "smol",
                MatchMode::Exact,
            ))
            .await
            .unwrap();
        assert!(new.contains("example.com/post/#1"));

        let in_range = store
            .annotations_in_range(TimeRange::new(150, 250))
            .await
            .unwrap();
        assert_eq!(in_range.len(), 1);
        assert_eq!(in_range[0].last_edited_ms(), 200);
    }

    #[tokio::test]
    async fn test_delete_annotation_clears_indexes() {
        let store = sample_store();
        store.add_annotation(Annotation::from_parts(
            "example.com/post/#1",
            "example.com/post",
            Some("futures".into()),
            None,
            ts(100),
        ));
        store.delete_annotation("example.com/post/#1").unwrap();

        let ids = store
            .term_lookup(TermLookup::new(
                TermField::AnnotationBody,
                "futures",
                MatchMode::Exact,
            ))
            .await
            .unwrap();
        assert!(ids.is_empty());
        assert!(store
            .annotations_in_range(TimeRange::new(0, 1_000))
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            store.delete_annotation("example.com/post/#1"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_any_activity_in() {
        let store = sample_store();
        assert!(!store.any_activity_in(TimeRange::new(0, 1_000)).await.unwrap());

        store.add_visit(Visit::new("example.com/post", ts(500)));
        assert!(store.any_activity_in(TimeRange::new(0, 1_000)).await.unwrap());
        assert!(!store.any_activity_in(TimeRange::new(501, 1_000)).await.unwrap());
    }

    #[tokio::test]
    async fn test_pages_in_domains() {
        let store = sample_store();
        let urls = store
            .pages_in_domains(&["Example.COM".to_string()])
            .await
            .unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("example.com/post"));
    }

    #[tokio::test]
    async fn test_visits_for_pages_bulk() {
        let store = sample_store();
        store.add_visit(Visit::new("rust-lang.org/learn", ts(100)));
        store.add_visit(Visit::new("example.com/post", ts(200)));

        let visits = store
            .visits_for_pages(&[
                "rust-lang.org/learn".to_string(),
                "missing.example".to_string(),
            ])
            .await
            .unwrap();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].url, "rust-lang.org/learn");
    }
}
