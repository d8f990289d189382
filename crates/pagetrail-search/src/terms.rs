//! Terms search: indexed term/phrase lookup with AND semantics across
//! pages and annotations, re-ranked by recency.
//!
//! Every term and phrase contributes one candidate set per source
//! (pages, annotations); filters contribute additional sets. The sets
//! of one source are intersected, matching annotations are grouped per
//! page, and page-level timestamps are reconciled before ranking.

use std::collections::{BTreeMap, HashSet};

use futures::future::try_join_all;
use tracing::info;

use pagetrail_storage::{
    MatchMode, PhraseScan, StoreReader, TermField, TermLookup, TextField, TimeRange,
};
use pagetrail_types::{PageResult, TermsSearchResults};

use crate::activity::latest_page_activity;
use crate::error::SearchError;
use crate::intersect::intersect;
use crate::rank::rank_by_recency;
use crate::tokenize::QueryFragments;

/// Optional predicates narrowing the candidate sets before intersection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Inclusive lower activity bound
    pub from_ms: Option<i64>,

    /// Exclusive upper activity bound
    pub until_ms: Option<i64>,

    /// Restrict results to these domains (case-insensitive)
    pub domains: Vec<String>,
}

impl SearchFilters {
    /// Combined time range, if either bound is set.
    fn time_range(&self) -> Option<TimeRange> {
        if self.from_ms.is_none() && self.until_ms.is_none() {
            return None;
        }
        Some(TimeRange::new(
            self.from_ms.unwrap_or(0),
            self.until_ms.unwrap_or(i64::MAX),
        ))
    }
}

/// Parameters for a terms search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermsSearchParams {
    /// Raw query string (terms and quoted phrases)
    pub query: String,

    /// Exact lookups by default; prefix for incremental search
    pub match_mode: MatchMode,

    /// Additional narrowing predicates
    pub filters: SearchFilters,
}

impl TermsSearchParams {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Self::default()
        }
    }

    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }
}

pub(crate) async fn terms_search<S: StoreReader>(
    store: &S,
    fragments: &QueryFragments,
    match_mode: MatchMode,
    filters: &SearchFilters,
) -> Result<TermsSearchResults, SearchError> {
    let (mut page_sets, mut annotation_sets) = tokio::try_join!(
        collect_page_sets(store, fragments, match_mode),
        collect_annotation_sets(store, fragments),
    )?;

    let domain_pages = if filters.domains.is_empty() {
        None
    } else {
        Some(store.pages_in_domains(&filters.domains).await?)
    };
    if let Some(ref pages) = domain_pages {
        page_sets.push(to_sorted_vec(pages.clone()));
    }

    if let Some(range) = filters.time_range() {
        let (visits, bookmarks, annotations) = tokio::try_join!(
            store.visits_in_range(range),
            store.bookmarks_in_range(range),
            store.annotations_in_range(range),
        )?;
        let mut active_pages: HashSet<String> = HashSet::new();
        active_pages.extend(visits.into_iter().map(|v| v.url));
        active_pages.extend(bookmarks.into_iter().map(|b| b.url));
        let mut active_annotations: HashSet<String> = HashSet::new();
        for annotation in annotations {
            active_pages.insert(annotation.page_url.clone());
            active_annotations.insert(annotation.id);
        }
        page_sets.push(to_sorted_vec(active_pages));
        annotation_sets.push(to_sorted_vec(active_annotations));
    }

    let page_ids = intersect(page_sets);
    let annotation_ids = intersect(annotation_sets);

    let mut annotation_rows = store.annotations_by_id(&annotation_ids).await?;
    if let Some(ref pages) = domain_pages {
        annotation_rows.retain(|a| pages.contains(&a.page_url));
    }

    let mut entries: BTreeMap<String, PageResult> = BTreeMap::new();
    for url in page_ids {
        entries.entry(url).or_default();
    }

    let mut per_page: BTreeMap<String, Vec<(i64, String)>> = BTreeMap::new();
    for annotation in &annotation_rows {
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

    let urls: Vec<String> = entries.keys().cloned().collect();
    let latest = latest_page_activity(store, &urls).await?;
    for (url, entry) in entries.iter_mut() {
        if let Some(ms) = latest.get(url) {
            entry.last_activity_ms = entry.last_activity_ms.max(*ms);
        }
    }

    let pages = rank_by_recency(entries);
    info!(
        terms = fragments.terms.len(),
        phrases = fragments.phrases.len(),
        pages = pages.len(),
        "Terms search complete"
    );
    Ok(TermsSearchResults { pages })
}

/// One candidate set per term and per phrase, against the page indexes.
async fn collect_page_sets<S: StoreReader>(
    store: &S,
    fragments: &QueryFragments,
    match_mode: MatchMode,
) -> Result<Vec<Vec<String>>, SearchError> {
    let term_lookups = fragments
        .terms
        .iter()
        .map(|term| page_ids_for_term(store, term, match_mode));
    let phrase_scans = fragments
        .phrases
        .iter()
        .map(|phrase| page_ids_for_phrase(store, phrase));

    let (term_sets, phrase_sets) =
        tokio::try_join!(try_join_all(term_lookups), try_join_all(phrase_scans))?;
    Ok(term_sets.into_iter().chain(phrase_sets).collect())
}

/// One candidate set per term and per phrase, against the annotation
/// indexes. Annotation lookups are always exact; prefix mode is a page
/// typeahead concern.
async fn collect_annotation_sets<S: StoreReader>(
    store: &S,
    fragments: &QueryFragments,
) -> Result<Vec<Vec<String>>, SearchError> {
    let term_lookups = fragments
        .terms
        .iter()
        .map(|term| annotation_ids_for_term(store, term));
    let phrase_scans = fragments
        .phrases
        .iter()
        .map(|phrase| annotation_ids_for_phrase(store, phrase));

    let (term_sets, phrase_sets) =
        tokio::try_join!(try_join_all(term_lookups), try_join_all(phrase_scans))?;
    Ok(term_sets.into_iter().chain(phrase_sets).collect())
}

/// Union of the body/url/title index lookups for one term.
async fn page_ids_for_term<S: StoreReader>(
    store: &S,
    term: &str,
    mode: MatchMode,
) -> Result<Vec<String>, SearchError> {
    let fields = [TermField::PageBody, TermField::PageUrl, TermField::PageTitle];
    let lookups = fields
        .iter()
        .map(|field| store.term_lookup(TermLookup::new(*field, term, mode)));
    let sets = try_join_all(lookups).await?;
    Ok(to_sorted_vec(sets.into_iter().flatten().collect()))
}

async fn page_ids_for_phrase<S: StoreReader>(
    store: &S,
    phrase: &str,
) -> Result<Vec<String>, SearchError> {
    let ids = store
        .phrase_scan(PhraseScan::new(TextField::PageBody, phrase))
        .await?;
    Ok(to_sorted_vec(ids))
}

/// Union of the body/comment index lookups for one term.
async fn annotation_ids_for_term<S: StoreReader>(
    store: &S,
    term: &str,
) -> Result<Vec<String>, SearchError> {
    let fields = [TermField::AnnotationBody, TermField::AnnotationComment];
    let lookups = fields
        .iter()
        .map(|field| store.term_lookup(TermLookup::new(*field, term, MatchMode::Exact)));
    let sets = try_join_all(lookups).await?;
    Ok(to_sorted_vec(sets.into_iter().flatten().collect()))
}

/// Union of the comment and highlighted-body scans for one phrase.
async fn annotation_ids_for_phrase<S: StoreReader>(
    store: &S,
    phrase: &str,
) -> Result<Vec<String>, SearchError> {
    let (bodies, comments) = tokio::try_join!(
        store.phrase_scan(PhraseScan::new(TextField::AnnotationBody, phrase)),
        store.phrase_scan(PhraseScan::new(TextField::AnnotationComment, phrase)),
    )?;
    Ok(to_sorted_vec(bodies.into_iter().chain(comments).collect()))
}

fn to_sorted_vec(ids: HashSet<String>) -> Vec<String> {
    let mut ids: Vec<String> = ids.into_iter().collect();
    ids.sort();
    ids
}
