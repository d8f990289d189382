//! Declarative query descriptors.
//!
//! The search core describes what it wants (field, operator, value) and
//! the storage collaborator decides how to evaluate it against its
//! indexes. This keeps the core storage-engine-agnostic.

use serde::{Deserialize, Serialize};

/// An indexed term field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermField {
    /// Page body term index (lookups yield page URLs)
    PageBody,
    /// Page URL term index (lookups yield page URLs)
    PageUrl,
    /// Page title term index (lookups yield page URLs)
    PageTitle,
    /// Annotation highlight-body term index (lookups yield annotation ids)
    AnnotationBody,
    /// Annotation comment term index (lookups yield annotation ids)
    AnnotationComment,
}

/// A raw text field for phrase scans.
///
/// Phrases are not pre-tokenized into any index, so they are answered by
/// a case-insensitive substring scan instead of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    /// Extracted page body text (scans yield page URLs)
    PageBody,
    /// Annotation highlighted text (scans yield annotation ids)
    AnnotationBody,
    /// Annotation comment text (scans yield annotation ids)
    AnnotationComment,
}

/// Exact or prefix matching for term lookups.
///
/// Prefix matching backs incremental (typeahead) search and is only used
/// against page term indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Exact,
    Prefix,
}

/// One indexed term lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermLookup {
    pub field: TermField,
    pub term: String,
    pub mode: MatchMode,
}

impl TermLookup {
    pub fn new(field: TermField, term: &str, mode: MatchMode) -> Self {
        Self {
            field,
            term: term.to_string(),
            mode,
        }
    }
}

/// One phrase substring scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseScan {
    pub field: TextField,
    pub phrase: String,
}

impl PhraseScan {
    pub fn new(field: TextField, phrase: &str) -> Self {
        Self {
            field,
            phrase: phrase.to_string(),
        }
    }
}

/// Half-open time range `[from_ms, until_ms)` in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive lower bound
    pub from_ms: i64,
    /// Exclusive upper bound
    pub until_ms: i64,
}

impl TimeRange {
    pub fn new(from_ms: i64, until_ms: i64) -> Self {
        Self { from_ms, until_ms }
    }

    pub fn contains(&self, ms: i64) -> bool {
        ms >= self.from_ms && ms < self.until_ms
    }

    pub fn is_empty(&self) -> bool {
        self.until_ms <= self.from_ms
    }
}
