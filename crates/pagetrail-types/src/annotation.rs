//! Annotation entity.
//!
//! An annotation is a highlight and/or comment attached to a page. Unlike
//! visits and bookmarks, annotations may be edited after creation, which
//! updates `last_edited` and re-derives the comment term set.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::terms::extract_terms;

/// A highlight or comment on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Unique identifier, `{page_url}/#{ulid}` for generated annotations
    pub id: String,

    /// Page the annotation belongs to (normalized URL)
    pub page_url: String,

    /// Highlighted body text, if the annotation anchors a selection
    pub body: Option<String>,

    /// User comment, if any
    pub comment: Option<String>,

    /// Term set over the highlighted body
    #[serde(default)]
    pub body_terms: BTreeSet<String>,

    /// Term set over the comment
    #[serde(default)]
    pub comment_terms: BTreeSet<String>,

    /// Last time the annotation was created or edited
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_edited: DateTime<Utc>,
}

impl Annotation {
    /// Create an annotation with a freshly generated identifier.
    pub fn new(
        page_url: &str,
        body: Option<String>,
        comment: Option<String>,
        last_edited: DateTime<Utc>,
    ) -> Self {
        let id = format!("{}/#{}", page_url, Ulid::new());
        Self::from_parts(&id, page_url, body, comment, last_edited)
    }

    /// Create an annotation with an explicit identifier.
    pub fn from_parts(
        id: &str,
        page_url: &str,
        body: Option<String>,
        comment: Option<String>,
        last_edited: DateTime<Utc>,
    ) -> Self {
        let body_terms = body.as_deref().map(extract_terms).unwrap_or_default();
        let comment_terms = comment.as_deref().map(extract_terms).unwrap_or_default();
        Self {
            id: id.to_string(),
            page_url: page_url.to_string(),
            body,
            comment,
            body_terms,
            comment_terms,
            last_edited,
        }
    }

    /// Replace the comment, re-deriving its term set and bumping
    /// `last_edited`.
    pub fn set_comment(&mut self, comment: Option<String>, edited_at: DateTime<Utc>) {
        self.comment_terms = comment.as_deref().map(extract_terms).unwrap_or_default();
        self.comment = comment;
        self.last_edited = edited_at;
    }

    /// Last-edited time as milliseconds since Unix epoch
    pub fn last_edited_ms(&self) -> i64 {
        self.last_edited.timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_generated_id_includes_page_url() {
        let ann = Annotation::new("example.com/post", None, Some("note".into()), ts(1_000));
        assert!(ann.id.starts_with("example.com/post/#"));
    }

    #[test]
    fn test_term_sets_per_field() {
        let ann = Annotation::from_parts(
            "example.com/#1",
            "example.com",
            Some("borrow checker".into()),
            Some("great explanation".into()),
            ts(1_000),
        );
        assert!(ann.body_terms.contains("borrow"));
        assert!(ann.comment_terms.contains("explanation"));
        assert!(!ann.comment_terms.contains("borrow"));
    }

    #[test]
    fn test_set_comment_reindexes_and_bumps_edit_time() {
        let mut ann = Annotation::from_parts(
            "example.com/#1",
            "example.com",
            None,
            Some("old words".into()),
            ts(1_000),
        );
        ann.set_comment(Some("fresh words".into()), ts(2_000));
        assert!(ann.comment_terms.contains("fresh"));
        assert!(!ann.comment_terms.contains("old"));
        assert_eq!(ann.last_edited_ms(), 2_000);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let ann = Annotation::from_parts(
            "example.com/#1",
            "example.com",
            Some("highlight".into()),
            None,
            ts(5_000),
        );
        let json = serde_json::to_string(&ann).unwrap();
        let decoded: Annotation = serde_json::from_str(&json).unwrap();
        assert_eq!(ann, decoded);
    }
}
