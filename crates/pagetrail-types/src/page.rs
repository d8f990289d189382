//! Page entity.
//!
//! A page is identified by its normalized URL (scheme stripped). Term
//! sets for body, URL and title are computed at construction so the
//! storage layer can index them directly.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::terms::{extract_terms, extract_url_terms};

/// An indexed web page.
///
/// Immutable once created; owned by the storage collaborator. The search
/// core only reads pages and their precomputed term sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Normalized URL, also the page identifier (no scheme, no fragment)
    pub url: String,

    /// Original URL including scheme
    pub full_url: String,

    /// Page title
    pub title: String,

    /// Host portion of the normalized URL
    pub domain: String,

    /// Extracted body text
    pub text: String,

    /// Term set over the body text
    #[serde(default)]
    pub terms: BTreeSet<String>,

    /// Term set over the URL
    #[serde(default)]
    pub url_terms: BTreeSet<String>,

    /// Term set over the title
    #[serde(default)]
    pub title_terms: BTreeSet<String>,
}

impl Page {
    /// Create a page, deriving the domain and all term sets.
    pub fn new(url: &str, full_url: &str, title: &str, text: &str) -> Self {
        Self {
            url: url.to_string(),
            full_url: full_url.to_string(),
            title: title.to_string(),
            domain: domain_of(url),
            text: text.to_string(),
            terms: extract_terms(text),
            url_terms: extract_url_terms(url),
            title_terms: extract_terms(title),
        }
    }
}

/// Host prefix of a normalized URL (everything before the first slash).
fn domain_of(url: &str) -> String {
    url.split('/').next().unwrap_or_default().to_lowercase()
}
