//! Term extraction for indexed entities.
//!
//! Pages and annotations carry precomputed term sets so the search core
//! can answer term queries with plain index lookups. Extraction happens
//! once, when the entity is constructed.

use std::collections::BTreeSet;

/// Minimum length for an extracted term. Single characters are noise.
const MIN_TERM_LEN: usize = 2;

/// URL tokens that carry no search value.
const URL_NOISE: [&str; 3] = ["http", "https", "www"];

/// Extract the term set from a block of text.
///
/// Terms are lower-cased runs of alphanumeric characters, deduplicated.
pub fn extract_terms(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= MIN_TERM_LEN)
        .map(|t| t.to_string())
        .collect()
}

/// Extract the term set from a URL.
///
/// Same rules as [`extract_terms`], minus scheme and `www` tokens.
pub fn extract_url_terms(url: &str) -> BTreeSet<String> {
    let mut terms = extract_terms(url);
    for noise in URL_NOISE {
        terms.remove(noise);
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_terms_lowercases_and_dedupes() {
        let terms = extract_terms("Rust rust RUST ownership");
        assert_eq!(terms.len(), 2);
        assert!(terms.contains("rust"));
        assert!(terms.contains("ownership"));
    }

    #[test]
    fn test_extract_terms_splits_on_punctuation() {
        let terms = extract_terms("memory-safety, without GC!");
        assert!(terms.contains("memory"));
        assert!(terms.contains("safety"));
        assert!(terms.contains("without"));
        assert!(terms.contains("gc"));
    }

    #[test]
    fn test_extract_terms_drops_single_chars() {
        let terms = extract_terms("a b cd");
        assert_eq!(terms.len(), 1);
        assert!(terms.contains("cd"));
    }

    #[test]
    fn test_extract_url_terms_drops_noise() {
        let terms = extract_url_terms("https://www.rust-lang.org/learn");
        assert!(!terms.contains("https"));
        assert!(!terms.contains("www"));
        assert!(terms.contains("rust"));
        assert!(terms.contains("lang"));
        assert!(terms.contains("org"));
        assert!(terms.contains("learn"));
    }

    #[test]
    fn test_extract_terms_empty_input() {
        assert!(extract_terms("").is_empty());
        assert!(extract_terms("   ").is_empty());
    }
}
