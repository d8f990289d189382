//! Query tokenizer.
//!
//! Splits a raw query string into discrete terms and quoted phrases.
//! Phrases keep their internal whitespace and are matched by substring
//! scan; terms go through the term indexes.

use std::collections::BTreeSet;

/// Deduplicated terms and phrases extracted from one query string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryFragments {
    pub terms: BTreeSet<String>,
    pub phrases: BTreeSet<String>,
}

impl QueryFragments {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.phrases.is_empty()
    }
}

/// Split a raw query into terms and phrases.
///
/// The input is lower-cased and split on double quotes. Fragments inside
/// a balanced pair of quotes become phrases, kept whole; everything else
/// is whitespace-split into terms. An unterminated quote is treated as
/// literal text.
pub fn split_query(query: &str) -> QueryFragments {
    let lowered = query.to_lowercase();
    let parts: Vec<&str> = lowered.split('"').collect();
    let last = parts.len() - 1;

    let mut fragments = QueryFragments::default();
    for (i, part) in parts.iter().enumerate() {
        let quoted = i % 2 == 1 && i < last;
        if quoted {
            if !part.trim().is_empty() {
                fragments.phrases.insert(part.to_string());
            }
        } else {
            for term in part.split_whitespace() {
                fragments.terms.insert(term.to_string());
            }
        }
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_terms_and_phrase() {
        let fragments = split_query("foo \"bar baz\" qux");
        assert_eq!(fragments.terms, set(&["foo", "qux"]));
        assert_eq!(fragments.phrases, set(&["bar baz"]));
    }

    #[test]
    fn test_empty_query() {
        let fragments = split_query("");
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_case_folding() {
        let fragments = split_query("Foo \"Bar Baz\"");
        assert_eq!(fragments.terms, set(&["foo"]));
        assert_eq!(fragments.phrases, set(&["bar baz"]));
    }

    #[test]
    fn test_deduplication() {
        let fragments = split_query("foo foo \"bar\" \"bar\"");
        assert_eq!(fragments.terms.len(), 1);
        assert_eq!(fragments.phrases.len(), 1);
    }

    #[test]
    fn test_unterminated_quote_is_literal() {
        let fragments = split_query("foo \"bar baz");
        assert_eq!(fragments.terms, set(&["foo", "bar", "baz"]));
        assert!(fragments.phrases.is_empty());
    }

    #[test]
    fn test_whitespace_only_phrase_dropped() {
        let fragments = split_query("foo \" \" bar");
        assert_eq!(fragments.terms, set(&["foo", "bar"]));
        assert!(fragments.phrases.is_empty());
    }

    #[test]
    fn test_query_of_only_phrase() {
        let fragments = split_query("\"exact words here\"");
        assert!(fragments.terms.is_empty());
        assert_eq!(fragments.phrases, set(&["exact words here"]));
    }
}
