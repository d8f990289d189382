//! Search engine facade.
//!
//! Owns the injected capabilities (storage reader, clock, settings),
//! resolves parameter defaults and validates cursors before delegating
//! to the blank and terms search paths. Every call is a pure function
//! of its parameters and the store contents; overlapping calls are
//! independent.

use std::sync::Arc;

use pagetrail_storage::StoreReader;
use pagetrail_types::{BlankSearchResults, SearchSettings, TermsSearchResults};

use crate::blank::{blank_search, BlankSearchParams};
use crate::clock::{Clock, SystemClock};
use crate::error::SearchError;
use crate::terms::{terms_search, TermsSearchParams};
use crate::tokenize::split_query;

/// Unified search over pages, visits, bookmarks and annotations.
pub struct SearchEngine<S, C = SystemClock> {
    store: Arc<S>,
    clock: C,
    settings: SearchSettings,
}

impl<S: StoreReader> SearchEngine<S> {
    /// Engine with wall-clock time and default settings.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_parts(store, SystemClock, SearchSettings::default())
    }
}

impl<S: StoreReader, C: Clock> SearchEngine<S, C> {
    /// Engine with explicit clock and settings.
    pub fn with_parts(store: Arc<S>, clock: C, settings: SearchSettings) -> Self {
        Self {
            store,
            clock,
            settings,
        }
    }

    /// Queryless recency search over one pagination window.
    ///
    /// `until_ms` defaults to the clock's now, `from_ms` to 0 and
    /// `days_to_search` to the configured window size. To fetch the next
    /// page, call again with `until_ms` set to this call's window lower
    /// bound (`until - days`).
    pub async fn unified_blank_search(
        &self,
        params: &BlankSearchParams,
    ) -> Result<BlankSearchResults, SearchError> {
        let until_ms = params.until_ms.unwrap_or_else(|| self.clock.now_ms());
        let from_ms = params.from_ms.unwrap_or(0);
        let days_to_search = params
            .days_to_search
            .unwrap_or(self.settings.days_to_search);

        if days_to_search == 0 {
            return Err(SearchError::InvalidDaySpan);
        }
        if until_ms < from_ms {
            return Err(SearchError::InvertedTimeBounds { from_ms, until_ms });
        }

        blank_search(self.store.as_ref(), until_ms, from_ms, days_to_search).await
    }

    /// Term/phrase search with AND semantics, ranked by recency.
    ///
    /// A query that tokenizes to nothing is rejected; deciding that "no
    /// constraints" means "everything" belongs to the caller, which can
    /// fall back to [`Self::unified_blank_search`].
    pub async fn unified_terms_search(
        &self,
        params: &TermsSearchParams,
    ) -> Result<TermsSearchResults, SearchError> {
        let fragments = split_query(&params.query);
        if fragments.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        if let (Some(from_ms), Some(until_ms)) = (params.filters.from_ms, params.filters.until_ms) {
            if until_ms < from_ms {
                return Err(SearchError::InvertedTimeBounds { from_ms, until_ms });
            }
        }

        terms_search(
            self.store.as_ref(),
            &fragments,
            params.match_mode,
            &params.filters,
        )
        .await
    }
}
