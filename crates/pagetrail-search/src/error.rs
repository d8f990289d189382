//! Search error types.

use thiserror::Error;

use pagetrail_storage::StoreError;

/// Errors that can occur during search operations.
///
/// Storage read failures propagate unmodified; the core performs no
/// retries.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Pagination window size of zero days
    #[error("days_to_search must be positive")]
    InvalidDaySpan,

    /// Upper time bound below the lower bound
    #[error("until bound {until_ms} precedes from bound {from_ms}")]
    InvertedTimeBounds { from_ms: i64, until_ms: i64 },

    /// Terms search received a query with no terms or phrases
    #[error("terms search requires a non-empty query")]
    EmptyQuery,

    /// Storage read failure
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}
