//! # pagetrail-search
//!
//! Unified search core for Pagetrail.
//!
//! Answers two query shapes against the storage collaborator:
//! - **Blank search**: queryless, reverse-chronological pagination over
//!   fixed-size day windows with exhaustion detection.
//! - **Terms search**: indexed term/phrase lookups with AND semantics
//!   across pages and annotations, re-ranked by recency.
//!
//! The core owns no data. It reads through the [`StoreReader`] seam
//! (re-exported from `pagetrail-storage`), launches the independent
//! lookups of each step concurrently, and assembles transient per-page
//! results that are discarded after the call.

pub mod activity;
pub mod blank;
pub mod clock;
pub mod engine;
pub mod error;
pub mod intersect;
pub mod rank;
pub mod terms;
pub mod tokenize;

pub use activity::latest_page_activity;
pub use blank::{BlankSearchParams, MS_PER_DAY};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::SearchEngine;
pub use error::SearchError;
pub use intersect::intersect;
pub use rank::rank_by_recency;
pub use terms::{SearchFilters, TermsSearchParams};
pub use tokenize::{split_query, QueryFragments};

pub use pagetrail_storage::{MatchMode, StoreReader};
