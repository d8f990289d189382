//! Page-level activity rows: visits and bookmarks.
//!
//! Both belong to exactly one page and never change after creation.
//! Timestamps are stored with millisecond precision for efficient
//! time-range queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single visit to a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Page the visit belongs to (normalized URL)
    pub url: String,

    /// When the visit happened
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
}

impl Visit {
    pub fn new(url: &str, time: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            time,
        }
    }

    /// Visit time as milliseconds since Unix epoch
    pub fn time_ms(&self) -> i64 {
        self.time.timestamp_millis()
    }
}

/// A bookmark on a page. At most one per page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Page the bookmark belongs to (normalized URL)
    pub url: String,

    /// When the bookmark was created
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(url: &str, time: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            time,
        }
    }

    /// Bookmark time as milliseconds since Unix epoch
    pub fn time_ms(&self) -> i64 {
        self.time.timestamp_millis()
    }
}
