//! JSON snapshot interchange for the reference store.
//!
//! A snapshot is one JSON document holding the four collections. Rows
//! use the same serde representation as the domain types (timestamps as
//! epoch milliseconds).

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use pagetrail_types::{Annotation, Bookmark, Page, Visit};

use crate::error::StoreError;
use crate::memory::MemoryStore;

/// Serializable dump of a store's contents.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub pages: Vec<Page>,

    #[serde(default)]
    pub visits: Vec<Visit>,

    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,

    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Snapshot {
    /// Read a snapshot document from disk.
    pub fn read_from(path: &Path) -> Result<Self, StoreError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Write the snapshot document to disk.
    pub fn write_to(&self, path: &Path) -> Result<(), StoreError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Build a populated reference store from this snapshot.
    pub fn into_store(self) -> MemoryStore {
        let store = MemoryStore::new();
        for page in self.pages {
            store.add_page(page);
        }
        for visit in self.visits {
            store.add_visit(visit);
        }
        for bookmark in self.bookmarks {
            store.add_bookmark(bookmark);
        }
        for annotation in self.annotations {
            store.add_annotation(annotation);
        }
        info!(
            pages = store.page_count(),
            visits = store.visit_count(),
            bookmarks = store.bookmark_count(),
            annotations = store.annotation_count(),
            "Loaded snapshot into store"
        );
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_snapshot_roundtrip_through_disk() {
        let time = Utc.timestamp_millis_opt(1_000).unwrap();
        let snapshot = Snapshot {
            pages: vec![Page::new(
                "example.com",
                "https://example.com",
                "Home",
                "hello world",
            )],
            visits: vec![Visit::new("example.com", time)],
            bookmarks: vec![Bookmark::new("example.com", time)],
            annotations: vec![Annotation::from_parts(
                "example.com/#1",
                "example.com",
                Some("hello".into()),
                None,
                time,
            )],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        snapshot.write_to(&path).unwrap();

        let loaded = Snapshot::read_from(&path).unwrap();
        assert_eq!(loaded.pages.len(), 1);
        assert_eq!(loaded.visits.len(), 1);
        assert_eq!(loaded.annotations[0].id, "example.com/#1");

        let store = loaded.into_store();
        assert_eq!(store.page_count(), 1);
        assert_eq!(store.annotation_count(), 1);
    }

    #[test]
    fn test_missing_collections_default_empty() {
        let snapshot: Snapshot = serde_json::from_str("{\"pages\": []}").unwrap();
        assert!(snapshot.visits.is_empty());
        assert!(snapshot.annotations.is_empty());
    }
}
