//! # pagetrail-storage
//!
//! Storage seam for the Pagetrail search core.
//!
//! The search core never talks to a storage engine directly. It builds
//! declarative query descriptors ([`query::TermLookup`],
//! [`query::PhraseScan`], [`query::TimeRange`]) and hands them to a
//! [`StoreReader`] capability, which any backing store can implement.
//!
//! This crate also ships [`MemoryStore`], an in-memory reference
//! implementation with the secondary indexes the core requires (exact and
//! prefix term lookup, time-range scans), plus a JSON snapshot format for
//! moving data in and out of it.

pub mod error;
pub mod memory;
pub mod query;
pub mod reader;
pub mod snapshot;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use query::{MatchMode, PhraseScan, TermField, TermLookup, TextField, TimeRange};
pub use reader::StoreReader;
pub use snapshot::Snapshot;
