// src/store/mod.rs

//! Record table persistence.
//!
//! One row per book record, header row first, keyed by the canonical
//! `(title, author)` pair. Appends are idempotent; merges update
//! enrichment fields in place and rewrite the whole table. The table
//! assumes a single writer for the duration of a run.

pub mod csv;

use crate::error::Result;
use crate::models::{BookRecord, CanonicalKey, RecordPatch};

// Re-export for convenience
pub use csv::CsvStore;

/// Trait for record table backends.
pub trait RecordStore {
    /// Append a record unless its canonical key is already persisted.
    ///
    /// Returns true on an actual insert, false for the "ignored"
    /// (already present) outcome. The table is durable after every
    /// single write.
    fn write_record(&self, record: &BookRecord) -> Result<bool>;

    /// Overwrite provided enrichment fields on the row(s) matching a key,
    /// leaving identity fields and `datetime_added` untouched.
    ///
    /// Returns true when at least one row changed. A missing table is a
    /// no-op returning false.
    fn merge_record(&self, key: &CanonicalKey, patch: &RecordPatch) -> Result<bool>;

    /// Load every persisted record. A missing table reads as empty.
    fn load_all(&self) -> Result<Vec<BookRecord>>;
}
