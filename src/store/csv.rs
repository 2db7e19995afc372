// src/store/csv.rs

//! CSV-file record store.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::PathBuf;

use chrono::Utc;

use crate::error::Result;
use crate::models::{BookRecord, CanonicalKey, RecordPatch, COLUMNS};
use crate::store::RecordStore;

/// Flat-file store: UTF-8 CSV, first row = column header.
///
/// Reads tolerate rows shorter than the header (older schema versions);
/// appends always write the full current column set.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Create a store over the given table file. The file itself is
    /// created lazily on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying table file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_records(&self) -> Result<Vec<BookRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ::csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.records() {
            records.push(BookRecord::from_row(&row?));
        }
        Ok(records)
    }

    /// Rewrite the whole table (write to temp, then rename).
    fn rewrite(&self, records: &[BookRecord]) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        {
            let mut writer = ::csv::Writer::from_path(&tmp)?;
            writer.write_record(COLUMNS)?;
            for record in records {
                writer.write_record(record.to_row())?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl RecordStore for CsvStore {
    fn write_record(&self, record: &BookRecord) -> Result<bool> {
        let existing: HashSet<CanonicalKey> =
            self.read_records()?.iter().map(BookRecord::key).collect();
        if existing.contains(&record.key()) {
            return Ok(false);
        }

        let write_header = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if write_header {
            writer.write_record(COLUMNS)?;
        }

        let mut row = record.clone();
        if row.datetime_added.is_empty() {
            row.datetime_added = Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string();
        }
        writer.write_record(row.to_row())?;
        writer.flush()?;

        log::info!("Wrote record to table: {} by {}", row.title, row.author);
        Ok(true)
    }

    fn merge_record(&self, key: &CanonicalKey, patch: &RecordPatch) -> Result<bool> {
        if !self.path.exists() || patch.is_empty() {
            return Ok(false);
        }
        let mut records = self.read_records()?;
        let mut changed = false;
        for record in records.iter_mut().filter(|r| r.key() == *key) {
            changed |= patch.apply(record);
        }
        if changed {
            self.rewrite(&records)?;
        }
        Ok(changed)
    }

    fn load_all(&self) -> Result<Vec<BookRecord>> {
        self.read_records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> CsvStore {
        CsvStore::new(dir.path().join("book_mentions.csv"))
    }

    fn sample_record() -> BookRecord {
        let mut record = BookRecord::placeholder("The Song", "Jane Doe");
        record.isbn13 = "9780000000000".into();
        record.tags = vec!["queer".into(), "romance".into()];
        record
    }

    #[test]
    fn append_creates_file_with_header() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        assert!(store.write_record(&sample_record()).unwrap());

        let content = std::fs::read_to_string(store.path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), COLUMNS.join(","));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn append_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        assert!(store.write_record(&sample_record()).unwrap());
        assert!(!store.write_record(&sample_record()).unwrap());
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn case_and_whitespace_variants_are_one_row() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        assert!(store.write_record(&sample_record()).unwrap());
        let variant = BookRecord::placeholder("  the song ", "JANE DOE");
        assert!(!store.write_record(&variant).unwrap());
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn append_stamps_datetime_added_once() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        store.write_record(&sample_record()).unwrap();
        let stamped = &store.load_all().unwrap()[0].datetime_added;
        assert!(!stamped.is_empty());
    }

    #[test]
    fn merge_updates_only_provided_fields() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.write_record(&sample_record()).unwrap();
        let before = store.load_all().unwrap().remove(0);

        let patch = RecordPatch {
            isbn13: Some("9781111111111".into()),
            ..RecordPatch::default()
        };
        assert!(store.merge_record(&before.key(), &patch).unwrap());

        let after = store.load_all().unwrap().remove(0);
        assert_eq!(after.isbn13, "9781111111111");
        assert_eq!(after.title, before.title);
        assert_eq!(after.author, before.author);
        assert_eq!(after.datetime_added, before.datetime_added);
        assert_eq!(after.tags, before.tags);
    }

    #[test]
    fn merge_on_missing_file_is_noop() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let patch = RecordPatch {
            isbn13: Some("9781111111111".into()),
            ..RecordPatch::default()
        };
        let key = CanonicalKey::new("T", "A");
        assert!(!store.merge_record(&key, &patch).unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn merge_for_absent_key_changes_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.write_record(&sample_record()).unwrap();

        let patch = RecordPatch {
            isbn13: Some("9781111111111".into()),
            ..RecordPatch::default()
        };
        let key = CanonicalKey::new("Another", "Book");
        assert!(!store.merge_record(&key, &patch).unwrap());
        assert_eq!(store.load_all().unwrap()[0].isbn13, "9780000000000");
    }

    #[test]
    fn loads_short_rows_from_older_schema() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("book_mentions.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "title,author,isbn13").unwrap();
        writeln!(file, "Old Title,Old Author,9780000000000").unwrap();
        drop(file);

        let store = CsvStore::new(&path);
        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Old Title");
        assert_eq!(records[0].isbn13, "9780000000000");
        assert_eq!(records[0].source_url, "");

        // A new append keeps the old row readable and adds a full row
        assert!(store.write_record(&sample_record()).unwrap());
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn merge_rewrites_short_rows_to_full_schema() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("book_mentions.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "title,author,isbn13").unwrap();
        writeln!(file, "Old Title,Old Author,").unwrap();
        drop(file);

        let store = CsvStore::new(&path);
        let patch = RecordPatch {
            isbn13: Some("9781111111111".into()),
            ..RecordPatch::default()
        };
        let key = CanonicalKey::new("Old Title", "Old Author");
        assert!(store.merge_record(&key, &patch).unwrap());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(&COLUMNS.join(",")));
        assert_eq!(store.load_all().unwrap()[0].isbn13, "9781111111111");
    }
}
