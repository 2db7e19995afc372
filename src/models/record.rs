// src/models/record.rs

//! Persisted book record and merge patch.

use csv::StringRecord;

use super::CanonicalKey;

/// On-disk column order for the record table.
///
/// Additive-only: new optional columns are appended, never removed or
/// renamed in place. Rows written by older schema versions are shorter
/// than this header and are read with missing cells as empty.
pub const COLUMNS: [&str; 14] = [
    "title",
    "author",
    "isbn13",
    "tags",
    "cover_url",
    "romance_io_url",
    "google_books_url",
    "steam",
    "steam_rating",
    "datetime_added",
    "reddit_created_utc",
    "reddit_created_date",
    "reddit_url",
    "subreddit",
];

/// Sentinel for enrichment fields with no known value.
pub const NOT_AVAILABLE: &str = "N/A";

/// A persisted book record, one table row.
///
/// Identity is the canonical `(title, author)` key. `datetime_added` is
/// stamped once at creation and never overwritten; enrichment fields may
/// be merged in by later passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub isbn13: String,
    pub tags: Vec<String>,
    pub cover_url: String,
    pub romance_io_url: String,
    pub google_books_url: String,
    pub steam: String,
    pub steam_rating: String,
    pub datetime_added: String,
    pub source_created_utc: String,
    pub source_created_date: String,
    pub source_url: String,
    pub source_tag: String,
}

impl BookRecord {
    /// A record carrying only its identity, with every enrichment field
    /// at its empty/"N/A" sentinel. Written when all lookups fail so a
    /// mention is never silently dropped.
    pub fn placeholder(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn13: NOT_AVAILABLE.to_string(),
            cover_url: NOT_AVAILABLE.to_string(),
            ..Self::default()
        }
    }

    /// Canonical identity of this record.
    pub fn key(&self) -> CanonicalKey {
        CanonicalKey::new(&self.title, &self.author)
    }

    /// Set the free-text steam label and derive its numeric rating.
    pub fn set_steam(&mut self, label: &str) {
        self.steam = label.trim().to_string();
        self.steam_rating = steam_rating_for(&self.steam)
            .map(|r| r.to_string())
            .unwrap_or_default();
    }

    /// Whether a later enrichment pass should revisit this record.
    pub fn is_missing_data(&self) -> bool {
        is_sentinel(&self.isbn13) || self.tags.is_empty() || is_sentinel(&self.cover_url)
    }

    /// Serialize to one table row, in [`COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.author.clone(),
            self.isbn13.clone(),
            self.tags.join(", "),
            self.cover_url.clone(),
            self.romance_io_url.clone(),
            self.google_books_url.clone(),
            self.steam.clone(),
            self.steam_rating.clone(),
            self.datetime_added.clone(),
            self.source_created_utc.clone(),
            self.source_created_date.clone(),
            self.source_url.clone(),
            self.source_tag.clone(),
        ]
    }

    /// Deserialize from a table row.
    ///
    /// Reads defensively: rows shorter than the current schema (older
    /// versions) are accepted with missing cells treated as empty.
    pub fn from_row(row: &StringRecord) -> Self {
        let cell = |i: usize| row.get(i).unwrap_or("").to_string();
        Self {
            title: cell(0),
            author: cell(1),
            isbn13: cell(2),
            tags: split_tags(row.get(3).unwrap_or("")),
            cover_url: cell(4),
            romance_io_url: cell(5),
            google_books_url: cell(6),
            steam: cell(7),
            steam_rating: cell(8),
            datetime_added: cell(9),
            source_created_utc: cell(10),
            source_created_date: cell(11),
            source_url: cell(12),
            source_tag: cell(13),
        }
    }
}

/// Partial enrichment fields for a merge-update.
///
/// Identity fields and `datetime_added` are not representable here, so a
/// merge can never touch them. `None` and sentinel values mean "not
/// provided": the existing cell is left untouched.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub isbn13: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_url: Option<String>,
    pub romance_io_url: Option<String>,
    pub google_books_url: Option<String>,
    pub steam: Option<String>,
    pub source_url: Option<String>,
}

impl RecordPatch {
    /// Whether the patch carries any applicable field.
    pub fn is_empty(&self) -> bool {
        !(provided(&self.isbn13)
            || self.tags.as_ref().is_some_and(|t| !t.is_empty())
            || provided(&self.cover_url)
            || provided(&self.romance_io_url)
            || provided(&self.google_books_url)
            || provided(&self.steam)
            || provided(&self.source_url))
    }

    /// Apply the provided fields onto an existing record.
    pub fn apply(&self, record: &mut BookRecord) -> bool {
        let mut changed = false;
        if let Some(v) = applicable(&self.isbn13) {
            record.isbn13 = v.to_string();
            changed = true;
        }
        if let Some(tags) = self.tags.as_ref().filter(|t| !t.is_empty()) {
            record.tags = tags.clone();
            changed = true;
        }
        if let Some(v) = applicable(&self.cover_url) {
            record.cover_url = v.to_string();
            changed = true;
        }
        if let Some(v) = applicable(&self.romance_io_url) {
            record.romance_io_url = v.to_string();
            changed = true;
        }
        if let Some(v) = applicable(&self.google_books_url) {
            record.google_books_url = v.to_string();
            changed = true;
        }
        if let Some(v) = applicable(&self.steam) {
            record.set_steam(v);
            changed = true;
        }
        if let Some(v) = applicable(&self.source_url) {
            record.source_url = v.to_string();
            changed = true;
        }
        changed
    }
}

/// Numeric heat rating for a known steam label, 1 (sweet) to 5 (explicit).
pub fn steam_rating_for(label: &str) -> Option<u8> {
    match label.trim().to_lowercase().as_str() {
        "glimpses and kisses" => Some(1),
        "behind closed doors" => Some(2),
        "open door" => Some(3),
        "explicit open door" => Some(4),
        "explicit and plentiful" => Some(5),
        _ => None,
    }
}

fn is_sentinel(value: &str) -> bool {
    value.is_empty() || value == NOT_AVAILABLE
}

fn provided(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !is_sentinel(v))
}

fn applicable(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !is_sentinel(v))
}

fn split_tags(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_round_trip() {
        let mut record = BookRecord::placeholder("A Title", "An Author");
        record.tags = vec!["queer".into(), "romance".into()];
        record.set_steam("Open door");
        record.datetime_added = "2026-08-07T12:00:00".into();

        let row = StringRecord::from(record.to_row());
        let loaded = BookRecord::from_row(&row);
        assert_eq!(loaded, record);
        assert_eq!(loaded.steam_rating, "3");
    }

    #[test]
    fn from_row_tolerates_short_rows() {
        // Older schema: title, author, isbn13 only
        let row = StringRecord::from(vec!["Title", "Author", "9780000000000"]);
        let record = BookRecord::from_row(&row);
        assert_eq!(record.title, "Title");
        assert_eq!(record.isbn13, "9780000000000");
        assert_eq!(record.source_url, "");
        assert!(record.tags.is_empty());
    }

    #[test]
    fn missing_data_rule() {
        let placeholder = BookRecord::placeholder("T", "A");
        assert!(placeholder.is_missing_data());

        let mut full = BookRecord::placeholder("T", "A");
        full.isbn13 = "9780000000000".into();
        full.tags = vec!["tag".into()];
        full.cover_url = "https://covers.example/1.jpg".into();
        assert!(!full.is_missing_data());

        // Any one missing field is enough
        full.tags.clear();
        assert!(full.is_missing_data());
    }

    #[test]
    fn patch_skips_empty_and_sentinel_fields() {
        let mut record = BookRecord::placeholder("T", "A");
        record.isbn13 = "9780000000000".into();
        record.datetime_added = "2026-01-01T00:00:00".into();

        let patch = RecordPatch {
            isbn13: Some(NOT_AVAILABLE.into()),
            cover_url: Some(String::new()),
            romance_io_url: Some("https://www.romance.io/books/1".into()),
            ..RecordPatch::default()
        };
        assert!(patch.apply(&mut record));

        // Sentinel patch values must not clobber known data
        assert_eq!(record.isbn13, "9780000000000");
        assert_eq!(record.cover_url, NOT_AVAILABLE);
        assert_eq!(record.romance_io_url, "https://www.romance.io/books/1");
        assert_eq!(record.datetime_added, "2026-01-01T00:00:00");
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(RecordPatch::default().is_empty());
        let patch = RecordPatch {
            steam: Some("Open door".into()),
            ..RecordPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn steam_ratings() {
        assert_eq!(steam_rating_for("Open door"), Some(3));
        assert_eq!(steam_rating_for("  EXPLICIT OPEN DOOR "), Some(4));
        assert_eq!(steam_rating_for("unheard of"), None);
    }
}
