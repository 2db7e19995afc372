// src/models/mention.rs

//! Extracted mentions and their canonical identity.

/// A raw `(title, author)` pair extracted from item text.
///
/// Ephemeral: produced per scanned item and consumed immediately by the
/// dedup layer and the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    pub title: String,
    pub author: String,

    /// Direct catalog URL captured alongside the mention
    /// (markdown-link contributor convention only).
    pub catalog_url: Option<String>,
}

impl Mention {
    /// Create a mention from raw captured text, trimming both parts.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            author: author.into().trim().to_string(),
            catalog_url: None,
        }
    }

    /// Create a mention carrying a direct catalog link.
    pub fn with_catalog_url(
        title: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            catalog_url: Some(url.into()),
            ..Self::new(title, author)
        }
    }

    /// Canonical identity of this mention.
    pub fn key(&self) -> CanonicalKey {
        CanonicalKey::new(&self.title, &self.author)
    }
}

/// Canonical identity of a book record.
///
/// Two mentions with the same canonical key refer to the same logical
/// record and must never produce two rows in the store, regardless of
/// which run or source produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey {
    title: String,
    author: String,
}

impl CanonicalKey {
    /// Build a key by trimming and case-folding both parts.
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            title: normalize(title),
            author: normalize(author),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_case_and_whitespace() {
        let a = CanonicalKey::new("The Song", "Jane Doe");
        let b = CanonicalKey::new("the song", "JANE DOE");
        let c = CanonicalKey::new("  The Song  ", "Jane Doe");
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn key_distinguishes_different_books() {
        let a = CanonicalKey::new("The Song", "Jane Doe");
        let b = CanonicalKey::new("The Song", "John Doe");
        assert_ne!(a, b);
    }

    #[test]
    fn mention_trims_captures() {
        let m = Mention::new("  Stone Butch Blues ", " Leslie Feinberg  ");
        assert_eq!(m.title, "Stone Butch Blues");
        assert_eq!(m.author, "Leslie Feinberg");
        assert!(m.catalog_url.is_none());
    }
}
