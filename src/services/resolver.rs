// src/services/resolver.rs

//! Tiered enrichment resolver.
//!
//! Tries the primary catalog, then the community catalog, then the
//! secondary catalog, in fixed order; the first hit wins. Stateless per
//! call.

use crate::error::Result;
use crate::models::ResolverConfig;
use crate::services::{google_books, open_library, romance_io};
use crate::utils::http::create_client;

/// A normalized lookup result, one shape for all three sources.
///
/// Fields a source cannot provide stay at their empty/"N/A" sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBook {
    pub title: String,
    pub author: String,
    pub isbn13: String,
    pub tags: Vec<String>,
    pub cover_url: String,
    pub romance_io_url: String,
    pub google_books_url: String,
}

impl ResolvedBook {
    /// A result carrying only title and author.
    pub fn minimal(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn13: "N/A".to_string(),
            tags: Vec::new(),
            cover_url: "N/A".to_string(),
            romance_io_url: String::new(),
            google_books_url: String::new(),
        }
    }
}

/// Resolver over the three bibliographic sources.
pub struct BookResolver {
    config: ResolverConfig,
    client: reqwest::Client,
}

impl BookResolver {
    /// Create a resolver with its own configured HTTP client.
    pub fn new(user_agent: &str, config: ResolverConfig) -> Result<Self> {
        let client = create_client(user_agent, config.timeout_secs)?;
        Ok(Self { config, client })
    }

    /// Resolve a title/author pair against the source chain.
    ///
    /// `None` means all three sources failed or had no match; the caller
    /// is expected to persist a placeholder so the mention is not lost.
    pub async fn resolve(&self, title: &str, author: &str) -> Option<ResolvedBook> {
        if let Some(book) =
            open_library::lookup_with_retry(&self.client, &self.config, title, author).await
        {
            log::info!("Resolved {} by {} via Open Library", title, author);
            return Some(book);
        }
        if let Some(book) = romance_io::lookup(&self.client, &self.config, title, author).await {
            log::info!("Resolved {} by {} via romance.io", title, author);
            return Some(book);
        }
        if let Some(book) = google_books::lookup(&self.client, &self.config, title, author).await {
            log::info!("Resolved {} by {} via Google Books", title, author);
            return Some(book);
        }
        log::info!("No source had data for {} by {}", title, author);
        None
    }
}
