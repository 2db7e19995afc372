// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Scan behavior settings
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Bibliographic lookup settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Record table settings
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scanner.user_agent.trim().is_empty() {
            return Err(AppError::validation("scanner.user_agent is empty"));
        }
        if self.resolver.timeout_secs == 0 {
            return Err(AppError::validation("resolver.timeout_secs must be > 0"));
        }
        if self.resolver.retries == 0 {
            return Err(AppError::validation("resolver.retries must be > 0"));
        }
        if self.store.csv_file.trim().is_empty() {
            return Err(AppError::validation("store.csv_file is empty"));
        }
        for base in [
            &self.resolver.open_library_url,
            &self.resolver.covers_url,
            &self.resolver.romance_io_url,
            &self.resolver.google_books_url,
        ] {
            if !base.starts_with("http") {
                return Err(AppError::validation(format!(
                    "resolver URL is not absolute: {base}"
                )));
            }
        }
        Ok(())
    }
}

/// Mention extraction convention for the primary scan path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    /// `{Title by Author}`, the common convention
    #[default]
    Curly,
    /// `[Title by Author]`, the historical square-bracket source
    Square,
}

/// Scan behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Delay between item-source requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Bracket convention expected in scanned text
    #[serde(default)]
    pub convention: Convention,

    /// Automated contributor accounts whose comments carry structured
    /// first-line mentions (matched case-insensitively, exact)
    #[serde(default = "defaults::contributor_handles")]
    pub contributor_handles: Vec<String>,
}

impl ScannerConfig {
    /// Whether an author handle belongs to a recognized contributor bot.
    pub fn is_contributor(&self, handle: &str) -> bool {
        self.contributor_handles
            .iter()
            .any(|h| h.eq_ignore_ascii_case(handle.trim()))
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            request_delay_ms: defaults::request_delay(),
            convention: Convention::default(),
            contributor_handles: defaults::contributor_handles(),
        }
    }
}

/// Bibliographic lookup settings.
///
/// Base URLs default to the public services; tests point them at a local
/// mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Attempts for the primary catalog lookup
    #[serde(default = "defaults::retries")]
    pub retries: u32,

    /// Fixed delay between retry attempts in seconds
    #[serde(default = "defaults::retry_delay")]
    pub retry_delay_secs: u64,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Primary catalog search API base URL
    #[serde(default = "defaults::open_library_url")]
    pub open_library_url: String,

    /// Primary catalog cover-image base URL
    #[serde(default = "defaults::covers_url")]
    pub covers_url: String,

    /// Community catalog base URL
    #[serde(default = "defaults::romance_io_url")]
    pub romance_io_url: String,

    /// Secondary catalog API base URL
    #[serde(default = "defaults::google_books_url")]
    pub google_books_url: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            retries: defaults::retries(),
            retry_delay_secs: defaults::retry_delay(),
            timeout_secs: defaults::timeout(),
            open_library_url: defaults::open_library_url(),
            covers_url: defaults::covers_url(),
            romance_io_url: defaults::romance_io_url(),
            google_books_url: defaults::google_books_url(),
        }
    }
}

/// Record table settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Table file name, relative to the data directory
    #[serde(default = "defaults::csv_file")]
    pub csv_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            csv_file: defaults::csv_file(),
        }
    }
}

mod defaults {
    // Scanner defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; bookscan/1.0)".into()
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn contributor_handles() -> Vec<String> {
        vec!["romance-bot".into()]
    }

    // Resolver defaults
    pub fn retries() -> u32 {
        3
    }
    pub fn retry_delay() -> u64 {
        2
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn open_library_url() -> String {
        "https://openlibrary.org".into()
    }
    pub fn covers_url() -> String {
        "https://covers.openlibrary.org".into()
    }
    pub fn romance_io_url() -> String {
        "https://www.romance.io".into()
    }
    pub fn google_books_url() -> String {
        "https://www.googleapis.com/books/v1".into()
    }

    // Store defaults
    pub fn csv_file() -> String {
        "book_mentions.csv".into()
    }
}
