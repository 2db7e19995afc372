// src/models/item.rs

//! Normalized platform item.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// A single text-bearing item delivered by a platform adapter.
///
/// Both adapters (discussion forum and social feed) hand items over in
/// this one shape, so the pipeline never probes for platform-specific
/// attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceItem {
    /// Full text content (post body, comment body, or feed post text)
    pub text: String,

    /// Handle of the posting account
    pub author_handle: String,

    /// Creation time as epoch seconds, if the platform exposes one
    #[serde(default)]
    pub created_utc: Option<i64>,

    /// Permanent URL of the item
    pub permalink: String,

    /// Platform grouping tag (subreddit or feed name)
    pub platform_tag: String,
}

impl SourceItem {
    /// Creation time as an ISO 8601 date string, empty when unknown.
    pub fn created_date(&self) -> String {
        self.created_utc
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_default()
    }

    /// Creation time as a raw epoch string, empty when unknown.
    pub fn created_utc_string(&self) -> String {
        self.created_utc.map(|s| s.to_string()).unwrap_or_default()
    }
}
