// src/source.rs

//! Item source seams.
//!
//! Platform adapters (discussion forum, social feed) live outside this
//! crate; the pipeline consumes their output through these traits. The
//! JSONL implementations read adapter-exported item files, one JSON
//! object per line.

use std::collections::{HashMap, VecDeque};
use std::io::{BufRead, BufReader};
use std::path::Path;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::SourceItem;

/// A lazy, finite, non-restartable sequence of platform items.
#[async_trait]
pub trait ItemSource: Send {
    /// Next item, or `None` when the sequence is exhausted.
    ///
    /// An `AppError::Auth` error is fatal to the whole run; any other
    /// error concerns only the current item.
    async fn next_item(&mut self) -> Result<Option<SourceItem>>;
}

/// Re-fetches original items by permalink for the double-check pass.
#[async_trait]
pub trait ItemFetcher: Send + Sync {
    /// Fetch the item behind a permalink, or `None` if it is gone.
    async fn fetch(&self, permalink: &str) -> Result<Option<SourceItem>>;
}

/// Item source over an adapter-exported JSONL file.
pub struct JsonlSource {
    lines: std::io::Lines<BufReader<std::fs::File>>,
}

impl JsonlSource {
    /// Open an item file for sequential reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
        })
    }
}

#[async_trait]
impl ItemSource for JsonlSource {
    async fn next_item(&mut self) -> Result<Option<SourceItem>> {
        for line in self.lines.by_ref() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let item: SourceItem = serde_json::from_str(&line)
                .map_err(|e| AppError::source("item file", e))?;
            return Ok(Some(item));
        }
        Ok(None)
    }
}

/// In-memory item source.
#[derive(Debug, Default)]
pub struct StaticSource {
    items: VecDeque<SourceItem>,
}

impl StaticSource {
    pub fn new(items: impl IntoIterator<Item = SourceItem>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ItemSource for StaticSource {
    async fn next_item(&mut self) -> Result<Option<SourceItem>> {
        Ok(self.items.pop_front())
    }
}

/// Permalink-keyed fetcher over an adapter-exported JSONL snapshot.
pub struct JsonlFetcher {
    by_permalink: HashMap<String, SourceItem>,
}

impl JsonlFetcher {
    /// Load and index an item file by permalink.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut by_permalink = HashMap::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let item: SourceItem = serde_json::from_str(&line)
                .map_err(|e| AppError::source("item file", e))?;
            by_permalink.insert(item.permalink.clone(), item);
        }
        Ok(Self { by_permalink })
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.by_permalink.len()
    }

    /// Whether the snapshot holds no items.
    pub fn is_empty(&self) -> bool {
        self.by_permalink.is_empty()
    }
}

#[async_trait]
impl ItemFetcher for JsonlFetcher {
    async fn fetch(&self, permalink: &str) -> Result<Option<SourceItem>> {
        Ok(self.by_permalink.get(permalink).cloned())
    }
}
