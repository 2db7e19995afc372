// src/services/open_library.rs

//! Primary catalog lookup against the Open Library search API.

use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::models::ResolverConfig;
use crate::services::resolver::ResolvedBook;
use crate::utils::http::fetch_text;

/// Subset of the search response we consume.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize, Default)]
struct SearchDoc {
    #[serde(default)]
    title: String,

    #[serde(default)]
    author_name: Vec<String>,

    #[serde(default)]
    subject: Vec<String>,

    #[serde(default)]
    cover_i: Option<i64>,

    #[serde(default)]
    isbn: Vec<String>,
}

/// Look up a title/author pair, retrying on transport or parse failure.
///
/// Retries up to `config.retries` attempts with a fixed delay between
/// them, then logs the failure and yields `None`. Errors never escape
/// this boundary.
pub async fn lookup_with_retry(
    client: &reqwest::Client,
    config: &ResolverConfig,
    title: &str,
    author: &str,
) -> Option<ResolvedBook> {
    let attempts = config.retries.max(1);
    for attempt in 1..=attempts {
        match lookup(client, config, title, author).await {
            Ok(result) => return result,
            Err(e) if attempt < attempts => {
                log::debug!(
                    "Open Library attempt {}/{} failed for {} by {}: {}",
                    attempt,
                    attempts,
                    title,
                    author,
                    e
                );
                tokio::time::sleep(Duration::from_secs(config.retry_delay_secs)).await;
            }
            Err(e) => {
                log::error!("Open Library lookup failed for {} by {}: {}", title, author, e);
            }
        }
    }
    None
}

/// Single search attempt. `Ok(None)` means the catalog had no match;
/// `Err` means the attempt itself failed and may be retried.
async fn lookup(
    client: &reqwest::Client,
    config: &ResolverConfig,
    title: &str,
    author: &str,
) -> Result<Option<ResolvedBook>> {
    let url = format!(
        "{}/search.json?title={}&author={}",
        config.open_library_url,
        urlencoding::encode(title),
        urlencoding::encode(author)
    );
    let body = fetch_text(client, &url).await?;
    let response: SearchResponse = serde_json::from_str(&body)?;
    if response.docs.is_empty() {
        return Ok(None);
    }

    let doc = select_doc(&response.docs, title, author);
    Ok(Some(to_book(doc, config, title, author)))
}

/// Pick the first candidate whose title contains the query title and
/// whose combined author field contains the query author; fall back to
/// the first candidate when none match both.
fn select_doc<'a>(docs: &'a [SearchDoc], title: &str, author: &str) -> &'a SearchDoc {
    let title_lower = title.to_lowercase();
    let author_lower = author.to_lowercase();
    docs.iter()
        .find(|d| {
            d.title.to_lowercase().contains(&title_lower)
                && d.author_name.join(" ").to_lowercase().contains(&author_lower)
        })
        .unwrap_or(&docs[0])
}

fn to_book(doc: &SearchDoc, config: &ResolverConfig, title: &str, author: &str) -> ResolvedBook {
    let mut book = ResolvedBook::minimal(
        if doc.title.is_empty() { title } else { &doc.title },
        if doc.author_name.is_empty() {
            author.to_string()
        } else {
            doc.author_name.join(", ")
        },
    );
    book.tags = doc.subject.iter().take(10).cloned().collect();
    if let Some(cover_id) = doc.cover_i {
        book.cover_url = format!("{}/b/id/{}-L.jpg", config.covers_url, cover_id);
    }
    book.isbn13 = pick_isbn(&doc.isbn);
    book
}

/// Prefer a 13-digit ISBN, then a 10-digit one, then any identifier,
/// then the "N/A" sentinel.
fn pick_isbn(isbns: &[String]) -> String {
    isbns
        .iter()
        .find(|i| i.len() == 13)
        .or_else(|| isbns.iter().find(|i| i.len() == 10))
        .or_else(|| isbns.first())
        .cloned()
        .unwrap_or_else(|| "N/A".to_string())
}
