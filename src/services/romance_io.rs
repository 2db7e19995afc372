// src/services/romance_io.rs

//! Community catalog lookup by scraping the romance.io search page.
//!
//! Best effort: a single attempt, and any failure yields `None`.

use scraper::{Html, Selector};
use url::Url;

use crate::error::Result;
use crate::models::ResolverConfig;
use crate::services::resolver::ResolvedBook;
use crate::utils::http::fetch_text;

/// Look up a title/author pair on the community catalog.
///
/// Returns a minimal record carrying only the catalog entry URL: ISBN,
/// tags and cover are explicitly absent, not guessed.
pub async fn lookup(
    client: &reqwest::Client,
    config: &ResolverConfig,
    title: &str,
    author: &str,
) -> Option<ResolvedBook> {
    match try_lookup(client, config, title, author).await {
        Ok(result) => result,
        Err(e) => {
            log::warn!("Romance.io lookup failed for {} by {}: {}", title, author, e);
            None
        }
    }
}

async fn try_lookup(
    client: &reqwest::Client,
    config: &ResolverConfig,
    title: &str,
    author: &str,
) -> Result<Option<ResolvedBook>> {
    let query = urlencoding::encode(&format!("{} {}", title, author)).into_owned();
    let url = format!("{}/books?search={}", config.romance_io_url, query);
    let body = fetch_text(client, &url).await?;

    let Some(href) = first_entry_href(&body) else {
        return Ok(None);
    };
    let base = Url::parse(&config.romance_io_url)?;
    let mut book = ResolvedBook::minimal(title, author.to_string());
    book.romance_io_url = base
        .join(&href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.clone());
    Ok(Some(book))
}

/// Href of the first catalog-entry link on the result page.
fn first_entry_href(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a.book-link").expect("valid selector");
    document
        .select(&selector)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(str::to_string)
}
