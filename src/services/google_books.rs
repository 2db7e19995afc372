// src/services/google_books.rs

//! Secondary catalog lookup against the Google Books volumes API.
//!
//! Best effort: a single attempt, and any failure yields `None`.

use serde::Deserialize;

use crate::error::Result;
use crate::models::ResolverConfig;
use crate::services::resolver::ResolvedBook;
use crate::utils::http::fetch_text;

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize, Default)]
struct VolumeInfo {
    #[serde(default)]
    title: String,

    #[serde(default)]
    authors: Vec<String>,

    #[serde(default)]
    categories: Vec<String>,

    #[serde(default, rename = "imageLinks")]
    image_links: ImageLinks,

    #[serde(default, rename = "industryIdentifiers")]
    industry_identifiers: Vec<IndustryIdentifier>,

    #[serde(default, rename = "infoLink")]
    info_link: String,
}

#[derive(Debug, Deserialize, Default)]
struct ImageLinks {
    #[serde(default)]
    thumbnail: String,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

/// Look up a title/author pair and normalize the first result item.
pub async fn lookup(
    client: &reqwest::Client,
    config: &ResolverConfig,
    title: &str,
    author: &str,
) -> Option<ResolvedBook> {
    match try_lookup(client, config, title, author).await {
        Ok(result) => result,
        Err(e) => {
            log::warn!(
                "Google Books lookup failed for {} by {}: {}",
                title,
                author,
                e
            );
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
    let query = urlencoding::encode(&format!("intitle:{} inauthor:{}", title, author)).into_owned();
    let url = format!(
        "{}/volumes?q={}&maxResults=1",
        config.google_books_url, query
    );
    let body = fetch_text(client, &url).await?;
    let response: VolumesResponse = serde_json::from_str(&body)?;

    let Some(volume) = response.items.into_iter().next() else {
        return Ok(None);
    };
    Ok(Some(to_book(volume.volume_info, title, author)))
}

fn to_book(info: VolumeInfo, title: &str, author: &str) -> ResolvedBook {
    let mut book = ResolvedBook::minimal(
        if info.title.is_empty() { title } else { &info.title },
        if info.authors.is_empty() {
            author.to_string()
        } else {
            info.authors.join(", ")
        },
    );
    book.isbn13 = info
        .industry_identifiers
        .iter()
        .find(|id| id.kind == "ISBN_13")
        .map(|id| id.identifier.clone())
        .unwrap_or_else(|| "N/A".to_string());
    book.tags = info.categories;
    if !info.image_links.thumbnail.is_empty() {
        book.cover_url = info.image_links.thumbnail;
    }
    book.google_books_url = info.info_link;
    book
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::http::create_client;

    fn test_config(base: &str) -> ResolverConfig {
        ResolverConfig {
            google_books_url: base.to_string(),
            ..ResolverConfig::default()
        }
    }

    #[tokio::test]
    async fn lookup_normalizes_first_item() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "items": [{
                "volumeInfo": {
                    "title": "Red, White & Royal Blue",
                    "authors": ["Casey McQuiston"],
                    "categories": ["Fiction", "Romance"],
                    "imageLinks": {"thumbnail": "https://books.example/cover.jpg"},
                    "industryIdentifiers": [
                        {"type": "ISBN_10", "identifier": "1250316774"},
                        {"type": "ISBN_13", "identifier": "9781250316776"}
                    ],
                    "infoLink": "https://books.example/info"
                }
            }]
        });
        let mock = server
            .mock("GET", "/volumes")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = create_client("test", 5).unwrap();
        let config = test_config(&server.url());
        let book = lookup(&client, &config, "Red, White & Royal Blue", "Casey McQuiston")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(book.title, "Red, White & Royal Blue");
        assert_eq!(book.author, "Casey McQuiston");
        assert_eq!(book.isbn13, "9781250316776");
        assert_eq!(book.tags, vec!["Fiction", "Romance"]);
        assert_eq!(book.cover_url, "https://books.example/cover.jpg");
        assert_eq!(book.google_books_url, "https://books.example/info");
    }

    #[tokio::test]
    async fn missing_isbn13_uses_sentinel() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "items": [{"volumeInfo": {"title": "T", "authors": ["A"]}}]
        });
        server
            .mock("GET", "/volumes")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = create_client("test", 5).unwrap();
        let config = test_config(&server.url());
        let book = lookup(&client, &config, "T", "A").await.unwrap();
        assert_eq!(book.isbn13, "N/A");
        assert_eq!(book.cover_url, "N/A");
    }

    #[tokio::test]
    async fn empty_items_yield_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/volumes")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let client = create_client("test", 5).unwrap();
        let config = test_config(&server.url());
        assert!(lookup(&client, &config, "T", "A").await.is_none());
    }
}
