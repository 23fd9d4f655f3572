use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Proxy, StatusCode};
use serde::Deserialize;
use url::Url;

use super::models::ItemRecord;
use super::term::SearchTerm;
use crate::config::AppConfig;
use crate::http::read_body_capped;
use crate::{Error, Result};

const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
const MAX_RETRIES: u32 = 3;
const INITIAL_RETRY_DELAY_MS: u64 = 500;
const SEARCH_FIELDS: &str = "key,title,author_name,cover_i,isbn";
const CLIENT_USER_AGENT: &str = concat!("bookreel/", env!("CARGO_PKG_VERSION"));

/// Source of book records for a search term
#[async_trait]
pub trait BookSearch: Send + Sync {
    async fn search(&self, term: &SearchTerm) -> Result<Vec<ItemRecord>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    #[serde(default)]
    cover_i: Option<u64>,
    #[serde(default)]
    isbn: Vec<String>,
}

impl From<SearchDoc> for ItemRecord {
    fn from(doc: SearchDoc) -> Self {
        Self {
            author: doc.author_name,
            title: doc.title.unwrap_or_default(),
            cover_id: doc.cover_i,
            isbn: doc.isbn,
            link_key: doc.key.filter(|k| !k.is_empty()),
        }
    }
}

/// Turn a raw search.json body into item records, preserving API order
pub fn normalize_response(body: &[u8]) -> Result<Vec<ItemRecord>> {
    let response: SearchResponse = serde_json::from_slice(body)?;
    Ok(response.docs.into_iter().map(ItemRecord::from).collect())
}

/// Open Library search.json client
pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
    limit: usize,
}

impl OpenLibraryClient {
    /// Create a client from configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Self::build_client(config.search.request_timeout_secs, &config.search.proxy_url)?;

        Ok(Self {
            client,
            base_url: config.search.base_url.clone(),
            limit: config.search.result_limit.max(1),
        })
    }

    /// Build HTTP client with optional proxy
    fn build_client(timeout_secs: u64, proxy_url: &Option<String>) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(ref proxy) = proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for book search");
        }

        builder.build().map_err(Error::Http)
    }

    /// Build the search URL for a term
    pub fn search_url(&self, term: &SearchTerm) -> Result<Url> {
        let base = self.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/search.json", base))?;
        url.query_pairs_mut()
            .append_pair("q", term.as_str())
            .append_pair("limit", &self.limit.to_string())
            .append_pair("fields", SEARCH_FIELDS);
        Ok(url)
    }

    /// GET with retry and exponential backoff
    async fn fetch_with_retry(&self, url: &Url) -> Result<(StatusCode, Bytes)> {
        let mut last_error = None;
        let mut delay_ms = INITIAL_RETRY_DELAY_MS;

        for attempt in 0..MAX_RETRIES {
            tracing::debug!("Search attempt {} for {}", attempt + 1, url);

            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS
                        || status == StatusCode::SERVICE_UNAVAILABLE
                    {
                        tracing::warn!("Received {} for {}, retrying after {}ms...", status, url, delay_ms);
                        last_error = Some(Error::Search(format!("HTTP {} for URL: {}", status, url)));
                    } else {
                        match read_body_capped(response, MAX_RESPONSE_BYTES).await {
                            Ok(bytes) => return Ok((status, bytes)),
                            Err(Error::Http(e)) => {
                                tracing::warn!("Failed to read search response: {}", e);
                                last_error = Some(Error::Http(e));
                            }
                            Err(e) => return Err(e),
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Search request failed (attempt {}): {}", attempt + 1, e);
                    last_error = Some(Error::Http(e));
                }
            }

            if attempt < MAX_RETRIES - 1 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                delay_ms *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::Search(format!("Search failed after {} retries: {}", MAX_RETRIES, url))
        }))
    }
}

#[async_trait]
impl BookSearch for OpenLibraryClient {
    async fn search(&self, term: &SearchTerm) -> Result<Vec<ItemRecord>> {
        let url = self.search_url(term)?;
        tracing::info!("Searching books for \"{}\"", term);

        let (status, body) = self.fetch_with_retry(&url).await?;

        if !status.is_success() {
            return Err(Error::Search(format!("HTTP {} for URL: {}", status, url)));
        }

        let items = normalize_response(&body)?;
        tracing::info!("Search for \"{}\" returned {} books", term, items.len());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "numFound": 3,
        "start": 0,
        "docs": [
            {
                "key": "/works/OL27448W",
                "title": "The Lord of the Rings",
                "author_name": ["J.R.R. Tolkien"],
                "cover_i": 9255566,
                "isbn": ["9780618640157", "0618640150"]
            },
            {
                "key": "/works/OL1W",
                "title": "Untitled Notes",
                "isbn": ["0000000000"]
            },
            {
                "author_name": ["Anonymous"]
            }
        ]
    }"#;

    #[test]
    fn test_normalize_maps_fields_in_order() {
        let items = normalize_response(FIXTURE.as_bytes()).unwrap();
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].title, "The Lord of the Rings");
        assert_eq!(items[0].author, vec!["J.R.R. Tolkien".to_string()]);
        assert_eq!(items[0].cover_id, Some(9255566));
        assert_eq!(items[0].first_isbn(), Some("9780618640157"));
        assert_eq!(items[0].link_key.as_deref(), Some("/works/OL27448W"));

        assert!(items[1].author.is_empty());
        assert_eq!(items[1].cover_id, None);

        assert_eq!(items[2].title, "");
        assert_eq!(items[2].link_key, None);
    }

    #[test]
    fn test_normalize_empty_and_invalid() {
        assert!(normalize_response(br#"{"numFound":0}"#).unwrap().is_empty());
        assert!(matches!(normalize_response(b"<html>"), Err(Error::Json(_))));
    }

    #[test]
    fn test_search_url_encodes_term() {
        let client = OpenLibraryClient::new(&AppConfig::default()).unwrap();
        let term = SearchTerm::typed("war & peace").unwrap();
        let url = client.search_url(&term).unwrap();

        assert_eq!(url.path(), "/search.json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".to_string(), "war & peace".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "20".to_string())));
        assert!(pairs.contains(&("fields".to_string(), SEARCH_FIELDS.to_string())));
    }
}
