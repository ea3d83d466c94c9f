//! Google Custom Search JSON API client.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use super::{SearchProvider, SearchRequest};
use crate::error::CollectorError;
use crate::types::RawResult;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/";
const SEARCH_PATH: &str = "customsearch/v1";
const PROVIDER: &str = "google_custom_search";

/// Metatag keys consulted for the publication time, most specific first.
const PUBLISHED_KEYS: [&str; 4] = [
    "article:published_time",
    "og:updated_time",
    "datePublished",
    "date",
];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    display_link: Option<String>,
    pagemap: Option<PageMap>,
}

#[derive(Debug, Deserialize)]
struct PageMap {
    #[serde(default)]
    metatags: Vec<HashMap<String, serde_json::Value>>,
}

impl SearchItem {
    fn metatag(&self, key: &str) -> Option<String> {
        self.pagemap
            .as_ref()?
            .metatags
            .iter()
            .filter_map(|tags| tags.get(key).and_then(serde_json::Value::as_str))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(ToString::to_string)
    }

    fn into_raw_result(self) -> RawResult {
        let published_raw = PUBLISHED_KEYS.iter().find_map(|key| self.metatag(key));
        let publisher = self
            .metatag("og:site_name")
            .or_else(|| self.display_link.clone());
        RawResult {
            title: self.title,
            snippet: self.snippet,
            link: self.link,
            published_raw,
            publisher,
        }
    }
}

/// Date-sorted keyword search against a Programmable Search Engine.
///
/// Use [`GoogleSearchClient::new`] for production or
/// [`GoogleSearchClient::with_base_url`] to point at a mock server.
pub struct GoogleSearchClient {
    client: Client,
    api_key: String,
    engine_id: String,
    base_url: Url,
}

impl GoogleSearchClient {
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the `reqwest::Client` cannot be
    /// built.
    pub fn new(
        api_key: &str,
        engine_id: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CollectorError> {
        Self::with_base_url(api_key, engine_id, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the client cannot be built, or
    /// [`CollectorError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        engine_id: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, CollectorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .and_then(|base| base.join(SEARCH_PATH))
            .map_err(|e| CollectorError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            engine_id: engine_id.to_owned(),
            base_url,
        })
    }

    fn build_url(&self, request: &SearchRequest) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("cx", &self.engine_id)
            .append_pair("q", &request.keyword)
            .append_pair("num", &request.page_size.to_string())
            .append_pair("start", &request.start_index().to_string())
            .append_pair("sort", "date");
        url
    }
}

impl SearchProvider for GoogleSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawResult>, CollectorError> {
        let url = self.build_url(request);
        // The query string carries the API key; keep it out of errors and logs.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CollectorError::RateLimited {
                provider: PROVIDER.to_string(),
            });
        }
        if !status.is_success() {
            return Err(CollectorError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.base_url.to_string(),
            });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| CollectorError::Deserialize {
                context: format!("search(q={}, page={})", request.keyword, request.page),
                source: e,
            })?;

        tracing::debug!(
            keyword = %request.keyword,
            page = request.page,
            count = parsed.items.len(),
            "search page received"
        );

        Ok(parsed
            .items
            .into_iter()
            .map(SearchItem::into_raw_result)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GoogleSearchClient {
        GoogleSearchClient::with_base_url("test-key", "cx-1", 30, "goodnews-test", base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_carries_paging_and_date_sort() {
        let client = test_client("https://www.googleapis.com");
        let url = client.build_url(&SearchRequest {
            keyword: "ペット".to_string(),
            page: 2,
            page_size: 10,
        });
        assert_eq!(url.path(), "/customsearch/v1");
        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["key"], "test-key");
        assert_eq!(pairs["cx"], "cx-1");
        assert_eq!(pairs["q"], "ペット");
        assert_eq!(pairs["num"], "10");
        assert_eq!(pairs["start"], "11");
        assert_eq!(pairs["sort"], "date");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = GoogleSearchClient::with_base_url("k", "cx", 5, "ua", "not a url");
        assert!(matches!(result, Err(CollectorError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn item_metadata_maps_onto_raw_result() {
        let item: SearchItem = serde_json::from_value(serde_json::json!({
            "title": "Shelter finds homes for 100 dogs",
            "link": "https://news.example.com/a",
            "snippet": "A local shelter...",
            "displayLink": "news.example.com",
            "pagemap": {
                "metatags": [{
                    "og:updated_time": "2024-05-01T08:00:00Z",
                    "article:published_time": "2024-05-01T07:00:00Z",
                    "og:site_name": "Example News"
                }]
            }
        }))
        .unwrap();
        let raw = item.into_raw_result();
        assert_eq!(raw.published_raw.as_deref(), Some("2024-05-01T07:00:00Z"));
        assert_eq!(raw.publisher.as_deref(), Some("Example News"));
    }

    #[test]
    fn display_link_is_publisher_fallback_and_missing_date_is_none() {
        let item: SearchItem = serde_json::from_value(serde_json::json!({
            "title": "t",
            "link": "https://news.example.com/b",
            "snippet": "s",
            "displayLink": "news.example.com"
        }))
        .unwrap();
        let raw = item.into_raw_result();
        assert!(raw.published_raw.is_none());
        assert_eq!(raw.publisher.as_deref(), Some("news.example.com"));
    }
}
