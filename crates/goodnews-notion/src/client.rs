//! HTTP client for creating pages in a Notion database.

use std::time::Duration;

use goodnews_collector::{ArticleSink, CandidateArticle, Sentiment};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::NotionError;
use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://api.notion.com/";
const NOTION_VERSION: &str = "2022-06-28";

/// Notion rejects rich-text segments longer than this.
const RICH_TEXT_LIMIT: usize = 2000;

/// Select option written for articles accepted by the lexicon-or-polarity rule.
pub const POSITIVE_LABEL: &str = "ポジティブ";

#[derive(Debug, Deserialize)]
struct CreatedPage {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Client for the Notion pages API, bound to one target database.
///
/// Use [`NotionClient::new`] for production or [`NotionClient::with_base_url`]
/// to point at a mock server in tests.
pub struct NotionClient {
    client: Client,
    api_key: String,
    database_id: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NotionClient {
    /// # Errors
    ///
    /// Returns [`NotionError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        api_key: &str,
        database_id: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, NotionError> {
        Self::with_base_url(
            api_key,
            database_id,
            timeout_secs,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// # Errors
    ///
    /// Returns [`NotionError::Http`] if the client cannot be built, or
    /// [`NotionError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        database_id: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, NotionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("goodnews/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .and_then(|base| base.join("v1/pages"))
            .map_err(|e| NotionError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            database_id: database_id.to_owned(),
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Create one database page for `article`, returning the new page id.
    ///
    /// Transient failures are retried with jittered exponential back-off.
    ///
    /// # Errors
    ///
    /// - [`NotionError::Api`] if Notion rejects the page.
    /// - [`NotionError::Http`] on network failure after all retries.
    /// - [`NotionError::Deserialize`] if the success body is not a page object.
    pub async fn create_page(&self, article: &CandidateArticle) -> Result<String, NotionError> {
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": page_properties(article),
        });
        let page = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.post_page(&body)
        })
        .await?;
        tracing::debug!(page_id = %page.id, link = %article.link, "Notion page created");
        Ok(page.id)
    }

    async fn post_page(&self, body: &Value) -> Result<CreatedPage, NotionError> {
        let response = self
            .client
            .post(self.base_url.clone())
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|e| e.message)
                .unwrap_or(text);
            return Err(NotionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| NotionError::Deserialize {
            context: "create page".to_string(),
            source: e,
        })
    }
}

impl ArticleSink for NotionClient {
    type Error = NotionError;

    async fn save(&self, article: &CandidateArticle) -> Result<(), NotionError> {
        self.create_page(article).await.map(|_| ())
    }
}

/// Database properties for `article`.
///
/// The description is the search snippet, or the extracted content when the
/// snippet is blank, cut to Notion's rich-text limit.
#[must_use]
pub fn page_properties(article: &CandidateArticle) -> Value {
    let description = if article.snippet.trim().is_empty() {
        &article.content
    } else {
        &article.snippet
    };
    let sentiment = match article.sentiment {
        Sentiment::Positive => POSITIVE_LABEL.to_string(),
        Sentiment::Score(score) => format!("{score:.2}"),
    };

    json!({
        "Title": { "title": [text_segment(&article.title)] },
        "URL": { "url": article.link },
        "Description": { "rich_text": [text_segment(description)] },
        "PublishedAt": { "date": { "start": article.published_at.to_rfc3339() } },
        "Sentiment": { "select": { "name": sentiment } },
        "Publisher": {
            "rich_text": article
                .publisher
                .as_deref()
                .map(text_segment)
                .into_iter()
                .collect::<Vec<_>>()
        },
    })
}

fn text_segment(content: &str) -> Value {
    let truncated: String = content.chars().take(RICH_TEXT_LIMIT).collect();
    json!({ "text": { "content": truncated } })
}
