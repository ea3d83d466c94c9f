//! Article page fetching and main-text extraction.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::CollectorError;

/// Sub-trees never read as article text.
const STRIPPED: [&str; 6] = ["script", "style", "nav", "header", "footer", "noscript"];

/// Elements after which a word boundary is forced when collecting text.
const BLOCKS: [&str; 16] = [
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "section",
    "article", "blockquote", "td",
];

/// Candidate containers for the main content region.
const REGIONS: &str = "article, main, section, div, body";

/// Retrieves raw page markup.
pub trait PageFetcher {
    /// Fetch `url`, giving up after `timeout`.
    fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, CollectorError>> + Send;
}

/// [`PageFetcher`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the client cannot be built.
    pub fn new(user_agent: &str) -> Result<Self, CollectorError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, CollectorError> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Fetches a page and reduces it to clean, bounded article text.
#[derive(Debug, Clone)]
pub struct ContentExtractor<F> {
    fetcher: F,
    timeout: Duration,
    max_len: usize,
}

impl<F: PageFetcher> ContentExtractor<F> {
    pub fn new(fetcher: F, timeout: Duration, max_len: usize) -> Self {
        Self {
            fetcher,
            timeout,
            max_len,
        }
    }

    /// Article text for `url`, or `None` when the page cannot be fetched or
    /// yields no text. Fetch failures are logged, never returned.
    pub async fn extract(&self, url: &str) -> Option<String> {
        match self.fetcher.fetch(url, self.timeout).await {
            Ok(html) => extract_from_html(&html, self.max_len),
            Err(e) => {
                tracing::debug!(url, error = %e, "page fetch failed");
                None
            }
        }
    }
}

/// Pure extraction step over already-fetched markup.
///
/// Prefers the page's short description (`og:description`, then
/// `<meta name="description">`). Otherwise reads the container with the most
/// paragraph text, skipping script, style and navigation chrome. The result
/// is whitespace-normalized and cut to `max_len` characters.
#[must_use]
pub fn extract_from_html(html: &str, max_len: usize) -> Option<String> {
    let document = Html::parse_document(html);

    let raw = match meta_description(&document) {
        Some(description) => description,
        None => {
            let region = main_region(&document)?;
            let mut text = String::new();
            collect_text(region, &mut text);
            text
        }
    };

    let normalized = normalize_whitespace(&raw);
    if normalized.is_empty() {
        return None;
    }
    Some(normalized.chars().take(max_len).collect())
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn meta_description(document: &Html) -> Option<String> {
    for css in [
        r#"meta[property="og:description"]"#,
        r#"meta[name="description"]"#,
    ] {
        let Some(sel) = selector(css) else {
            continue;
        };
        let found = document
            .select(&sel)
            .filter_map(|el| el.value().attr("content"))
            .find(|content| !content.trim().is_empty());
        if let Some(content) = found {
            return Some(content.to_string());
        }
    }
    None
}

fn is_stripped(element: &ElementRef<'_>) -> bool {
    STRIPPED.contains(&element.value().name())
}

fn inside_stripped(element: &ElementRef<'_>) -> bool {
    is_stripped(element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| is_stripped(&ancestor))
}

/// Characters of text in the element's direct `<p>` children.
fn paragraph_weight(element: &ElementRef<'_>) -> usize {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "p")
        .map(|p| p.text().map(|t| t.trim().chars().count()).sum::<usize>())
        .sum()
}

fn main_region(document: &Html) -> Option<ElementRef<'_>> {
    let regions = selector(REGIONS)?;
    let mut best: Option<(ElementRef<'_>, usize)> = None;
    for element in document.select(&regions) {
        if inside_stripped(&element) {
            continue;
        }
        let weight = paragraph_weight(&element);
        if weight > 0 && best.is_none_or(|(_, w)| weight > w) {
            best = Some((element, weight));
        }
    }
    if let Some((element, _)) = best {
        return Some(element);
    }
    document.select(&selector("body")?).next()
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if is_stripped(&child_element) {
                continue;
            }
            collect_text(child_element, out);
            if BLOCKS.contains(&child_element.value().name()) {
                out.push(' ');
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
