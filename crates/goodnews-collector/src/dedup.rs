//! Within-invocation deduplication keyed on canonical article links.

use std::collections::HashSet;

use reqwest::Url;

const TRACKING_PARAMS: [&str; 4] = ["fbclid", "gclid", "ocid", "ref"];

/// Canonical form of an article link, or `None` if it is not an http(s) URL.
///
/// Drops the fragment, tracking query parameters (`utm_*` and a few click
/// ids) and a trailing path slash, so the same article reached through
/// different search results maps to one key.
#[must_use]
pub fn canonicalize_url(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }

    url.set_fragment(None);

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| {
            let key: &str = k;
            !key.starts_with("utm_") && !TRACKING_PARAMS.contains(&key)
        })
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(path.trim_end_matches('/'));
    }

    Some(url.to_string())
}

/// Canonical links observed during one invocation.
///
/// Never persisted; every invocation starts with an empty set.
#[derive(Debug, Default, Clone)]
pub struct SeenSet {
    urls: HashSet<String>,
}

impl SeenSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn seen_before(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn mark_seen(&mut self, url: &str) {
        self.urls.insert(url.to_string());
    }

    /// Check and mark in one step. Returns `true` if `url` was new.
    pub fn check_and_mark(&mut self, url: &str) -> bool {
        if self.seen_before(url) {
            return false;
        }
        self.mark_seen(url);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
