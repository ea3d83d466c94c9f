use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {provider}")]
    RateLimited { provider: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid exclusion pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl CollectorError {
    /// Whether this failure means further queries this invocation are pointless.
    ///
    /// Quota and credential rejections will repeat for every keyword; anything
    /// else only costs the call that failed.
    #[must_use]
    pub fn ends_run(&self) -> bool {
        match self {
            CollectorError::RateLimited { .. } => true,
            CollectorError::UnexpectedStatus { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }
}
