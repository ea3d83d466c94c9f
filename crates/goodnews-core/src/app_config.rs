use std::path::PathBuf;
use std::str::FromStr;

use crate::ConfigError;

/// Selects the exclusion-pattern set and sentiment decision rule for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatingMode {
    /// Looser exclusions; lexicon hit OR positive polarity accepts.
    #[default]
    Trend,
    /// Stricter exclusions; polarity must clear the configured threshold.
    CuratedPositive,
}

impl std::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatingMode::Trend => write!(f, "trend"),
            OperatingMode::CuratedPositive => write!(f, "curated-positive"),
        }
    }
}

impl FromStr for OperatingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trend" => Ok(OperatingMode::Trend),
            "curated-positive" | "curated_positive" => Ok(OperatingMode::CuratedPositive),
            other => Err(format!(
                "unknown mode '{other}'; expected 'trend' or 'curated-positive'"
            )),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub google_api_key: String,
    pub search_engine_id: String,
    pub notion_api_key: String,
    pub notion_database_id: String,
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub mode: OperatingMode,
    pub daily_query_limit: u32,
    pub invocations_per_day: u32,
    pub queries_per_keyword: u32,
    pub max_results_per_keyword: usize,
    pub results_per_query: u32,
    pub inter_query_delay_secs: u64,
    pub search_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub min_content_length: usize,
    pub max_content_length: usize,
    pub recency_window_hours: u32,
    pub sentiment_threshold: f32,
    pub user_agent: String,
    pub notion_max_retries: u32,
    pub notion_retry_backoff_ms: u64,
    pub schedule: Option<String>,
}

impl AppConfig {
    /// Queries one invocation may spend: `daily_query_limit / invocations_per_day`,
    /// remainder discarded.
    #[must_use]
    pub fn per_invocation_allowance(&self) -> u32 {
        self.daily_query_limit
            .checked_div(self.invocations_per_day)
            .unwrap_or(0)
    }

    /// Cron expression for repeated invocations.
    ///
    /// Uses `GOODNEWS_SCHEDULE` when set, otherwise spreads
    /// `invocations_per_day` runs evenly across the day starting at 00:00 UTC.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] when no explicit schedule is set
    /// and `invocations_per_day` does not divide 24.
    pub fn cron_schedule(&self) -> Result<String, ConfigError> {
        if let Some(explicit) = &self.schedule {
            return Ok(explicit.clone());
        }
        let n = self.invocations_per_day;
        if n == 0 || n > 24 || 24 % n != 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: "GOODNEWS_INVOCATIONS_PER_DAY".to_string(),
                reason: format!(
                    "{n} runs/day cannot be spread evenly over 24h; set GOODNEWS_SCHEDULE explicitly"
                ),
            });
        }
        Ok(format!("0 0 */{} * * *", 24 / n))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("google_api_key", &"[redacted]")
            .field("search_engine_id", &self.search_engine_id)
            .field("notion_api_key", &"[redacted]")
            .field("notion_database_id", &self.notion_database_id)
            .field("log_level", &self.log_level)
            .field("catalog_path", &self.catalog_path)
            .field("mode", &self.mode)
            .field("daily_query_limit", &self.daily_query_limit)
            .field("invocations_per_day", &self.invocations_per_day)
            .field("queries_per_keyword", &self.queries_per_keyword)
            .field("max_results_per_keyword", &self.max_results_per_keyword)
            .field("results_per_query", &self.results_per_query)
            .field("inter_query_delay_secs", &self.inter_query_delay_secs)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("min_content_length", &self.min_content_length)
            .field("max_content_length", &self.max_content_length)
            .field("recency_window_hours", &self.recency_window_hours)
            .field("sentiment_threshold", &self.sentiment_threshold)
            .field("user_agent", &self.user_agent)
            .field("notion_max_retries", &self.notion_max_retries)
            .field("notion_retry_backoff_ms", &self.notion_retry_backoff_ms)
            .field("schedule", &self.schedule)
            .finish()
    }
}
