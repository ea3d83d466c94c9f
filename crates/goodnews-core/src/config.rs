use crate::app_config::{AppConfig, OperatingMode};
use crate::ConfigError;

/// Longest accepted recency window: one year.
const MAX_RECENCY_WINDOW_HOURS: u32 = 24 * 366;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
#[allow(clippy::too_many_lines)]
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let google_api_key = require("GOOGLE_API_KEY")?;
    let search_engine_id = require("SEARCH_ENGINE_ID")?;
    let notion_api_key = require("NOTION_API_KEY")?;
    let notion_database_id = require("NOTION_DATABASE_ID")?;

    let log_level = or_default("GOODNEWS_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default(
        "GOODNEWS_CATALOG_PATH",
        "./config/catalog.yaml",
    ));
    let mode: OperatingMode = parse_as("GOODNEWS_MODE", &or_default("GOODNEWS_MODE", "trend"))?;

    let daily_query_limit: u32 = parse_as(
        "GOODNEWS_DAILY_QUERY_LIMIT",
        &or_default("GOODNEWS_DAILY_QUERY_LIMIT", "75"),
    )?;
    let invocations_per_day: u32 = parse_as(
        "GOODNEWS_INVOCATIONS_PER_DAY",
        &or_default("GOODNEWS_INVOCATIONS_PER_DAY", "6"),
    )?;
    if invocations_per_day == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "GOODNEWS_INVOCATIONS_PER_DAY".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let queries_per_keyword: u32 = parse_as(
        "GOODNEWS_QUERIES_PER_KEYWORD",
        &or_default("GOODNEWS_QUERIES_PER_KEYWORD", "3"),
    )?;
    let max_results_per_keyword: usize = parse_as(
        "GOODNEWS_MAX_RESULTS_PER_KEYWORD",
        &or_default("GOODNEWS_MAX_RESULTS_PER_KEYWORD", "5"),
    )?;
    // The provider caps page size at 10.
    let results_per_query: u32 = parse_as::<u32>(
        "GOODNEWS_RESULTS_PER_QUERY",
        &or_default("GOODNEWS_RESULTS_PER_QUERY", "10"),
    )?
    .clamp(1, 10);

    let inter_query_delay_secs: u64 = parse_as(
        "GOODNEWS_INTER_QUERY_DELAY_SECS",
        &or_default("GOODNEWS_INTER_QUERY_DELAY_SECS", "2"),
    )?;
    let search_timeout_secs: u64 = parse_as(
        "GOODNEWS_SEARCH_TIMEOUT_SECS",
        &or_default("GOODNEWS_SEARCH_TIMEOUT_SECS", "30"),
    )?;
    let fetch_timeout_secs: u64 = parse_as(
        "GOODNEWS_FETCH_TIMEOUT_SECS",
        &or_default("GOODNEWS_FETCH_TIMEOUT_SECS", "10"),
    )?;

    let min_content_length: usize = parse_as(
        "GOODNEWS_MIN_CONTENT_LENGTH",
        &or_default("GOODNEWS_MIN_CONTENT_LENGTH", "80"),
    )?;
    let max_content_length: usize = parse_as(
        "GOODNEWS_MAX_CONTENT_LENGTH",
        &or_default("GOODNEWS_MAX_CONTENT_LENGTH", "2000"),
    )?;
    if min_content_length > max_content_length {
        return Err(ConfigError::InvalidEnvVar {
            var: "GOODNEWS_MIN_CONTENT_LENGTH".to_string(),
            reason: format!(
                "minimum ({min_content_length}) exceeds maximum ({max_content_length})"
            ),
        });
    }

    let recency_window_hours: u32 = parse_as(
        "GOODNEWS_RECENCY_WINDOW_HOURS",
        &or_default("GOODNEWS_RECENCY_WINDOW_HOURS", "24"),
    )?;
    if recency_window_hours == 0 || recency_window_hours > MAX_RECENCY_WINDOW_HOURS {
        return Err(ConfigError::InvalidEnvVar {
            var: "GOODNEWS_RECENCY_WINDOW_HOURS".to_string(),
            reason: format!(
                "{recency_window_hours} is outside 1..={MAX_RECENCY_WINDOW_HOURS} hours"
            ),
        });
    }
    let sentiment_threshold: f32 = parse_as(
        "GOODNEWS_SENTIMENT_THRESHOLD",
        &or_default("GOODNEWS_SENTIMENT_THRESHOLD", "0.6"),
    )?;
    if !(-1.0..=1.0).contains(&sentiment_threshold) {
        return Err(ConfigError::InvalidEnvVar {
            var: "GOODNEWS_SENTIMENT_THRESHOLD".to_string(),
            reason: format!("{sentiment_threshold} is outside [-1.0, 1.0]"),
        });
    }

    let user_agent = or_default("GOODNEWS_USER_AGENT", "goodnews/0.1 (+news-digest)");
    let notion_max_retries: u32 = parse_as(
        "GOODNEWS_NOTION_MAX_RETRIES",
        &or_default("GOODNEWS_NOTION_MAX_RETRIES", "2"),
    )?;
    let notion_retry_backoff_ms: u64 = parse_as(
        "GOODNEWS_NOTION_RETRY_BACKOFF_MS",
        &or_default("GOODNEWS_NOTION_RETRY_BACKOFF_MS", "500"),
    )?;
    let schedule = lookup("GOODNEWS_SCHEDULE")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(AppConfig {
        google_api_key,
        search_engine_id,
        notion_api_key,
        notion_database_id,
        log_level,
        catalog_path,
        mode,
        daily_query_limit,
        invocations_per_day,
        queries_per_keyword,
        max_results_per_keyword,
        results_per_query,
        inter_query_delay_secs,
        search_timeout_secs,
        fetch_timeout_secs,
        min_content_length,
        max_content_length,
        recency_window_hours,
        sentiment_threshold,
        user_agent,
        notion_max_retries,
        notion_retry_backoff_ms,
        schedule,
    })
}

fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
