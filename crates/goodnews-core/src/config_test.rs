use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GOOGLE_API_KEY", "test-google-key");
    m.insert("SEARCH_ENGINE_ID", "test-cx");
    m.insert("NOTION_API_KEY", "secret_test");
    m.insert("NOTION_DATABASE_ID", "db-123");
    m
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.mode, OperatingMode::Trend);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.daily_query_limit, 75);
    assert_eq!(cfg.invocations_per_day, 6);
    assert_eq!(cfg.per_invocation_allowance(), 12);
    assert_eq!(cfg.queries_per_keyword, 3);
    assert_eq!(cfg.max_results_per_keyword, 5);
    assert_eq!(cfg.results_per_query, 10);
    assert_eq!(cfg.inter_query_delay_secs, 2);
    assert_eq!(cfg.fetch_timeout_secs, 10);
    assert_eq!(cfg.min_content_length, 80);
    assert_eq!(cfg.max_content_length, 2000);
    assert_eq!(cfg.recency_window_hours, 24);
    assert!((cfg.sentiment_threshold - 0.6).abs() < f32::EPSILON);
    assert!(cfg.schedule.is_none());
}

#[test]
fn build_app_config_fails_without_each_credential() {
    for var in [
        "GOOGLE_API_KEY",
        "SEARCH_ENGINE_ID",
        "NOTION_API_KEY",
        "NOTION_DATABASE_ID",
    ] {
        let mut map = full_env();
        map.remove(var);
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == var),
            "expected MissingEnvVar({var}), got: {result:?}"
        );
    }
}

#[test]
fn blank_credential_counts_as_missing() {
    let mut map = full_env();
    map.insert("NOTION_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "NOTION_API_KEY"),
        "got: {result:?}"
    );
}

#[test]
fn mode_curated_positive_is_parsed() {
    let mut map = full_env();
    map.insert("GOODNEWS_MODE", "curated-positive");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.mode, OperatingMode::CuratedPositive);
}

#[test]
fn unknown_mode_is_rejected() {
    let mut map = full_env();
    map.insert("GOODNEWS_MODE", "everything");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GOODNEWS_MODE"),
        "got: {result:?}"
    );
}

#[test]
fn zero_invocations_per_day_is_rejected() {
    let mut map = full_env();
    map.insert("GOODNEWS_INVOCATIONS_PER_DAY", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GOODNEWS_INVOCATIONS_PER_DAY"),
        "got: {result:?}"
    );
}

#[test]
fn allowance_discards_remainder() {
    let mut map = full_env();
    map.insert("GOODNEWS_DAILY_QUERY_LIMIT", "10");
    map.insert("GOODNEWS_INVOCATIONS_PER_DAY", "4");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.per_invocation_allowance(), 2);
}

#[test]
fn non_numeric_limit_is_rejected() {
    let mut map = full_env();
    map.insert("GOODNEWS_DAILY_QUERY_LIMIT", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GOODNEWS_DAILY_QUERY_LIMIT"),
        "got: {result:?}"
    );
}

#[test]
fn min_content_length_above_max_is_rejected() {
    let mut map = full_env();
    map.insert("GOODNEWS_MIN_CONTENT_LENGTH", "500");
    map.insert("GOODNEWS_MAX_CONTENT_LENGTH", "400");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GOODNEWS_MIN_CONTENT_LENGTH"),
        "got: {result:?}"
    );
}

#[test]
fn threshold_outside_unit_range_is_rejected() {
    let mut map = full_env();
    map.insert("GOODNEWS_SENTIMENT_THRESHOLD", "1.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GOODNEWS_SENTIMENT_THRESHOLD"),
        "got: {result:?}"
    );
}

#[test]
fn recency_window_outside_supported_range_is_rejected() {
    for hours in ["0", "9000", "4294967295"] {
        let mut map = full_env();
        map.insert("GOODNEWS_RECENCY_WINDOW_HOURS", hours);
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GOODNEWS_RECENCY_WINDOW_HOURS"),
            "{hours}h got: {result:?}"
        );
    }
}

#[test]
fn one_year_recency_window_is_accepted() {
    let mut map = full_env();
    map.insert("GOODNEWS_RECENCY_WINDOW_HOURS", "8784");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.recency_window_hours, 8784);
}

#[test]
fn results_per_query_is_clamped_to_provider_maximum() {
    let mut map = full_env();
    map.insert("GOODNEWS_RESULTS_PER_QUERY", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.results_per_query, 10);
}

#[test]
fn cron_schedule_is_derived_from_invocations_per_day() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.cron_schedule().unwrap(), "0 0 */4 * * *");
}

#[test]
fn cron_schedule_rejects_uneven_split_without_override() {
    let mut map = full_env();
    map.insert("GOODNEWS_INVOCATIONS_PER_DAY", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.cron_schedule().is_err());
}

#[test]
fn explicit_schedule_wins() {
    let mut map = full_env();
    map.insert("GOODNEWS_INVOCATIONS_PER_DAY", "5");
    map.insert("GOODNEWS_SCHEDULE", "0 30 1,6,11,16,21 * * *");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.cron_schedule().unwrap(), "0 30 1,6,11,16,21 * * *");
}

#[test]
fn debug_output_redacts_credentials() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-google-key"));
    assert!(!rendered.contains("secret_test"));
    assert!(rendered.contains("[redacted]"));
}
