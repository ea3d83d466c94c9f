//! Recency window: accept only articles published shortly before the run.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::types::Rejection;

/// Parse a provider-reported publication timestamp.
///
/// Accepts RFC 3339, RFC 2822, and offset-less ISO forms (read as UTC).
/// A bare date is read as midnight UTC.
#[must_use]
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Inclusive time span `[now - length, now]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    length: Duration,
}

impl RecencyWindow {
    #[must_use]
    pub fn new(length: Duration) -> Self {
        Self { length }
    }

    #[must_use]
    pub fn hours(hours: u32) -> Self {
        Self::new(Duration::hours(i64::from(hours)))
    }

    /// A window reaching past chrono's earliest date has no lower bound.
    #[must_use]
    pub fn contains(&self, published_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let after_start = now
            .checked_sub_signed(self.length)
            .is_none_or(|start| published_at >= start);
        after_start && published_at <= now
    }

    /// Parse `raw` and check it against the window ending at `now`.
    ///
    /// # Errors
    ///
    /// Missing, unparsable, and out-of-window timestamps are all rejections.
    pub fn check(
        &self,
        raw: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, Rejection> {
        let raw = raw
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(Rejection::MissingTimestamp)?;
        let published_at =
            parse_published(raw).ok_or_else(|| Rejection::UnparsableTimestamp(raw.to_string()))?;
        if self.contains(published_at, now) {
            Ok(published_at)
        } else {
            Err(Rejection::OutsideWindow { published_at })
        }
    }
}
