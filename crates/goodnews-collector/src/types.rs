use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::persist::PersistReport;

/// One provider search hit, before any filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
    /// Publication timestamp exactly as the provider reported it, if at all.
    pub published_raw: Option<String>,
    pub publisher: Option<String>,
}

/// Sentiment recorded on an accepted article.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Sentiment {
    /// Accepted by the lexicon-or-polarity rule.
    Positive,
    /// Accepted by the polarity-threshold rule with this compound score.
    Score(f32),
}

/// Output of a [`crate::SentimentStrategy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Judgment {
    Positive,
    NotPositive,
    Scored { score: f32, accepted: bool },
}

impl Judgment {
    #[must_use]
    pub fn is_positive(&self) -> bool {
        match self {
            Judgment::Positive => true,
            Judgment::NotPositive => false,
            Judgment::Scored { accepted, .. } => *accepted,
        }
    }

    /// Label to store with the article; `None` when the judgment rejects.
    #[must_use]
    pub fn sentiment(&self) -> Option<Sentiment> {
        match *self {
            Judgment::Positive => Some(Sentiment::Positive),
            Judgment::Scored {
                score,
                accepted: true,
            } => Some(Sentiment::Score(score)),
            _ => None,
        }
    }
}

/// An article that passed every filter stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateArticle {
    pub title: String,
    /// Canonical link; the deduplication key.
    pub link: String,
    pub snippet: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
    pub sentiment: Sentiment,
    pub publisher: Option<String>,
    /// Catalog keyword whose query surfaced the article.
    pub keyword: String,
}

/// Why a single raw result was discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    MalformedLink(String),
    ExtractionFailed,
    Excluded { pattern: String },
    TooShort { len: usize, min: usize },
    Fragmented { segment: String },
    MissingTimestamp,
    UnparsableTimestamp(String),
    OutsideWindow { published_at: DateTime<Utc> },
    Duplicate,
    NotPositive,
}

impl Rejection {
    #[must_use]
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::MalformedLink(_) => RejectionKind::MalformedLink,
            Rejection::ExtractionFailed => RejectionKind::ExtractionFailed,
            Rejection::Excluded { .. } => RejectionKind::Excluded,
            Rejection::TooShort { .. } => RejectionKind::TooShort,
            Rejection::Fragmented { .. } => RejectionKind::Fragmented,
            Rejection::MissingTimestamp => RejectionKind::MissingTimestamp,
            Rejection::UnparsableTimestamp(_) => RejectionKind::UnparsableTimestamp,
            Rejection::OutsideWindow { .. } => RejectionKind::OutsideWindow,
            Rejection::Duplicate => RejectionKind::Duplicate,
            Rejection::NotPositive => RejectionKind::NotPositive,
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::MalformedLink(link) => write!(f, "malformed link '{link}'"),
            Rejection::ExtractionFailed => write!(f, "no content could be extracted"),
            Rejection::Excluded { pattern } => write!(f, "matched exclusion pattern '{pattern}'"),
            Rejection::TooShort { len, min } => write!(f, "content too short ({len} < {min})"),
            Rejection::Fragmented { segment } => write!(f, "fragmented segment '{segment}'"),
            Rejection::MissingTimestamp => write!(f, "no publication timestamp"),
            Rejection::UnparsableTimestamp(raw) => write!(f, "unparsable timestamp '{raw}'"),
            Rejection::OutsideWindow { published_at } => {
                write!(f, "published {published_at} is outside the recency window")
            }
            Rejection::Duplicate => write!(f, "already seen this invocation"),
            Rejection::NotPositive => write!(f, "sentiment not positive"),
        }
    }
}

/// Field-free discriminant of [`Rejection`], used for per-reason counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    MalformedLink,
    ExtractionFailed,
    Excluded,
    TooShort,
    Fragmented,
    MissingTimestamp,
    UnparsableTimestamp,
    OutsideWindow,
    Duplicate,
    NotPositive,
}

/// Everything one invocation produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub accepted: Vec<CandidateArticle>,
    /// Keywords that had at least one query issued.
    pub keywords_processed: usize,
    pub queries_consumed: u32,
    pub query_allowance: u32,
    /// A query was refused because the allowance was spent, so the pages
    /// or keywords still to be queried were skipped. Also set when only the
    /// last keyword's next page was refused.
    pub budget_exhausted: bool,
    pub search_failures: usize,
    pub rejections: BTreeMap<RejectionKind, usize>,
}

impl RunReport {
    pub(crate) fn record_rejection(&mut self, rejection: &Rejection) {
        *self.rejections.entry(rejection.kind()).or_insert(0) += 1;
    }

    #[must_use]
    pub fn summary(&self, persisted: Option<&PersistReport>) -> RunSummary {
        RunSummary {
            keywords_processed: self.keywords_processed,
            articles_accepted: self.accepted.len(),
            queries_consumed: self.queries_consumed,
            query_allowance: self.query_allowance,
            budget_exhausted: self.budget_exhausted,
            search_failures: self.search_failures,
            articles_saved: persisted.map(|p| p.saved),
            save_failures: persisted.map(|p| p.failed),
            rejections: self.rejections.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub keywords_processed: usize,
    pub articles_accepted: usize,
    pub queries_consumed: u32,
    pub query_allowance: u32,
    pub budget_exhausted: bool,
    pub search_failures: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub articles_saved: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_failures: Option<usize>,
    pub rejections: BTreeMap<RejectionKind, usize>,
}

/// Terminal result of one invocation: exactly one of success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationOutcome {
    Success(RunSummary),
    Failure { error: String },
}

impl InvocationOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success(_))
    }
}
