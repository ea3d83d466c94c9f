//! Per-invocation acquisition loop.
//!
//! Keywords are processed one at a time in ascending priority order, and
//! each keyword's results one at a time. Every outbound search page claims a
//! budget slot first; the first refused claim ends the whole run.

use std::time::Duration;

use chrono::{DateTime, Utc};
use goodnews_core::{AppConfig, Catalog, KeywordEntry};

use crate::budget::QueryBudget;
use crate::dedup::{canonicalize_url, SeenSet};
use crate::error::CollectorError;
use crate::extractor::{ContentExtractor, PageFetcher};
use crate::relevance::RelevanceFilter;
use crate::sentiment::{strategy_for, SentimentStrategy};
use crate::sources::{SearchProvider, SearchRequest};
use crate::types::{CandidateArticle, Judgment, RawResult, Rejection, RunReport};
use crate::window::RecencyWindow;

/// Paging and pacing knobs for the search loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSettings {
    pub queries_per_keyword: u32,
    pub max_results_per_keyword: usize,
    pub results_per_query: u32,
    /// Pause between consecutive outbound search queries.
    pub inter_query_delay: Duration,
}

impl CollectorSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            queries_per_keyword: config.queries_per_keyword,
            max_results_per_keyword: config.max_results_per_keyword,
            results_per_query: config.results_per_query,
            inter_query_delay: Duration::from_secs(config.inter_query_delay_secs),
        }
    }
}

/// Mutable state owned by exactly one invocation.
///
/// Build a fresh context per run; nothing in it carries over.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub budget: QueryBudget,
    pub seen: SeenSet,
    /// End of the recency window.
    pub started_at: DateTime<Utc>,
}

impl InvocationContext {
    #[must_use]
    pub fn new(budget: QueryBudget, started_at: DateTime<Utc>) -> Self {
        Self {
            budget,
            seen: SeenSet::new(),
            started_at,
        }
    }

    /// A context starting now with an untouched budget.
    #[must_use]
    pub fn start(daily_limit: u32, invocations_per_day: u32) -> Self {
        Self::new(QueryBudget::new(daily_limit, invocations_per_day), Utc::now())
    }
}

/// Why the keyword loop stopped early.
enum Halt {
    BudgetExhausted,
    ProviderRefused,
}

pub struct Orchestrator<S, F> {
    search: S,
    extractor: ContentExtractor<F>,
    relevance: RelevanceFilter,
    window: RecencyWindow,
    classifier: Box<dyn SentimentStrategy + Send + Sync>,
    settings: CollectorSettings,
}

impl<S: SearchProvider, F: PageFetcher> Orchestrator<S, F> {
    pub fn new(
        search: S,
        extractor: ContentExtractor<F>,
        relevance: RelevanceFilter,
        window: RecencyWindow,
        classifier: Box<dyn SentimentStrategy + Send + Sync>,
        settings: CollectorSettings,
    ) -> Self {
        Self {
            search,
            extractor,
            relevance,
            window,
            classifier,
            settings,
        }
    }

    /// Wire every stage from configuration and the loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Pattern`] if an exclusion pattern fails to
    /// compile.
    pub fn from_config(
        config: &AppConfig,
        catalog: &Catalog,
        search: S,
        fetcher: F,
    ) -> Result<Self, CollectorError> {
        let relevance = RelevanceFilter::new(
            &catalog.exclusion_patterns(config.mode),
            config.min_content_length,
        )?;
        let extractor = ContentExtractor::new(
            fetcher,
            Duration::from_secs(config.fetch_timeout_secs),
            config.max_content_length,
        );
        let classifier = strategy_for(
            config.mode,
            catalog.positive_words(),
            config.sentiment_threshold,
        );
        Ok(Self::new(
            search,
            extractor,
            relevance,
            RecencyWindow::hours(config.recency_window_hours),
            classifier,
            CollectorSettings::from_app_config(config),
        ))
    }

    /// Run one invocation over `keywords`.
    ///
    /// Never fails: search errors are logged and counted, and per-result
    /// problems become rejections. Returns everything accepted so far when
    /// the budget runs out or the provider refuses further queries.
    pub async fn run(
        &self,
        keywords: &[KeywordEntry],
        ctx: &mut InvocationContext,
    ) -> RunReport {
        let mut ordered: Vec<&KeywordEntry> = keywords.iter().collect();
        ordered.sort_by_key(|entry| entry.priority);

        let mut report = RunReport {
            query_allowance: ctx.budget.allowance(),
            ..RunReport::default()
        };

        tracing::info!(
            keywords = ordered.len(),
            allowance = ctx.budget.allowance(),
            started_at = %ctx.started_at,
            "invocation started"
        );

        for entry in ordered {
            match self.run_keyword(entry, ctx, &mut report).await {
                Ok(()) => {}
                Err(Halt::BudgetExhausted) => {
                    report.budget_exhausted = true;
                    tracing::info!(
                        keyword = %entry.text,
                        consumed = ctx.budget.consumed(),
                        allowance = ctx.budget.allowance(),
                        "query budget exhausted; skipping remaining keywords"
                    );
                    break;
                }
                Err(Halt::ProviderRefused) => {
                    tracing::warn!(
                        keyword = %entry.text,
                        "search provider refused further queries; ending run"
                    );
                    break;
                }
            }
        }

        report.queries_consumed = ctx.budget.consumed();
        tracing::info!(
            keywords_processed = report.keywords_processed,
            accepted = report.accepted.len(),
            queries_consumed = report.queries_consumed,
            budget_exhausted = report.budget_exhausted,
            "invocation finished"
        );
        report
    }

    async fn run_keyword(
        &self,
        entry: &KeywordEntry,
        ctx: &mut InvocationContext,
        report: &mut RunReport,
    ) -> Result<(), Halt> {
        let mut accepted_here = 0usize;
        let mut queried = false;
        let mut outcome = Ok(());

        for page in 1..=self.settings.queries_per_keyword {
            if accepted_here >= self.settings.max_results_per_keyword {
                break;
            }
            if !ctx.budget.try_consume() {
                outcome = Err(Halt::BudgetExhausted);
                break;
            }
            if ctx.budget.consumed() > 1 {
                tokio::time::sleep(self.settings.inter_query_delay).await;
            }
            queried = true;

            let request = SearchRequest {
                keyword: entry.text.clone(),
                page,
                page_size: self.settings.results_per_query,
            };
            let results = match self.search.search(&request).await {
                Ok(results) => results,
                Err(e) => {
                    report.search_failures += 1;
                    tracing::warn!(
                        keyword = %entry.text,
                        page,
                        error = %e,
                        "search query failed"
                    );
                    if e.ends_run() {
                        outcome = Err(Halt::ProviderRefused);
                    }
                    break;
                }
            };
            if results.is_empty() {
                tracing::debug!(keyword = %entry.text, page, "no more results");
                break;
            }

            for raw in results {
                if accepted_here >= self.settings.max_results_per_keyword {
                    break;
                }
                match self.evaluate(raw, &entry.text, ctx).await {
                    Ok(article) => {
                        tracing::info!(
                            keyword = %entry.text,
                            link = %article.link,
                            "article accepted"
                        );
                        accepted_here += 1;
                        report.accepted.push(article);
                    }
                    Err(rejection) => {
                        tracing::debug!(
                            keyword = %entry.text,
                            reason = %rejection,
                            "result rejected"
                        );
                        report.record_rejection(&rejection);
                    }
                }
            }
        }

        if queried {
            report.keywords_processed += 1;
        }
        outcome
    }

    /// Run one raw result through every stage, first failure wins.
    async fn evaluate(
        &self,
        raw: RawResult,
        keyword: &str,
        ctx: &mut InvocationContext,
    ) -> Result<CandidateArticle, Rejection> {
        let link =
            canonicalize_url(&raw.link).ok_or_else(|| Rejection::MalformedLink(raw.link.clone()))?;

        let content = self
            .extractor
            .extract(&raw.link)
            .await
            .ok_or(Rejection::ExtractionFailed)?;

        self.relevance.check(&content)?;

        let published_at = self
            .window
            .check(raw.published_raw.as_deref(), ctx.started_at)?;

        if !ctx.seen.check_and_mark(&link) {
            return Err(Rejection::Duplicate);
        }

        let text = format!("{} {} {}", raw.title, raw.snippet, content);
        let judgment = self.classifier.classify(&text);
        let Some(sentiment) = judgment.sentiment() else {
            if let Judgment::Scored { score, .. } = judgment {
                tracing::debug!(link = %link, score, "polarity at or below threshold");
            }
            return Err(Rejection::NotPositive);
        };

        Ok(CandidateArticle {
            title: raw.title,
            link,
            snippet: raw.snippet,
            content,
            published_at,
            sentiment,
            publisher: raw.publisher,
            keyword: keyword.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
