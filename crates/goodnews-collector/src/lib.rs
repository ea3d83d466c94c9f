//! Budget-bounded article acquisition for goodnews.
//!
//! Queries the search provider for each catalog keyword in priority order,
//! fetches and cleans each result's page, filters it for relevance, recency,
//! duplicates and sentiment, and returns the accepted articles. Persisting
//! them is the caller's job (see [`persist_all`]).

pub mod budget;
pub mod dedup;
pub mod error;
pub mod extractor;
pub mod persist;
pub mod pipeline;
pub mod relevance;
pub mod sentiment;
pub mod sources;
pub mod types;
pub mod window;

pub use budget::{allowance, plan_queries, QueryBudget};
pub use dedup::{canonicalize_url, SeenSet};
pub use error::CollectorError;
pub use extractor::{extract_from_html, ContentExtractor, HttpFetcher, PageFetcher};
pub use persist::{persist_all, ArticleSink, PersistReport};
pub use pipeline::{CollectorSettings, InvocationContext, Orchestrator};
pub use relevance::RelevanceFilter;
pub use sentiment::{
    strategy_for, LexiconOrPolarity, PolarityScorer, PolarityThreshold, SentimentStrategy,
    Tokenizer,
};
pub use sources::{GoogleSearchClient, SearchProvider, SearchRequest};
pub use types::{
    CandidateArticle, InvocationOutcome, Judgment, RawResult, Rejection, RejectionKind,
    RunReport, RunSummary, Sentiment,
};
pub use window::{parse_published, RecencyWindow};
