//! Hybrid positive-news classification.
//!
//! Two signals feed the decision: hits against the catalog's positive-word
//! set, and a general polarity score from [`PolarityScorer`]. Which rule
//! combines them is fixed per run by the operating mode.

mod polarity;
mod tokenizer;

use std::collections::HashSet;

use goodnews_core::OperatingMode;

pub use polarity::PolarityScorer;
pub use tokenizer::Tokenizer;

use crate::types::Judgment;

/// A pure decision over article text.
pub trait SentimentStrategy {
    fn classify(&self, text: &str) -> Judgment;
}

/// Boolean rule: positive if any catalog positive word appears **or** the
/// polarity score is above zero. Either signal alone is enough.
#[derive(Debug, Clone)]
pub struct LexiconOrPolarity {
    tokenizer: Tokenizer,
    positive_words: HashSet<String>,
    scorer: PolarityScorer,
}

impl LexiconOrPolarity {
    pub fn new<I, S>(positive_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let positive_words: HashSet<String> = positive_words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            tokenizer: Tokenizer::new(&positive_words),
            positive_words,
            scorer: PolarityScorer::new(),
        }
    }

    /// Number of tokens in `text` that are catalog positive words.
    #[must_use]
    pub fn positive_hits(&self, text: &str) -> usize {
        self.tokenizer
            .tokenize(text)
            .iter()
            .filter(|token| self.positive_words.contains(token.as_str()))
            .count()
    }
}

impl SentimentStrategy for LexiconOrPolarity {
    fn classify(&self, text: &str) -> Judgment {
        if self.positive_hits(text) > 0 || self.scorer.score(text) > 0.0 {
            Judgment::Positive
        } else {
            Judgment::NotPositive
        }
    }
}

/// Scored rule: accept only when the polarity score exceeds `threshold`.
/// The positive-word set is not consulted.
#[derive(Debug, Clone)]
pub struct PolarityThreshold {
    scorer: PolarityScorer,
    threshold: f32,
}

impl PolarityThreshold {
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            scorer: PolarityScorer::new(),
            threshold,
        }
    }
}

impl SentimentStrategy for PolarityThreshold {
    fn classify(&self, text: &str) -> Judgment {
        let score = self.scorer.score(text);
        Judgment::Scored {
            score,
            accepted: score > self.threshold,
        }
    }
}

/// The strategy a run in `mode` uses.
#[must_use]
pub fn strategy_for(
    mode: OperatingMode,
    positive_words: &[String],
    threshold: f32,
) -> Box<dyn SentimentStrategy + Send + Sync> {
    match mode {
        OperatingMode::Trend => Box::new(LexiconOrPolarity::new(positive_words)),
        OperatingMode::CuratedPositive => Box::new(PolarityThreshold::new(threshold)),
    }
}
