//! General-purpose lexicon polarity scorer for English and Japanese text.

use std::collections::HashMap;

use super::tokenizer::Tokenizer;

/// Word valences on a `[-4, 4]` scale. Keys are lowercase.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // English, positive
    ("great", 3.1),
    ("good", 1.9),
    ("excellent", 3.2),
    ("wonderful", 2.7),
    ("positive", 2.6),
    ("approved", 1.8),
    ("safe", 1.9),
    ("love", 3.2),
    ("loved", 2.9),
    ("best", 3.2),
    ("happy", 2.7),
    ("joy", 2.8),
    ("hope", 1.9),
    ("success", 2.7),
    ("successful", 2.8),
    ("breakthrough", 2.4),
    ("improve", 1.9),
    ("improved", 2.1),
    ("helped", 1.7),
    ("popular", 1.8),
    ("growing", 1.2),
    ("thriving", 2.6),
    ("celebrate", 2.7),
    ("celebrated", 2.4),
    ("victory", 2.7),
    ("win", 2.8),
    ("recommend", 1.5),
    // English, negative
    ("bad", -2.5),
    ("terrible", -3.1),
    ("worst", -3.1),
    ("ban", -2.6),
    ("banned", -2.6),
    ("illegal", -2.6),
    ("recall", -1.6),
    ("dangerous", -2.1),
    ("harmful", -2.5),
    ("lawsuit", -1.8),
    ("shutdown", -2.0),
    ("failed", -2.3),
    ("failure", -2.3),
    ("problem", -1.7),
    ("concern", -1.4),
    ("warning", -1.4),
    ("decline", -1.4),
    ("crash", -2.4),
    ("crisis", -3.1),
    ("accident", -2.1),
    ("fraud", -2.8),
    ("death", -2.9),
    ("died", -2.6),
    ("killed", -3.5),
    // Japanese, positive
    ("成功", 2.5),
    ("達成", 2.3),
    ("快挙", 3.0),
    ("躍進", 2.5),
    ("優勝", 3.0),
    ("受賞", 2.6),
    ("改善", 1.8),
    ("向上", 1.8),
    ("回復", 1.6),
    ("発展", 1.8),
    ("成長", 1.8),
    ("好調", 2.2),
    ("希望", 2.0),
    ("感謝", 2.3),
    ("歓迎", 2.0),
    ("貢献", 1.9),
    ("解決", 1.7),
    ("支援", 1.4),
    ("安心", 1.8),
    ("笑顔", 2.4),
    ("喜び", 2.8),
    ("幸せ", 2.8),
    ("嬉しい", 2.6),
    ("楽しい", 2.4),
    ("素晴らしい", 3.0),
    // Japanese, negative
    ("事故", -2.5),
    ("事件", -2.2),
    ("死亡", -3.2),
    ("殺人", -3.5),
    ("被害", -2.4),
    ("災害", -2.6),
    ("火災", -2.5),
    ("逮捕", -2.3),
    ("詐欺", -2.8),
    ("違反", -2.2),
    ("不祥事", -2.8),
    ("倒産", -2.9),
    ("失敗", -2.3),
    ("低迷", -2.0),
    ("悪化", -2.2),
    ("損失", -2.1),
    ("懸念", -1.6),
    ("批判", -1.8),
    ("炎上", -2.3),
    ("不安", -1.9),
    ("中止", -1.4),
];

/// Negate a term when found up to three tokens before it.
const NEGATORS_BEFORE: &[&str] = &[
    "not", "no", "never", "isn't", "wasn't", "aren't", "won't", "can't", "cannot", "without",
    "didn't", "doesn't",
];

/// Japanese negation follows the verb or adjective it applies to.
const NEGATORS_AFTER: &[&str] = &["ない", "なかった", "なく", "ず", "ません", "ませんでした"];

const INTENSIFIERS: &[&str] = &["very", "extremely", "highly", "really", "大幅", "非常", "とても"];

const NEGATION_LOOKBEHIND: usize = 3;
const NEGATION_LOOKAHEAD: usize = 2;
const INTENSIFIER_LOOKBEHIND: usize = 2;
const INTENSIFIER_SCALE: f32 = 1.5;

/// Normalization constant approximating the maximum expected sum.
const NORMALIZATION_ALPHA: f32 = 15.0;

/// Scores text into a compound polarity in `(-1.0, 1.0)`.
///
/// Sums the valence of each lexicon token, flipping it when negated and
/// scaling it when intensified, then squashes the sum with
/// `sum / sqrt(sum² + 15)`.
#[derive(Debug, Clone)]
pub struct PolarityScorer {
    tokenizer: Tokenizer,
    valences: HashMap<&'static str, f32>,
}

impl Default for PolarityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer {
    #[must_use]
    pub fn new() -> Self {
        let vocabulary = LEXICON
            .iter()
            .map(|&(word, _)| word)
            .chain(NEGATORS_AFTER.iter().copied())
            .chain(INTENSIFIERS.iter().copied());
        Self {
            tokenizer: Tokenizer::new(vocabulary),
            valences: LEXICON.iter().copied().collect(),
        }
    }

    #[must_use]
    pub fn score(&self, text: &str) -> f32 {
        self.score_tokens(&self.tokenizer.tokenize(text))
    }

    #[must_use]
    pub fn score_tokens(&self, tokens: &[String]) -> f32 {
        let mut sum = 0.0_f32;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = self.valences.get(token.as_str()) else {
                continue;
            };
            let mut value = valence;

            let before = &tokens[i.saturating_sub(INTENSIFIER_LOOKBEHIND)..i];
            if before.iter().any(|t| INTENSIFIERS.contains(&t.as_str())) {
                value *= INTENSIFIER_SCALE;
            }

            let before = &tokens[i.saturating_sub(NEGATION_LOOKBEHIND)..i];
            let after = &tokens[i + 1..tokens.len().min(i + 1 + NEGATION_LOOKAHEAD)];
            let negated = before.iter().any(|t| NEGATORS_BEFORE.contains(&t.as_str()))
                || after.iter().any(|t| NEGATORS_AFTER.contains(&t.as_str()));
            if negated {
                value = -value;
            }

            sum += value;
        }
        normalize(sum)
    }
}

fn normalize(sum: f32) -> f32 {
    if sum.abs() < f32::EPSILON {
        return 0.0;
    }
    sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()
}
