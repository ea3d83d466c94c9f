use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app_config::OperatingMode;
use crate::ConfigError;

/// Built-in keyword catalog, used when no catalog file is present.
pub const DEFAULT_KEYWORDS: &[(&str, u32)] = &[
    ("技術革新 成功", 1),
    ("医療 breakthrough", 1),
    ("科学 発見", 1),
    ("社会貢献 成果", 2),
    ("環境改善 進展", 2),
    ("再生可能エネルギー 進展", 2),
    ("SDGs 達成", 3),
    ("AI 革新", 3),
    ("宇宙開発 成功", 3),
    ("ベンチャー 成功", 4),
];

/// Curated positive vocabulary matched token-by-token by the sentiment classifier.
pub const DEFAULT_POSITIVE_WORDS: &[&str] = &[
    "成功", "達成", "革新", "進歩", "発展", "向上", "改善", "好調", "快挙", "躍進", "前進",
    "期待", "希望", "発見", "貢献", "実現", "解決", "支援", "協力", "成長", "進展", "回復",
    "改革", "創造", "開発", "成果", "効果", "優秀", "歓迎", "推進", "拡大", "充実", "強化",
    "安定", "確立",
];

/// Advertising and promotional markers rejected in every mode.
///
/// Latin terms are bounded by explicit ASCII classes rather than `\b`: the
/// Unicode `\b` sees no boundary between kana or kanji and a Latin letter,
/// so `\bPR\b` would never match "新製品のPRです".
pub const DEFAULT_TREND_EXCLUSIONS: &[&str] = &[
    r"(?:^|[^A-Za-z0-9_])PR(?:[^A-Za-z0-9_]|$)",
    "広告",
    "提供[:：]",
    "スポンサー",
    r"(?i)(?:^|[^A-Za-z0-9_])sponsored(?:[^A-Za-z0-9_]|$)",
    r"(?i)(?:^|[^A-Za-z0-9_])advertisement(?:[^A-Za-z0-9_]|$)",
    r"(?i)(?:^|[^A-Za-z0-9_])affiliate(?:[^A-Za-z0-9_]|$)",
    "今すぐ購入",
    r"(?i)(?:^|[^A-Za-z0-9_])buy now(?:[^A-Za-z0-9_]|$)",
    r"(?i)(?:^|[^A-Za-z0-9_])coupons?(?:[^A-Za-z0-9_]|$)",
    "クーポン",
];

/// Click-bait, listicle and stale-date markers added on top of the trend set
/// in curated-positive mode.
pub const DEFAULT_CURATED_EXCLUSIONS: &[&str] = &[
    "衝撃",
    "驚愕",
    "まとめ",
    r"(?i)you won'?t believe",
    r"(?i)(?:^|[^A-Za-z0-9_])shocking(?:[^A-Za-z0-9_]|$)",
    "ランキング",
    r"\d+選",
    r"(?i)(?:^|[^A-Za-z0-9_])top\s*[0-9]+(?:[^0-9]|$)",
    r"(?i)(?:^|[^A-Za-z0-9_])best\s+[0-9]+(?:[^0-9]|$)",
    "20[01][0-9]年",
    r"(?:^|[^0-9])20[01][0-9](?:[^0-9]|$)",
];

/// A search keyword and its rank. Lower priority values are queried first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub text: String,
    pub priority: u32,
}

/// Exclusion regexes per operating mode.
///
/// `curated_positive` holds only the additions; the effective curated set is
/// `trend` followed by `curated_positive`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionPatterns {
    #[serde(default)]
    pub trend: Vec<String>,
    #[serde(default)]
    pub curated_positive: Vec<String>,
}

impl Default for ExclusionPatterns {
    fn default() -> Self {
        Self {
            trend: DEFAULT_TREND_EXCLUSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            curated_positive: DEFAULT_CURATED_EXCLUSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// On-disk shape of the catalog YAML.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub keywords: Vec<KeywordEntry>,
    #[serde(default)]
    pub exclusion_patterns: Option<ExclusionPatterns>,
    #[serde(default)]
    pub positive_words: Option<Vec<String>>,
}

/// Validated, priority-ordered static tables for one process lifetime.
#[derive(Debug, Clone)]
pub struct Catalog {
    keywords: Vec<KeywordEntry>,
    exclusions: ExclusionPatterns,
    positive_words: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        let keywords = DEFAULT_KEYWORDS
            .iter()
            .map(|&(text, priority)| KeywordEntry {
                text: text.to_string(),
                priority,
            })
            .collect();
        Self::from_parts(
            keywords,
            ExclusionPatterns::default(),
            DEFAULT_POSITIVE_WORDS
                .iter()
                .map(ToString::to_string)
                .collect(),
        )
    }
}

impl Catalog {
    /// Build a catalog, ordering keywords by ascending priority.
    ///
    /// The sort is stable, so equal priorities keep their catalog order.
    #[must_use]
    pub fn from_parts(
        mut keywords: Vec<KeywordEntry>,
        exclusions: ExclusionPatterns,
        positive_words: Vec<String>,
    ) -> Self {
        keywords.sort_by_key(|k| k.priority);
        Self {
            keywords,
            exclusions,
            positive_words,
        }
    }

    /// Keywords in processing order.
    #[must_use]
    pub fn keywords(&self) -> &[KeywordEntry] {
        &self.keywords
    }

    #[must_use]
    pub fn positive_words(&self) -> &[String] {
        &self.positive_words
    }

    /// Effective exclusion patterns for `mode`.
    #[must_use]
    pub fn exclusion_patterns(&self, mode: OperatingMode) -> Vec<&str> {
        let trend = self.exclusions.trend.iter().map(String::as_str);
        match mode {
            OperatingMode::Trend => trend.collect(),
            OperatingMode::CuratedPositive => trend
                .chain(self.exclusions.curated_positive.iter().map(String::as_str))
                .collect(),
        }
    }
}

/// Load and validate the keyword catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_catalog(&content)
}

/// Parse and validate catalog YAML. Omitted tables fall back to the built-ins.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(yaml: &str) -> Result<Catalog, ConfigError> {
    let file: CatalogFile = serde_yaml::from_str(yaml)?;
    validate_catalog(&file)?;

    let exclusions = file.exclusion_patterns.unwrap_or_default();
    let positive_words = file.positive_words.unwrap_or_else(|| {
        DEFAULT_POSITIVE_WORDS
            .iter()
            .map(ToString::to_string)
            .collect()
    });

    Ok(Catalog::from_parts(file.keywords, exclusions, positive_words))
}

fn validate_catalog(file: &CatalogFile) -> Result<(), ConfigError> {
    if file.keywords.is_empty() {
        return Err(ConfigError::Validation(
            "catalog must contain at least one keyword".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for entry in &file.keywords {
        let normalized = entry.text.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ConfigError::Validation(
                "keyword text must be non-empty".to_string(),
            ));
        }
        if !seen.insert(normalized) {
            return Err(ConfigError::Validation(format!(
                "duplicate keyword: '{}'",
                entry.text
            )));
        }
    }

    if let Some(patterns) = &file.exclusion_patterns {
        for pattern in patterns.trend.iter().chain(&patterns.curated_positive) {
            regex::Regex::new(pattern).map_err(|e| {
                ConfigError::Validation(format!("invalid exclusion pattern '{pattern}': {e}"))
            })?;
        }
    }

    if let Some(words) = &file.positive_words {
        if words.iter().any(|w| w.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "positive words must be non-empty".to_string(),
            ));
        }
    }

    Ok(())
}
