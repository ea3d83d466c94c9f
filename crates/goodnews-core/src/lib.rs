//! Shared configuration and domain types for the goodnews workspace.
//!
//! Everything here is loaded once at process start and handed to the
//! collector by reference; nothing in this crate mutates at runtime.

mod app_config;
mod catalog;
mod config;

use thiserror::Error;

pub use app_config::{AppConfig, OperatingMode};
pub use catalog::{
    load_catalog, parse_catalog, Catalog, CatalogFile, ExclusionPatterns, KeywordEntry,
    DEFAULT_CURATED_EXCLUSIONS, DEFAULT_KEYWORDS, DEFAULT_POSITIVE_WORDS, DEFAULT_TREND_EXCLUSIONS,
};
pub use config::{load_app_config, load_app_config_from_env};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
