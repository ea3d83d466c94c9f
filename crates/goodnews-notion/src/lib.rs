//! Notion database sink for accepted goodnews articles.

mod client;
mod error;
mod retry;

pub use client::{page_properties, NotionClient, POSITIVE_LABEL};
pub use error::NotionError;
