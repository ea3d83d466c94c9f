//! Best-effort hand-off of accepted articles to a storage sink.

use std::fmt::Display;
use std::future::Future;

use serde::Serialize;

use crate::types::CandidateArticle;

/// Destination for accepted articles.
pub trait ArticleSink {
    type Error: Display;

    fn save(
        &self,
        article: &CandidateArticle,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistReport {
    pub saved: usize,
    pub failed: usize,
}

/// Save every article in order. A failed save is logged and counted; it
/// never stops the remaining saves and is not retried here.
pub async fn persist_all<S: ArticleSink>(
    sink: &S,
    articles: &[CandidateArticle],
) -> PersistReport {
    let mut report = PersistReport::default();
    for article in articles {
        match sink.save(article).await {
            Ok(()) => report.saved += 1,
            Err(e) => {
                report.failed += 1;
                tracing::warn!(link = %article.link, error = %e, "failed to save article");
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::types::Sentiment;

    struct FlakySink {
        fail_links: Vec<&'static str>,
        attempted: Mutex<Vec<String>>,
    }

    impl ArticleSink for FlakySink {
        type Error = String;

        async fn save(&self, article: &CandidateArticle) -> Result<(), String> {
            self.attempted.lock().unwrap().push(article.link.clone());
            if self.fail_links.contains(&article.link.as_str()) {
                Err("boom".to_string())
            } else {
                Ok(())
            }
        }
    }

    fn article(link: &str) -> CandidateArticle {
        CandidateArticle {
            title: "t".to_string(),
            link: link.to_string(),
            snippet: String::new(),
            content: String::new(),
            published_at: Utc::now(),
            sentiment: Sentiment::Positive,
            publisher: None,
            keyword: "pets".to_string(),
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_block_later_saves() {
        let sink = FlakySink {
            fail_links: vec!["https://example.com/2"],
            attempted: Mutex::new(Vec::new()),
        };
        let articles = [
            article("https://example.com/1"),
            article("https://example.com/2"),
            article("https://example.com/3"),
        ];
        let report = persist_all(&sink, &articles).await;
        assert_eq!(report, PersistReport { saved: 2, failed: 1 });
        assert_eq!(sink.attempted.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn empty_batch_saves_nothing() {
        let sink = FlakySink {
            fail_links: vec![],
            attempted: Mutex::new(Vec::new()),
        };
        assert_eq!(persist_all(&sink, &[]).await, PersistReport::default());
    }
}
