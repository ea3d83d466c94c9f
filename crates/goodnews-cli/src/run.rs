use goodnews_collector::{
    persist_all, GoogleSearchClient, HttpFetcher, InvocationContext, InvocationOutcome,
    Orchestrator, RunSummary,
};
use goodnews_core::{AppConfig, Catalog};
use goodnews_notion::NotionClient;

const NOTION_TIMEOUT_SECS: u64 = 30;

/// One full invocation: search, filter, classify, then persist unless
/// `persist` is false. Never panics on collaborator failure; setup errors
/// become [`InvocationOutcome::Failure`].
pub(crate) async fn run_invocation(
    config: &AppConfig,
    catalog: &Catalog,
    persist: bool,
) -> InvocationOutcome {
    match try_run(config, catalog, persist).await {
        Ok(summary) => {
            tracing::info!(
                accepted = summary.articles_accepted,
                saved = ?summary.articles_saved,
                queries = summary.queries_consumed,
                "invocation complete"
            );
            InvocationOutcome::Success(summary)
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "invocation failed");
            InvocationOutcome::Failure {
                error: format!("{e:#}"),
            }
        }
    }
}

async fn try_run(
    config: &AppConfig,
    catalog: &Catalog,
    persist: bool,
) -> anyhow::Result<RunSummary> {
    let search = GoogleSearchClient::new(
        &config.google_api_key,
        &config.search_engine_id,
        config.search_timeout_secs,
        &config.user_agent,
    )?;
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let orchestrator = Orchestrator::from_config(config, catalog, search, fetcher)?;

    let mut ctx = InvocationContext::start(config.daily_query_limit, config.invocations_per_day);
    let report = orchestrator.run(catalog.keywords(), &mut ctx).await;

    let persisted = if persist {
        let notion = NotionClient::new(
            &config.notion_api_key,
            &config.notion_database_id,
            NOTION_TIMEOUT_SECS,
            config.notion_max_retries,
            config.notion_retry_backoff_ms,
        )?;
        Some(persist_all(&notion, &report.accepted).await)
    } else {
        tracing::info!(
            accepted = report.accepted.len(),
            "persistence disabled, skipping Notion"
        );
        None
    };

    Ok(report.summary(persisted.as_ref()))
}
