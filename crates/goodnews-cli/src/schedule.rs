use std::future::Future;
use std::sync::Arc;

use goodnews_core::{AppConfig, Catalog};
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::run::run_invocation;

/// Register the invocation job and block until Ctrl-C.
///
/// Each tick gets a fresh budget and seen-set. Ticks never overlap: a tick
/// that fires while the previous invocation is still running is skipped.
pub(crate) async fn run_scheduler(
    config: Arc<AppConfig>,
    catalog: Arc<Catalog>,
) -> anyhow::Result<()> {
    let cron = config.cron_schedule()?;
    let running = Arc::new(Mutex::new(()));

    let mut scheduler = JobScheduler::new().await?;
    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let config = Arc::clone(&config);
        let catalog = Arc::clone(&catalog);
        let running = Arc::clone(&running);
        Box::pin(async move {
            run_exclusive(&running, async {
                tracing::info!("scheduler: starting invocation");
                let outcome = run_invocation(&config, &catalog, true).await;
                match serde_json::to_string(&outcome) {
                    Ok(json) => println!("{json}"),
                    Err(e) => tracing::error!(error = %e, "scheduler: failed to encode outcome"),
                }
            })
            .await;
        })
    })?;
    scheduler.add(job).await?;
    tracing::info!(cron = %cron, "scheduler: registered invocation job");

    scheduler.start().await?;
    tokio::signal::ctrl_c().await?;
    tracing::info!("scheduler: shutting down");
    scheduler.shutdown().await?;
    Ok(())
}

/// Run `invocation` unless another one holds `running`. Returns whether it
/// ran. Skipped ticks are not queued, so a slow run never causes a burst of
/// back-to-back invocations.
pub(crate) async fn run_exclusive<F>(running: &Mutex<()>, invocation: F) -> bool
where
    F: Future<Output = ()>,
{
    let Ok(_guard) = running.try_lock() else {
        tracing::info!("scheduler: previous invocation still running, skipping tick");
        return false;
    };
    invocation.await;
    true
}
