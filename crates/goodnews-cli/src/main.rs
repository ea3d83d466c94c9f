use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use goodnews_collector::InvocationOutcome;
use goodnews_core::{AppConfig, Catalog};
use tracing_subscriber::EnvFilter;

mod plan;
mod run;
mod schedule;

#[cfg(test)]
mod tests;

#[derive(Debug, Parser)]
#[command(name = "goodnews", version, about = "Positive-news acquisition pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one acquisition invocation and print its outcome as JSON
    Run {
        /// Collect and classify without writing to Notion
        #[arg(long)]
        no_persist: bool,
    },
    /// Show how the per-invocation query allowance spreads over the catalog
    Plan,
    /// Run invocations on a cron schedule until interrupted
    Schedule,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, catalog) = match load_inputs() {
        Ok(inputs) => inputs,
        Err(e) => {
            let outcome = InvocationOutcome::Failure {
                error: format!("{e:#}"),
            };
            println!("{}", serde_json::to_string(&outcome)?);
            return Err(e);
        }
    };

    match cli.command.unwrap_or(Commands::Run { no_persist: false }) {
        Commands::Run { no_persist } => {
            let outcome = run::run_invocation(&config, &catalog, !no_persist).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if let InvocationOutcome::Failure { error } = outcome {
                anyhow::bail!("invocation failed: {error}");
            }
        }
        Commands::Plan => plan::print_plan(&config, &catalog),
        Commands::Schedule => {
            schedule::run_scheduler(Arc::new(config), Arc::new(catalog)).await?;
        }
    }

    Ok(())
}

fn load_inputs() -> anyhow::Result<(AppConfig, Catalog)> {
    let config = goodnews_core::load_app_config()?;
    init_tracing(&config.log_level)?;
    let catalog = load_catalog_or_default(&config.catalog_path)?;
    tracing::info!(
        keywords = catalog.keywords().len(),
        mode = ?config.mode,
        allowance = config.per_invocation_allowance(),
        "configuration loaded"
    );
    Ok((config, catalog))
}

/// `RUST_LOG` wins over the configured level. Logs go to stderr so stdout
/// carries only the JSON outcome.
fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// A missing catalog file means the built-in tables; an unreadable or invalid
/// one is an error.
fn load_catalog_or_default(path: &Path) -> anyhow::Result<Catalog> {
    if path.exists() {
        Ok(goodnews_core::load_catalog(path)?)
    } else {
        tracing::warn!(
            path = %path.display(),
            "catalog file not found, using built-in keywords"
        );
        Ok(Catalog::default())
    }
}
