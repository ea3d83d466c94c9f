use super::*;
use goodnews_core::KeywordEntry;

#[test]
fn cli_parses_run_with_no_persist() {
    let cli = Cli::try_parse_from(["goodnews", "run", "--no-persist"])
        .expect("run --no-persist should parse");
    assert!(matches!(
        cli.command,
        Some(Commands::Run { no_persist: true })
    ));
}

#[test]
fn cli_parses_run_without_flags() {
    let cli = Cli::try_parse_from(["goodnews", "run"]).expect("run should parse");
    assert!(matches!(
        cli.command,
        Some(Commands::Run { no_persist: false })
    ));
}

#[test]
fn cli_without_subcommand_defaults_to_none() {
    let cli = Cli::try_parse_from(["goodnews"]).expect("bare invocation should parse");
    assert!(cli.command.is_none());
}

#[test]
fn cli_parses_plan_and_schedule() {
    let plan = Cli::try_parse_from(["goodnews", "plan"]).expect("plan should parse");
    assert!(matches!(plan.command, Some(Commands::Plan)));
    let schedule = Cli::try_parse_from(["goodnews", "schedule"]).expect("schedule should parse");
    assert!(matches!(schedule.command, Some(Commands::Schedule)));
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["goodnews", "crawl"]).is_err());
}

#[test]
fn missing_catalog_file_falls_back_to_builtins() {
    let catalog = load_catalog_or_default(Path::new("/nonexistent/goodnews/catalog.yaml"))
        .expect("missing file should not be an error");
    assert_eq!(
        catalog.keywords().len(),
        goodnews_core::DEFAULT_KEYWORDS.len()
    );
}

#[test]
fn shipped_catalog_file_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/catalog.yaml");
    let catalog = load_catalog_or_default(&path).expect("shipped catalog should load");
    assert!(!catalog.keywords().is_empty());
    assert!(!catalog.positive_words().is_empty());
}

#[test]
fn plan_lines_list_reached_keywords_and_count_the_rest() {
    let keywords: Vec<KeywordEntry> = [("pets", 1), ("finance", 2), ("space", 3)]
        .iter()
        .map(|&(text, priority)| KeywordEntry {
            text: text.to_string(),
            priority,
        })
        .collect();
    let lines = plan::plan_lines(&keywords, 3, 2);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("pets"));
    assert!(lines[0].contains(" 2 "));
    assert!(lines[1].ends_with("finance"));
    assert!(lines[1].contains(" 1 "));
    assert_eq!(lines[2], "(1 keyword(s) not reached this invocation)");
}

#[tokio::test]
async fn tick_is_skipped_while_an_invocation_is_running() {
    let running = tokio::sync::Mutex::new(());
    let mut ran = false;

    let held = running.lock().await;
    assert!(!schedule::run_exclusive(&running, async { ran = true }).await);
    drop(held);
    assert!(!ran);

    assert!(schedule::run_exclusive(&running, async { ran = true }).await);
    assert!(ran);
}
