use goodnews_collector::plan_queries;
use goodnews_core::{AppConfig, Catalog, KeywordEntry};

pub(crate) fn print_plan(config: &AppConfig, catalog: &Catalog) {
    let allowance = config.per_invocation_allowance();
    println!(
        "allowance: {allowance} queries/invocation ({} per day over {} invocations)",
        config.daily_query_limit, config.invocations_per_day
    );
    match config.cron_schedule() {
        Ok(cron) => println!("schedule:  {cron}"),
        Err(e) => println!("schedule:  unavailable ({e})"),
    }
    println!();
    for line in plan_lines(catalog.keywords(), allowance, config.queries_per_keyword) {
        println!("{line}");
    }
}

/// One line per keyword that would be queried, then a line for the rest.
pub(crate) fn plan_lines(
    keywords: &[KeywordEntry],
    allowance: u32,
    queries_per_keyword: u32,
) -> Vec<String> {
    let plan = plan_queries(keywords, allowance, queries_per_keyword);
    let skipped = keywords.len() - plan.len();
    let mut lines: Vec<String> = plan
        .iter()
        .map(|(entry, slots)| format!("p{:<3} {slots:>2}  {}", entry.priority, entry.text))
        .collect();
    if skipped > 0 {
        lines.push(format!("({skipped} keyword(s) not reached this invocation)"));
    }
    lines
}
