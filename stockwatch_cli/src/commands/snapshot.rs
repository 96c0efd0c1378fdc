use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use stockwatch_lib::analysis;
use stockwatch_lib::{NseFetcher, RefreshScheduler, WatchConfig};

use crate::output::{
    print_json, print_stocks_csv, print_stocks_markdown, print_stocks_table, print_summary,
    OutputFormat,
};

#[derive(Args)]
pub struct SnapshotArgs {
    /// Only show the N best performers by percentage change
    #[arg(long)]
    pub top: Option<usize>,

    /// Skip the portfolio totals line
    #[arg(long)]
    pub no_summary: bool,
}

pub async fn run(args: &SnapshotArgs, config: WatchConfig, format: &OutputFormat) -> Result<()> {
    let fetcher = Arc::new(NseFetcher::from_env());
    let scheduler = RefreshScheduler::from_config(fetcher, &config);

    let report = scheduler.run_cycle().await;
    for failure in &report.failures {
        eprintln!(
            "{} {}: {} ({})",
            failure.serial, failure.symbol, failure.message, failure.cause
        );
    }

    let snapshot = scheduler.store().get();
    if snapshot.is_empty() && !report.failures.is_empty() {
        bail!(
            "no quotes could be fetched ({} symbols failed)",
            report.failures.len()
        );
    }

    let records = match args.top {
        Some(limit) => analysis::top_movers(&snapshot.records, limit)
            .into_iter()
            .cloned()
            .collect(),
        None => snapshot.records.clone(),
    };

    match format {
        OutputFormat::Table => print_stocks_table(&records),
        OutputFormat::Markdown => print_stocks_markdown(&records),
        OutputFormat::Csv => print_stocks_csv(&records)?,
        OutputFormat::Json => print_json(&records),
    }

    let show_summary = !args.no_summary && matches!(format, OutputFormat::Table | OutputFormat::Markdown);
    if show_summary {
        print_summary(&analysis::summarize(&snapshot.records));
    }

    Ok(())
}
