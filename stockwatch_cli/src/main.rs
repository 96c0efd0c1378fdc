mod commands;
mod output;
mod server;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stockwatch_lib::WatchConfig;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "stockwatch")]
#[command(about = "Track NSE equity holdings against their average purchase price")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Watch list file (.json or .toml)
    #[arg(
        long,
        env = "STOCKWATCH_CONFIG",
        default_value = "config.json",
        global = true
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh quotes periodically and serve them over HTTP
    Serve(commands::serve::ServeArgs),
    /// Run a single refresh cycle and print the result
    Snapshot(commands::snapshot::SnapshotArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stockwatch=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let config = WatchConfig::load(&cli.config)
        .with_context(|| format!("loading watch list from {}", cli.config.display()))?;

    match &cli.command {
        Commands::Serve(args) => commands::serve::run(args, config).await?,
        Commands::Snapshot(args) => commands::snapshot::run(args, config, &format).await?,
    }

    Ok(())
}
