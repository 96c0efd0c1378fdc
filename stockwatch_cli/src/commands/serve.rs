use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use stockwatch_lib::{NseFetcher, RefreshScheduler, WatchConfig};

use crate::server::{self, AppState};

#[derive(Args)]
pub struct ServeArgs {
    /// Address for the HTTP server
    #[arg(long, env = "STOCKWATCH_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,
}

pub async fn run(args: &ServeArgs, config: WatchConfig) -> Result<()> {
    let fetcher = Arc::new(NseFetcher::from_env());
    let scheduler = RefreshScheduler::from_config(fetcher, &config);
    let handle = scheduler.spawn();

    let state = AppState::new(handle.store(), config.refresh_interval_seconds);
    let result = server::serve(state, args.bind, shutdown_signal()).await;

    handle.shutdown().await;
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, shutting down gracefully...");
}
