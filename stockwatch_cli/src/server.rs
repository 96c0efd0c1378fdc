//! HTTP surface: the JSON API over the snapshot store and the embedded dashboard.

use std::future::Future;
use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use stockwatch_lib::analysis::{self, PortfolioSummary};
use stockwatch_lib::{SnapshotStore, StockRecord};
use tower_http::trace::TraceLayer;

const DASHBOARD_HTML: &str = include_str!("../static/index.html");

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SnapshotStore,
    pub refresh_interval_seconds: u64,
}

impl AppState {
    pub fn new(store: SnapshotStore, refresh_interval_seconds: u64) -> Self {
        Self {
            store,
            refresh_interval_seconds,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub version: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub refresh_interval_seconds: u64,
    #[serde(flatten)]
    pub summary: PortfolioSummary,
}

/// Latest snapshot as a JSON array; empty before the first cycle completes.
pub async fn stocks_handler(State(state): State<AppState>) -> Json<Vec<StockRecord>> {
    let snapshot = state.store.get();
    tracing::debug!(version = snapshot.version, "Serving {} records", snapshot.len());
    Json(snapshot.records.clone())
}

pub async fn summary_handler(State(state): State<AppState>) -> Json<SummaryResponse> {
    let snapshot = state.store.get();
    Json(SummaryResponse {
        version: snapshot.version,
        published_at: snapshot.published_at,
        refresh_interval_seconds: state.refresh_interval_seconds,
        summary: analysis::summarize(&snapshot.records),
    })
}

pub async fn dashboard_handler(State(state): State<AppState>) -> Html<String> {
    Html(DASHBOARD_HTML.replace(
        "__REFRESH_MS__",
        &(state.refresh_interval_seconds * 1000).to_string(),
    ))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/api/stocks", get(stocks_handler))
        .route("/api/summary", get(summary_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves until `shutdown` resolves, then drains open connections.
pub async fn serve<S>(state: AppState, addr: SocketAddr, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    tracing::info!("Registering routes:");
    tracing::info!("  GET /");
    tracing::info!("  GET /api/stocks");
    tracing::info!("  GET /api/summary");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
