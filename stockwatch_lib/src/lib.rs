//! Library layer for StockWatch: configuration, quote fetching, valuation,
//! previous-value tracking, and the periodic refresh that publishes snapshots.
//!
//! Wraps the `nse_quote_api` crate behind the [`QuoteFetcher`] seam so the
//! refresh scheduler can run against the live site or a scripted source.

pub mod analysis;
pub mod client;
pub mod config;
pub mod delta;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod scheduler;
pub mod snapshot;
pub mod validation;

pub use nse_quote_api;
pub use nse_quote_api::FailureKind;

pub use analysis::PortfolioSummary;
pub use client::NseFetcher;
pub use config::{SymbolConfig, WatchConfig};
pub use delta::{DeltaTracker, PreviousValues};
pub use error::StockWatchError;
pub use fetcher::{FetchError, QuoteFetcher, RawQuote};
pub use metrics::{Direction, Valuation};
pub use scheduler::{CycleReport, FailureCause, RefreshScheduler, SchedulerHandle, SymbolFailure};
pub use snapshot::{Snapshot, SnapshotStore, StockRecord};
