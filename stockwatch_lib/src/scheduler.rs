//! Periodic refresh of the watch list into the [`SnapshotStore`].
//!
//! Each cycle walks the configured symbols in order, fetches and values each
//! one, and publishes the successful records as a single new snapshot. A
//! symbol that fails, or panics, is logged and left out of that cycle only;
//! the loop itself keeps running until shutdown is signalled.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures::FutureExt;
use nse_quote_api::FailureKind;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::{SymbolConfig, WatchConfig};
use crate::delta::{DeltaTracker, PreviousValues};
use crate::fetcher::{FetchError, QuoteFetcher};
use crate::metrics;
use crate::snapshot::{StockRecord, SnapshotStore};

/// Consecutive failed cycles after which carried-forward previous values are reported.
pub const CARRY_FORWARD_WARN_CYCLES: u32 = 3;

/// Why a symbol is missing from a cycle's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    Fetch(FailureKind),
    Panic,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(kind) => write!(f, "{}", kind),
            Self::Panic => write!(f, "panic"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolFailure {
    pub serial: usize,
    pub symbol: String,
    pub cause: FailureCause,
    pub message: String,
    /// Failed cycles in a row for this symbol, including this one.
    pub consecutive: u32,
}

/// Outcome of one refresh cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// 1-based cycle counter for this scheduler.
    pub cycle: u64,
    /// Snapshot version published at the end of the cycle.
    pub version: u64,
    pub succeeded: usize,
    pub failures: Vec<SymbolFailure>,
    pub elapsed: Duration,
}

/// Drives refresh cycles for a fixed list of symbols.
///
/// Symbols are fetched one after another in configuration order, which is
/// also the order of the published records and the source of their serial
/// numbers. The delta tracker and snapshot store are shared handles so the
/// HTTP layer can read the store while the scheduler owns the writes.
pub struct RefreshScheduler<F: ?Sized> {
    fetcher: Arc<F>,
    symbols: Vec<SymbolConfig>,
    interval: Duration,
    tracker: Arc<DeltaTracker>,
    store: SnapshotStore,
    cycles: AtomicU64,
    failure_streaks: DashMap<String, u32>,
}

impl<F: QuoteFetcher + ?Sized> RefreshScheduler<F> {
    pub fn new(fetcher: Arc<F>, symbols: Vec<SymbolConfig>, interval: Duration) -> Self {
        Self {
            fetcher,
            symbols,
            interval,
            tracker: Arc::new(DeltaTracker::new()),
            store: SnapshotStore::new(),
            cycles: AtomicU64::new(0),
            failure_streaks: DashMap::new(),
        }
    }

    pub fn from_config(fetcher: Arc<F>, config: &WatchConfig) -> Self {
        Self::new(
            fetcher,
            config.stock_symbols.clone(),
            config.refresh_interval(),
        )
    }

    /// Uses an existing tracker and store instead of fresh ones.
    pub fn with_state(mut self, tracker: Arc<DeltaTracker>, store: SnapshotStore) -> Self {
        self.tracker = tracker;
        self.store = store;
        self
    }

    pub fn store(&self) -> SnapshotStore {
        self.store.clone()
    }

    pub fn tracker(&self) -> Arc<DeltaTracker> {
        Arc::clone(&self.tracker)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn symbols(&self) -> &[SymbolConfig] {
        &self.symbols
    }

    pub fn consecutive_failures(&self, symbol: &str) -> u32 {
        self.failure_streaks
            .get(symbol)
            .map(|streak| *streak)
            .unwrap_or(0)
    }

    async fn refresh_symbol(
        &self,
        serial: usize,
        position: &SymbolConfig,
    ) -> Result<StockRecord, FetchError> {
        let raw = self.fetcher.fetch(&position.symbol).await?;
        let previous = self.tracker.observe(
            &position.symbol,
            PreviousValues::new(raw.last_price, raw.day_high, raw.day_low),
        );
        let valuation = metrics::compute(&raw, position);
        Ok(StockRecord::new(serial, position, raw, previous, valuation))
    }

    fn record_failure(
        &self,
        serial: usize,
        position: &SymbolConfig,
        cause: FailureCause,
        message: String,
    ) -> SymbolFailure {
        let consecutive = {
            let mut streak = self
                .failure_streaks
                .entry(position.symbol.clone())
                .or_insert(0);
            *streak += 1;
            *streak
        };
        if consecutive >= CARRY_FORWARD_WARN_CYCLES && self.tracker.get(&position.symbol).is_some()
        {
            tracing::warn!(
                symbol = %position.symbol,
                consecutive,
                "Previous values carried forward from an older cycle"
            );
        }
        SymbolFailure {
            serial,
            symbol: position.symbol.clone(),
            cause,
            message,
            consecutive,
        }
    }

    /// Runs one full pass over the watch list and publishes the result.
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let started = Instant::now();
        let mut records = Vec::with_capacity(self.symbols.len());
        let mut failures = Vec::new();

        for (idx, position) in self.symbols.iter().enumerate() {
            let serial = idx + 1;
            let outcome = AssertUnwindSafe(self.refresh_symbol(serial, position))
                .catch_unwind()
                .await;
            match outcome {
                Ok(Ok(record)) => {
                    self.failure_streaks.remove(&position.symbol);
                    records.push(record);
                }
                Ok(Err(err)) => {
                    tracing::warn!(
                        cycle,
                        symbol = %position.symbol,
                        cause = %err.kind(),
                        "Error fetching data for {}: {}",
                        position.symbol,
                        err
                    );
                    let cause = FailureCause::Fetch(err.kind());
                    failures.push(self.record_failure(serial, position, cause, err.to_string()));
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(
                        cycle,
                        symbol = %position.symbol,
                        "Refreshing {} panicked: {}",
                        position.symbol,
                        message
                    );
                    failures.push(self.record_failure(serial, position, FailureCause::Panic, message));
                }
            }
        }

        let succeeded = records.len();
        let version = self.store.publish(records);
        let elapsed = started.elapsed();
        tracing::info!(
            cycle,
            version,
            succeeded,
            failed = failures.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Stock data updated"
        );

        CycleReport {
            cycle,
            version,
            succeeded,
            failures,
            elapsed,
        }
    }

    /// Runs cycles separated by the refresh interval until `shutdown` turns
    /// `true` or its sender is dropped. A cycle in progress is abandoned on
    /// shutdown without publishing.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            symbols = self.symbols.len(),
            interval_secs = self.interval.as_secs_f64(),
            "Refresh scheduler started"
        );
        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = self.run_cycle() => {}
                _ = wait_for_shutdown(&mut shutdown) => break,
            }
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = wait_for_shutdown(&mut shutdown) => break,
            }
        }
        tracing::info!("Refresh scheduler stopped");
    }
}

impl<F: QuoteFetcher + ?Sized + 'static> RefreshScheduler<F> {
    /// Moves the scheduler onto its own task and returns a handle to stop it.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown, rx) = watch::channel(false);
        let store = self.store.clone();
        let task = tokio::spawn(async move { self.run(rx).await });
        SchedulerHandle {
            shutdown,
            task,
            store,
        }
    }
}

/// Handle to a spawned scheduler task.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
    store: SnapshotStore,
}

impl SchedulerHandle {
    pub fn store(&self) -> SnapshotStore {
        self.store.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signals shutdown and waits for the loop to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::error!("Refresh scheduler task failed: {}", e);
        }
    }
}

async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    // an Err means the sender is gone, which is treated as shutdown
    let _ = rx.wait_for(|stop| *stop).await;
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
