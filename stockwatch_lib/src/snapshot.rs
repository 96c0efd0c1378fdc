//! Published per-symbol records and the store that swaps them atomically.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SymbolConfig;
use crate::delta::PreviousValues;
use crate::fetcher::RawQuote;
use crate::metrics::{Direction, Valuation};

/// One row of the dashboard. Field order is the JSON order served by `/api/stocks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    /// 1-based position in the configured list, zero-padded to two digits.
    pub serial_number: String,
    pub symbol: String,
    pub company_name: String,
    /// Quantity held.
    pub qoh: u64,
    pub average_price: f64,
    pub last_price: f64,
    pub last_updated: String,
    pub prev_last_price: f64,
    pub prev_day_high: f64,
    pub prev_day_low: f64,
    pub change: f64,
    pub percentage_change: f64,
    pub previous_close: f64,
    pub open_price: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub week_high: f64,
    pub week_low: f64,
    pub average_value: f64,
    pub current_value: f64,
}

impl StockRecord {
    pub fn new(
        serial: usize,
        position: &SymbolConfig,
        raw: RawQuote,
        previous: PreviousValues,
        valuation: Valuation,
    ) -> Self {
        Self {
            serial_number: format_serial(serial),
            symbol: raw.symbol,
            company_name: raw.company_name,
            qoh: position.quantity_available,
            average_price: position.average_price,
            last_price: raw.last_price,
            last_updated: raw.last_updated,
            prev_last_price: previous.last_price,
            prev_day_high: previous.day_high,
            prev_day_low: previous.day_low,
            change: valuation.change,
            percentage_change: valuation.percentage_change,
            previous_close: raw.previous_close,
            open_price: raw.open,
            day_high: raw.day_high,
            day_low: raw.day_low,
            week_high: raw.week_high,
            week_low: raw.week_low,
            average_value: valuation.average_value,
            current_value: valuation.current_value,
        }
    }

    pub fn last_price_direction(&self) -> Direction {
        Direction::between(self.prev_last_price, self.last_price)
    }

    pub fn day_high_direction(&self) -> Direction {
        Direction::between(self.prev_day_high, self.day_high)
    }

    pub fn day_low_direction(&self) -> Direction {
        Direction::between(self.prev_day_low, self.day_low)
    }
}

pub fn format_serial(serial: usize) -> String {
    format!("{:02}", serial)
}

/// The records of one completed refresh cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    /// 0 until the first publish, then incremented by every publish.
    pub version: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub records: Vec<StockRecord>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Latest published snapshot, shared between the refresh task and readers.
///
/// Readers get an `Arc` to an immutable snapshot; `publish` replaces the
/// whole `Arc` under a write lock, so a reader holds either the previous
/// snapshot or the new one in full. Cloning the store shares the same state.
#[derive(Clone, Default)]
pub struct SnapshotStore {
    current: Arc<RwLock<Arc<Snapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the latest snapshot; empty with version 0 before the first publish.
    pub fn get(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.current.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Replaces the visible snapshot and returns its version.
    pub fn publish(&self, records: Vec<StockRecord>) -> u64 {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let version = guard.version + 1;
        *guard = Arc::new(Snapshot {
            version,
            published_at: Some(Utc::now()),
            records,
        });
        version
    }
}
