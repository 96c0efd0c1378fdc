//! Per-symbol "previous value" tracking backed by `DashMap` for concurrent access.

use dashmap::DashMap;
use serde::Serialize;

/// The values of one symbol as seen at its last successful refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PreviousValues {
    pub last_price: f64,
    pub day_high: f64,
    pub day_low: f64,
}

impl PreviousValues {
    pub fn new(last_price: f64, day_high: f64, day_low: f64) -> Self {
        Self {
            last_price,
            day_high,
            day_low,
        }
    }
}

/// Remembers the last observed price, day high and day low for each symbol.
///
/// Entries appear on a symbol's first successful fetch, are overwritten on
/// every later one and are never removed. A failed fetch never reaches the
/// tracker, so a symbol's entry may be several cycles old.
#[derive(Default)]
pub struct DeltaTracker {
    store: DashMap<String, PreviousValues>,
}

impl DeltaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `current` for `symbol` and returns what was stored before.
    ///
    /// The first observation of a symbol returns `current` itself, so a fresh
    /// symbol shows no movement.
    pub fn observe(&self, symbol: &str, current: PreviousValues) -> PreviousValues {
        self.store
            .insert(symbol.to_string(), current)
            .unwrap_or(current)
    }

    /// Returns the stored values for `symbol` without modifying them.
    pub fn get(&self, symbol: &str) -> Option<PreviousValues> {
        self.store.get(symbol).map(|entry| *entry)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
