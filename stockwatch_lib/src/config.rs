//! Watch-list configuration: the symbols to poll, the position held in each,
//! and the refresh interval.
//!
//! Loaded once at startup from a JSON or TOML file (picked by extension) and
//! never reloaded.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StockWatchError;
use crate::validation;

/// Refresh interval used when the config file does not set one.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 15;

/// One watched symbol and the position held in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolConfig {
    pub symbol: String,
    pub average_price: f64,
    pub quantity_available: u64,
}

impl SymbolConfig {
    pub fn new(symbol: &str, average_price: f64, quantity_available: u64) -> Self {
        Self {
            symbol: symbol.to_string(),
            average_price,
            quantity_available,
        }
    }
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

/// The full watch list. Symbol order is the display order and fixes serial numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    pub stock_symbols: Vec<SymbolConfig>,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
}

impl WatchConfig {
    /// Reads and validates a config file. `.toml` files are parsed as TOML,
    /// everything else as JSON.
    pub fn load(path: &Path) -> Result<Self, StockWatchError> {
        let text = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let config = if is_toml {
            Self::from_toml_str(&text)?
        } else {
            Self::from_json_str(&text)?
        };
        tracing::info!(
            "Loaded {} symbols from {} (refresh every {}s)",
            config.stock_symbols.len(),
            path.display(),
            config.refresh_interval_seconds
        );
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, StockWatchError> {
        let raw: WatchConfig = serde_json::from_str(text)?;
        raw.validated()
    }

    pub fn from_toml_str(text: &str) -> Result<Self, StockWatchError> {
        let raw: WatchConfig = toml::from_str(text)?;
        raw.validated()
    }

    /// Normalizes symbols and checks every field, rejecting duplicates.
    pub fn validated(self) -> Result<Self, StockWatchError> {
        if self.stock_symbols.is_empty() {
            return Err(StockWatchError::Config(
                "stock_symbols must contain at least one symbol".to_string(),
            ));
        }
        let refresh_interval_seconds =
            validation::validate_refresh_interval(self.refresh_interval_seconds)?;

        let mut seen = HashSet::new();
        let mut stock_symbols = Vec::with_capacity(self.stock_symbols.len());
        for entry in self.stock_symbols {
            let symbol = validation::validate_symbol(&entry.symbol)?;
            let average_price = validation::validate_average_price(&symbol, entry.average_price)?;
            if !seen.insert(symbol.clone()) {
                return Err(StockWatchError::Config(format!(
                    "symbol {} is listed more than once",
                    symbol
                )));
            }
            stock_symbols.push(SymbolConfig {
                symbol,
                average_price,
                quantity_available: entry.quantity_available,
            });
        }

        Ok(Self {
            stock_symbols,
            refresh_interval_seconds,
        })
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}
