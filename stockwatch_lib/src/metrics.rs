//! Position valuation: change against the average purchase price and the
//! invested/current value of a holding.
//!
//! All results are rounded with [`round2`], which rounds half away from zero
//! (`f64::round`) on the binary value. A price such as `2.675` is stored as
//! `2.67499999...` and therefore rounds to `2.67`.

use serde::Serialize;

use crate::config::SymbolConfig;
use crate::fetcher::RawQuote;

/// Rounds to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derived figures for one holding at one quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Valuation {
    /// `last_price - average_price`
    pub change: f64,
    /// `change / average_price * 100`, or exactly 0 when the average price is 0.
    pub percentage_change: f64,
    /// `quantity * average_price`
    pub average_value: f64,
    /// `quantity * last_price`
    pub current_value: f64,
}

/// Values a holding at the quote's last price.
pub fn compute(raw: &RawQuote, position: &SymbolConfig) -> Valuation {
    valuation(
        raw.last_price,
        position.average_price,
        position.quantity_available,
    )
}

pub fn valuation(last_price: f64, average_price: f64, quantity: u64) -> Valuation {
    let qty = quantity as f64;
    let change = round2(last_price - average_price);
    let percentage_change = if average_price != 0.0 {
        round2(change / average_price * 100.0)
    } else {
        0.0
    };
    Valuation {
        change,
        percentage_change,
        average_value: round2(qty * average_price),
        current_value: round2(qty * last_price),
    }
}

/// Movement of a value since the previous refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Unchanged,
}

impl Direction {
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Self::Up
        } else if current < previous {
            Self::Down
        } else {
            Self::Unchanged
        }
    }

    /// Arrow shown next to a value. Day lows are displayed with the
    /// inverted direction, so a rising low shows ▼.
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Unchanged => "■",
        }
    }

    pub fn inverted(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Unchanged => Self::Unchanged,
        }
    }
}
