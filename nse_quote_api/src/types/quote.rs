//! Equity quote document returned by the `/api/quote-equity` endpoint.
//!
//! Only the fields the dashboard needs are modelled; everything else in the
//! upstream payload is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Top-level quote document for one equity symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEquity {
    pub info: Info,
    pub metadata: Metadata,
    pub price_info: PriceInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    /// Exchange symbol, e.g. `TCS`.
    pub symbol: String,
    pub company_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Exchange-formatted timestamp, e.g. `16-Oct-2026 15:30:00`. Passed through verbatim.
    pub last_update_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceInfo {
    pub last_price: f64,
    pub previous_close: f64,
    pub open: f64,
    /// Intraday high and low.
    pub intra_day_high_low: HighLow,
    /// 52-week high and low.
    pub week_high_low: HighLow,
}

/// A `{max, min}` pair. Extra keys such as `value` or `maxDate` are ignored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HighLow {
    pub max: f64,
    pub min: f64,
}
