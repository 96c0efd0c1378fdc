//! The quote source seam: a [`QuoteFetcher`] turns a symbol into a [`RawQuote`].

use async_trait::async_trait;
use nse_quote_api::types::QuoteEquity;
use nse_quote_api::FailureKind;
use thiserror::Error;

use crate::metrics::round2;

/// Errors from a single symbol fetch. Never escapes the per-symbol boundary
/// of a refresh cycle.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Api(#[from] nse_quote_api::Error),
    #[error("Invalid quote for {symbol}: {field} is not a finite number")]
    NonFinite { symbol: String, field: &'static str },
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Api(e) => e.kind(),
            Self::NonFinite { .. } => FailureKind::Parse,
        }
    }
}

/// Quote fields the dashboard uses, with every price rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    /// Symbol as reported upstream.
    pub symbol: String,
    pub company_name: String,
    pub last_price: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub previous_close: f64,
    pub open: f64,
    pub week_high: f64,
    pub week_low: f64,
    /// Upstream timestamp, passed through verbatim.
    pub last_updated: String,
}

impl TryFrom<QuoteEquity> for RawQuote {
    type Error = FetchError;

    fn try_from(quote: QuoteEquity) -> Result<Self, Self::Error> {
        let symbol = quote.info.symbol;
        let price = |field: &'static str, value: f64| {
            if value.is_finite() {
                Ok(round2(value))
            } else {
                Err(FetchError::NonFinite {
                    symbol: symbol.clone(),
                    field,
                })
            }
        };
        let p = &quote.price_info;
        let raw = RawQuote {
            last_price: price("lastPrice", p.last_price)?,
            day_high: price("intraDayHighLow.max", p.intra_day_high_low.max)?,
            day_low: price("intraDayHighLow.min", p.intra_day_high_low.min)?,
            previous_close: price("previousClose", p.previous_close)?,
            open: price("open", p.open)?,
            week_high: price("weekHighLow.max", p.week_high_low.max)?,
            week_low: price("weekHighLow.min", p.week_high_low.min)?,
            company_name: quote.info.company_name,
            last_updated: quote.metadata.last_update_time,
            symbol: symbol.clone(),
        };
        Ok(raw)
    }
}

/// Source of raw quotes. Implementations own whatever session state the
/// upstream needs and must bound each call with a timeout.
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    async fn fetch(&self, symbol: &str) -> Result<RawQuote, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use nse_quote_api::types::{HighLow, Info, Metadata, PriceInfo};

    fn sample_quote(last_price: f64) -> QuoteEquity {
        QuoteEquity {
            info: Info {
                symbol: "TCS".to_string(),
                company_name: "Tata Consultancy Services Limited".to_string(),
            },
            metadata: Metadata {
                last_update_time: "16-Oct-2026 15:30:00".to_string(),
            },
            price_info: PriceInfo {
                last_price,
                previous_close: 4100.006,
                open: 4105.1,
                intra_day_high_low: HighLow {
                    max: 4140.754,
                    min: 4098.2,
                },
                week_high_low: HighLow {
                    max: 4592.25,
                    min: 3311.8,
                },
            },
        }
    }

    #[test]
    fn raw_quote_rounds_prices() {
        let raw = RawQuote::try_from(sample_quote(4123.456)).unwrap();
        assert_eq!(raw.symbol, "TCS");
        assert_eq!(raw.last_price, 4123.46);
        assert_eq!(raw.previous_close, 4100.01);
        assert_eq!(raw.day_high, 4140.75);
        assert_eq!(raw.day_low, 4098.2);
        assert_eq!(raw.week_high, 4592.25);
        assert_eq!(raw.last_updated, "16-Oct-2026 15:30:00");
    }

    #[test]
    fn raw_quote_rejects_non_finite_price() {
        let err = RawQuote::try_from(sample_quote(f64::NAN)).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
        assert!(err.to_string().contains("lastPrice"));
    }
}
