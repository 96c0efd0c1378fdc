//! [`QuoteFetcher`] backed by the NSE quote API client.

use std::time::Duration;

use async_trait::async_trait;
use nse_quote_api::Client;

use crate::fetcher::{FetchError, QuoteFetcher, RawQuote};

/// Fetches quotes from NSE, reusing one cookie session across symbols.
///
/// `STOCKWATCH_BASE_URL` points the client at a different host (mirrors,
/// local mocks) and `STOCKWATCH_FETCH_TIMEOUT_SECS` overrides the 10 second
/// per-fetch budget.
pub struct NseFetcher {
    inner: Client,
}

impl NseFetcher {
    /// Creates a fetcher using the production site.
    pub fn new() -> Self {
        Self {
            inner: Client::new(),
        }
    }

    /// Creates a fetcher with a custom base URL. Used for testing.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            inner: Client::with_base_url(base_url),
        }
    }

    /// Builds a fetcher from `STOCKWATCH_BASE_URL` and `STOCKWATCH_FETCH_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let client = match std::env::var("STOCKWATCH_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => Client::with_base_url(url.trim()),
            _ => Client::new(),
        };
        let timeout = env_u64(
            "STOCKWATCH_FETCH_TIMEOUT_SECS",
            nse_quote_api::DEFAULT_TIMEOUT.as_secs(),
        );
        Self {
            inner: client.with_timeout(Duration::from_secs(timeout.max(1))),
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            inner: self.inner.with_timeout(timeout),
        }
    }

    /// Forces a new handshake on the next fetch.
    pub fn reset_session(&self) {
        self.inner.reset_session();
    }
}

impl Default for NseFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteFetcher for NseFetcher {
    async fn fetch(&self, symbol: &str) -> Result<RawQuote, FetchError> {
        let quote = self.inner.get_quote_equity(symbol).await?;
        RawQuote::try_from(quote)
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}
