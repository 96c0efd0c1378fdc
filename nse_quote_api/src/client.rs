//! HTTP client for the NSE equity quote API.

use std::sync::Mutex;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use url::Url;

use crate::{types::QuoteEquity, user_agent::get_user_agent, Error};

/// Upper bound for one `get_quote_equity` call, handshake and retry included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const HANDSHAKE_PATH: &str = "/get-quotes/equity";
const QUOTE_PATH: &str = "/api/quote-equity";

/// HTTP client for the NSE quote API.
///
/// The API only answers requests that carry the cookies handed out by the
/// public quote page, so every session starts with a handshake `GET` of that
/// page through a cookie-storing `reqwest::Client`. The session is cached and
/// shared by all symbols until the API rejects it with 401/403, at which point
/// it is thrown away, a fresh handshake is made and the request is retried once.
pub struct Client {
    /// Base URL for the site. Defaults to `https://www.nseindia.com`.
    base_api_url: String,
    timeout: Duration,
    session: Mutex<Option<reqwest::Client>>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production NSE site.
    pub fn new() -> Self {
        Self::with_base_url("https://www.nseindia.com")
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            session: Mutex::new(None),
        }
    }

    /// Overrides the total time allowed for a single quote fetch.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn get_url(&self, path: &str, symbol: &str) -> Result<Url, Error> {
        let mut url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str())
            .map_err(|e| {
                tracing::error!("Invalid URL constructed: {}", e);
                Error::InvalidSymbol(symbol.to_string())
            })?;
        url.query_pairs_mut().append_pair("symbol", symbol);
        Ok(url)
    }

    fn build_session(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::DNT, HeaderValue::from_static("1"));
        let referer = HeaderValue::from_str(&format!("{}/", self.base_api_url)).map_err(|e| {
            tracing::error!("Invalid referer header: {}", e);
            Error::Network(e.to_string())
        })?;
        headers.insert(header::REFERER, referer);

        // accept-encoding is added by reqwest's gzip support
        reqwest::Client::builder()
            .user_agent(get_user_agent())
            .default_headers(headers)
            .cookie_store(true)
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Network(e.to_string())
            })
    }

    /// Loads the public quote page so the session picks up its cookies.
    /// Returns whether the page answered with a success status.
    async fn handshake(&self, http: &reqwest::Client, symbol: &str) -> Result<bool, Error> {
        let url = self.get_url(HANDSHAKE_PATH, symbol)?;
        let resp = http.get(url).send().await.map_err(|e| {
            tracing::debug!("Handshake request for {} failed: {}", symbol, e);
            Error::from_reqwest(e)
        })?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("Handshake for {} returned status {}", symbol, status);
        } else {
            tracing::debug!("Handshake for {} returned status {}", symbol, status);
        }
        Ok(status.is_success())
    }

    /// Returns the cached session, or a new one with a completed handshake.
    /// The flag is `true` when the session was created by this call.
    async fn session(&self, symbol: &str) -> Result<(reqwest::Client, bool), Error> {
        let cached = self
            .session
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(http) = cached {
            return Ok((http, false));
        }

        let http = self.build_session()?;
        if self.handshake(&http, symbol).await? {
            *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(http.clone());
        }
        Ok((http, true))
    }

    /// Drops the cached session so the next request performs a new handshake.
    pub fn reset_session(&self) {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    async fn request_quote(
        &self,
        http: &reqwest::Client,
        symbol: &str,
    ) -> Result<QuoteEquity, Error> {
        let url = self.get_url(QUOTE_PATH, symbol)?;
        let resp = http.get(url).send().await.map_err(|e| {
            tracing::debug!("Failed to get quote for {}: {}", symbol, e);
            Error::from_reqwest(e)
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::debug!("Failed to read response body for {}: {}", symbol, e);
            Error::from_reqwest(e)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::debug!("Quote for {} failed with status {}: {}", symbol, status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<QuoteEquity>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::debug!("Failed to parse quote for {}: {} | body: {}", symbol, e, snippet);
            Error::Parse(e.to_string())
        })
    }

    async fn fetch_with_session(&self, symbol: &str) -> Result<QuoteEquity, Error> {
        let (http, fresh) = self.session(symbol).await?;
        match self.request_quote(&http, symbol).await {
            Err(Error::HttpStatus { status, .. }) if !fresh && is_session_rejection(status) => {
                tracing::warn!(
                    "Session rejected with status {} for {}, repeating handshake",
                    status,
                    symbol
                );
                self.reset_session();
                let (http, _) = self.session(symbol).await?;
                self.request_quote(&http, symbol).await
            }
            other => other,
        }
    }

    /// Fetches the quote document for one equity symbol.
    ///
    /// The handshake, the data request and a possible session retry all share
    /// the client timeout; running past it yields [`Error::Timeout`].
    pub async fn get_quote_equity(&self, symbol: &str) -> Result<QuoteEquity, Error> {
        match tokio::time::timeout(self.timeout, self.fetch_with_session(symbol)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!("Quote for {} timed out after {:?}", symbol, self.timeout);
                Err(Error::Timeout)
            }
        }
    }
}

fn is_session_rejection(status: u16) -> bool {
    status == StatusCode::UNAUTHORIZED.as_u16() || status == StatusCode::FORBIDDEN.as_u16()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    match body.char_indices().nth(MAX) {
        None => body.to_string(),
        Some((idx, _)) => format!("{}...[truncated]", &body[..idx]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_symbol() {
        let client = Client::with_base_url("http://localhost:1234/");
        let url = client.get_url(QUOTE_PATH, "M&M").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:1234/api/quote-equity?symbol=M%26M"
        );
    }

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_cuts_long_bodies() {
        let body = "é".repeat(2500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
        assert_eq!(out.chars().count(), 2000 + "...[truncated]".len());
    }

    #[test]
    fn session_rejection_statuses() {
        assert!(is_session_rejection(401));
        assert!(is_session_rejection(403));
        assert!(!is_session_rejection(404));
        assert!(!is_session_rejection(500));
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        assert_eq!(Client::new().timeout(), Duration::from_secs(10));
        let client = Client::new().with_timeout(Duration::from_secs(3));
        assert_eq!(client.timeout(), Duration::from_secs(3));
    }
}
