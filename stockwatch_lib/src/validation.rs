use crate::error::StockWatchError;

pub const MAX_SYMBOL_LENGTH: usize = 20;
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 1;
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 3600;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, StockWatchError> {
    if input.len() > max_len {
        return Err(StockWatchError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(StockWatchError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate an exchange symbol: trim, uppercase, and restrict to the characters
/// NSE uses in tickers (`A-Z`, `0-9`, `&`, `-`, `_`, `.`), e.g. `M&M`, `BAJAJ-AUTO`.
pub fn validate_symbol(input: &str) -> Result<String, StockWatchError> {
    let upper = sanitize_text(input, MAX_SYMBOL_LENGTH)?.to_uppercase();
    if let Some(bad) = upper
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '&' | '-' | '_' | '.')))
    {
        return Err(StockWatchError::InvalidInput(format!(
            "symbol '{}' contains invalid character '{}'",
            input.trim(),
            bad
        )));
    }
    Ok(upper)
}

/// Validate an average purchase price (finite, >= 0). Zero is allowed and
/// reported as a 0% change.
pub fn validate_average_price(symbol: &str, price: f64) -> Result<f64, StockWatchError> {
    if !price.is_finite() || price < 0.0 {
        return Err(StockWatchError::InvalidInput(format!(
            "average_price for {} must be a finite number >= 0, got {}",
            symbol, price
        )));
    }
    Ok(price)
}

/// Validate the refresh interval (1..=3600 seconds).
pub fn validate_refresh_interval(seconds: u64) -> Result<u64, StockWatchError> {
    if !(MIN_REFRESH_INTERVAL_SECS..=MAX_REFRESH_INTERVAL_SECS).contains(&seconds) {
        return Err(StockWatchError::InvalidInput(format!(
            "refresh_interval_seconds must be between {} and {}",
            MIN_REFRESH_INTERVAL_SECS, MAX_REFRESH_INTERVAL_SECS
        )));
    }
    Ok(seconds)
}
