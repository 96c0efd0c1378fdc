//! Portfolio-level aggregation over a published snapshot.
//!
//! Operates on the records of one snapshot only, so symbols that failed in
//! the latest cycle are absent from the totals.

use serde::Serialize;

use crate::metrics::round2;
use crate::snapshot::StockRecord;

/// Totals across every holding in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub holdings: usize,
    pub total_average_value: f64,
    pub total_current_value: f64,
    /// `total_current_value - total_average_value`
    pub change: f64,
    /// Change relative to the invested total, 0 when nothing is invested.
    pub percentage_change: f64,
}

/// Sums invested and current values across `records`.
pub fn summarize(records: &[StockRecord]) -> PortfolioSummary {
    let total_average_value = round2(records.iter().map(|r| r.average_value).sum());
    let total_current_value = round2(records.iter().map(|r| r.current_value).sum());
    let change = round2(total_current_value - total_average_value);
    let percentage_change = if total_average_value != 0.0 {
        round2(change / total_average_value * 100.0)
    } else {
        0.0
    };
    PortfolioSummary {
        holdings: records.len(),
        total_average_value,
        total_current_value,
        change,
        percentage_change,
    }
}

/// Records ordered by percentage change, best performer first.
pub fn top_movers(records: &[StockRecord], limit: usize) -> Vec<&StockRecord> {
    let mut sorted: Vec<&StockRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.percentage_change.total_cmp(&a.percentage_change));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: &str, average_value: f64, current_value: f64, pct: f64) -> StockRecord {
        StockRecord {
            serial_number: "01".to_string(),
            symbol: symbol.to_string(),
            company_name: String::new(),
            qoh: 1,
            average_price: average_value,
            last_price: current_value,
            last_updated: String::new(),
            prev_last_price: current_value,
            prev_day_high: current_value,
            prev_day_low: current_value,
            change: 0.0,
            percentage_change: pct,
            previous_close: 0.0,
            open_price: 0.0,
            day_high: current_value,
            day_low: current_value,
            week_high: current_value,
            week_low: current_value,
            average_value,
            current_value,
        }
    }

    #[test]
    fn test_summarize_totals() {
        let records = vec![
            record("TCS", 1000.0, 1100.0, 10.0),
            record("INFY", 500.0, 450.0, -10.0),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.holdings, 2);
        assert_eq!(summary.total_average_value, 1500.0);
        assert_eq!(summary.total_current_value, 1550.0);
        assert_eq!(summary.change, 50.0);
        assert_eq!(summary.percentage_change, 3.33);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.holdings, 0);
        assert_eq!(summary.total_current_value, 0.0);
        assert_eq!(summary.percentage_change, 0.0);
    }

    #[test]
    fn test_summarize_rounds_float_sums() {
        let records = vec![record("A", 0.1, 0.1, 0.0), record("B", 0.2, 0.2, 0.0)];
        assert_eq!(summarize(&records).total_average_value, 0.3);
    }

    #[test]
    fn test_top_movers() {
        let records = vec![
            record("TCS", 1.0, 1.0, 2.5),
            record("INFY", 1.0, 1.0, -4.0),
            record("WIPRO", 1.0, 1.0, 7.25),
        ];
        let top = top_movers(&records, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].symbol, "WIPRO");
        assert_eq!(top[1].symbol, "TCS");
    }
}
