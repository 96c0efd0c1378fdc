use anyhow::Result;
use serde::Serialize;
use stockwatch_lib::{PortfolioSummary, StockRecord};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct StockRow {
    #[tabled(rename = "#")]
    #[serde(rename = "#")]
    serial: String,
    #[tabled(rename = "Symbol")]
    #[serde(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Company")]
    #[serde(rename = "Company")]
    company: String,
    #[tabled(rename = "Qty")]
    #[serde(rename = "Qty")]
    qty: u64,
    #[tabled(rename = "Avg Price")]
    #[serde(rename = "Avg Price")]
    average_price: String,
    #[tabled(rename = "LTP")]
    #[serde(rename = "LTP")]
    last_price: String,
    #[tabled(rename = "Change")]
    #[serde(rename = "Change")]
    change: String,
    #[tabled(rename = "Change %")]
    #[serde(rename = "Change %")]
    percentage_change: String,
    #[tabled(rename = "Open")]
    #[serde(rename = "Open")]
    open: String,
    #[tabled(rename = "Prev Close")]
    #[serde(rename = "Prev Close")]
    previous_close: String,
    #[tabled(rename = "Day High")]
    #[serde(rename = "Day High")]
    day_high: String,
    #[tabled(rename = "Day Low")]
    #[serde(rename = "Day Low")]
    day_low: String,
    #[tabled(rename = "52W High")]
    #[serde(rename = "52W High")]
    week_high: String,
    #[tabled(rename = "52W Low")]
    #[serde(rename = "52W Low")]
    week_low: String,
    #[tabled(rename = "Avg Value")]
    #[serde(rename = "Avg Value")]
    average_value: String,
    #[tabled(rename = "Cur Value")]
    #[serde(rename = "Cur Value")]
    current_value: String,
    #[tabled(rename = "Updated")]
    #[serde(rename = "Updated")]
    last_updated: String,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Holdings")]
    holdings: usize,
    #[tabled(rename = "Avg Value")]
    total_average_value: String,
    #[tabled(rename = "Cur Value")]
    total_current_value: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Change %")]
    percentage_change: String,
}

// -- Row builders --

fn build_stock_rows(records: &[StockRecord]) -> Vec<StockRow> {
    records
        .iter()
        .map(|r| StockRow {
            serial: r.serial_number.clone(),
            symbol: r.symbol.clone(),
            company: sanitize_csv_field(&r.company_name),
            qty: r.qoh,
            average_price: format_price(r.average_price),
            last_price: with_arrow(r.last_price, r.last_price_direction().arrow()),
            change: format_price(r.change),
            percentage_change: format_percent(r.percentage_change),
            open: format_price(r.open_price),
            previous_close: format_price(r.previous_close),
            day_high: with_arrow(r.day_high, r.day_high_direction().arrow()),
            // day low arrows are inverted
            day_low: with_arrow(r.day_low, r.day_low_direction().inverted().arrow()),
            week_high: format_price(r.week_high),
            week_low: format_price(r.week_low),
            average_value: format_price(r.average_value),
            current_value: format_price(r.current_value),
            last_updated: r.last_updated.clone(),
        })
        .collect()
}

fn build_summary_row(summary: &PortfolioSummary) -> SummaryRow {
    SummaryRow {
        holdings: summary.holdings,
        total_average_value: format_price(summary.total_average_value),
        total_current_value: format_price(summary.total_current_value),
        change: format_price(summary.change),
        percentage_change: format_percent(summary.percentage_change),
    }
}

// -- Table output --

pub fn print_stocks_table(records: &[StockRecord]) {
    println!("{}", Table::new(build_stock_rows(records)));
}

pub fn print_summary(summary: &PortfolioSummary) {
    println!("{}", Table::new([build_summary_row(summary)]));
}

// -- Markdown output --

pub fn print_stocks_markdown(records: &[StockRecord]) {
    let mut table = Table::new(build_stock_rows(records));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn print_stocks_csv(records: &[StockRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_stock_rows(records) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_price(value: f64) -> String {
    format!("{:.2}", value)
}

fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

fn with_arrow(value: f64, arrow: &str) -> String {
    format!("{:.2} {}", value, arrow)
}

/// Prefixes values that spreadsheets would evaluate as formulas.
fn sanitize_csv_field(value: &str) -> String {
    match value.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("\t{}", value),
        _ => value.to_string(),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
