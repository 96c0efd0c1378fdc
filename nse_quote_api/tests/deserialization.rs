use nse_quote_api::types::QuoteEquity;

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_quote_equity_full() {
    let json = load_fixture("quote_equity_tcs.json");
    let quote: QuoteEquity = serde_json::from_str(&json).unwrap();

    assert_eq!(quote.info.symbol, "TCS");
    assert_eq!(quote.info.company_name, "Tata Consultancy Services Limited");
    assert_eq!(quote.metadata.last_update_time, "16-Oct-2026 15:30:00");
    assert_eq!(quote.price_info.last_price, 4123.456);
    assert_eq!(quote.price_info.previous_close, 4100.006);
    assert_eq!(quote.price_info.open, 4105.1);
    assert_eq!(quote.price_info.intra_day_high_low.max, 4140.75);
    assert_eq!(quote.price_info.intra_day_high_low.min, 4098.2);
    assert_eq!(quote.price_info.week_high_low.max, 4592.25);
    assert_eq!(quote.price_info.week_high_low.min, 3311.8);
}

#[test]
fn deserialize_integer_prices() {
    let json = r#"{
        "info": {"symbol": "X", "companyName": "X Ltd"},
        "metadata": {"lastUpdateTime": "t"},
        "priceInfo": {
            "lastPrice": 100, "previousClose": 99, "open": 98,
            "intraDayHighLow": {"min": 97, "max": 101},
            "weekHighLow": {"min": 50, "max": 150}
        }
    }"#;
    let quote: QuoteEquity = serde_json::from_str(json).unwrap();
    assert_eq!(quote.price_info.last_price, 100.0);
    assert_eq!(quote.price_info.week_high_low.min, 50.0);
}

#[test]
fn deserialize_missing_required_fields_returns_error() {
    let json = load_fixture("quote_equity_missing_price.json");
    let result = serde_json::from_str::<QuoteEquity>(&json);
    assert!(result.is_err());
}

#[test]
fn deserialize_malformed_json_returns_error() {
    let bad_json = r#"{"info": not valid json}"#;
    let result = serde_json::from_str::<QuoteEquity>(bad_json);
    assert!(result.is_err());
}
