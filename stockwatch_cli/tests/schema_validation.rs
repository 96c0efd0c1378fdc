use serde_json::Value;
use std::path::{Path, PathBuf};
use stockwatch_lib::metrics;
use stockwatch_lib::{PreviousValues, RawQuote, StockRecord, SymbolConfig};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("CLI crate should be inside workspace")
        .to_path_buf()
}

fn load_fixture(name: &str) -> Value {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read fixture {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("fixture is valid JSON")
}

fn load_schema(name: &str) -> Value {
    let path = workspace_root().join("schema").join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read schema {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("schema is valid JSON")
}

fn validator() -> jsonschema::Validator {
    let schema = load_schema("stock_record.schema.json");
    jsonschema::draft202012::new(&schema).expect("stock record schema compiles")
}

fn built_record(serial: usize) -> StockRecord {
    let position = SymbolConfig::new("M&M", 2890.5, 3);
    let raw = RawQuote {
        symbol: "M&M".to_string(),
        company_name: "Mahindra & Mahindra Limited".to_string(),
        last_price: 2950.0,
        day_high: 2961.4,
        day_low: 2902.05,
        previous_close: 2911.3,
        open: 2915.0,
        week_high: 3222.7,
        week_low: 1800.0,
        last_updated: "16-Oct-2026 15:30:00".to_string(),
    };
    let valuation = metrics::compute(&raw, &position);
    StockRecord::new(
        serial,
        &position,
        raw,
        PreviousValues::new(2940.0, 2961.4, 2900.0),
        valuation,
    )
}

// ---------------------------------------------------------------------------
// Positive validation
// ---------------------------------------------------------------------------

#[test]
fn test_stocks_fixture_conforms_to_schema() {
    let data = load_fixture("stocks.json");
    let result = validator().validate(&data);
    if let Err(e) = &result {
        panic!("stocks fixture failed validation: {e}");
    }
}

#[test]
fn test_serialized_records_conform_to_schema() {
    let data = serde_json::to_value(vec![built_record(1), built_record(12)]).unwrap();
    let result = validator().validate(&data);
    if let Err(e) = &result {
        panic!("serialized records failed validation: {e}");
    }
}

#[test]
fn test_empty_array_conforms_to_schema() {
    let empty = serde_json::json!([]);
    let result = validator().validate(&empty);
    if let Err(e) = &result {
        panic!("empty array should conform: {e}");
    }
}

// ---------------------------------------------------------------------------
// Negative validation: schema rejects invalid data
// ---------------------------------------------------------------------------

#[test]
fn test_schema_rejects_missing_required_field() {
    let mut data = load_fixture("stocks.json");
    data[0]
        .as_object_mut()
        .expect("record is an object")
        .remove("prev_last_price");

    assert!(
        validator().validate(&data).is_err(),
        "schema should reject record missing prev_last_price"
    );
}

#[test]
fn test_schema_rejects_unpadded_serial() {
    let mut data = load_fixture("stocks.json");
    data[0]
        .as_object_mut()
        .expect("record is an object")
        .insert("serial_number".to_string(), Value::String("1".to_string()));

    assert!(
        validator().validate(&data).is_err(),
        "schema should reject a single-digit serial"
    );
}

#[test]
fn test_schema_rejects_fractional_quantity() {
    let mut data = load_fixture("stocks.json");
    data[1]
        .as_object_mut()
        .expect("record is an object")
        .insert("qoh".to_string(), serde_json::json!(2.5));

    assert!(
        validator().validate(&data).is_err(),
        "schema should reject a fractional quantity"
    );
}

// ---------------------------------------------------------------------------
// Edge cases
// ---------------------------------------------------------------------------

#[test]
fn test_schema_rejects_additional_properties() {
    let mut data = load_fixture("stocks.json");
    data[0]
        .as_object_mut()
        .expect("record is an object")
        .insert("bogusField".to_string(), Value::Number(123.into()));

    assert!(
        validator().validate(&data).is_err(),
        "schema should reject additional properties"
    );
}
