//! Common types used across the frontend application.
//!
//! This module centralizes type definitions to avoid duplication
//! and ensure consistency across components.
//!
//! # Categories
//!
//! - **Result Types** - Records returned by the prediction endpoint
//! - **Error Types** - Frontend error handling

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

// =============================================================================
// Result Types
// =============================================================================

/// A single cell of a prediction record.
///
/// Numbers keep the integer/float distinction of the JSON they came from,
/// so `3` stays `3` on export instead of turning into `3.0`.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    /// Any JSON number
    Number(Number),
    /// JSON string
    Text(String),
    /// JSON boolean
    Bool(bool),
    /// JSON null (or a missing field)
    Null,
    /// Arrays and objects, kept as-is
    Nested(Value),
}

impl CellValue {
    /// `true` for JSON null.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric value, if this cell holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => CellValue::Number(n),
            Value::String(s) => CellValue::Text(s),
            Value::Bool(b) => CellValue::Bool(b),
            Value::Null => CellValue::Null,
            nested => CellValue::Nested(nested),
        }
    }
}

/// Plain string form of a cell: null is empty, integral floats drop their `.0`.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => f.write_str(&number_to_string(n)),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Null => Ok(()),
            CellValue::Nested(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(n) => n.serialize(serializer),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Null => serializer.serialize_unit(),
            CellValue::Nested(v) => v.serialize(serializer),
        }
    }
}

fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => js_number_string(f),
        _ => n.to_string(),
    }
}

/// Float text as JavaScript's `String(number)` writes it.
///
/// Plain notation for decimal exponents in `-7..21`, otherwise
/// `d.ddde±x`. Negative zero prints as `0`.
pub fn js_number_string(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };

    // Shortest round-trip digits, e.g. "1.2345e3"
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let k = digits.len() as i32;
    let point = exponent + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let (first, rest) = digits.split_at(1);
        let mantissa = if rest.is_empty() {
            first.to_string()
        } else {
            format!("{}.{}", first, rest)
        };
        let exp_sign = if exponent >= 0 { "+" } else { "-" };
        format!("{}e{}{}", mantissa, exp_sign, exponent.abs())
    };

    format!("{}{}", sign, body)
}

/// One prediction row: field names mapped to cells, in server order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used mostly by tests and fixtures.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, replacing an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<CellValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Field names in their original order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Objects keep their key order; any other JSON value yields a record without fields.
impl From<Value> for Record {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Record {
                fields: map.into_iter().map(|(k, v)| (k, CellValue::from(v))).collect(),
            },
            _ => Record::default(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Record::from)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map(CellValue::Number).unwrap_or(CellValue::Null)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// Ordered records returned by one upload.
///
/// The column list comes from the first record only. Later records with
/// other keys are not reconciled: missing fields show as empty cells and
/// extra fields are not displayed or exported to CSV.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<Record>,
}

impl ResultSet {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names, in the key order of the first record.
    pub fn columns(&self) -> Vec<String> {
        self.records
            .first()
            .map(|r| r.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

impl FromIterator<Record> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
///
/// Unified error type for all frontend operations.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// Non-success HTTP status from the prediction endpoint.
    Server(u16),
    /// Network/HTTP error.
    Network(String),
    /// Response body is not the expected JSON.
    Parse(String),
    /// Request could not be built.
    Request(String),
    /// Browser download could not be started.
    Download(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Server(status) => write!(f, "Server error: {}", status),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Parse(msg) => write!(f, "Invalid response: {}", msg),
            AppError::Request(msg) => write!(f, "Request error: {}", msg),
            AppError::Download(msg) => write!(f, "Download error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_keeps_key_order() {
        let record: Record = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_non_object_record_has_no_fields() {
        assert!(Record::from(json!(42)).is_empty());
        assert!(Record::from(json!(null)).is_empty());
    }

    #[test]
    fn test_columns_from_first_record() {
        let set = ResultSet::new(vec![
            Record::new().with_field("fare", 12.5).with_field("distance", 3),
            Record::new().with_field("other", "x"),
        ]);
        assert_eq!(set.columns(), vec!["fare", "distance"]);
        assert!(ResultSet::default().columns().is_empty());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::from(json!(3)).to_string(), "3");
        assert_eq!(CellValue::from(json!(3.0)).to_string(), "3");
        assert_eq!(CellValue::from(json!(12.5)).to_string(), "12.5");
        assert_eq!(CellValue::from(json!(-0.0)).to_string(), "0");
        assert_eq!(CellValue::from(json!(true)).to_string(), "true");
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::from(json!([1, 2])).to_string(), "[1,2]");
    }

    #[test]
    fn test_float_text_matches_javascript() {
        assert_eq!(js_number_string(0.000001), "0.000001");
        assert_eq!(js_number_string(1e-7), "1e-7");
        assert_eq!(js_number_string(123.456), "123.456");
        assert_eq!(js_number_string(-0.5), "-0.5");
        assert_eq!(js_number_string(100.0), "100");
        assert_eq!(js_number_string(-0.0), "0");
        assert_eq!(js_number_string(1e20), "100000000000000000000");
        assert_eq!(js_number_string(1e21), "1e+21");
        assert_eq!(js_number_string(1.5e300), "1.5e+300");
        assert_eq!(js_number_string(2.5e-10), "2.5e-10");
    }

    #[test]
    fn test_small_float_cell_is_not_exponent() {
        assert_eq!(CellValue::from(json!(0.000001)).to_string(), "0.000001");
        assert_eq!(CellValue::from(json!(0.00012)).to_string(), "0.00012");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = Record::new().with_field("a", 1).with_field("b", 2);
        record.insert("a", "x");
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&CellValue::Text("x".into())));
    }

    #[test]
    fn test_server_error_message() {
        assert_eq!(AppError::Server(500).to_string(), "Server error: 500");
    }
}
