//! Display model for the results table.
//!
//! Turns a [`ResultSet`] into plain header/row strings so the component
//! only has to lay them out.

use crate::config::DECIMAL_PLACES;
use crate::types::{js_number_string, CellValue, ResultSet};

/// Format a cell for the table.
///
/// Numbers always get [`DECIMAL_PLACES`] digits (Rust float formatting,
/// exact binary ties round half to even). Null shows as an empty cell.
pub fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => match n.as_f64() {
            Some(f) => fixed_decimals(f),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Fixed-point text; `-0` loses its sign and magnitudes from 1e21 use
/// exponent notation, as `Number.prototype.toFixed` does.
fn fixed_decimals(value: f64) -> String {
    if value == 0.0 {
        return format!("{:.*}", DECIMAL_PLACES, 0.0);
    }
    if value.abs() >= 1e21 {
        return js_number_string(value);
    }
    format!("{:.*}", DECIMAL_PLACES, value)
}

/// Header and formatted rows of a rendered result set.
#[derive(Clone, Debug, PartialEq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    /// `None` for an empty set, which the UI shows as a placeholder.
    pub fn from_results(results: &ResultSet) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let headers = results.columns();
        let rows = results
            .records()
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|key| record.get(key).map(format_cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        Some(Self { headers, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;
    use serde_json::json;

    #[test]
    fn test_numbers_get_four_decimals() {
        assert_eq!(format_cell(&CellValue::from(json!(3))), "3.0000");
        assert_eq!(format_cell(&CellValue::from(json!(3.14159))), "3.1416");
        assert_eq!(format_cell(&CellValue::from(json!(12.5))), "12.5000");
        assert_eq!(format_cell(&CellValue::from(json!(-2.00004))), "-2.0000");
    }

    #[test]
    fn test_negative_zero_and_huge_values() {
        assert_eq!(format_cell(&CellValue::from(-0.0)), "0.0000");
        assert_eq!(format_cell(&CellValue::from(-0.00001)), "-0.0000");
        assert_eq!(format_cell(&CellValue::from(1e21)), "1e+21");
        assert_eq!(format_cell(&CellValue::from(-2.5e22)), "-2.5e+22");
    }

    #[test]
    fn test_exact_tie_rounds_half_to_even() {
        // 0.03125 is exactly representable, so this is a true tie.
        assert_eq!(format_cell(&CellValue::from(json!(0.03125))), "0.0312");
        assert_eq!(format_cell(&CellValue::from(json!(0.09375))), "0.0938");
    }

    #[test]
    fn test_non_numeric_cells() {
        assert_eq!(format_cell(&CellValue::Null), "");
        assert_eq!(format_cell(&CellValue::from("abc")), "abc");
        assert_eq!(format_cell(&CellValue::from(json!("3.5"))), "3.5");
        assert_eq!(format_cell(&CellValue::from(json!(false))), "false");
    }

    #[test]
    fn test_empty_set_has_no_table() {
        assert_eq!(TableView::from_results(&ResultSet::default()), None);
    }

    #[test]
    fn test_fare_and_distance_table() {
        let results: ResultSet =
            serde_json::from_value(json!([{"fare": 12.5, "distance": 3}])).unwrap();
        let table = TableView::from_results(&results).unwrap();

        assert_eq!(table.headers, vec!["fare", "distance"]);
        assert_eq!(table.rows, vec![vec!["12.5000", "3.0000"]]);
    }

    #[test]
    fn test_columns_fixed_by_first_record() {
        let results = ResultSet::new(vec![
            Record::new().with_field("a", 1).with_field("b", "x"),
            Record::new().with_field("b", "y").with_field("c", 2),
        ]);
        let table = TableView::from_results(&results).unwrap();

        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0], vec!["1.0000", "x"]);
        assert_eq!(table.rows[1], vec!["", "y"]);
    }
}
