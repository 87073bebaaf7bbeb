//! Client-side export of the last rendered results.
//!
//! Both formats are generated in the browser and handed to the download
//! mechanism through a short-lived object URL.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::types::{AppError, AppResult, CellValue, ResultSet};

/// Downloadable export formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "predictions.csv",
            ExportFormat::Json => "predictions.json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "Download CSV",
            ExportFormat::Json => "Download JSON",
        }
    }

    /// Serialize the results in this format.
    pub fn render(&self, results: &ResultSet) -> AppResult<String> {
        match self {
            ExportFormat::Csv => Ok(to_csv(results)),
            ExportFormat::Json => to_json(results),
        }
    }
}

/// CSV with an unquoted header from the first record's keys.
///
/// Every value is double-quoted with inner quotes doubled; null or
/// missing values become an empty unquoted field. Lines are joined with
/// `\n` and there is no trailing newline.
pub fn to_csv(results: &ResultSet) -> String {
    let columns = results.columns();
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(columns.join(","));

    for record in results.records() {
        let row: Vec<String> = columns
            .iter()
            .map(|key| match record.get(key) {
                None | Some(CellValue::Null) => String::new(),
                Some(value) => quote_field(&value.to_string()),
            })
            .collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Pretty JSON array, 2-space indented.
pub fn to_json(results: &ResultSet) -> AppResult<String> {
    serde_json::to_string_pretty(results).map_err(|e| AppError::Download(e.to_string()))
}

/// Serialize `results` and hand them to the browser as a file download.
pub fn export_results(results: &ResultSet, format: ExportFormat) -> AppResult<()> {
    let content = format.render(results)?;
    download(&content, format)?;
    log::info!("💾 Exported {} record(s) to {}", results.len(), format.file_name());
    Ok(())
}

/// Trigger a download of `content` and release the object URL right after.
pub fn download(content: &str, format: ExportFormat) -> AppResult<()> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::Download("No document available".to_string()))?;

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(content));

    let options = BlobPropertyBag::new();
    options.set_type(format.mime_type());

    let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_error)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| AppError::Download("Failed to create link element".to_string()))?;
    anchor.set_href(&url);
    anchor.set_download(format.file_name());
    anchor.click();

    Url::revoke_object_url(&url).map_err(js_error)
}

fn js_error(e: JsValue) -> AppError {
    AppError::Download(format!("{:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;
    use serde_json::json;

    fn results(value: serde_json::Value) -> ResultSet {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_csv_quotes_values_not_header() {
        let set = results(json!([{"fare": 12.5, "distance": 3}]));
        assert_eq!(to_csv(&set), "fare,distance\n\"12.5\",\"3\"");
    }

    #[test]
    fn test_csv_doubles_embedded_quotes() {
        let set = results(json!([{"note": "a\"b"}]));
        assert_eq!(to_csv(&set), "note\n\"a\"\"b\"");
    }

    #[test]
    fn test_csv_null_and_missing_are_empty() {
        let set = ResultSet::new(vec![
            Record::new().with_field("a", 1).with_field("b", CellValue::Null),
            Record::new().with_field("b", "x"),
        ]);
        assert_eq!(to_csv(&set), "a,b\n\"1\",\n,\"x\"");
    }

    #[test]
    fn test_csv_small_numbers_in_plain_notation() {
        let set = results(json!([{"p": 0.000001, "q": 1e21}]));
        assert_eq!(to_csv(&set), "p,q\n\"0.000001\",\"1e+21\"");
    }

    #[test]
    fn test_csv_line_count() {
        let set = results(json!([
            {"fare_usd": 7.25, "id": "a1"},
            {"fare_usd": 10.0, "id": "a2"},
            {"fare_usd": 52.5, "id": "a3"}
        ]));
        assert_eq!(to_csv(&set).lines().count(), 1 + set.len());
    }

    #[test]
    fn test_json_round_trip() {
        let set = results(json!([
            {"fare": 12.5, "distance": 3, "note": null, "label": "x\"y"},
            {"fare": 0.1, "distance": -4, "note": "ok", "label": ""}
        ]));
        let text = to_json(&set).unwrap();
        let parsed: ResultSet = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, set);
    }

    #[test]
    fn test_json_uses_two_space_indent() {
        let set = results(json!([{"fare": 12.5}]));
        assert_eq!(to_json(&set).unwrap(), "[\n  {\n    \"fare\": 12.5\n  }\n]");
    }

    #[test]
    fn test_json_keeps_key_order() {
        let set = results(json!([{"z": 1, "a": 2}]));
        let text = to_json(&set).unwrap();
        assert!(text.find("\"z\"").unwrap() < text.find("\"a\"").unwrap());
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Csv.file_name(), "predictions.csv");
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
        assert_eq!(ExportFormat::Json.file_name(), "predictions.json");
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
    }
}
