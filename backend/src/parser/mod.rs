//! Upload parsing: CSV or JSON in, JSON object rows out.
//!
//! CSV gets encoding and delimiter auto-detection; cells that look like
//! numbers become JSON numbers so the model can consume them directly.

use serde_json::{Map, Number, Value};
use std::path::Path;

use crate::error::{ParseError, ParseResult};

/// One input row, keyed by column name.
pub type Row = Map<String, Value>;

/// Delimiters tried by [`detect_delimiter`], in order of preference.
const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Detected shape of an upload.
#[derive(Debug, Clone, PartialEq)]
pub enum InputFormat {
    Csv { encoding: String, delimiter: char },
    Json,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Csv { encoding, delimiter } => {
                write!(f, "CSV ({}, delimiter '{}')", encoding, delimiter.escape_default())
            }
            InputFormat::Json => write!(f, "JSON"),
        }
    }
}

/// Parsed upload with metadata.
#[derive(Debug, Clone)]
pub struct ParsedInput {
    pub rows: Vec<Row>,
    pub format: InputFormat,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Unknown encodings and invalid UTF-8 fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Defaults to a comma when none of the candidates appear.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = DELIMITERS[0];
    let mut best_count = 0;

    for &sep in &DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Typed JSON value for a raw CSV cell.
///
/// Empty cells are null, integers and finite floats are numbers,
/// `true`/`false` (any case) are booleans, everything else stays text.
pub fn infer_value(raw: &str) -> Value {
    let cell = raw.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = cell.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    match cell.to_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(cell.to_string()),
    }
}

/// Parse CSV text with an explicit delimiter.
///
/// Short rows are padded with null, extra cells are ignored and blank
/// lines are skipped.
pub fn parse_csv_str(content: &str, delimiter: char) -> ParseResult<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(String::is_empty) {
        return Err(ParseError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).map(infer_value).unwrap_or(Value::Null)))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_csv_bytes(bytes: &[u8]) -> ParseResult<ParsedInput> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let content = content.trim_start_matches('\u{feff}');
    let delimiter = detect_delimiter(content);

    let rows = parse_csv_str(content, delimiter)?;
    Ok(ParsedInput {
        rows,
        format: InputFormat::Csv { encoding, delimiter },
    })
}

/// Rows from a JSON document: a list of objects or `{"rows": [...]}`.
pub fn rows_from_json(value: Value) -> ParseResult<Vec<Row>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("rows") {
            Some(Value::Array(items)) => items,
            _ => return Err(ParseError::UnexpectedShape),
        },
        _ => return Err(ParseError::UnexpectedShape),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(row) => Ok(row),
            _ => Err(ParseError::UnexpectedShape),
        })
        .collect()
}

/// Parse JSON bytes into rows. A leading UTF-8 BOM is ignored.
pub fn parse_json_bytes(bytes: &[u8]) -> ParseResult<ParsedInput> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(ParsedInput {
        rows: rows_from_json(value)?,
        format: InputFormat::Json,
    })
}

/// Parse an uploaded file of either kind.
///
/// Content starting with `[` or `{` is read as JSON, anything else as CSV.
/// Failures are reported as [`ParseError::InvalidUpload`].
pub fn parse_upload(bytes: &[u8]) -> ParseResult<ParsedInput> {
    let first = bytes
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .find(|b| !matches!(b, 0xEF | 0xBB | 0xBF));

    let parsed = match first {
        Some(b'[') | Some(b'{') => parse_json_bytes(bytes),
        _ => parse_csv_bytes(bytes),
    };

    parsed.map_err(|e| ParseError::InvalidUpload(e.to_string()))
}

/// Parse a CSV or JSON file from disk.
pub fn parse_file<P: AsRef<Path>>(path: P) -> ParseResult<ParsedInput> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_upload(&bytes)
}
