//! Derived model features computed from raw trip columns.
//!
//! - `distance_miles` from pickup/dropoff coordinates (haversine)
//! - `hour_of_day`, `day_of_week` (Monday = 0), `month` from `pickup_datetime`
//!
//! Each feature is only added when its source columns are present, so
//! inputs for models that do not use them pass through untouched.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde_json::{json, Value};

use crate::error::FeatureError;
use crate::parser::Row;

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.87433;

const PICKUP_DATETIME: &str = "pickup_datetime";
const COORDINATES: [&str; 4] = [
    "pickup_latitude",
    "pickup_longitude",
    "dropoff_latitude",
    "dropoff_longitude",
];

/// Naive datetime layouts accepted besides RFC 3339.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Great-circle distance between two points, in miles.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * a.sqrt().asin()
}

/// Parse a pickup timestamp.
///
/// Offsets are kept as local wall time; a trailing ` UTC` is accepted.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    let value = value.strip_suffix(" UTC").unwrap_or(value);
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Numeric column value; `None` when missing or null.
fn numeric(row: &Row, column: &str, index: usize) -> Result<Option<f64>, FeatureError> {
    let not_numeric = |value: &Value| FeatureError::NotNumeric {
        row: index,
        column: column.to_string(),
        value: value.to_string(),
    };

    match row.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(v @ Value::String(s)) => s.trim().parse().map(Some).map_err(|_| not_numeric(v)),
        Some(other) => Err(not_numeric(other)),
    }
}

/// Add derived features to one row. `index` is only used in errors.
pub fn compute_features(row: &mut Row, index: usize) -> Result<(), FeatureError> {
    let mut coords = [0.0; 4];
    let mut complete = true;
    for (slot, column) in coords.iter_mut().zip(COORDINATES) {
        match numeric(row, column, index)? {
            Some(v) => *slot = v,
            None => complete = false,
        }
    }
    if complete {
        let [pickup_lat, pickup_lon, dropoff_lat, dropoff_lon] = coords;
        let distance = haversine_miles(pickup_lat, pickup_lon, dropoff_lat, dropoff_lon);
        row.insert("distance_miles".to_string(), json!(distance));
    }

    let pickup = match row.get(PICKUP_DATETIME) {
        Some(Value::String(s)) => Some(
            parse_datetime(s).ok_or_else(|| FeatureError::InvalidDatetime {
                row: index,
                value: s.clone(),
            })?,
        ),
        None | Some(Value::Null) => None,
        Some(other) => {
            return Err(FeatureError::InvalidDatetime {
                row: index,
                value: other.to_string(),
            })
        }
    };
    if let Some(dt) = pickup {
        row.insert("hour_of_day".to_string(), json!(dt.hour()));
        row.insert("day_of_week".to_string(), json!(dt.weekday().num_days_from_monday()));
        row.insert("month".to_string(), json!(dt.month()));
    }

    Ok(())
}

/// Add derived features to every row.
pub fn compute_all(rows: &mut [Row]) -> Result<(), FeatureError> {
    rows.iter_mut()
        .enumerate()
        .try_for_each(|(i, row)| compute_features(row, i))
}
