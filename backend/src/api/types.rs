//! REST API types for frontend integration.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::parser::Row;
use crate::pipeline::PredictionOutput;

/// Response sent to the frontend after a prediction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// One record per input row
    pub results: Vec<Row>,
}

impl From<PredictionOutput> for PredictionResponse {
    fn from(output: PredictionOutput) -> Self {
        Self {
            results: output.results,
        }
    }
}

/// Form fields of a single manually entered trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualTrip {
    pub pickup_datetime: String,
    pub pickup_longitude: f64,
    pub pickup_latitude: f64,
    pub dropoff_longitude: f64,
    pub dropoff_latitude: f64,
    pub passenger_count: i64,
}

impl ManualTrip {
    /// The trip as a single input row.
    pub fn into_row(self) -> Row {
        let mut row = Row::new();
        row.insert("pickup_datetime".into(), json!(self.pickup_datetime));
        row.insert("pickup_longitude".into(), json!(self.pickup_longitude));
        row.insert("pickup_latitude".into(), json!(self.pickup_latitude));
        row.insert("dropoff_longitude".into(), json!(self.dropoff_longitude));
        row.insert("dropoff_latitude".into(), json!(self.dropoff_latitude));
        row.insert("passenger_count".into(), json!(self.passenger_count));
        row
    }
}

/// Create an error response body
pub fn error_response(detail: &str) -> Value {
    json!({ "detail": detail })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let mut record = Row::new();
        record.insert("fare_usd".into(), json!(12.5));
        let response = PredictionResponse { results: vec![record] };

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body, json!({"results": [{"fare_usd": 12.5}]}));
    }

    #[test]
    fn test_manual_trip_row() {
        let trip = ManualTrip {
            pickup_datetime: "2015-01-27 13:08:24".into(),
            pickup_longitude: -73.97,
            pickup_latitude: 40.76,
            dropoff_longitude: -73.88,
            dropoff_latitude: 40.65,
            passenger_count: 2,
        };

        let row = trip.into_row();
        assert_eq!(row.len(), 6);
        assert_eq!(row["passenger_count"], 2);
    }

    #[test]
    fn test_error_body() {
        assert_eq!(error_response("boom"), json!({"detail": "boom"}));
    }
}
