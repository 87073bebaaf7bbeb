//! Prediction pipeline: parsed rows → derived features → model → result records.

use crate::error::PredictResult;
use crate::features::compute_all;
use crate::model::{predict_rows, Predictor};
use crate::parser::{parse_upload, InputFormat, Row};

/// Predictions for one batch.
#[derive(Debug, Clone)]
pub struct PredictionOutput {
    /// Detected input format (`None` for rows supplied directly)
    pub format: Option<InputFormat>,
    /// Number of input rows
    pub row_count: usize,
    /// One `{<output name>: value}` record per input row
    pub results: Vec<Row>,
}

/// Score rows that are already parsed.
pub fn predict_records(model: &dyn Predictor, mut rows: Vec<Row>) -> PredictResult<PredictionOutput> {
    compute_all(&mut rows)?;
    let results = predict_rows(model, &rows)?;

    Ok(PredictionOutput {
        format: None,
        row_count: rows.len(),
        results,
    })
}

/// Parse an uploaded CSV/JSON file and score it.
pub fn predict_bytes(model: &dyn Predictor, bytes: &[u8]) -> PredictResult<PredictionOutput> {
    let parsed = parse_upload(bytes)?;
    let output = predict_records(model, parsed.rows)?;

    Ok(PredictionOutput {
        format: Some(parsed.format),
        ..output
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictError;
    use crate::model::LinearModel;

    fn fare_model() -> LinearModel {
        LinearModel::from_json(
            r#"{
                "features": ["distance_miles", "passenger_count"],
                "intercept": 2.5,
                "weights": { "distance_miles": 2.0, "passenger_count": 0.5 },
                "output": { "name": "fare_usd" }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_csv_upload_end_to_end() {
        let csv = "pickup_datetime,pickup_longitude,pickup_latitude,dropoff_longitude,dropoff_latitude,passenger_count\n\
                   2015-01-27 13:08:24 UTC,-73.97,40.76,-73.97,40.76,2\n\
                   2015-01-27 13:08:24 UTC,-73.9798156,40.7614327,-73.8803331,40.6513111,1\n";

        let output = predict_bytes(&fare_model(), csv.as_bytes()).unwrap();

        assert_eq!(output.row_count, 2);
        assert!(matches!(output.format, Some(InputFormat::Csv { delimiter: ',', .. })));
        // Zero distance: 2.5 + 0.5 * 2
        assert_eq!(output.results[0]["fare_usd"], 3.5);
        // 2.5 + 2 * 9.2244 + 0.5
        assert_eq!(output.results[1]["fare_usd"], 21.45);
    }

    #[test]
    fn test_json_upload() {
        let json = br#"[{"distance_miles": 1.0, "passenger_count": 1}]"#;
        let output = predict_bytes(&fare_model(), json).unwrap();

        assert_eq!(output.format, Some(InputFormat::Json));
        assert_eq!(output.results[0]["fare_usd"], 5.0);
    }

    #[test]
    fn test_header_only_gives_no_results() {
        let output = predict_bytes(&fare_model(), b"passenger_count\n").unwrap();
        assert!(output.results.is_empty());
    }

    #[test]
    fn test_error_kinds() {
        let err = predict_bytes(&fare_model(), b"{broken").unwrap_err();
        assert!(err.is_client_error());

        let err = predict_bytes(&fare_model(), b"pickup_datetime\nsoon\n").unwrap_err();
        assert!(matches!(err, PredictError::Feature(_)));
        assert!(!err.is_client_error());
    }
}
