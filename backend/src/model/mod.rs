//! Prediction models.
//!
//! A [`Predictor`] scores feature vectors laid out in its own column
//! order. [`LinearModel`] is the bundled implementation, loaded from a
//! JSON definition:
//!
//! ```json
//! {
//!   "features": ["distance_miles", "passenger_count", "hour_of_day"],
//!   "intercept": 2.5,
//!   "weights": { "distance_miles": 2.1, "passenger_count": 0.4 },
//!   "output": { "name": "fare_usd", "transform": "identity", "round": 2 }
//! }
//! ```
//!
//! Features without a weight contribute nothing. `transform: "expm1"`
//! undoes a log1p target (useful for price models trained on log prices).

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ModelError, ModelResult};
use crate::parser::Row;

/// Something that turns feature vectors into predictions.
pub trait Predictor: Send + Sync {
    /// Columns each feature vector is laid out in.
    fn feature_columns(&self) -> &[String];

    /// Field name of the prediction in each result record.
    fn output_name(&self) -> &str;

    /// One prediction per input vector, in order.
    fn predict(&self, features: &[Vec<f64>]) -> ModelResult<Vec<f64>>;
}

/// Transform applied to the raw model output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTransform {
    #[default]
    Identity,
    /// `exp(x) - 1`
    Expm1,
}

impl OutputTransform {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            OutputTransform::Identity => value,
            OutputTransform::Expm1 => value.exp_m1(),
        }
    }
}

/// How predictions are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Result field name
    #[serde(default = "default_output_name")]
    pub name: String,
    /// Post-processing of the raw score
    #[serde(default)]
    pub transform: OutputTransform,
    /// Decimal digits to round to (`null` keeps full precision)
    #[serde(default = "default_round")]
    pub round: Option<u32>,
}

fn default_output_name() -> String {
    "prediction".to_string()
}

fn default_round() -> Option<u32> {
    Some(2)
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            name: default_output_name(),
            transform: OutputTransform::default(),
            round: default_round(),
        }
    }
}

/// Linear model: `intercept + Σ weight·feature`, then the output transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub features: Vec<String>,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub weights: HashMap<String, f64>,
    #[serde(default)]
    pub output: OutputSpec,
}

impl LinearModel {
    /// Load and validate a model definition file.
    pub fn load<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }
        log::info!("📦 Loading model from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a model definition.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let model: LinearModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> ModelResult<()> {
        if self.features.is_empty() {
            return Err(ModelError::NoFeatures);
        }
        if let Some(unknown) = self.weights.keys().find(|k| !self.features.contains(k)) {
            return Err(ModelError::UnknownWeight(unknown.clone()));
        }
        Ok(())
    }

    fn score(&self, vector: &[f64]) -> f64 {
        let raw = self
            .features
            .iter()
            .zip(vector)
            .map(|(name, x)| self.weights.get(name).copied().unwrap_or(0.0) * x)
            .sum::<f64>()
            + self.intercept;

        let value = self.output.transform.apply(raw);
        match self.output.round {
            Some(digits) => round_to(value, digits),
            None => value,
        }
    }
}

impl Predictor for LinearModel {
    fn feature_columns(&self) -> &[String] {
        &self.features
    }

    fn output_name(&self) -> &str {
        &self.output.name
    }

    fn predict(&self, features: &[Vec<f64>]) -> ModelResult<Vec<f64>> {
        Ok(features.iter().map(|v| self.score(v)).collect())
    }
}

/// Round half away from zero to `digits` decimals.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Project rows onto the model's columns.
///
/// Missing or null columns become 0, extra columns are ignored, booleans
/// count as 0/1 and numeric strings are parsed.
pub fn prepare_features(rows: &[Row], columns: &[String]) -> ModelResult<Vec<Vec<f64>>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            columns
                .iter()
                .map(|column| feature_value(row.get(column), i, column))
                .collect()
        })
        .collect()
}

fn feature_value(value: Option<&Value>, row: usize, feature: &str) -> ModelResult<f64> {
    let non_numeric = |v: &Value| ModelError::NonNumeric {
        row,
        feature: feature.to_string(),
        value: v.to_string(),
    };

    match value {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => Ok(n.as_f64().unwrap_or(0.0)),
        Some(Value::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
        Some(v @ Value::String(s)) => s.trim().parse().map_err(|_| non_numeric(v)),
        Some(other) => Err(non_numeric(other)),
    }
}

/// Score rows and wrap each prediction in a `{<output name>: value}` record.
pub fn predict_rows(model: &dyn Predictor, rows: &[Row]) -> ModelResult<Vec<Row>> {
    let features = prepare_features(rows, model.feature_columns())?;
    let predictions = model.predict(&features)?;

    Ok(predictions
        .into_iter()
        .map(|p| {
            let mut record = Row::new();
            let value = Number::from_f64(p).map(Value::Number).unwrap_or(Value::Null);
            record.insert(model.output_name().to_string(), value);
            record
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FARE_MODEL: &str = r#"{
        "features": ["distance_miles", "passenger_count", "hour_of_day"],
        "intercept": 2.5,
        "weights": { "distance_miles": 2.0, "passenger_count": 0.5 },
        "output": { "name": "fare_usd", "round": 2 }
    }"#;

    fn rows(value: Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_load_fare_model() {
        let model = LinearModel::from_json(FARE_MODEL).unwrap();
        assert_eq!(model.feature_columns().len(), 3);
        assert_eq!(model.output_name(), "fare_usd");
        assert_eq!(model.output.transform, OutputTransform::Identity);
    }

    #[test]
    fn test_defaults() {
        let model = LinearModel::from_json(r#"{"features": ["x"]}"#).unwrap();
        assert_eq!(model.intercept, 0.0);
        assert_eq!(model.output, OutputSpec::default());
        assert_eq!(model.output_name(), "prediction");
    }

    #[test]
    fn test_invalid_definitions() {
        assert!(matches!(
            LinearModel::from_json(r#"{"features": []}"#),
            Err(ModelError::NoFeatures)
        ));
        assert!(matches!(
            LinearModel::from_json(r#"{"features": ["a"], "weights": {"b": 1.0}}"#),
            Err(ModelError::UnknownWeight(name)) if name == "b"
        ));
        assert!(matches!(LinearModel::from_json("[]"), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LinearModel::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, FARE_MODEL).unwrap();

        let model = LinearModel::load(&path).unwrap();
        assert_eq!(model.intercept, 2.5);
    }

    #[test]
    fn test_prepare_fills_missing_with_zero() {
        let columns = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let input = rows(json!([{"a": 1.5, "b": "2", "extra": "ignored"}, {"c": true, "b": null}]));

        let features = prepare_features(&input, &columns).unwrap();
        assert_eq!(features, vec![vec![1.5, 2.0, 0.0], vec![0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_prepare_rejects_text() {
        let columns = vec!["a".to_string()];
        let input = rows(json!([{"a": 1}, {"a": "many"}]));

        let err = prepare_features(&input, &columns).unwrap_err();
        assert!(matches!(err, ModelError::NonNumeric { row: 1, .. }));
    }

    #[test]
    fn test_predict_rows() {
        let model = LinearModel::from_json(FARE_MODEL).unwrap();
        let input = rows(json!([
            {"distance_miles": 3.0, "passenger_count": 1},
            {"distance_miles": 1.234, "passenger_count": 2, "hour_of_day": 23}
        ]));

        let results = predict_rows(&model, &input).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["fare_usd"], 9.0);
        // 2.5 + 2.468 + 1.0 = 5.968
        assert_eq!(results[1]["fare_usd"], 5.97);
    }

    #[test]
    fn test_expm1_transform() {
        let model = LinearModel::from_json(
            r#"{"features": ["x"], "weights": {"x": 1.0},
                "output": {"name": "price", "transform": "expm1", "round": null}}"#,
        )
        .unwrap();

        let out = model.predict(&[vec![0.0], vec![2.0f64.ln_1p()]]).unwrap();
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.345678, 2), 12.35);
        assert_eq!(round_to(-1.005, 0), -1.0);
        assert_eq!(round_to(7.0, 2), 7.0);
    }
}
