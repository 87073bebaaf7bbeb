//! Error types for the prediction backend.
//!
//! - [`ParseError`] - Uploaded file / request body parsing errors
//! - [`FeatureError`] - Derived feature computation errors
//! - [`ModelError`] - Model loading and scoring errors
//! - [`PredictError`] - Top-level pipeline errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Input Parsing Errors
// =============================================================================

/// Errors while turning an upload or request body into rows.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Upload is neither readable CSV nor JSON.
    #[error("Uploaded file is not valid CSV or JSON: {0}")]
    InvalidUpload(String),

    /// JSON is valid but not a list of objects.
    #[error("JSON body must be {{\"rows\": [...]}} or a list of objects")]
    UnexpectedShape,

    /// CSV without a header line.
    #[error("No headers found in CSV")]
    NoHeaders,

    /// CSV reader error.
    #[error("Invalid CSV format: {0}")]
    Csv(#[from] csv::Error),

    /// JSON syntax error.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Feature Errors
// =============================================================================

/// Errors while computing derived model features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Pickup datetime in an unknown format.
    #[error("Row {row}: cannot parse pickup_datetime '{value}'")]
    InvalidDatetime { row: usize, value: String },

    /// Coordinate column holding something other than a number.
    #[error("Row {row}: column '{column}' must be numeric, got {value}")]
    NotNumeric {
        row: usize,
        column: String,
        value: String,
    },
}

// =============================================================================
// Model Errors
// =============================================================================

/// Errors from model loading and scoring.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Model file missing.
    #[error("Model file not found at {}", .0.display())]
    NotFound(PathBuf),

    /// IO error.
    #[error("Failed to read model: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed model definition.
    #[error("Invalid model file: {0}")]
    Invalid(#[from] serde_json::Error),

    /// Model without inputs.
    #[error("Model declares no feature columns")]
    NoFeatures,

    /// Weight for a column the model does not use.
    #[error("Weight given for unknown feature '{0}'")]
    UnknownWeight(String),

    /// Feature value that cannot be fed to the model.
    #[error("Row {row}: feature '{feature}' is not numeric: {value}")]
    NonNumeric {
        row: usize,
        feature: String,
        value: String,
    },
}

// =============================================================================
// Prediction Errors (top-level)
// =============================================================================

/// Top-level prediction pipeline errors.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Input parsing error.
    #[error("Invalid input: {0}")]
    Parse(#[from] ParseError),

    /// Feature computation error.
    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),

    /// Model error.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl PredictError {
    /// `true` when the caller sent bad input rather than the server failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictError::Parse(_))
    }
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Model could not be loaded at startup.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Socket or filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Result type for pipeline operations.
pub type PredictResult<T> = Result<T, PredictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let parse_err = ParseError::NoHeaders;
        let err: PredictError = parse_err.into();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("No headers"));

        let model_err = ModelError::NoFeatures;
        let err: PredictError = model_err.into();
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("no feature columns"));
    }

    #[test]
    fn test_feature_error_format() {
        let err = FeatureError::NotNumeric {
            row: 3,
            column: "pickup_latitude".into(),
            value: "\"north\"".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Row 3"));
        assert!(msg.contains("pickup_latitude"));
        assert!(msg.contains("north"));
    }

    #[test]
    fn test_not_found_shows_path() {
        let err = ModelError::NotFound(PathBuf::from("models/fare.json"));
        assert_eq!(err.to_string(), "Model file not found at models/fare.json");
    }
}
