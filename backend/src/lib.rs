//! # Predict - batch predictions over uploaded trip files
//!
//! Turns CSV or JSON uploads into one prediction per row for the
//! browser frontend.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ CSV / JSON  │────▶│   Parser    │────▶│  Features   │────▶│    Model    │
//! │  (upload)   │     │  (auto-enc) │     │ (distance…) │     │  (linear)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use predict::{predict_bytes, LinearModel};
//!
//! let model = LinearModel::load("model.json")?;
//! let output = predict_bytes(&model, &std::fs::read("trips.csv")?)?;
//! println!("{} predictions", output.results.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Environment driven server settings
//! - [`parser`] - CSV/JSON parsing with auto-detection
//! - [`features`] - Derived trip features
//! - [`model`] - Predictor trait and linear model
//! - [`pipeline`] - Parse, enrich and score in one call
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;

// Input
pub mod parser;

// Scoring
pub mod features;
pub mod model;
pub mod pipeline;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    FeatureError, ModelError, ModelResult, ParseError, ParseResult, PredictError, PredictResult,
    ServerError,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_file, parse_upload, rows_from_json,
    InputFormat, ParsedInput, Row,
};

// =============================================================================
// Re-exports - Features and model
// =============================================================================

pub use features::{compute_all, compute_features, haversine_miles};
pub use model::{LinearModel, OutputSpec, OutputTransform, Predictor};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{predict_bytes, predict_records, PredictionOutput};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ManualTrip, PredictionResponse};
pub use config::ServerConfig;

// Server
pub mod server {
    pub use crate::api::server::{router, serve, start_server};
}
