//! Application configuration.
//!
//! Centralized configuration for the prediction frontend.
//! The backend serves this app, so the endpoint is a same-origin path.

/// Prediction endpoint.
///
/// Receives the uploaded file as the multipart part [`UPLOAD_FIELD`].
pub const PREDICT_URL: &str = "/api/predict";

/// Multipart field name carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Page title shown in the hero and the browser tab.
pub const APP_TITLE: &str = "NYC Taxi Fare Prediction";

/// File types offered by the file picker.
///
/// Only a hint for the browser dialog; nothing is validated client-side.
pub const ACCEPTED_FILE_TYPES: &str = ".csv,.json";

/// Digits after the decimal point for numeric cells in the results table.
pub const DECIMAL_PLACES: usize = 4;

/// Alert shown when the upload button is pressed without a file.
pub const NO_FILE_MESSAGE: &str = "Please select a CSV or JSON file first.";

/// Prefix of the alert shown when a prediction request fails.
pub const FAILURE_PREFIX: &str = "Prediction failed: ";

/// Placeholder shown when the server returns no records.
pub const NO_RESULTS_MESSAGE: &str = "No results returned.";
