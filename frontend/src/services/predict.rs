//! Prediction upload: sends the selected file to the backend and
//! turns the JSON answer into a [`ResultSet`].

use gloo_net::http::Request;
use serde_json::Value;
use std::future::Future;
use web_sys::{File, FormData};

use crate::config::{FAILURE_PREFIX, NO_FILE_MESSAGE, UPLOAD_FIELD};
use crate::types::{AppError, AppResult, Record, ResultSet};

/// Pull the record list out of a prediction response.
///
/// Accepts `{"results": [...]}` or a bare array. A missing, null or
/// non-array `results` falls back to the body itself, and anything that
/// is still not an array yields an empty set.
pub fn extract_results(body: Value) -> ResultSet {
    let items = match body {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    items.into_iter().map(Record::from).collect()
}

/// POST a file as multipart form data and parse the predictions.
pub async fn request_predictions(file: File, url: &str) -> AppResult<ResultSet> {
    let form_data = FormData::new()
        .map_err(|e| AppError::Request(format!("Failed to create FormData: {:?}", e)))?;

    form_data
        .append_with_blob(UPLOAD_FIELD, &file)
        .map_err(|e| AppError::Request(format!("Failed to append file: {:?}", e)))?;

    let request = Request::post(url)
        .body(form_data)
        .map_err(|e| AppError::Request(e.to_string()))?;

    let response = request
        .send()
        .await
        .map_err(|e| AppError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(AppError::Server(response.status()));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| AppError::Parse(e.to_string()))?;

    Ok(extract_results(body))
}

/// What the upload flow needs from the page.
pub trait UploadView {
    /// Show or hide the busy indicator.
    fn set_busy(&self, busy: bool);
    /// Blocking user message.
    fn alert(&self, message: &str);
    /// Replace the displayed results.
    fn render(&self, results: ResultSet);
}

/// Keeps the busy indicator visible for as long as it lives.
pub struct BusyGuard<'a, V: UploadView + ?Sized> {
    view: &'a V,
}

impl<'a, V: UploadView + ?Sized> BusyGuard<'a, V> {
    pub fn show(view: &'a V) -> Self {
        view.set_busy(true);
        Self { view }
    }
}

impl<V: UploadView + ?Sized> Drop for BusyGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_busy(false);
    }
}

/// How an upload attempt ended.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadOutcome {
    /// Nothing selected, no request made.
    MissingFile,
    /// Results rendered (possibly an empty set).
    Rendered,
    /// Request or response failed; the user was alerted.
    Failed(AppError),
}

/// Check that a file was selected, alerting the user when it was not.
pub fn take_file<V: UploadView + ?Sized, F>(view: &V, file: Option<F>) -> Option<F> {
    if file.is_none() {
        view.alert(NO_FILE_MESSAGE);
    }
    file
}

/// One click on the upload button.
///
/// `send` performs the network round-trip. The busy indicator is shown
/// right before it and hidden after rendering or alerting, on every path.
/// Overlapping calls are not guarded against: the last one to finish wins.
pub async fn run_upload<V, F, S, Fut>(view: &V, file: Option<F>, send: S) -> UploadOutcome
where
    V: UploadView + ?Sized,
    S: FnOnce(F) -> Fut,
    Fut: Future<Output = AppResult<ResultSet>>,
{
    let Some(file) = take_file(view, file) else {
        return UploadOutcome::MissingFile;
    };

    let _busy = BusyGuard::show(view);

    match send(file).await {
        Ok(results) => {
            log::info!("📥 {} prediction(s) received", results.len());
            view.render(results);
            UploadOutcome::Rendered
        }
        Err(e) => {
            log::warn!("❌ Prediction failed: {}", e);
            view.alert(&format!("{}{}", FAILURE_PREFIX, e));
            UploadOutcome::Failed(e)
        }
    }
}
