//! HTTP Server for the prediction API.
//!
//! Provides REST endpoints for batch and single-trip predictions and
//! serves the built frontend.
//!
//! # API Endpoints
//!
//! | Method | Path                  | Description                              |
//! |--------|-----------------------|------------------------------------------|
//! | GET    | `/health`             | Health check and model summary           |
//! | POST   | `/api/predict`        | Multipart `file` (CSV/JSON) or JSON rows |
//! | POST   | `/api/predict/manual` | Form-encoded single trip                 |
//! | GET    | `/*`                  | Static frontend files                    |

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Form, Router,
};
use serde_json::{json, Value};
use std::{net::SocketAddr, path::Path, sync::Arc};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use uuid::Uuid;

use super::types::{error_response, ManualTrip, PredictionResponse};
use crate::config::ServerConfig;
use crate::error::{PredictError, ServerError};
use crate::model::{LinearModel, Predictor};
use crate::parser::rows_from_json;
use crate::pipeline::{predict_bytes, predict_records, PredictionOutput};

type ApiError = (StatusCode, Json<Value>);

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    model: Arc<dyn Predictor>,
}

/// Build the application router.
///
/// Without a static directory, `/` answers with the health document.
/// Request bodies, uploads included, are capped at `upload_limit` bytes.
pub fn router(model: Arc<dyn Predictor>, static_dir: Option<&Path>, upload_limit: usize) -> Router {
    // Permissive CORS for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let mut api = Router::new()
        .route("/health", get(health))
        .route("/api/predict", post(predict))
        .route("/api/predict/manual", post(predict_manual));

    if static_dir.is_none() {
        api = api.route("/", get(health));
    }

    let mut app = api.with_state(AppState { model });
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(upload_limit)).layer(cors)
}

/// Load the model and start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    let model = LinearModel::load(&config.model_path)?;
    log::info!(
        "📦 Model ready: {} feature(s) → {}",
        model.feature_columns().len(),
        model.output_name()
    );

    let static_dir = config.static_dir.is_dir().then_some(config.static_dir.as_path());
    match static_dir {
        Some(dir) => log::info!("🗂  Serving frontend from {}", dir.display()),
        None => log::warn!(
            "Static directory {} not found, frontend will not be served",
            config.static_dir.display()
        ),
    }

    let app = router(Arc::new(model), static_dir, config.upload_limit_bytes());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    log::info!("🚀 Prediction server running on http://localhost:{}", config.port);
    log::info!("   POST /api/predict        - Upload CSV/JSON file");
    log::info!("   POST /api/predict/manual - Single trip form");
    log::info!("   GET  /health             - Health check");
    log::info!("   Upload limit: {} MiB", config.upload_limit_mb);

    serve(listener, app).await
}

/// Serve `app` on an already bound listener.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    axum::serve(listener, app).await?;
    Ok(())
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "predict",
        "version": env!("CARGO_PKG_VERSION"),
        "model": {
            "features": state.model.feature_columns(),
            "output": state.model.output_name()
        },
        "endpoints": {
            "predict": "POST /api/predict",
            "manual": "POST /api/predict/manual"
        }
    }))
}

/// Batch prediction endpoint: multipart upload or raw JSON rows
async fn predict(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<PredictionResponse>, ApiError> {
    let request_id = Uuid::new_v4();

    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let result = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| reject(e.status(), &format!("Multipart error: {}", e)))?;
        let (file_name, bytes) = read_file_field(multipart).await?;

        log::info!(
            "[{}] 📄 Upload: {} ({} bytes)",
            request_id,
            file_name.as_deref().unwrap_or("unknown"),
            bytes.len()
        );
        predict_bytes(state.model.as_ref(), &bytes)
    } else {
        let body = Bytes::from_request(request, &state)
            .await
            .map_err(|e| reject(e.status(), &format!("Read error: {}", e)))?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| bad_request(&format!("Invalid input: {}", e)))?;

        log::info!("[{}] 📄 JSON body ({} bytes)", request_id, body.len());
        rows_from_json(value)
            .map_err(PredictError::from)
            .and_then(|rows| predict_records(state.model.as_ref(), rows))
    };

    let output = result.map_err(|e| prediction_error(request_id, e))?;
    log_summary(request_id, &output);

    Ok(Json(output.into()))
}

/// Single trip prediction from form fields
async fn predict_manual(
    State(state): State<AppState>,
    Form(trip): Form<ManualTrip>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let request_id = Uuid::new_v4();

    let output = predict_records(state.model.as_ref(), vec![trip.into_row()])
        .map_err(|e| prediction_error(request_id, e))?;
    log_summary(request_id, &output);

    Ok(Json(output.into()))
}

/// Contents of the `file` part, with its client-side name.
async fn read_file_field(mut multipart: Multipart) -> Result<(Option<String>, Bytes), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| reject(e.status(), &format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| reject(e.status(), &format!("Read error: {}", e)))?;
            return Ok((file_name, bytes));
        }
    }

    Err(bad_request("No file provided"))
}

fn log_summary(request_id: Uuid, output: &PredictionOutput) {
    let source = output
        .format
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "rows".to_string());
    log::info!(
        "[{}] ✓ {} prediction(s) from {} input row(s), {}",
        request_id,
        output.results.len(),
        output.row_count,
        source
    );
}

fn bad_request(detail: &str) -> ApiError {
    reject(StatusCode::BAD_REQUEST, detail)
}

/// Error body with the status axum picked (413 for oversized bodies).
fn reject(status: StatusCode, detail: &str) -> ApiError {
    (status, Json(error_response(detail)))
}

fn prediction_error(request_id: Uuid, err: PredictError) -> ApiError {
    if err.is_client_error() {
        log::warn!("[{}] ⚠️  {}", request_id, err);
        bad_request(&err.to_string())
    } else {
        log::error!("[{}] ❌ Prediction failed: {}", request_id, err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response(&format!("Prediction failed: {}", err))),
        )
    }
}
