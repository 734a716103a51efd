// 🌐 Prediction API (axum)
// The artifact is loaded once by the binary and shared read-only across requests

use crate::error::Error;
use crate::form::HouseInput;
use crate::predictor::{Estimate, Predictor};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    predictor: Predictor,
}

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Present on feature mismatches so the caller can fix its input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_features: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            expected_features: None,
        }
    }

    fn err(error: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            expected_features: error.expected_features().map(<[String]>::to_vec),
        }
    }
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::FeatureMismatch { .. } | Error::InvalidInput { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/features - Feature names the loaded model expects
async fn get_features(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.predictor.feature_names().to_vec()))
}

/// POST /api/predict - Price one house
async fn predict(State(state): State<AppState>, Json(input): Json<HouseInput>) -> Response {
    match state.predictor.estimate(&input) {
        Ok(estimate) => (StatusCode::OK, Json(ApiResponse::ok(estimate))).into_response(),
        Err(e) => {
            log::warn!("predict request failed: {}", e);
            (status_for(&e), Json(ApiResponse::<Estimate>::err(&e))).into_response()
        }
    }
}

/// GET / - Serve the prediction form
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(predictor: Predictor) -> Router {
    let state = AppState { predictor };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/features", get(get_features))
        .route("/predict", post(predict))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
