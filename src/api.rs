// 🌐 HTTP API - Axum routes over the registry
//
//   GET  /health            liveness
//   POST /parse             normalize a free-text name
//   POST /entry             register an ingredient or recipe
//   GET  /summary?name=...  expand a recipe into base ingredients
//   GET  /entries           list registered entries
//
// Every domain failure is answered with 400 and `{"error": "..."}`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;

use crate::naming::{normalize_name, NameError};
use crate::registry::{AddError, EntryInfo, Registry};
use crate::summary::{Summary, SummaryError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    registry: Arc<Registry>,
}

// ============================================================================
// Request / Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParseResponse {
    pub msg: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Add(#[from] AddError),

    #[error(transparent)]
    Summary(#[from] SummaryError),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Name(_) => "no_valid_characters",
            ApiError::Add(err) => err.kind(),
            ApiError::Summary(err) => err.kind(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(kind = self.kind(), error = %self, "request rejected");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check() -> &'static str {
    "OK"
}

/// POST /parse - Normalize a hand-typed recipe name
async fn parse(Json(request): Json<ParseRequest>) -> Result<Json<ParseResponse>, ApiError> {
    let msg = normalize_name(&request.input)?;
    Ok(Json(ParseResponse { msg }))
}

/// POST /entry - Register an ingredient or a recipe
async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<StatusCode, ApiError> {
    let kind = state.registry.add(&payload)?;
    let name = payload.get("name").and_then(Value::as_str).unwrap_or_default();
    tracing::info!(entry = name, kind = kind.as_str(), "entry registered");
    Ok(StatusCode::OK)
}

/// GET /summary?name=... - Expand a recipe into its base ingredients
async fn summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Summary>, ApiError> {
    let summary = state.registry.summarize(&query.name)?;
    tracing::debug!(
        name = %summary.name,
        cook_time = summary.cook_time,
        ingredients = summary.ingredients.len(),
        "summary computed"
    );
    Ok(Json(summary))
}

/// GET /entries - List every registered entry
async fn list_entries(State(state): State<AppState>) -> Json<Vec<EntryInfo>> {
    Json(state.registry.list())
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router around a shared registry.
pub fn router(registry: Arc<Registry>) -> Router {
    let state = AppState { registry };

    Router::new()
        .route("/health", get(health_check))
        .route("/parse", post(parse))
        .route("/entry", post(create_entry))
        .route("/summary", get(summary))
        .route("/entries", get(list_entries))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================
