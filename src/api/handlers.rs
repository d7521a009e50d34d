//! HTTP request handlers

use super::types::{ChatRequest, ErrorResponse, SessionCreatedResponse};
use super::AppState;
use crate::runtime::{ClearOutcome, RouterError, SessionSnapshot, TurnOutcome};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/messages", post(send_message))
        .route("/api/sessions/:id/clear", post(clear_session))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Sessions
// ============================================================

async fn create_session(State(state): State<AppState>) -> Json<SessionCreatedResponse> {
    let session_id = state.router.sessions().create().await;
    Json(SessionCreatedResponse { session_id })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<SessionSnapshot> {
    Json(state.router.snapshot(&id).await)
}

// ============================================================
// Turns
// ============================================================

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<TurnOutcome>, AppError> {
    let Json(req) = body?;
    let outcome = state.router.submit_message(&id, req.text).await?;
    Ok(Json(outcome))
}

async fn clear_session(State(state): State<AppState>, Path(id): Path<String>) -> Json<ClearOutcome> {
    Json(state.router.clear(&id).await)
}

async fn get_version() -> Json<Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Conflict(String),
    BadGateway(String),
    Internal(String),
}

impl From<RouterError> for AppError {
    fn from(err: RouterError) -> Self {
        match err {
            RouterError::SessionBusy(_) => AppError::Conflict(err.to_string()),
            RouterError::ClassifierUnavailable(_)
            | RouterError::ResponderUnavailable { .. }
            | RouterError::Validation(_) => AppError::BadGateway(err.to_string()),
            RouterError::Transition(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
