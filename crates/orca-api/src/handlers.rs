//! JSON API handlers.
//!
//! Each handler reads through the repository and returns the `ApiResponse`
//! envelope.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use orca_state::{CollectionKind, ConfigStore, StateError};

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

fn state_error_response(err: &StateError) -> axum::response::Response {
    if err.is_not_found() {
        return error_response(&err.to_string(), StatusCode::NOT_FOUND).into_response();
    }
    warn!(error = %err, "trainer request failed");
    error_response(&err.to_string(), StatusCode::BAD_GATEWAY).into_response()
}

// ── Applications ───────────────────────────────────────────────

/// GET /api/v1/applications
pub async fn list_applications<S: ConfigStore>(
    State(state): State<ApiState<S>>,
) -> impl IntoResponse {
    match state.repo.list().await {
        Ok(applications) => ApiResponse::ok(applications).into_response(),
        Err(e) => state_error_response(&e),
    }
}

/// GET /api/v1/applications/{name}
pub async fn get_application<S: ConfigStore>(
    State(state): State<ApiState<S>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.repo.get(&name).await {
        Ok(Some(app)) => ApiResponse::ok(app).into_response(),
        Ok(None) => error_response("application not found", StatusCode::NOT_FOUND).into_response(),
        Err(e) => state_error_response(&e),
    }
}

/// GET /api/v1/applications/{name}/{kind}
pub async fn list_collection<S: ConfigStore>(
    State(state): State<ApiState<S>>,
    Path((name, kind)): Path<(String, String)>,
) -> impl IntoResponse {
    let kind = match kind.parse::<CollectionKind>() {
        Ok(kind) => kind,
        Err(e) => return error_response(&e.to_string(), StatusCode::NOT_FOUND).into_response(),
    };

    match state.repo.require(&name).await {
        Ok(app) => ApiResponse::ok(app.collection(kind)).into_response(),
        Err(e) => state_error_response(&e),
    }
}

// ── Health ─────────────────────────────────────────────────────

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
