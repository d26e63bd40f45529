pub mod anonymous;
pub mod authenticated;
pub mod manager;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::AppState;
use crate::models::SpamRule;
use crate::validation::Violations;

// ============================================================
// Error Handling
// ============================================================

/// Failure of a request, rendered as its HTTP response.
#[derive(Debug)]
pub enum ApiError {
    /// Plain status with a client-safe message.
    Status(StatusCode, String),
    /// A submission broke one or more business rules.
    Rejected(Violations),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Status(status, message) => (status, message).into_response(),
            Self::Rejected(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "errors": violations })),
            )
                .into_response(),
        }
    }
}

impl From<(StatusCode, String)> for ApiError {
    fn from((status, message): (StatusCode, String)) -> Self {
        Self::Status(status, message)
    }
}

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
fn internal_error(e: impl std::fmt::Display) -> ApiError {
    let msg = e.to_string();

    if msg.contains("not found") {
        tracing::warn!("Validation error: {}", msg);
        return ApiError::Status(StatusCode::BAD_REQUEST, msg);
    }

    tracing::error!("Internal error: {}", msg);
    ApiError::Status(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn rejected(violations: Violations) -> ApiError {
    tracing::warn!(
        violations = violations.len(),
        "Submission rejected: {:?}",
        violations.iter().map(|v| v.key.as_str()).collect::<Vec<_>>()
    );
    ApiError::Rejected(violations)
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status(StatusCode::NOT_FOUND, format!("{what} not found"))
}

fn forbidden(what: &str) -> ApiError {
    ApiError::Status(StatusCode::FORBIDDEN, format!("{what} belongs to another manager"))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Spam terms
// ============================================================

pub async fn list_spam(State(state): State<AppState>) -> ApiResult<Json<SpamRule>> {
    state.db.get_spam_rule().map(Json).map_err(internal_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: ApiError) -> StatusCode {
        match err {
            ApiError::Status(status, _) => status,
            ApiError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    #[test]
    fn missing_entities_are_bad_requests() {
        assert_eq!(status(internal_error("Task not found")), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_errors_are_sanitized() {
        let err = internal_error("Spam term is blank");

        assert_eq!(status(err), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(
            internal_error("disk I/O error"),
            ApiError::Status(_, msg) if msg == "Internal server error"
        ));
    }
}
