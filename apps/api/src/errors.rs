use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every failure a wizard transition can hit collapses into one of these
/// variants at the handler boundary; the session itself is left in its
/// pre-call stage by `WizardSession::abort_call`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Schema violation: {0}")]
    Schema(String),

    #[error("File read error: {0}")]
    FileRead(String),

    #[error("Call already in flight: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Gateway(msg) => (
                StatusCode::BAD_GATEWAY,
                "GATEWAY_ERROR",
                format!("{msg}. Retry, or switch to manual entry."),
            ),
            AppError::Schema(msg) => {
                tracing::warn!("Schema violation from gateway: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "SCHEMA_VIOLATION",
                    "The AI provided an invalid data format. This often happens with very long \
                     inputs; try shortening your input."
                        .to_string(),
                )
            }
            AppError::FileRead(msg) => {
                tracing::warn!("File read error: {msg}");
                (
                    StatusCode::BAD_REQUEST,
                    "FILE_READ_ERROR",
                    "Read failed.".to_string(),
                )
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CALL_IN_FLIGHT", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_violation_hides_root_cause() {
        // Root cause is unobservable to the caller; the response carries the
        // generic shortening advice instead of the parser message.
        let resp = AppError::Schema("expected value at line 1".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_gateway_error_is_bad_gateway() {
        let resp = AppError::Gateway("connection refused".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let resp = AppError::Conflict("keyword extraction in flight".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
