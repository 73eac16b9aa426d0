use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use subtrack_core::error::CoreError;

/// User-facing message for malformed cost query bounds.
pub const INVALID_DATE_FORMAT_MESSAGE: &str = "invalid date format: use MM-YYYY";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `subtrack_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidDateFormat(detail) => {
                    tracing::debug!(detail = %detail, "Rejected cost query bounds");
                    (
                        StatusCode::BAD_REQUEST,
                        "INVALID_DATE_FORMAT",
                        INVALID_DATE_FORMAT_MESSAGE.to_string(),
                    )
                }
                CoreError::CostOverflow => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "COST_OVERFLOW",
                    core.to_string(),
                ),
                CoreError::Storage(err) => {
                    tracing::error!(error = %err, "Storage failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
