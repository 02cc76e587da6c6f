use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use peel_core::error::CoreError;
use peel_core::resolver::ResolutionError;
use serde_json::json;

use crate::engine::dispatcher::DispatchError;
use crate::engine::materializer::MaterializeError;
use crate::engine::tracker::TrackerError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, the engine's error types for the
/// run and result paths, and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses of the form
/// `{ "error": ..., "code": ... }`, plus `"message"` where the caller
/// benefits from the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `peel_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The stored explanation could not be resolved into a payload.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The resolved payload could not be dispatched.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The task status could not be read.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// A finished result could not be served.
    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Status, error code, error text and optional detail message.
type ErrorParts = (StatusCode, &'static str, String, Option<String>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error, message): ErrorParts = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                    None,
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Run path ---
            AppError::Resolution(err) => {
                tracing::warn!(error = %err, kind = err.kind(), "Explanation arguments rejected");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    err.kind(),
                    "Failed to resolve explanation arguments".to_string(),
                    Some(err.to_string()),
                )
            }
            AppError::Dispatch(err) => {
                let message = match err {
                    DispatchError::BrokerUnavailable(_) => "The task queue is unavailable",
                    DispatchError::PersistFailure { .. } => {
                        "The task was enqueued but could not be recorded"
                    }
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    err.kind(),
                    "Failed to dispatch explanation".to_string(),
                    Some(message.to_string()),
                )
            }

            // --- Result path ---
            AppError::Tracker(err) => match err {
                TrackerError::TaskNotFound(task_id) => (
                    StatusCode::NOT_FOUND,
                    "TASK_NOT_FOUND",
                    format!("No status record for task {task_id}"),
                    None,
                ),
                TrackerError::Store(db_err) => classify_sqlx_error(db_err),
            },
            AppError::Materialize(err) => match err {
                MaterializeError::ArtifactMissing(path) => {
                    tracing::error!(path = %path.display(), "Result artifact missing");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "ARTIFACT_MISSING",
                        "Result artifact not found".to_string(),
                        None,
                    )
                }
                MaterializeError::NotReady(state) => (
                    StatusCode::CONFLICT,
                    "RESULT_NOT_READY",
                    format!("Result is not available in state {state}"),
                    None,
                ),
                other => {
                    tracing::error!(error = %other, "Failed to materialize result");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
        };

        let mut body = json!({
            "error": error,
            "code": code,
        });
        if let Some(message) = message {
            body["message"] = json!(message);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Generic 500 with a sanitized message.
fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Foreign key violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
            None,
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL foreign key violation: error code 23503
            if db_err.code().as_deref() == Some("23503") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return (
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    format!("Referenced record does not exist: {constraint}"),
                    None,
                );
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
