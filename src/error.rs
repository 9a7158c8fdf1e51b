use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error taxonomy for the request surface.
///
/// Validation failures on the request envelope reject fast with no side
/// effects; noise inside an embedded analysis payload is never surfaced
/// through here (it is absorbed to zero at the parsing boundary).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    MissingInput(&'static str),

    #[error("{0}")]
    MalformedPayload(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Consumption already recorded for this scan")]
    AlreadyResolved,

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingInput(_) | AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyResolved | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
