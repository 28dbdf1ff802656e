//! Error types for the analysis API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Extraction failures carry the literal descriptive string
    /// ("Unsupported file type", "Error parsing PDF: ...").
    #[error("{0}")]
    Document(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Analysis failed: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Document(detail) => (StatusCode::BAD_REQUEST, detail.clone()),
            ApiError::InvalidRequest(detail) => (StatusCode::BAD_REQUEST, detail.clone()),
            ApiError::Internal(err) => {
                tracing::error!("internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Analysis failed: {err:#}"),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
