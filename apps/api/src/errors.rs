use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::analysis::extractor::ExtractionError;
use crate::analysis::scoring::ComputationError;

/// Stable, machine-readable error code plus a human-readable message.
/// Used for the top-level error body and for per-section / per-suggestion failures
/// that travel inside an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Keyword extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    pub fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND",
                    message: msg.clone(),
                },
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR",
                    message: msg.clone(),
                },
            ),
            AppError::Extraction(e) => {
                let status = if e.is_timeout() {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (status, e.detail())
            }
            AppError::Computation(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "COMPUTATION_ERROR",
                    message: e.to_string(),
                },
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR",
                    message: "An internal server error occurred".to_string(),
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Extraction(e) => tracing::error!("Extraction error: {e}"),
            AppError::Computation(e) => tracing::error!("Computation error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => {}
        }

        let (status, detail) = self.status_and_detail();
        let body = Json(json!({
            "error": {
                "code": detail.code,
                "message": detail.message
            }
        }));

        (status, body).into_response()
    }
}
