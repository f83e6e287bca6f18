//! HTTP error taxonomy and response conversion.
//!
//! Three categories cover every failure the gateway can surface: the caller
//! sent something unusable (400), the service is misconfigured (500), or the
//! provider call failed (500 with best-effort detail passthrough).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or oversized upload, blank prompt. Maps to 400.
    #[error("{0}")]
    InvalidInput(String),

    /// The service itself is misconfigured; the caller cannot fix this.
    /// The inner detail is logged server-side but never returned.
    #[error("Server configuration error")]
    Configuration(String),

    /// The provider call failed or its response violated the expected shape.
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },
}

impl ApiError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::InvalidInput(message.into())
    }

    /// Wrap a provider failure, keeping the underlying message for diagnostics.
    pub fn upstream(message: impl Into<String>, source: impl std::fmt::Display) -> Self {
        ApiError::Upstream {
            message: message.into(),
            details: Some(source.to_string()),
        }
    }

    /// A provider response missing a field the contract promises.
    pub fn malformed_upstream(message: impl Into<String>) -> Self {
        ApiError::Upstream {
            message: message.into(),
            details: None,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration(_) | ApiError::Upstream { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = match &self {
            ApiError::Configuration(detail) => {
                error!(%detail, "Configuration error");
                None
            }
            ApiError::Upstream { details, .. } => details.clone(),
            ApiError::InvalidInput(_) => None,
        };

        let body = ErrorResponse {
            error: self.to_string(),
            details,
        };

        (self.status_code(), Json(body)).into_response()
    }
}
