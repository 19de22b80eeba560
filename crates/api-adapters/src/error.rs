//! # API Error Envelope
//!
//! Maps workflow failures to the `{error, details?}` JSON envelope and the
//! status codes the dashboard expects: 400 for bad input and missing
//! referenced documents, 404 only where a direct fetch misses, 500 for
//! identity and dependency failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use domains::error::DomainError;

/// Wire shape of every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Handler-level error with its HTTP status.
#[derive(Debug)]
pub enum ApiError {
    /// Bad input or a missing referenced document (400).
    BadRequest(String),
    /// Missing resource on a direct fetch (404).
    NotFound(String),
    /// Identity or dependency failure (500).
    Internal {
        message: String,
        details: Option<String>,
    },
}

impl ApiError {
    /// Maps a workflow failure, using `fallback` as the user-facing message
    /// for unexpected dependency errors.
    pub fn from_domain(err: DomainError, fallback: &str) -> Self {
        match err {
            DomainError::NotFound(..) | DomainError::Validation(_) => {
                Self::BadRequest(err.to_string())
            }
            DomainError::IdentityConflict(_) => Self::Internal {
                message: "Failed to create authentication user".to_string(),
                details: Some(err.to_string()),
            },
            DomainError::Dependency(_) => Self::Internal {
                message: fallback.to_string(),
                details: Some(err.to_string()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            Self::Internal { message, details } => {
                error!(error = %message, details = ?details, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: message,
                        details,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
