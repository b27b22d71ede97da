//! Error taxonomy and mapping to HTTP response shapes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Fixed user-facing message for any failure that is not validation or
/// not-found. Internal detail is logged, never returned.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Errors surfaced by the service layers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input failed a declared constraint; keyed by field name.
    #[error("validation failed: {0:?}")]
    Validation(BTreeMap<String, String>),

    /// Referenced entity does not exist.
    #[error("{resource} not found with id: {id}")]
    NotFound { resource: &'static str, id: i64 },

    /// Store failures and anything else unexpected.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn task_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "Task",
            id,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert this error into the wire shape for the request at `path`.
    ///
    /// This is the single mapping point between the error taxonomy and the
    /// HTTP surface; handlers funnel every failure through here.
    pub fn into_http_response(self, path: &str) -> Response {
        let status = self.status();
        match self {
            Self::Validation(errors) => {
                tracing::error!(?errors, "Validation failed");
                let body = ValidationErrorBody {
                    status: status.as_u16(),
                    errors,
                    path: path.to_string(),
                    timestamp: Utc::now(),
                };
                (status, Json(body)).into_response()
            }
            Self::NotFound { .. } => {
                tracing::error!("Resource not found: {}", self);
                let body = ErrorBody {
                    status: status.as_u16(),
                    message: self.to_string(),
                    path: path.to_string(),
                    timestamp: Utc::now(),
                };
                (status, Json(body)).into_response()
            }
            Self::Internal(err) => {
                tracing::error!("Internal server error: {:#}", err);
                let body = ErrorBody {
                    status: status.as_u16(),
                    message: INTERNAL_ERROR_MESSAGE.to_string(),
                    path: path.to_string(),
                    timestamp: Utc::now(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

/// Generic error body (404 / 500).
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// Validation error body (400), with per-field messages.
#[derive(Debug, Serialize)]
pub struct ValidationErrorBody {
    pub status: u16,
    pub errors: BTreeMap<String, String>,
    pub path: String,
    pub timestamp: DateTime<Utc>,
}
