//! API error taxonomy and its HTTP rendering.
//!
//! Validation → 400, not found → 404, storage → 500. Bodies are
//! `{ "message": ..., "error": ... }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use notebook_core::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid data: {0}")]
    Validation(String),

    #[error("Subject not found")]
    NotFound,

    #[error("Server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Invalid data",
            Self::NotFound => "Subject not found",
            Self::Internal(_) => "Server error",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err.to_string()),
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::Storage(err) => Self::Internal(err.to_string()),
            StoreError::Remote(message) => Self::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(detail) => json!({ "message": self.message(), "error": detail }),
            Self::NotFound => json!({ "message": self.message() }),
            Self::Internal(detail) => {
                error!("event=http_error module=http status=error error={detail}");
                // Storage details stay in the log.
                json!({ "message": self.message() })
            }
        };
        (status, Json(body)).into_response()
    }
}
