// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::services::dataset::DatasetError;
use crate::services::export::ExportError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials", None)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_failed",
                Some(errors.to_string()),
            ),
            AppError::NoData(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "no_data",
                Some(msg.clone()),
            ),
            AppError::Dataset(err) => match err {
                DatasetError::NotFound(name) => {
                    (StatusCode::NOT_FOUND, "not_found", Some(name.clone()))
                }
                DatasetError::IoError(msg) => {
                    tracing::error!(error = %msg, "Dataset storage error");
                    (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
                }
                other => (
                    StatusCode::BAD_REQUEST,
                    "invalid_dataset",
                    Some(other.to_string()),
                ),
            },
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NoData => AppError::NoData("No data to export".to_string()),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
