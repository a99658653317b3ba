// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the photograph proxy API.

use crate::response::ErrorEnvelope;
use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level problem reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors returned to API callers.
///
/// Messages are fixed strings. Upstream causes are logged where they occur
/// and never carried in here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid or missing authentication token")]
    Unauthorized,

    #[error("Invalid request data")]
    Validation(Vec<FieldError>),

    #[error("Too many photograph submissions, please try again later.")]
    RateLimited { retry_after_secs: u64 },

    #[error("Method {0} not allowed")]
    MethodNotAllowed(Method),

    #[error("No image file provided")]
    NoFile,

    #[error("Only image files are allowed")]
    InvalidFileType,

    #[error("File size exceeds {}MB limit", .limit_bytes / (1024 * 1024))]
    FileTooLarge { limit_bytes: usize },

    #[error("Request body too large")]
    BodyTooLarge,

    #[error("Failed to fetch photographs")]
    FetchFailed,

    #[error("Failed to create photograph")]
    CreateFailed,

    #[error("File upload failed")]
    UploadFailed,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
            Self::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            Self::NoFile => "NO_FILE",
            Self::InvalidFileType => "INVALID_FILE_TYPE",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::BodyTooLarge => "PAYLOAD_TOO_LARGE",
            Self::FetchFailed => "FETCH_FAILED",
            Self::CreateFailed => "CREATE_FAILED",
            Self::UploadFailed => "UPLOAD_FAILED",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::NoFile | Self::InvalidFileType => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::FileTooLarge { .. } | Self::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::FetchFailed | Self::CreateFailed | Self::UploadFailed | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Field-level details, when the error has any.
    pub fn details(&self) -> Option<Vec<FieldError>> {
        match self {
            Self::Validation(errors) => Some(errors.clone()),
            Self::RateLimited { retry_after_secs } => Some(vec![FieldError::new(
                "rate_limit",
                format!("Please wait {retry_after_secs} seconds before trying again."),
            )]),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorEnvelope::new(self.code(), self.to_string(), self.details()));

        match self {
            Self::RateLimited { retry_after_secs } => (
                status,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;
