// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classifier::ClassifierError;
use crate::vision::ImageError;

/// JSON body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request failure taxonomy, mapped to distinct HTTP statuses.
///
/// Whatever the failure, clients always get an `ErrorResponse` JSON body;
/// a request can never crash the process.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// The upload field is missing, empty, or the multipart body is malformed
    MissingInput(String),
    /// The uploaded bytes are not a decodable image
    InvalidImage(String),
    /// The classifier could not produce a usable analysis
    ClassificationFailed(String),
    /// The classifier service cannot be reached
    ServiceUnavailable(String),
    /// Anything else
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_) | ApiError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            ApiError::ClassificationFailed(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// The message surfaced to the client, verbatim
    pub fn message(&self) -> &str {
        match self {
            ApiError::MissingInput(msg)
            | ApiError::InvalidImage(msg)
            | ApiError::ClassificationFailed(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::Internal(msg) => msg,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.message().to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingInput(msg) => write!(f, "missing input: {}", msg),
            ApiError::InvalidImage(msg) => write!(f, "invalid image: {}", msg),
            ApiError::ClassificationFailed(msg) => write!(f, "classification failed: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "service unavailable: {}", msg),
            ApiError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        ApiError::InvalidImage(err.to_string())
    }
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::Unreachable(_) => ApiError::ServiceUnavailable(err.to_string()),
            ClassifierError::Rejected { .. } | ClassifierError::InvalidResponse(_) => {
                ApiError::ClassificationFailed(err.to_string())
            }
            ClassifierError::Encode(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
