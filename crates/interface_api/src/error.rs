//! API error handling
//!
//! Every failure leaves the API as `{"error": "<kind>", "message": "..."}`.
//! Internal failures are logged with full detail and answered with an
//! opaque message.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use core_kernel::PortError;
use domain_beneficiary::BeneficiaryError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    InvalidField { message: String, fields: Vec<String> },

    #[error("{0}")]
    InvalidDocumentType(String),

    #[error("{0}")]
    InvalidDocumentFormat(String),

    #[error("{0}")]
    DuplicateDocument(String),

    #[error("{0}")]
    InvalidSex(String),

    #[error("{0}")]
    IdMismatch(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<Vec<String>>,
}

impl ApiError {
    /// The status code and machine-readable kind of this error
    pub fn kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::InvalidField { .. } => (StatusCode::BAD_REQUEST, "invalid_field"),
            ApiError::InvalidDocumentType(_) => (StatusCode::BAD_REQUEST, "invalid_document_type"),
            ApiError::InvalidDocumentFormat(_) => (StatusCode::BAD_REQUEST, "invalid_document_format"),
            ApiError::DuplicateDocument(_) => (StatusCode::BAD_REQUEST, "duplicate_document"),
            ApiError::InvalidSex(_) => (StatusCode::BAD_REQUEST, "invalid_sex"),
            ApiError::IdMismatch(_) => (StatusCode::BAD_REQUEST, "id_mismatch"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.kind();

        let (message, details) = match self {
            ApiError::Internal(detail) => {
                error!(detail = %detail, "Request failed with internal error");
                ("Internal server error".to_string(), None)
            }
            ApiError::InvalidField { message, fields } => {
                warn!(error = error_type, %message, "Request rejected");
                (message, Some(fields))
            }
            other => {
                let message = other.to_string();
                warn!(error = error_type, %message, "Request rejected");
                (message, None)
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<BeneficiaryError> for ApiError {
    fn from(err: BeneficiaryError) -> Self {
        let message = err.to_string();
        match err {
            BeneficiaryError::NotFound(_) => ApiError::NotFound(message),
            BeneficiaryError::InvalidField(fields) => ApiError::InvalidField { message, fields },
            BeneficiaryError::InvalidDocumentType(_) => ApiError::InvalidDocumentType(message),
            BeneficiaryError::InvalidDocumentFormat(_) => ApiError::InvalidDocumentFormat(message),
            BeneficiaryError::DuplicateDocument { .. } => ApiError::DuplicateDocument(message),
            BeneficiaryError::InvalidSex(_) => ApiError::InvalidSex(message),
            BeneficiaryError::IdMismatch { .. } => ApiError::IdMismatch(message),
            BeneficiaryError::Internal(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
