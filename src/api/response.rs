//! Response types for the payroll reconciler API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;
use crate::store::ClientCoverage;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<ReconcileError> for ApiErrorResponse {
    fn from(error: ReconcileError) -> Self {
        let message = error.to_string();
        match error {
            ReconcileError::ConfigNotFound { .. } | ReconcileError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
            ReconcileError::InvalidReferenceData { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "REFERENCE_DATA_ERROR",
                    "Reference data is inconsistent",
                    message,
                ),
            },
            ReconcileError::EmptyWorkSet { .. }
            | ReconcileError::MixedClientWorkSet { .. }
            | ReconcileError::DuplicateWorkRecord { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "RECONCILIATION_ERROR",
                    "Reconciliation failed",
                    message,
                ),
            },
            ReconcileError::ZeroTotalWorked { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "ZERO_HOURS_WORKED",
                    message,
                    "Approved units cannot be shared out when no hours were worked",
                ),
            ),
            ReconcileError::NegativeHours { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "NEGATIVE_HOURS",
                    message,
                    "Hours, ceilings and assignments must not be negative",
                ),
            ),
            ReconcileError::NegativeApprovedUnits { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "NEGATIVE_APPROVED_UNITS",
                    message,
                    "Net approved units for a client must not be negative",
                ),
            ),
            ReconcileError::NoPeriodsToCombine => ApiErrorResponse::bad_request(
                ApiError::validation_error(message),
            ),
            ReconcileError::ValueOutOfRange { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "VALUE_OUT_OF_RANGE",
                    message,
                    "Hours and units must stay within the representable range when summed",
                ),
            ),
        }
    }
}

/// Response body for `GET /coverage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageResponse {
    /// Coverage per active client.
    pub clients: Vec<ClientCoverage>,
}
