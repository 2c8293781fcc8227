//! Response types for the expense report API.
//!
//! This module defines the error response structures and the mapping from
//! domain errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::assistant::OptimizationSuggestion;
use crate::error::{AssistantError, ReportError, StoreError};
use crate::models::ExpenseRecord;

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
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A `400 Bad Request` carrying `error`.
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

impl From<ReportError> for ApiErrorResponse {
    fn from(error: ReportError) -> Self {
        match error {
            ReportError::UnencodableCharacter { .. } | ReportError::InvalidLayout { .. } => {
                ApiErrorResponse {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    error: ApiError::with_details(
                        "REPORT_GENERATION_FAILED",
                        "Report generation failed",
                        error.to_string(),
                    ),
                }
            }
            ReportError::InvalidRecord { .. } => {
                ApiErrorResponse::bad_request(ApiError::validation_error(error.to_string()))
            }
            ReportError::ConfigNotFound { .. } | ReportError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details(
                        "CONFIG_ERROR",
                        "Configuration error",
                        error.to_string(),
                    ),
                }
            }
        }
    }
}

impl From<StoreError> for ApiErrorResponse {
    fn from(error: StoreError) -> Self {
        let status = match error {
            StoreError::MissingConfiguration { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiErrorResponse {
            status,
            error: ApiError::with_details("STORE_ERROR", "Expense store error", error.to_string()),
        }
    }
}

impl From<AssistantError> for ApiErrorResponse {
    fn from(error: AssistantError) -> Self {
        ApiErrorResponse {
            status: StatusCode::BAD_GATEWAY,
            error: ApiError::with_details(
                "TRANSLATION_FAILED",
                "Failed to get tax optimization suggestions.",
                error.to_string(),
            ),
        }
    }
}

/// Response body of `POST /translations/optimize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    /// The assistant's suggestion.
    #[serde(flatten)]
    pub suggestion: OptimizationSuggestion,
    /// The record with the suggestion applied.
    pub record: ExpenseRecord,
}
