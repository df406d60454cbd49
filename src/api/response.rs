//! Response types for the concession billing API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::BillingError;

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

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                if body_text.contains("missing field") {
                    ApiError::validation_error(body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };

        ApiErrorResponse {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl From<BillingError> for ApiErrorResponse {
    fn from(error: BillingError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            BillingError::ConfigNotFound { .. }
            | BillingError::ConfigParseError { .. }
            | BillingError::DuplicateContract { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            BillingError::ContractNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("CONTRACT_NOT_FOUND", message),
            ),
            BillingError::InvalidConfiguration { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_CONFIGURATION",
                    message,
                    "The contract's payment configuration must be corrected before it can be billed",
                ),
            ),
            BillingError::InvalidRule { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_RULE",
                    message,
                    "A charge rule in force for the period is missing a required parameter or has an invalid value",
                ),
            ),
            BillingError::AmountOverflow { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "AMOUNT_OVERFLOW",
                    message,
                    "The declared figures or charge parameters are too large to bill",
                ),
            ),
            BillingError::InvalidIncomeReport { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_INCOME_REPORT", message),
            ),
            BillingError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PERIOD", message),
            ),
            BillingError::IncomeReportNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("INCOME_REPORT_NOT_FOUND", message),
            ),
            BillingError::IncomeReportMismatch { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INCOME_REPORT_MISMATCH", message),
            ),
            BillingError::IncomeReportExists { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("INCOME_REPORT_EXISTS", message),
            ),
            BillingError::PaymentAlreadyExists { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "PAYMENT_ALREADY_EXISTS",
                    message,
                    "A payment has already been computed for this period",
                ),
            ),
            BillingError::PaymentNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("PAYMENT_NOT_FOUND", message),
            ),
        };

        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_rule_maps_to_400() {
        let response: ApiErrorResponse = BillingError::InvalidRule {
            rule: "Stall entries".to_string(),
            message: "per-unit rule requires a unit type".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_RULE");
        assert!(response.error.message.contains("Stall entries"));
    }

    #[test]
    fn test_invalid_configuration_maps_to_400() {
        let response: ApiErrorResponse = BillingError::InvalidConfiguration {
            contract_id: 105,
            message: "minimum guarantee is enabled but no amount is set".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_CONFIGURATION");
    }

    #[test]
    fn test_amount_overflow_maps_to_400() {
        let response: ApiErrorResponse = BillingError::AmountOverflow {
            rule: "Share of sales".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "AMOUNT_OVERFLOW");
    }

    #[test]
    fn test_duplicate_payment_maps_to_409() {
        let response: ApiErrorResponse = BillingError::PaymentAlreadyExists {
            contract_id: 101,
            month: 3,
            year: 2025,
        }
        .into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "PAYMENT_ALREADY_EXISTS");
    }

    #[test]
    fn test_contract_not_found_maps_to_404() {
        let response: ApiErrorResponse = BillingError::ContractNotFound { contract_id: 9 }.into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error.code, "CONTRACT_NOT_FOUND");
    }

    #[test]
    fn test_config_errors_map_to_500() {
        let response: ApiErrorResponse = BillingError::ConfigNotFound {
            path: "/etc/parks".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "CONFIG_ERROR");
        assert!(response.error.details.unwrap().contains("/etc/parks"));
    }
}
