//! Unified error types for the Membership API
//!
//! This module defines error types for each layer:
//! - `ValidationError`: Rejected membership input, reported to the caller by kind
//! - `DomainError`: Storage failures behind the ports
//! - `AppError`: Application layer errors (wraps both for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Input rejected by the membership creation rules
///
/// The display form is the wire identifier returned in `{"message": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missingMandatoryFields")]
    MissingMandatoryFields,

    #[error("negativeRecurringPrice")]
    NegativeRecurringPrice,

    #[error("cashPriceBelow100")]
    CashPriceBelow100,

    #[error("billingPeriodsMoreThan12Months")]
    BillingPeriodsMoreThan12Months,

    #[error("billingPeriodsLessThan6Months")]
    BillingPeriodsLessThan6Months,

    #[error("billingPeriodsMoreThan10Years")]
    BillingPeriodsMoreThan10Years,

    #[error("billingPeriodsLessThan3Years")]
    BillingPeriodsLessThan3Years,

    #[error("invalidBillingPeriods")]
    InvalidBillingPeriods,
}

/// Domain layer errors - failures behind the ports
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(kind) => (StatusCode::BAD_REQUEST, None, kind.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, None, msg.clone()),
            AppError::Domain(e) => {
                tracing::error!(error = %e, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Some("Internal Server Error"),
                    e.to_string(),
                )
            }
        };

        let body = Json(ErrorResponse { error, message });

        (status, body).into_response()
    }
}
