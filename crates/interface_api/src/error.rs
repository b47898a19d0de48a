//! API error handling
//!
//! Every failure serializes to the same wire shape:
//! `{ "errorCode": "...", "message": "...", "details": ... }`. Business-rule
//! failures carry their stable code through from the domain; database and
//! integrity failures are logged server-side and surfaced as a generic 500
//! so internals never leak to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain_billing::BillingError;
use infra_db::{DatabaseError, RepositoryError};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed validation before reaching the domain
    #[error("Validation failed")]
    Validation { details: Value },

    /// A billing business rule rejected the request
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// The database failed
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Anything else
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

fn billing_status(err: &BillingError) -> StatusCode {
    match err {
        BillingError::CustomerNotFound(_)
        | BillingError::ChargeNotFound(_)
        | BillingError::InvoiceNotFound(_) => StatusCode::NOT_FOUND,
        BillingError::ChargeBilled(_)
        | BillingError::ChargeVoid(_)
        | BillingError::NoChargesToInvoice { .. }
        | BillingError::MultiCurrencyNotSupported { .. }
        | BillingError::InvoiceVoid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BillingError::IdempotencyBroken { .. } | BillingError::InvoiceCreateFailed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Structured context carried on the business errors that have any
fn billing_details(err: &BillingError) -> Option<Value> {
    match err {
        BillingError::NoChargesToInvoice {
            customer_id,
            period,
        } => Some(json!({
            "customerId": customer_id,
            "periodFrom": period.from,
            "periodTo": period.to,
        })),
        BillingError::MultiCurrencyNotSupported { currencies } => Some(json!({
            "currencies": currencies,
        })),
        _ => None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Validation { details } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR".to_string(),
                "Request validation failed".to_string(),
                Some(details),
            ),
            ApiError::Billing(err) if err.is_internal() => {
                tracing::error!(error = %err, "billing integrity failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    err.error_code().to_string(),
                    "Internal server error".to_string(),
                    None,
                )
            }
            ApiError::Billing(err) => (
                billing_status(&err),
                err.error_code().to_string(),
                err.to_string(),
                billing_details(&err),
            ),
            ApiError::Database(err) => {
                tracing::error!(error = %err, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR".to_string(),
                    "Internal server error".to_string(),
                    None,
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR".to_string(),
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error_code,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Billing(e) => ApiError::Billing(e),
            RepositoryError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
        ApiError::Validation { details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{ChargeId, CustomerId, InvoiceId};

    #[test]
    fn test_not_found_errors_map_to_404() {
        assert_eq!(
            billing_status(&BillingError::CustomerNotFound(CustomerId::new())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            billing_status(&BillingError::InvoiceNotFound(InvoiceId::new())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_business_rule_errors_map_to_422() {
        assert_eq!(
            billing_status(&BillingError::ChargeBilled(ChargeId::new())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            billing_status(&BillingError::MultiCurrencyNotSupported {
                currencies: vec!["eur".into(), "usd".into()]
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_integrity_errors_map_to_500() {
        let err = BillingError::InvoiceCreateFailed(InvoiceId::new());
        assert_eq!(billing_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_internal());
    }

    #[test]
    fn test_no_charges_details_carry_customer_and_period() {
        use chrono::NaiveDate;
        use core_kernel::BillingPeriod;

        let customer_id = CustomerId::new();
        let err = BillingError::NoChargesToInvoice {
            customer_id,
            period: BillingPeriod::new(
                NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
            ),
        };

        let details = billing_details(&err).expect("details present");
        assert_eq!(details["customerId"], json!(customer_id));
        assert_eq!(details["periodFrom"], "2026-02-01");
        assert_eq!(details["periodTo"], "2026-02-28");
    }

    #[test]
    fn test_multi_currency_details_list_the_currencies() {
        let err = BillingError::MultiCurrencyNotSupported {
            currencies: vec!["eur".into(), "usd".into()],
        };

        let details = billing_details(&err).expect("details present");
        assert_eq!(details["currencies"], json!(["eur", "usd"]));
    }

    #[test]
    fn test_not_found_errors_carry_no_details() {
        let err = BillingError::InvoiceNotFound(InvoiceId::new());
        assert!(billing_details(&err).is_none());
    }
}
