//! Invoice DTOs

use chrono::NaiveDate;
use core_kernel::CustomerId;
use domain_billing::{Invoice, InvoiceStatus, Payment};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_period"))]
pub struct GenerateInvoiceRequest {
    pub customer_id: CustomerId,
    /// Billing period start, inclusive
    pub period_from: NaiveDate,
    /// Billing period end, inclusive
    pub period_to: NaiveDate,
    /// Overrides the configured default tax rate; must be in `[0, 1]`
    pub tax_rate: Option<Decimal>,
    /// When false, creates the invoice as a `draft` instead of issuing it
    #[serde(default = "default_issue_now")]
    pub issue_now: bool,
}

fn default_issue_now() -> bool {
    true
}

fn validate_period(req: &GenerateInvoiceRequest) -> Result<(), ValidationError> {
    if req.period_from > req.period_to {
        return Err(ValidationError::new("period_inverted"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvoicesQuery {
    pub customer_id: Option<CustomerId>,
    pub status: Option<InvoiceStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    /// Payment amount in minor units; must be positive
    #[validate(range(min = 1))]
    pub amount: i64,
}

/// Response for a recorded payment: the payment plus the updated invoice
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment: Payment,
    pub invoice: Invoice,
}
