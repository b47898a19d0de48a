//! Billing domain errors
//!
//! Business-rule failures carry a stable machine-readable code that the API
//! layer surfaces as `errorCode`. Every failure aborts the enclosing
//! transaction, so no partial state survives any of these.

use core_kernel::{BillingPeriod, ChargeId, CustomerId, GenerationRequestId, InvoiceId};
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Customer does not exist
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Charge does not exist
    #[error("Charge not found: {0}")]
    ChargeNotFound(ChargeId),

    /// Charge has been billed and is immutable
    #[error("Charge is billed and can no longer be edited: {0}")]
    ChargeBilled(ChargeId),

    /// Charge has been voided and is immutable
    #[error("Charge is void and can no longer be edited: {0}")]
    ChargeVoid(ChargeId),

    /// No unbilled charges matched the customer and period
    #[error("No unbilled charges for customer {customer_id} in period {period}")]
    NoChargesToInvoice {
        customer_id: CustomerId,
        period: BillingPeriod,
    },

    /// Selected charges span more than one currency
    #[error("Charges contain multiple currencies; cannot generate a single invoice: {currencies:?}")]
    MultiCurrencyNotSupported { currencies: Vec<String> },

    /// Invoice does not exist
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// Invoice is void and rejects payments
    #[error("Cannot pay a void invoice: {0}")]
    InvoiceVoid(InvoiceId),

    /// Idempotency ledger points at an invoice that does not exist
    #[error("Idempotency record {request_id} points to missing invoice {invoice_id}")]
    IdempotencyBroken {
        request_id: GenerationRequestId,
        invoice_id: InvoiceId,
    },

    /// A freshly created invoice could not be read back
    #[error("Invoice create yielded no readable result: {0}")]
    InvoiceCreateFailed(InvoiceId),
}

impl BillingError {
    /// Stable machine-readable code for the wire error format
    pub fn error_code(&self) -> &'static str {
        match self {
            BillingError::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            BillingError::ChargeNotFound(_) => "CHARGE_NOT_FOUND",
            BillingError::ChargeBilled(_) => "CHARGE_BILLED",
            BillingError::ChargeVoid(_) => "CHARGE_VOID",
            BillingError::NoChargesToInvoice { .. } => "NO_CHARGES_TO_INVOICE",
            BillingError::MultiCurrencyNotSupported { .. } => "MULTI_CURRENCY_NOT_SUPPORTED",
            BillingError::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            BillingError::InvoiceVoid(_) => "INVOICE_VOID",
            BillingError::IdempotencyBroken { .. } => "IDEMPOTENCY_BROKEN",
            BillingError::InvoiceCreateFailed(_) => "INVOICE_CREATE_FAILED",
        }
    }

    /// True for data-integrity failures that must surface as 500s
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            BillingError::IdempotencyBroken { .. } | BillingError::InvoiceCreateFailed(_)
        )
    }
}
