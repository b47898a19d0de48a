//! Payment model and invoice status recomputation
//!
//! Payments are append-only; every new payment recomputes the owning
//! invoice's cumulative `amount_paid` and its status. There is no real
//! gateway: each payment is recorded unconditionally as `complete` under a
//! mock provider tag.

use chrono::{DateTime, Utc};
use core_kernel::{InvoiceId, PaymentId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::invoice::InvoiceStatus;

/// Provider tag recorded on every mock payment
pub const MOCK_PROVIDER: &str = "mock";

/// Payment processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting provider confirmation
    Pending,
    /// Settled
    Complete,
    /// Rejected by the provider
    Failed,
}

/// A payment applied to an invoice
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Invoice the payment applies to
    pub invoice_id: InvoiceId,
    /// Amount in minor units
    pub amount: i64,
    /// Currency code, copied from the invoice
    pub currency: String,
    /// Processing status
    pub status: PaymentStatus,
    /// Provider tag
    pub provider: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

/// Computes the invoice status after a payment brings it to `new_paid`
///
/// Overpayment is not capped: `new_paid` above `total` still yields `paid`.
/// The zero-paid branch preserves `draft` for drafts and otherwise settles
/// on `issued`.
pub fn next_status_after_payment(
    current: InvoiceStatus,
    new_paid: i64,
    total: i64,
) -> InvoiceStatus {
    if new_paid >= total {
        InvoiceStatus::Paid
    } else if new_paid > 0 {
        InvoiceStatus::Partial
    } else if current == InvoiceStatus::Draft {
        InvoiceStatus::Draft
    } else {
        InvoiceStatus::Issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_then_paid() {
        let status = next_status_after_payment(InvoiceStatus::Issued, 100, 1150);
        assert_eq!(status, InvoiceStatus::Partial);

        let status = next_status_after_payment(InvoiceStatus::Partial, 1150, 1150);
        assert_eq!(status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_overpayment_is_paid() {
        let status = next_status_after_payment(InvoiceStatus::Issued, 2000, 1150);
        assert_eq!(status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_zero_paid_preserves_draft() {
        let status = next_status_after_payment(InvoiceStatus::Draft, 0, 1150);
        assert_eq!(status, InvoiceStatus::Draft);

        let status = next_status_after_payment(InvoiceStatus::Issued, 0, 1150);
        assert_eq!(status, InvoiceStatus::Issued);
    }
}
