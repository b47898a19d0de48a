//! Invoice model and aggregation arithmetic
//!
//! The aggregation engine in `infra_db` drives the transaction; the actual
//! numbers are computed here so they can be tested without a database:
//! subtotal/tax/total for the invoice header, and the per-line tax
//! reconciliation that folds the rounding residue into the first line.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use core_kernel::{ChargeId, CustomerId, InvoiceId, InvoiceItemId, TaxRate};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::charge::Charge;

/// Invoice lifecycle status
///
/// `paid`/`partial` are pure functions of `amount_paid` vs `total`; `void`
/// is terminal and rejects payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "invoice_status", rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Generated but not issued
    Draft,
    /// Issued, awaiting payment
    Issued,
    /// Fully paid
    Paid,
    /// Partially paid
    Partial,
    /// Cancelled
    Void,
}

/// An invoice aggregating one customer's charges for one billing period
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Owning customer
    pub customer_id: CustomerId,
    /// Human-readable invoice number; display-only, not guaranteed unique
    pub invoice_no: String,
    /// Billing period start (inclusive)
    pub period_from: NaiveDate,
    /// Billing period end (inclusive)
    pub period_to: NaiveDate,
    /// Lifecycle status
    pub status: InvoiceStatus,
    /// Three-letter lowercase currency code
    pub currency: String,
    /// Sum of charge amounts, minor units
    pub subtotal: i64,
    /// Tax rate the invoice was computed at
    pub tax_rate: Decimal,
    /// round_half_up(subtotal * tax_rate), minor units
    pub tax_amount: i64,
    /// subtotal + tax_amount, minor units
    pub total: i64,
    /// Cumulative amount paid, minor units; monotonically non-decreasing
    pub amount_paid: i64,
    /// When the invoice was issued
    pub issued_at: DateTime<Utc>,
    /// Optional due date
    pub due_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Outstanding balance in minor units; negative on overpayment
    pub fn balance_due(&self) -> i64 {
        self.total - self.amount_paid
    }
}

/// A line on an invoice, tracing back to the charge that produced it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    /// Unique identifier
    pub id: InvoiceItemId,
    /// Owning invoice
    pub invoice_id: InvoiceId,
    /// Originating charge; kept even if the charge record changes later
    pub charge_id: Option<ChargeId>,
    /// Line description
    pub description: String,
    /// Charge amount, minor units
    pub amount: i64,
    /// Tax rate snapshot
    pub tax_rate: Decimal,
    /// This line's tax after reconciliation, minor units
    pub tax_amount: i64,
    /// amount + tax_amount, minor units
    pub total: i64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

/// An invoice together with its line items, the generation result shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceWithItems {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

/// Invoice-level amounts computed from the selected charges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: i64,
    pub tax_amount: i64,
    pub total: i64,
}

impl InvoiceTotals {
    /// Sums the charges and applies the tax rate once to the aggregate
    pub fn compute(charges: &[Charge], rate: TaxRate) -> Self {
        let subtotal: i64 = charges.iter().map(|c| c.amount).sum();
        let tax_amount = rate.tax_on_minor(subtotal);
        Self {
            subtotal,
            tax_amount,
            total: subtotal + tax_amount,
        }
    }
}

/// A line item about to be persisted, before it has an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemDraft {
    pub charge_id: ChargeId,
    pub description: String,
    pub amount: i64,
    pub tax_amount: i64,
    pub total: i64,
}

/// Builds line items from charges with exact tax reconciliation
///
/// Each line's tax is rounded independently; the sum of those lines can
/// differ from the invoice-level tax by a small residue because the
/// aggregate was rounded once. The residue is added to the first line's
/// `tax_amount` and `total` only, which makes
/// `sum(item.tax_amount) == invoice_tax` and
/// `sum(item.total) == subtotal + invoice_tax` hold exactly while every
/// other line reflects its own locally-rounded tax.
pub fn reconcile_line_items(
    charges: &[Charge],
    rate: TaxRate,
    invoice_tax: i64,
) -> Vec<LineItemDraft> {
    let mut items: Vec<LineItemDraft> = charges
        .iter()
        .map(|c| {
            let tax = rate.tax_on_minor(c.amount);
            LineItemDraft {
                charge_id: c.id,
                description: c.line_description(),
                amount: c.amount,
                tax_amount: tax,
                total: c.amount + tax,
            }
        })
        .collect();

    let line_tax_sum: i64 = items.iter().map(|i| i.tax_amount).sum();
    let delta = invoice_tax - line_tax_sum;
    if delta != 0 {
        if let Some(first) = items.first_mut() {
            first.tax_amount += delta;
            first.total += delta;
        }
    }

    items
}

/// Generates a display invoice number: `INV-YYYYMMDD-<6 hex chars>`
///
/// The random suffix is cosmetic; collisions are possible and accepted
/// since the UUID primary key is the real identity.
pub fn generate_invoice_number(now: DateTime<Utc>) -> String {
    let date = now.date_naive();
    let suffix: u32 = rand::thread_rng().gen_range(0..0x100_0000);
    format!(
        "INV-{:04}{:02}{:02}-{:06X}",
        date.year(),
        date.month(),
        date.day(),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_invoice_number_format() {
        let now = Utc.with_ymd_and_hms(2026, 2, 3, 12, 0, 0).unwrap();
        let number = generate_invoice_number(now);

        assert!(number.starts_with("INV-20260203-"));
        let suffix = number.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
