//! Charge model and lifecycle rules
//!
//! A charge is a single billable line owed by one customer. It is created
//! `unbilled`, and transitions exactly once: to `billed` when the aggregation
//! engine folds it into an invoice, or to `void` on explicit cancellation.
//! A billed or void charge is immutable; charges are never physically
//! deleted.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{BillingPeriod, ChargeId, CustomerId, InvoiceId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::collections::BTreeSet;
use std::fmt;

/// Kind of charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "charge_type", rename_all = "lowercase")]
pub enum ChargeType {
    /// Recurring storage usage
    Storage,
    /// Service/consulting work
    Service,
    /// Negative-amount discount line
    Discount,
    /// Manually entered adjustment
    Manual,
}

impl fmt::Display for ChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChargeType::Storage => "storage",
            ChargeType::Service => "service",
            ChargeType::Discount => "discount",
            ChargeType::Manual => "manual",
        };
        write!(f, "{s}")
    }
}

/// Charge lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "charge_status", rename_all = "lowercase")]
pub enum ChargeStatus {
    /// Awaiting invoicing
    Unbilled,
    /// Folded into an invoice
    Billed,
    /// Cancelled, excluded from invoicing forever
    Void,
}

/// A billable line owed by a customer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    /// Unique identifier
    pub id: ChargeId,
    /// Owning customer
    pub customer_id: CustomerId,
    /// Kind of charge
    #[serde(rename = "type")]
    pub charge_type: ChargeType,
    /// Signed amount in minor currency units (discounts are negative)
    pub amount: i64,
    /// Three-letter lowercase currency code
    pub currency: String,
    /// Free-text description, used as the invoice line description
    pub description: Option<String>,
    /// The single day the charge applies to, if any
    pub service_date: Option<NaiveDate>,
    /// Start of the charge's own period, if any
    pub period_from: Option<NaiveDate>,
    /// End of the charge's own period, if any
    pub period_to: Option<NaiveDate>,
    /// Lifecycle status
    pub status: ChargeStatus,
    /// Owning invoice once billed
    pub invoice_id: Option<InvoiceId>,
    /// Opaque metadata snapshot
    pub metadata: Option<Value>,
    /// Created timestamp; invoice line ordering follows this
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Charge {
    /// Returns true while the charge may still be edited or voided
    pub fn is_editable(&self) -> bool {
        self.status == ChargeStatus::Unbilled
    }

    /// Whether this charge is selectable for the given billing period
    ///
    /// Mirrors the selection query: an unbilled charge qualifies when its
    /// service date falls inside the period, or when it carries a complete
    /// period of its own that overlaps it. A charge with neither dates set
    /// is never selected.
    pub fn eligible_for(&self, period: &BillingPeriod) -> bool {
        if self.status != ChargeStatus::Unbilled {
            return false;
        }
        if let Some(date) = self.service_date {
            if period.contains(date) {
                return true;
            }
        }
        if let (Some(from), Some(to)) = (self.period_from, self.period_to) {
            return BillingPeriod::new(from, to).overlaps(period);
        }
        false
    }

    /// Invoice line description: the charge's own, or "<type> charge"
    pub fn line_description(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("{} charge", self.charge_type))
    }
}

/// Collects the distinct currency codes among a set of charges, sorted
pub fn distinct_currencies(charges: &[Charge]) -> BTreeSet<String> {
    charges
        .iter()
        .map(|c| c.currency.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn charge(status: ChargeStatus) -> Charge {
        Charge {
            id: ChargeId::new(),
            customer_id: CustomerId::new(),
            charge_type: ChargeType::Service,
            amount: 1000,
            currency: "usd".to_string(),
            description: None,
            service_date: None,
            period_from: None,
            period_to: None,
            status,
            invoice_id: None,
            metadata: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_charge_without_dates_is_never_eligible() {
        let c = charge(ChargeStatus::Unbilled);
        let period = BillingPeriod::new(d(2026, 2, 1), d(2026, 2, 28));
        assert!(!c.eligible_for(&period));
    }

    #[test]
    fn test_service_date_inside_period_is_eligible() {
        let mut c = charge(ChargeStatus::Unbilled);
        c.service_date = Some(d(2026, 2, 10));
        let period = BillingPeriod::new(d(2026, 2, 1), d(2026, 2, 28));
        assert!(c.eligible_for(&period));
    }

    #[test]
    fn test_billed_charge_is_not_eligible_regardless_of_dates() {
        let mut c = charge(ChargeStatus::Billed);
        c.service_date = Some(d(2026, 2, 10));
        let period = BillingPeriod::new(d(2026, 2, 1), d(2026, 2, 28));
        assert!(!c.eligible_for(&period));
    }

    #[test]
    fn test_line_description_falls_back_to_type() {
        let c = charge(ChargeStatus::Unbilled);
        assert_eq!(c.line_description(), "service charge");
    }
}
