//! Outstanding-invoice notifications
//!
//! The sweep finds invoices still owing money, groups them per customer,
//! and emits one aggregated notification per customer. Each attempt is
//! recorded in the communication log as `queued`, then flipped to `sent`
//! once the (stubbed) delivery completes. The log is an audit trail only:
//! the sweep carries no dedup against it, so a customer with an invoice
//! left outstanding is re-notified on every run.

use chrono::{DateTime, Utc};
use core_kernel::{CommunicationLogId, CustomerId, InvoiceId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::invoice::Invoice;

/// Communication type written by the sweep
pub const PENDING_INVOICES_EMAIL: &str = "pending_invoices_email";

/// Delivery status of a logged communication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "communication_status", rename_all = "lowercase")]
pub enum CommunicationStatus {
    /// Created, delivery not yet attempted
    Queued,
    /// Delivery completed
    Sent,
}

/// An outbound notification attempt, append-only
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationLog {
    /// Unique identifier
    pub id: CommunicationLogId,
    /// Customer the notification addresses
    pub customer_id: CustomerId,
    /// Communication type tag
    #[serde(rename = "type")]
    pub communication_type: String,
    /// Delivery status
    pub status: CommunicationStatus,
    /// Snapshot of the payload that was (to be) sent
    pub payload: Value,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

/// One customer's outstanding invoices, aggregated for notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInvoiceGroup {
    pub customer_id: CustomerId,
    pub invoice_ids: Vec<InvoiceId>,
    /// Sum of `total - amount_paid` across the group, minor units
    pub total_due: i64,
    /// Currency of the first invoice in the group
    pub currency: String,
}

impl PendingInvoiceGroup {
    pub fn invoice_count(&self) -> usize {
        self.invoice_ids.len()
    }
}

/// Payload snapshot stored in the communication log and handed to delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub customer_id: CustomerId,
    pub invoice_count: usize,
    pub total_due: i64,
    pub currency: String,
    pub pay_link: String,
    pub invoice_ids: Vec<InvoiceId>,
}

impl NotificationPayload {
    /// Builds the payload for a group, with a pay-link under `base_url`
    pub fn for_group(group: &PendingInvoiceGroup, base_url: &str) -> Self {
        Self {
            customer_id: group.customer_id,
            invoice_count: group.invoice_count(),
            total_due: group.total_due,
            currency: group.currency.clone(),
            pay_link: format!("{}/pay?customerId={}", base_url, group.customer_id.as_uuid()),
            invoice_ids: group.invoice_ids.clone(),
        }
    }
}

/// Per-customer summary returned by the sweep entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerNotificationSummary {
    pub customer_id: CustomerId,
    pub invoice_count: usize,
    pub total_due: i64,
    pub currency: String,
}

/// Groups invoices that still owe money by customer
///
/// Invoices whose `amount_paid` already covers `total` are dropped (a
/// defensive re-check; the caller should only pass `issued`/`partial`
/// invoices). Groups keep first-seen customer order so sweep output is
/// deterministic for a given fetch order.
pub fn group_outstanding_by_customer(invoices: &[Invoice]) -> Vec<PendingInvoiceGroup> {
    let mut groups: Vec<PendingInvoiceGroup> = Vec::new();

    for invoice in invoices.iter().filter(|i| i.amount_paid < i.total) {
        match groups.iter_mut().find(|g| g.customer_id == invoice.customer_id) {
            Some(group) => {
                group.invoice_ids.push(invoice.id);
                group.total_due += invoice.balance_due();
            }
            None => groups.push(PendingInvoiceGroup {
                customer_id: invoice.customer_id,
                invoice_ids: vec![invoice.id],
                total_due: invoice.balance_due(),
                currency: invoice.currency.clone(),
            }),
        }
    }

    groups
}
