//! Notification sweep implementation
//!
//! Finds invoices still owing money, aggregates them per customer, and
//! records one communication-log entry per customer: `queued` first, then
//! `sent` once delivery completes. Delivery itself is a log-line stub; the
//! communication log is the audit trail of what would have gone out.

use core_kernel::{CommunicationLogId, CustomerId};
use domain_billing::{
    group_outstanding_by_customer, CommunicationStatus, CustomerNotificationSummary, Invoice,
    NotificationPayload, PENDING_INVOICES_EMAIL,
};
use sqlx::PgPool;
use tracing::info;

use crate::error::{DatabaseError, RepositoryError};

/// Repository for the outstanding-invoice notification sweep
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the sweep, optionally restricted to one customer
    ///
    /// Every run re-notifies every customer with an outstanding invoice;
    /// there is no dedup against previous log entries. Returns one summary
    /// per notified customer.
    pub async fn send_pending(
        &self,
        customer_id: Option<CustomerId>,
        base_url: &str,
    ) -> Result<Vec<CustomerNotificationSummary>, RepositoryError> {
        let invoices: Vec<Invoice> = sqlx::query_as(
            r#"
            SELECT id, customer_id, invoice_no, period_from, period_to, status,
                   currency, subtotal, tax_rate, tax_amount, total, amount_paid,
                   issued_at, due_at, created_at, updated_at
            FROM invoices
            WHERE status IN ('issued', 'partial')
              AND ($1::uuid IS NULL OR customer_id = $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        let groups = group_outstanding_by_customer(&invoices);
        let mut summaries = Vec::with_capacity(groups.len());

        for group in &groups {
            let payload = NotificationPayload::for_group(group, base_url);
            let payload_json = serde_json::to_value(&payload)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

            let log_id = CommunicationLogId::new();
            sqlx::query(
                r#"
                INSERT INTO communication_logs (id, customer_id, communication_type, status, payload)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(log_id)
            .bind(group.customer_id)
            .bind(PENDING_INVOICES_EMAIL)
            .bind(CommunicationStatus::Queued)
            .bind(&payload_json)
            .execute(&self.pool)
            .await?;

            info!(
                customer_id = %group.customer_id,
                invoices = group.invoice_count(),
                total_due = group.total_due,
                "sending pending-invoices notification"
            );

            sqlx::query("UPDATE communication_logs SET status = $1 WHERE id = $2")
                .bind(CommunicationStatus::Sent)
                .bind(log_id)
                .execute(&self.pool)
                .await?;

            summaries.push(CustomerNotificationSummary {
                customer_id: group.customer_id,
                invoice_count: group.invoice_count(),
                total_due: group.total_due,
                currency: group.currency.clone(),
            });
        }

        Ok(summaries)
    }
}
