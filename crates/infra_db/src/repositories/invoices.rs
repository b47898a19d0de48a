//! Invoice repository: generation engine, queries, and payment application
//!
//! Invoice generation is the one place charges change hands, and it runs as
//! a single transaction: claim the idempotency ledger row, select the
//! unbilled charges, compute totals, write the invoice and its lines, mark
//! the charges billed, and point the ledger row at the invoice. Any failure
//! rolls the whole thing back, including the ledger claim, so a failed
//! period can be retried.
//!
//! Concurrency control is the database's: the `ON CONFLICT DO UPDATE`
//! upsert on the ledger takes a row lock, so two requests for the same
//! (customer, period) serialize there. The loser observes the winner's
//! committed `invoice_id` and returns the same invoice.

use chrono::Utc;
use core_kernel::{BillingPeriod, CustomerId, GenerationRequestId, InvoiceId, InvoiceItemId, PaymentId, TaxRate};
use domain_billing::{
    distinct_currencies, generate_invoice_number, next_status_after_payment,
    reconcile_line_items, BillingError, Charge, Invoice, InvoiceItem, InvoiceStatus,
    InvoiceTotals, InvoiceWithItems, Payment, PaymentStatus, MOCK_PROVIDER,
};
use sqlx::{PgConnection, PgPool};
use tracing::info;

use crate::error::RepositoryError;
use crate::repositories::charges::CHARGE_COLUMNS;
use crate::repositories::Page;

const INVOICE_COLUMNS: &str = "id, customer_id, invoice_no, period_from, period_to, status, \
     currency, subtotal, tax_rate, tax_amount, total, amount_paid, issued_at, due_at, \
     created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, invoice_id, charge_id, description, amount, tax_rate, tax_amount, total, created_at";

/// Request to generate an invoice for one customer and billing period
#[derive(Debug, Clone)]
pub struct GenerateInvoice {
    pub customer_id: CustomerId,
    pub period: BillingPeriod,
    pub tax_rate: TaxRate,
    /// When false the invoice is created as a `draft` instead of `issued`
    pub issue_now: bool,
}

/// Result of a generation request
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub invoice: InvoiceWithItems,
    /// True when the idempotency ledger already held an invoice for the
    /// (customer, period) and no new invoice was created
    pub reused: bool,
}

/// Filter for listing invoices
#[derive(Debug, Clone)]
pub struct InvoiceFilter {
    pub customer_id: Option<CustomerId>,
    pub status: Option<InvoiceStatus>,
    pub limit: i64,
    pub offset: i64,
}

/// Result of applying a payment
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub invoice: Invoice,
}

/// Repository for invoices, their items, and payments
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Generates the invoice for a customer and billing period, or returns
    /// the already-generated one
    ///
    /// # Errors
    ///
    /// - `CustomerNotFound` if the customer does not exist
    /// - `NoChargesToInvoice` if no unbilled charge matches the period
    /// - `MultiCurrencyNotSupported` if the matched charges span currencies
    /// - `IdempotencyBroken` if the ledger references a missing invoice
    pub async fn generate(
        &self,
        req: GenerateInvoice,
    ) -> Result<GenerationOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let customer_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM customers WHERE id = $1)",
        )
        .bind(req.customer_id)
        .fetch_one(&mut *tx)
        .await?;

        if !customer_exists {
            return Err(BillingError::CustomerNotFound(req.customer_id).into());
        }

        // Claim the ledger row. The no-op DO UPDATE makes the statement
        // return the existing row (locked) instead of nothing, so the two
        // outcomes are one round trip: a fresh claim with NULL invoice_id,
        // or the winner's invoice_id.
        let (request_id, existing): (GenerationRequestId, Option<InvoiceId>) = sqlx::query_as(
            r#"
            INSERT INTO invoice_generation_requests (id, customer_id, period_from, period_to)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ON CONSTRAINT generation_requests_unique_period
            DO UPDATE SET customer_id = EXCLUDED.customer_id
            RETURNING id, invoice_id
            "#,
        )
        .bind(GenerationRequestId::new())
        .bind(req.customer_id)
        .bind(req.period.from)
        .bind(req.period.to)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(invoice_id) = existing {
            let invoice = fetch_with_items(&mut tx, invoice_id).await?.ok_or(
                BillingError::IdempotencyBroken {
                    request_id,
                    invoice_id,
                },
            )?;
            tx.commit().await?;
            info!(%invoice_id, customer_id = %req.customer_id, "generation request reused existing invoice");
            return Ok(GenerationOutcome {
                invoice,
                reused: true,
            });
        }

        // Select the billable charges: unbilled, and either dated inside
        // the period or carrying a period of their own that overlaps it.
        let charges: Vec<Charge> = sqlx::query_as(&format!(
            r#"
            SELECT {CHARGE_COLUMNS}
            FROM charges
            WHERE customer_id = $1
              AND status = 'unbilled'
              AND (
                  (service_date IS NOT NULL AND service_date BETWEEN $2 AND $3)
                  OR (period_from IS NOT NULL AND period_to IS NOT NULL
                      AND period_from <= $3 AND period_to >= $2)
              )
            ORDER BY created_at ASC
            "#
        ))
        .bind(req.customer_id)
        .bind(req.period.from)
        .bind(req.period.to)
        .fetch_all(&mut *tx)
        .await?;

        if charges.is_empty() {
            return Err(BillingError::NoChargesToInvoice {
                customer_id: req.customer_id,
                period: req.period,
            }
            .into());
        }

        let currencies = distinct_currencies(&charges);
        if currencies.len() > 1 {
            return Err(BillingError::MultiCurrencyNotSupported {
                currencies: currencies.into_iter().collect(),
            }
            .into());
        }
        let currency = charges[0].currency.to_ascii_lowercase();

        let totals = InvoiceTotals::compute(&charges, req.tax_rate);
        let now = Utc::now();
        let invoice_id = InvoiceId::new();
        let invoice_no = generate_invoice_number(now);
        let status = if req.issue_now {
            InvoiceStatus::Issued
        } else {
            InvoiceStatus::Draft
        };

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, customer_id, invoice_no, period_from, period_to, status,
                currency, subtotal, tax_rate, tax_amount, total, amount_paid, issued_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0, $12)
            "#,
        )
        .bind(invoice_id)
        .bind(req.customer_id)
        .bind(&invoice_no)
        .bind(req.period.from)
        .bind(req.period.to)
        .bind(status)
        .bind(&currency)
        .bind(totals.subtotal)
        .bind(req.tax_rate.as_decimal())
        .bind(totals.tax_amount)
        .bind(totals.total)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let drafts = reconcile_line_items(&charges, req.tax_rate, totals.tax_amount);
        for (line_no, draft) in drafts.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (
                    id, invoice_id, line_no, charge_id, description,
                    amount, tax_rate, tax_amount, total
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(InvoiceItemId::new())
            .bind(invoice_id)
            .bind(line_no as i32 + 1)
            .bind(draft.charge_id)
            .bind(&draft.description)
            .bind(draft.amount)
            .bind(req.tax_rate.as_decimal())
            .bind(draft.tax_amount)
            .bind(draft.total)
            .execute(&mut *tx)
            .await?;
        }

        let charge_ids: Vec<uuid::Uuid> =
            charges.iter().map(|c| *c.id.as_uuid()).collect();
        sqlx::query(
            r#"
            UPDATE charges SET status = 'billed', invoice_id = $1, updated_at = now()
            WHERE id = ANY($2)
            "#,
        )
        .bind(invoice_id)
        .bind(&charge_ids)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE invoice_generation_requests SET invoice_id = $1 WHERE id = $2")
            .bind(invoice_id)
            .bind(request_id)
            .execute(&mut *tx)
            .await?;

        let invoice = fetch_with_items(&mut tx, invoice_id)
            .await?
            .ok_or(BillingError::InvoiceCreateFailed(invoice_id))?;

        tx.commit().await?;
        info!(
            %invoice_id,
            customer_id = %req.customer_id,
            charges = charges.len(),
            total = totals.total,
            "invoice generated"
        );
        Ok(GenerationOutcome {
            invoice,
            reused: false,
        })
    }

    /// Fetches an invoice with its line items
    pub async fn get_with_items(
        &self,
        id: InvoiceId,
    ) -> Result<InvoiceWithItems, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        fetch_with_items(&mut conn, id)
            .await?
            .ok_or_else(|| BillingError::InvoiceNotFound(id).into())
    }

    /// Lists invoices, newest first, with the unpaged match count
    pub async fn list(&self, filter: InvoiceFilter) -> Result<Page<Invoice>, RepositoryError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM invoices
            WHERE ($1::uuid IS NULL OR customer_id = $1)
              AND ($2::invoice_status IS NULL OR status = $2)
            "#,
        )
        .bind(filter.customer_id)
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await?;

        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE ($1::uuid IS NULL OR customer_id = $1)
              AND ($2::invoice_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.customer_id)
        .bind(filter.status)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: invoices,
            total,
        })
    }

    /// Applies a payment to an invoice and recomputes its status
    ///
    /// The invoice row is locked for the duration, so concurrent payments
    /// serialize and each one's `amount_paid` builds on the previous.
    /// Overpayment is accepted; a void invoice rejects payment.
    pub async fn apply_payment(
        &self,
        invoice_id: InvoiceId,
        amount: i64,
    ) -> Result<PaymentReceipt, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1 FOR UPDATE"
        ))
        .bind(invoice_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BillingError::InvoiceNotFound(invoice_id))?;

        if invoice.status == InvoiceStatus::Void {
            return Err(BillingError::InvoiceVoid(invoice_id).into());
        }

        // No gateway integration: the payment settles immediately.
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (id, invoice_id, amount, currency, status, provider)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, invoice_id, amount, currency, status, provider, created_at
            "#,
        )
        .bind(PaymentId::new())
        .bind(invoice_id)
        .bind(amount)
        .bind(&invoice.currency)
        .bind(PaymentStatus::Complete)
        .bind(MOCK_PROVIDER)
        .fetch_one(&mut *tx)
        .await?;

        let new_paid = invoice.amount_paid + amount;
        let status = next_status_after_payment(invoice.status, new_paid, invoice.total);

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices SET amount_paid = $2, status = $3, updated_at = now()
            WHERE id = $1
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .bind(new_paid)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(%invoice_id, amount, new_paid, ?status, "payment applied");
        Ok(PaymentReceipt { payment, invoice })
    }

    /// Lists the payments recorded against an invoice, oldest first
    pub async fn list_payments(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<Vec<Payment>, RepositoryError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, invoice_id, amount, currency, status, provider, created_at
            FROM payments
            WHERE invoice_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}

/// Loads an invoice and its items on an existing connection
///
/// Used both inside the generation transaction (for the refetch and the
/// idempotent short-circuit) and for plain reads.
async fn fetch_with_items(
    conn: &mut PgConnection,
    invoice_id: InvoiceId,
) -> Result<Option<InvoiceWithItems>, RepositoryError> {
    let invoice = sqlx::query_as::<_, Invoice>(&format!(
        "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
    ))
    .bind(invoice_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(invoice) = invoice else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, InvoiceItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = $1 ORDER BY line_no ASC"
    ))
    .bind(invoice_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(InvoiceWithItems { invoice, items }))
}
