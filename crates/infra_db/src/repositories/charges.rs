//! Charge repository implementation
//!
//! Charges are the unit of accrual: created `unbilled`, edited and voided
//! only while `unbilled`, and flipped to `billed` by the invoice generation
//! transaction. The lifecycle checks here run against a row locked with
//! `FOR UPDATE` so a concurrent generation cannot bill a charge between the
//! check and the write.

use chrono::NaiveDate;
use core_kernel::{ChargeId, CustomerId};
use domain_billing::{BillingError, Charge, ChargeStatus, ChargeType};
use serde_json::Value;
use sqlx::PgPool;

use crate::error::RepositoryError;
use crate::repositories::Page;

pub(crate) const CHARGE_COLUMNS: &str = "id, customer_id, charge_type, amount, currency, \
     description, service_date, period_from, period_to, status, invoice_id, metadata, \
     created_at, updated_at";

/// Data for creating a new charge
#[derive(Debug, Clone)]
pub struct NewCharge {
    pub customer_id: CustomerId,
    pub charge_type: ChargeType,
    /// Signed amount in minor units
    pub amount: i64,
    /// Charge currency; `None` inherits the customer's currency
    pub currency: Option<String>,
    pub description: Option<String>,
    pub service_date: Option<NaiveDate>,
    pub period_from: Option<NaiveDate>,
    pub period_to: Option<NaiveDate>,
    pub metadata: Option<Value>,
}

/// Partial update of an unbilled charge
///
/// Outer `None` leaves a field unchanged. For the nullable fields the inner
/// option distinguishes setting a value from clearing it, so a PATCH can
/// drop a service date or description outright.
#[derive(Debug, Clone, Default)]
pub struct ChargeUpdate {
    pub charge_type: Option<ChargeType>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub description: Option<Option<String>>,
    pub service_date: Option<Option<NaiveDate>>,
    pub period_from: Option<Option<NaiveDate>>,
    pub period_to: Option<Option<NaiveDate>>,
    pub metadata: Option<Option<Value>>,
}

/// Filter for listing charges
#[derive(Debug, Clone)]
pub struct ChargeFilter {
    pub customer_id: Option<CustomerId>,
    pub status: Option<ChargeStatus>,
    /// Inclusive lower bound on the creation date
    pub created_from: Option<NaiveDate>,
    /// Inclusive upper bound on the creation date
    pub created_to: Option<NaiveDate>,
    pub limit: i64,
    pub offset: i64,
}

/// Repository for charge records
#[derive(Debug, Clone)]
pub struct ChargeRepository {
    pool: PgPool,
}

impl ChargeRepository {
    /// Creates a new ChargeRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates an unbilled charge for an existing customer
    ///
    /// A charge without an explicit currency takes the customer's.
    pub async fn create(&self, new: NewCharge) -> Result<Charge, RepositoryError> {
        let customer_currency =
            sqlx::query_scalar::<_, String>("SELECT currency FROM customers WHERE id = $1")
                .bind(new.customer_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(BillingError::CustomerNotFound(new.customer_id))?;

        let currency = new
            .currency
            .map(|c| c.to_ascii_lowercase())
            .unwrap_or(customer_currency);

        let charge = sqlx::query_as::<_, Charge>(&format!(
            r#"
            INSERT INTO charges (
                id, customer_id, charge_type, amount, currency, description,
                service_date, period_from, period_to, status, metadata
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'unbilled', $10)
            RETURNING {CHARGE_COLUMNS}
            "#
        ))
        .bind(ChargeId::new())
        .bind(new.customer_id)
        .bind(new.charge_type)
        .bind(new.amount)
        .bind(currency)
        .bind(&new.description)
        .bind(new.service_date)
        .bind(new.period_from)
        .bind(new.period_to)
        .bind(&new.metadata)
        .fetch_one(&self.pool)
        .await?;

        Ok(charge)
    }

    /// Fetches a charge, failing with `ChargeNotFound` if absent
    pub async fn get(&self, id: ChargeId) -> Result<Charge, RepositoryError> {
        let charge = sqlx::query_as::<_, Charge>(&format!(
            "SELECT {CHARGE_COLUMNS} FROM charges WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        charge.ok_or_else(|| BillingError::ChargeNotFound(id).into())
    }

    /// Lists charges, newest first, with the unpaged match count
    ///
    /// The `created_from`/`created_to` window is inclusive on both ends at
    /// day granularity.
    pub async fn list(&self, filter: ChargeFilter) -> Result<Page<Charge>, RepositoryError> {
        const PREDICATES: &str = r#"
            WHERE ($1::uuid IS NULL OR customer_id = $1)
              AND ($2::charge_status IS NULL OR status = $2)
              AND ($3::date IS NULL OR created_at >= $3)
              AND ($4::date IS NULL OR created_at < $4 + 1)
        "#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM charges {PREDICATES}"
        ))
        .bind(filter.customer_id)
        .bind(filter.status)
        .bind(filter.created_from)
        .bind(filter.created_to)
        .fetch_one(&self.pool)
        .await?;

        let charges = sqlx::query_as::<_, Charge>(&format!(
            r#"
            SELECT {CHARGE_COLUMNS}
            FROM charges
            {PREDICATES}
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(filter.customer_id)
        .bind(filter.status)
        .bind(filter.created_from)
        .bind(filter.created_to)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: charges,
            total,
        })
    }

    /// Updates an unbilled charge; billed and void charges are immutable
    pub async fn update(
        &self,
        id: ChargeId,
        update: ChargeUpdate,
    ) -> Result<Charge, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Charge>(&format!(
            "SELECT {CHARGE_COLUMNS} FROM charges WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BillingError::ChargeNotFound(id))?;

        match current.status {
            ChargeStatus::Unbilled => {}
            ChargeStatus::Billed => return Err(BillingError::ChargeBilled(id).into()),
            ChargeStatus::Void => return Err(BillingError::ChargeVoid(id).into()),
        }

        // Nullable fields pass a set-flag plus the value, so an explicit
        // null clears where an absent field leaves the column alone.
        let charge = sqlx::query_as::<_, Charge>(&format!(
            r#"
            UPDATE charges SET
                charge_type = COALESCE($2, charge_type),
                amount = COALESCE($3, amount),
                currency = COALESCE($4, currency),
                description = CASE WHEN $5 THEN $6::text ELSE description END,
                service_date = CASE WHEN $7 THEN $8::date ELSE service_date END,
                period_from = CASE WHEN $9 THEN $10::date ELSE period_from END,
                period_to = CASE WHEN $11 THEN $12::date ELSE period_to END,
                metadata = CASE WHEN $13 THEN $14::jsonb ELSE metadata END,
                updated_at = now()
            WHERE id = $1
            RETURNING {CHARGE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.charge_type)
        .bind(update.amount)
        .bind(update.currency.map(|c| c.to_ascii_lowercase()))
        .bind(update.description.is_some())
        .bind(update.description.flatten())
        .bind(update.service_date.is_some())
        .bind(update.service_date.flatten())
        .bind(update.period_from.is_some())
        .bind(update.period_from.flatten())
        .bind(update.period_to.is_some())
        .bind(update.period_to.flatten())
        .bind(update.metadata.is_some())
        .bind(update.metadata.flatten())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(charge)
    }

    /// Voids an unbilled charge, excluding it from invoicing permanently
    ///
    /// Charges are never physically deleted; void is the soft-delete.
    pub async fn void(&self, id: ChargeId) -> Result<Charge, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Charge>(&format!(
            "SELECT {CHARGE_COLUMNS} FROM charges WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BillingError::ChargeNotFound(id))?;

        match current.status {
            ChargeStatus::Unbilled => {}
            ChargeStatus::Billed => return Err(BillingError::ChargeBilled(id).into()),
            ChargeStatus::Void => return Err(BillingError::ChargeVoid(id).into()),
        }

        let charge = sqlx::query_as::<_, Charge>(&format!(
            r#"
            UPDATE charges SET status = 'void', updated_at = now()
            WHERE id = $1
            RETURNING {CHARGE_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(charge)
    }
}
