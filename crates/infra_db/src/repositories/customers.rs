//! Customer repository implementation

use core_kernel::CustomerId;
use domain_billing::{BillingError, Customer};
use sqlx::PgPool;

use crate::error::RepositoryError;

const CUSTOMER_COLUMNS: &str = "id, name, email, phone, currency, created_at, updated_at";

/// Data for creating a new customer
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Lowercase three-letter code; defaults to "usd" when absent
    pub currency: Option<String>,
}

/// Repository for customer records
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a customer and returns the stored record
    pub async fn create(&self, new: NewCustomer) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (id, name, email, phone, currency)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(CustomerId::new())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.currency.as_deref().unwrap_or("usd"))
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Fetches a customer, failing with `CustomerNotFound` if absent
    pub async fn get(&self, id: CustomerId) -> Result<Customer, RepositoryError> {
        self.find(id)
            .await?
            .ok_or_else(|| BillingError::CustomerNotFound(id).into())
    }

    /// Fetches a customer if it exists
    pub async fn find(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }
}
