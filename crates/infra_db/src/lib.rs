//! Infrastructure Database Layer
//!
//! This crate provides the database infrastructure for the billing system,
//! implementing the transactional workflows on PostgreSQL using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern, providing data access
//! abstractions that hide the database implementation details from the
//! domain layer. Multi-step workflows (invoice generation, payment
//! application) each run inside a single transaction so a failure at any
//! step leaves no partial state.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, create_pool, InvoiceRepository};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/billing")).await?;
//! let repo = InvoiceRepository::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;

pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use error::{DatabaseError, RepositoryError};
pub use repositories::{
    ChargeRepository, CustomerRepository, InvoiceRepository, NotificationRepository,
};
