//! Repository implementations for billing entities
//!
//! This module provides concrete repository implementations that handle
//! database access for each billing aggregate. Repositories encapsulate
//! SQL queries and map between database rows and domain types.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Business-rule checks happen inside the same transaction as the writes
//!   they guard
//! - Multi-step workflows commit atomically or not at all
//! - Row locks (`FOR UPDATE`, the idempotency ledger's unique row) serialize
//!   concurrent writers instead of application-level mutexes

pub mod customers;
pub mod charges;
pub mod invoices;
pub mod notifications;

/// One page of a filtered listing plus the unpaged match count
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

pub use customers::{CustomerRepository, NewCustomer};
pub use charges::{ChargeFilter, ChargeRepository, ChargeUpdate, NewCharge};
pub use invoices::{
    GenerateInvoice, GenerationOutcome, InvoiceFilter, InvoiceRepository, PaymentReceipt,
};
pub use notifications::NotificationRepository;
