//! Core Kernel - Foundational types and utilities for the billing system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Currency codes and exact round-half-up tax-rate arithmetic over
//!   integer minor-unit amounts
//! - Billing periods with inclusive day-granularity overlap semantics
//! - Common identifiers and value objects

pub mod money;
pub mod period;
pub mod identifiers;

pub use money::{Currency, TaxRate, MoneyError};
pub use period::BillingPeriod;
pub use identifiers::{
    CustomerId, ChargeId, InvoiceId, InvoiceItemId, PaymentId,
    GenerationRequestId, CommunicationLogId,
};
