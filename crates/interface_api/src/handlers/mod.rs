//! Request handlers

pub mod health;
pub mod customers;
pub mod charges;
pub mod invoices;
pub mod notifications;
