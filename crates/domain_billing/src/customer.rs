//! Customer model
//!
//! Customers own charges and invoices. The record is created at signup and
//! only contact fields and the default currency are editable afterwards.

use chrono::{DateTime, Utc};
use core_kernel::CustomerId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A billable customer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier
    pub id: CustomerId,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Default currency, three-letter lowercase code; used as the fallback
    /// currency for new charges
    pub currency: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}
