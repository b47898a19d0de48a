//! Billing Domain - Charges, Invoices, Payments, and Notifications
//!
//! This crate implements the pure billing logic: what a charge is, how a set
//! of unbilled charges becomes an invoice with exactly-reconciled tax, how a
//! payment moves an invoice through its status lifecycle, and how outstanding
//! invoices are grouped into per-customer notifications.
//!
//! # Invoice arithmetic
//!
//! All amounts are integer minor units. The invoice-level tax is
//! `round_half_up(subtotal * rate)`; each line's tax is rounded the same way
//! independently, and any residue between the two is folded into the first
//! line so that `sum(item.tax) == invoice.tax` and
//! `sum(item.total) == invoice.total` hold exactly.
//!
//! Persistence and transactions live in `infra_db`; nothing here performs
//! I/O.

pub mod customer;
pub mod charge;
pub mod invoice;
pub mod payment;
pub mod notification;
pub mod error;

pub use customer::Customer;
pub use charge::{distinct_currencies, Charge, ChargeStatus, ChargeType};
pub use invoice::{
    generate_invoice_number, reconcile_line_items, InvoiceTotals,
    Invoice, InvoiceItem, InvoiceStatus, InvoiceWithItems, LineItemDraft,
};
pub use payment::{next_status_after_payment, Payment, PaymentStatus, MOCK_PROVIDER};
pub use notification::{
    group_outstanding_by_customer, CommunicationLog, CommunicationStatus,
    CustomerNotificationSummary, NotificationPayload, PendingInvoiceGroup,
    PENDING_INVOICES_EMAIL,
};
pub use error::BillingError;
