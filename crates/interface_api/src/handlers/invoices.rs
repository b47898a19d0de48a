//! Invoice handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use core_kernel::{BillingPeriod, InvoiceId, TaxRate};
use domain_billing::{Invoice, InvoiceWithItems};
use infra_db::repositories::{GenerateInvoice, InvoiceFilter, InvoiceRepository};
use serde_json::json;
use validator::Validate;

use crate::dto::invoices::{
    GenerateInvoiceRequest, ListInvoicesQuery, PaymentResponse, RecordPaymentRequest,
};
use crate::dto::{page_params, Paginated};
use crate::error::ApiError;
use crate::AppState;

/// Generates the invoice for a customer and billing period
///
/// Idempotent per (customer, period): a repeat request returns the existing
/// invoice with 200 instead of 201.
#[tracing::instrument(
    skip(state, request),
    fields(customer_id = %request.customer_id, period_from = %request.period_from, period_to = %request.period_to)
)]
pub async fn generate_invoice(
    State(state): State<AppState>,
    Json(request): Json<GenerateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceWithItems>), ApiError> {
    request.validate()?;

    let rate = request.tax_rate.unwrap_or(state.config.default_tax_rate);
    let tax_rate = TaxRate::new(rate).map_err(|e| ApiError::Validation {
        details: json!({ "taxRate": e.to_string() }),
    })?;

    let outcome = InvoiceRepository::new(state.pool.clone())
        .generate(GenerateInvoice {
            customer_id: request.customer_id,
            period: BillingPeriod::new(request.period_from, request.period_to),
            tax_rate,
            issue_now: request.issue_now,
        })
        .await?;

    let status = if outcome.reused {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(outcome.invoice)))
}

/// Lists invoices, optionally filtered by customer and status
#[tracing::instrument(skip(state))]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<Json<Paginated<Invoice>>, ApiError> {
    let params = page_params(query.page, query.limit);
    let page = InvoiceRepository::new(state.pool.clone())
        .list(InvoiceFilter {
            customer_id: query.customer_id,
            status: query.status,
            limit: params.limit,
            offset: params.offset,
        })
        .await?;

    Ok(Json(Paginated::new(page.items, params, page.total)))
}

/// Gets an invoice with its line items
#[tracing::instrument(skip(state))]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
) -> Result<Json<InvoiceWithItems>, ApiError> {
    let invoice = InvoiceRepository::new(state.pool.clone())
        .get_with_items(id)
        .await?;
    Ok(Json(invoice))
}

/// Records a payment against an invoice
#[tracing::instrument(skip(state, request), fields(amount = request.amount))]
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    request.validate()?;

    let receipt = InvoiceRepository::new(state.pool.clone())
        .apply_payment(id, request.amount)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentResponse {
            payment: receipt.payment,
            invoice: receipt.invoice,
        }),
    ))
}
