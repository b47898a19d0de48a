//! Charge handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use core_kernel::ChargeId;
use domain_billing::Charge;
use infra_db::repositories::{ChargeFilter, ChargeRepository, ChargeUpdate, NewCharge};
use validator::Validate;

use crate::dto::charges::{CreateChargeRequest, ListChargesQuery, UpdateChargeRequest};
use crate::dto::{page_params, Paginated};
use crate::error::ApiError;
use crate::handlers::customers::normalize_currency;
use crate::AppState;

/// Creates a new unbilled charge
///
/// A request without a currency inherits the customer's.
#[tracing::instrument(skip(state, request), fields(customer_id = %request.customer_id, amount = request.amount))]
pub async fn create_charge(
    State(state): State<AppState>,
    Json(request): Json<CreateChargeRequest>,
) -> Result<(StatusCode, Json<Charge>), ApiError> {
    request.validate()?;
    let currency = match &request.currency {
        Some(code) => Some(normalize_currency(code)?),
        None => None,
    };

    let charge = ChargeRepository::new(state.pool.clone())
        .create(NewCharge {
            customer_id: request.customer_id,
            charge_type: request.charge_type,
            amount: request.amount,
            currency,
            description: request.description,
            service_date: request.service_date,
            period_from: request.period_from,
            period_to: request.period_to,
            metadata: request.metadata,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(charge)))
}

/// Lists charges, optionally filtered by customer, status, and a
/// creation-date window
#[tracing::instrument(skip(state))]
pub async fn list_charges(
    State(state): State<AppState>,
    Query(query): Query<ListChargesQuery>,
) -> Result<Json<Paginated<Charge>>, ApiError> {
    let params = page_params(query.page, query.limit);
    let page = ChargeRepository::new(state.pool.clone())
        .list(ChargeFilter {
            customer_id: query.customer_id,
            status: query.status,
            created_from: query.from,
            created_to: query.to,
            limit: params.limit,
            offset: params.offset,
        })
        .await?;

    Ok(Json(Paginated::new(page.items, params, page.total)))
}

/// Updates an unbilled charge
#[tracing::instrument(skip(state, request))]
pub async fn update_charge(
    State(state): State<AppState>,
    Path(id): Path<ChargeId>,
    Json(request): Json<UpdateChargeRequest>,
) -> Result<Json<Charge>, ApiError> {
    request.validate()?;
    let currency = match &request.currency {
        Some(code) => Some(normalize_currency(code)?),
        None => None,
    };

    let charge = ChargeRepository::new(state.pool.clone())
        .update(
            id,
            ChargeUpdate {
                charge_type: request.charge_type,
                amount: request.amount,
                currency,
                description: request.description,
                service_date: request.service_date,
                period_from: request.period_from,
                period_to: request.period_to,
                metadata: request.metadata,
            },
        )
        .await?;

    Ok(Json(charge))
}

/// Voids an unbilled charge (soft delete)
#[tracing::instrument(skip(state))]
pub async fn void_charge(
    State(state): State<AppState>,
    Path(id): Path<ChargeId>,
) -> Result<Json<Charge>, ApiError> {
    let charge = ChargeRepository::new(state.pool.clone()).void(id).await?;
    Ok(Json(charge))
}
