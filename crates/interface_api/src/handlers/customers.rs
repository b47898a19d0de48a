//! Customer handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use core_kernel::{Currency, CustomerId};
use domain_billing::Customer;
use infra_db::repositories::{CustomerRepository, NewCustomer};
use serde_json::json;
use validator::Validate;

use crate::dto::customers::CreateCustomerRequest;
use crate::error::ApiError;
use crate::AppState;

/// Creates a new customer
#[tracing::instrument(skip(state, request), fields(name = %request.name))]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    request.validate()?;

    let currency = match &request.currency {
        Some(code) => Some(normalize_currency(code)?),
        None => None,
    };

    let customer = CustomerRepository::new(state.pool.clone())
        .create(NewCustomer {
            name: request.name,
            email: request.email,
            phone: request.phone,
            currency,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Gets a customer by ID
#[tracing::instrument(skip(state))]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Customer>, ApiError> {
    let customer = CustomerRepository::new(state.pool.clone()).get(id).await?;
    Ok(Json(customer))
}

/// Validates a currency code and returns its lowercase form
pub(crate) fn normalize_currency(code: &str) -> Result<String, ApiError> {
    let currency = Currency::new(code).map_err(|e| ApiError::Validation {
        details: json!({ "currency": e.to_string() }),
    })?;
    Ok(currency.code().to_string())
}
