//! Notification handlers

use axum::{
    extract::{Query, State},
    Json,
};
use infra_db::repositories::NotificationRepository;

use crate::dto::notifications::{SendNotificationsQuery, SendNotificationsResponse};
use crate::error::ApiError;
use crate::AppState;

/// Runs the pending-invoices notification sweep
///
/// Notifies every customer with an outstanding issued or partial invoice,
/// or only the given customer when `customerId` is set.
#[tracing::instrument(skip(state))]
pub async fn send_pending_invoices(
    State(state): State<AppState>,
    Query(query): Query<SendNotificationsQuery>,
) -> Result<Json<SendNotificationsResponse>, ApiError> {
    let results = NotificationRepository::new(state.pool.clone())
        .send_pending(query.customer_id, &state.config.app_base_url)
        .await?;

    Ok(Json(SendNotificationsResponse {
        customers_notified: results.len(),
        results,
    }))
}
