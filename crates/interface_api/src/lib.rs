//! HTTP API Layer
//!
//! This crate provides the REST API for the billing system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each resource
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent `{errorCode, message, details}` responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(pool, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod dto;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{charges, customers, health, invoices, notifications};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(pool: PgPool, config: ApiConfig) -> Router {
    let state = AppState { pool, config };

    // Health routes
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Customer routes
    let customer_routes = Router::new()
        .route("/", post(customers::create_customer))
        .route("/:id", get(customers::get_customer));

    // Charge routes
    let charge_routes = Router::new()
        .route("/", post(charges::create_charge))
        .route("/", get(charges::list_charges))
        .route("/:id", patch(charges::update_charge))
        .route("/:id", delete(charges::void_charge));

    // Invoice routes
    let invoice_routes = Router::new()
        .route("/generate", post(invoices::generate_invoice))
        .route("/", get(invoices::list_invoices))
        .route("/:id", get(invoices::get_invoice))
        .route("/:id/payments", post(invoices::record_payment));

    // Notification routes
    let notification_routes = Router::new().route(
        "/pending-invoices/send",
        post(notifications::send_pending_invoices),
    );

    let api_routes = Router::new()
        .nest("/customers", customer_routes)
        .nest("/charges", charge_routes)
        .nest("/invoices", invoice_routes)
        .nest("/notifications", notification_routes);

    // Combine all routes
    Router::new()
        .merge(health_routes)
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
