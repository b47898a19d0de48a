//! Billing API Server Binary
//!
//! This binary starts the HTTP API server for the billing system and the
//! periodic notification sweep.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin billing-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 DATABASE_URL=postgres://... cargo run --bin billing-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `DATABASE_URL` / `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `INVOICE_TAX_RATE` - Default tax rate for generation (default: 0.15)
//! * `APP_BASE_URL` - Base URL for notification pay-links (default: http://localhost:3000)
//! * `API_SWEEP_INTERVAL_SECS` - Notification sweep interval (default: 3600)

use std::net::SocketAddr;
use std::time::Duration;

use infra_db::repositories::NotificationRepository;
use interface_api::{config::ApiConfig, create_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, establishes the database
/// connection, spawns the notification sweep, and starts the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migrations fail
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    // Load configuration from environment
    let config = load_config();

    // Initialize tracing/logging
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Billing API Server"
    );

    // Create database connection pool
    let pool = create_database_pool(&config.database_url).await?;

    // Run database migrations
    infra_db::run_migrations(&pool).await?;

    // Periodic notification sweep
    spawn_notification_sweep(pool.clone(), config.clone());

    // Create the API router
    let app = create_router(pool, config.clone());

    // Parse server address
    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables.
///
/// Tries the `API_`-prefixed block first, then falls back to individual
/// variables and defaults.
fn load_config() -> ApiConfig {
    ApiConfig::from_env().unwrap_or_else(|_| ApiConfig::from_individual_vars())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Creates a PostgreSQL connection pool.
async fn create_database_pool(database_url: &str) -> Result<sqlx::PgPool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(database_url)
        .await?;

    tracing::info!("Database connection established");
    Ok(pool)
}

/// Spawns the periodic notification sweep task.
///
/// The sweep runs at the configured interval for as long as the server is
/// up. A failed run is logged and retried at the next tick; the first tick
/// is skipped so startup does not immediately fire a sweep.
fn spawn_notification_sweep(pool: sqlx::PgPool, config: ApiConfig) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(config.sweep_interval_secs));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        let repo = NotificationRepository::new(pool);
        loop {
            interval.tick().await;
            match repo.send_pending(None, &config.app_base_url).await {
                Ok(customers) => {
                    tracing::info!(notified = customers.len(), "notification sweep complete");
                }
                Err(e) => {
                    tracing::error!(error = %e, "notification sweep failed");
                }
            }
        }
    });
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
