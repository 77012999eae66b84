//! Tutoring Billing - API Server Binary
//!
//! This binary starts the HTTP API server for the tutoring billing system.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin tutoring-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 API_DATABASE_URL=postgres://... cargo run --bin tutoring-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{DomainPort, OrderId, PortError, StudentId, TenantContext};
use domain_billing::NotificationPort;
use infra_db::{create_pool, run_migrations, CatalogRepository, MileLedgerRepository, OrderRepository};
use interface_api::{config::ApiConfig, create_router, AppState};

/// Logs confirmations instead of delivering them.
///
/// Task and chat delivery is owned by a separate service; this stand-in
/// keeps the port satisfied until that integration is wired up.
struct LogNotifier;

impl DomainPort for LogNotifier {}

#[async_trait]
impl NotificationPort for LogNotifier {
    async fn order_confirmed(
        &self,
        tenant: &TenantContext,
        order_id: OrderId,
        student_id: StudentId,
    ) -> Result<(), PortError> {
        tracing::info!(%tenant, %order_id, %student_id, "order confirmed");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().unwrap_or_default();

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting tutoring billing API server"
    );

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let state = AppState {
        catalog: Arc::new(CatalogRepository::new(pool.clone())),
        ledger: Arc::new(MileLedgerRepository::new(pool.clone())),
        orders: Arc::new(OrderRepository::new(pool.clone())),
        notifier: Arc::new(LogNotifier),
        pool: Some(pool),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with an env-filter
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolves when the process receives SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
