//! HTTP API Layer
//!
//! This crate provides the REST API for the tutoring billing system using
//! Axum.
//!
//! # Architecture
//!
//! - **Handlers**: preview (read-only) and confirm (transactional) over the
//!   same billing calculation
//! - **Tenant extraction**: explicit `TenantContext` from request headers
//! - **DTOs**: request/response data transfer objects
//! - **Error handling**: consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod tenant;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_billing::{
    BillingPreviewService, MileLedgerPort, NotificationPort, OrderMaterializer, OrderWriter,
};
use domain_catalog::CatalogPort;

use crate::config::ApiConfig;
use crate::handlers::{enrollment, health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogPort>,
    pub ledger: Arc<dyn MileLedgerPort>,
    pub orders: Arc<dyn OrderWriter>,
    pub notifier: Arc<dyn NotificationPort>,
    /// Present when backed by PostgreSQL; used by the readiness check
    pub pool: Option<PgPool>,
    pub config: ApiConfig,
}

impl AppState {
    /// Builds the preview service over the configured ports
    pub fn preview_service(&self) -> BillingPreviewService {
        BillingPreviewService::new(Arc::clone(&self.catalog), Arc::clone(&self.ledger))
    }

    /// Builds the order materializer over the configured ports
    pub fn order_materializer(&self) -> OrderMaterializer {
        OrderMaterializer::new(
            self.preview_service(),
            Arc::clone(&self.orders),
            Arc::clone(&self.notifier),
        )
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let enrollment_routes = Router::new()
        .route("/preview", post(enrollment::preview))
        .route("/confirm", post(enrollment::confirm));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api/v1/enrollments", enrollment_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
