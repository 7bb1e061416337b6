//! mutaparc-ev library interface
//!
//! Exposes the enrichment pipeline, the scoring engine and the HTTP surface
//! for integration testing.

pub mod api;
pub mod db;
pub mod enrichment;
pub mod error;
pub mod models;
pub mod scoring;
pub mod sources;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Upstream geodata adapters
    pub sources: sources::Sources,
    /// Enrichment cache validity window
    pub cache_ttl_hours: i64,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, sources: sources::Sources, cache_ttl_hours: i64) -> Self {
        Self {
            db,
            sources,
            cache_ttl_hours,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::enrichment_routes())
        .merge(api::evaluation_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
