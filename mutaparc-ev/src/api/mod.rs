//! HTTP API routes

pub mod enrichment;
pub mod evaluation;
pub mod health;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn enrichment_routes() -> Router<AppState> {
    Router::new().route("/enrichissements", post(enrichment::create_enrichment))
}

pub fn evaluation_routes() -> Router<AppState> {
    Router::new()
        .route("/evaluations", post(evaluation::create_evaluation))
        .route("/evaluations/:id", get(evaluation::get_evaluation))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health))
}
