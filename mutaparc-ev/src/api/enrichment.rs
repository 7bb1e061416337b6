//! Enrichment endpoint

use crate::enrichment::EnrichmentOrchestrator;
use crate::error::{ApiError, ApiResult};
use crate::models::enrichment::EnrichmentResult;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct EnrichRequest {
    pub id_cadastral: String,
}

/// POST /enrichissements
pub async fn create_enrichment(
    State(state): State<AppState>,
    Json(request): Json<EnrichRequest>,
) -> ApiResult<Json<EnrichmentResult>> {
    let id_cadastral = request.id_cadastral.trim();
    if id_cadastral.is_empty() {
        return Err(ApiError::BadRequest("id_cadastral is required".to_string()));
    }

    let orchestrator = EnrichmentOrchestrator::new(
        state.sources.clone(),
        state.db.clone(),
        state.cache_ttl_hours,
    );
    let result = orchestrator.enrich(id_cadastral).await?;
    Ok(Json(result))
}
