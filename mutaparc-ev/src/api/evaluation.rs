//! Evaluation endpoints: enrich + score + persist, and replay

use crate::db;
use crate::enrichment::EnrichmentOrchestrator;
use crate::error::{ApiError, ApiResult};
use crate::models::criteres::CriteresManuels;
use crate::models::evaluation::MutabiliteResult;
use crate::scoring::MutabilityScorer;
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    pub id_cadastral: String,
    #[serde(default)]
    pub criteres: CriteresManuels,
}

/// POST /evaluations
pub async fn create_evaluation(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> ApiResult<Json<MutabiliteResult>> {
    let id_cadastral = request.id_cadastral.trim();
    if id_cadastral.is_empty() {
        return Err(ApiError::BadRequest("id_cadastral is required".to_string()));
    }

    let orchestrator = EnrichmentOrchestrator::new(
        state.sources.clone(),
        state.db.clone(),
        state.cache_ttl_hours,
    );
    let enrichment = orchestrator.enrich(id_cadastral).await?;

    let scorer = MutabilityScorer::new();
    let mutabilite = scorer.score(&enrichment.parcelle, &request.criteres)?;

    let resultat = MutabiliteResult {
        evaluation_id: Uuid::new_v4(),
        enrichment_id: enrichment.enrichment_id,
        fiabilite: mutabilite.fiabilite,
        usages: mutabilite.usages,
    };

    db::evaluations::save_evaluation(
        &state.db,
        &enrichment.parcelle.id_cadastral,
        &request.criteres,
        &resultat,
    )
    .await?;

    Ok(Json(resultat))
}

/// GET /evaluations/:id
pub async fn get_evaluation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<db::evaluations::StoredEvaluation>> {
    let stored = db::evaluations::find_evaluation(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Evaluation not found: {}", id)))?;
    Ok(Json(stored))
}
