//! Stored mutability evaluations

use crate::models::criteres::CriteresManuels;
use crate::models::evaluation::MutabiliteResult;
use chrono::Utc;
use mutaparc_common::{Error, Result};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// One persisted evaluation, replayable through the API
#[derive(Debug, Clone, Serialize)]
pub struct StoredEvaluation {
    pub evaluation_id: Uuid,
    pub id_cadastral: String,
    pub criteres: CriteresManuels,
    pub resultat: MutabiliteResult,
}

/// Save an evaluation row
pub async fn save_evaluation(
    pool: &SqlitePool,
    id_cadastral: &str,
    criteres: &CriteresManuels,
    resultat: &MutabiliteResult,
) -> Result<()> {
    let criteres_json = serde_json::to_string(criteres)
        .map_err(|e| Error::Internal(format!("Failed to serialize criteria: {}", e)))?;
    let resultat_json = serde_json::to_string(resultat)
        .map_err(|e| Error::Internal(format!("Failed to serialize result: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO evaluations (
            evaluation_id, enrichment_id, id_cadastral, criteres, resultat, created_at
        ) VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(resultat.evaluation_id.to_string())
    .bind(resultat.enrichment_id.to_string())
    .bind(id_cadastral)
    .bind(&criteres_json)
    .bind(&resultat_json)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load an evaluation by id
pub async fn find_evaluation(
    pool: &SqlitePool,
    evaluation_id: Uuid,
) -> Result<Option<StoredEvaluation>> {
    let row = sqlx::query(
        r#"
        SELECT evaluation_id, id_cadastral, criteres, resultat
        FROM evaluations
        WHERE evaluation_id = ?
        "#,
    )
    .bind(evaluation_id.to_string())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let criteres: String = row.get("criteres");
    let criteres: CriteresManuels = serde_json::from_str(&criteres)
        .map_err(|e| Error::Internal(format!("Failed to deserialize criteria: {}", e)))?;

    let resultat: String = row.get("resultat");
    let resultat: MutabiliteResult = serde_json::from_str(&resultat)
        .map_err(|e| Error::Internal(format!("Failed to deserialize result: {}", e)))?;

    Ok(Some(StoredEvaluation {
        evaluation_id,
        id_cadastral: row.get("id_cadastral"),
        criteres,
        resultat,
    }))
}
