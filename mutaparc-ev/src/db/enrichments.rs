//! Enrichment log/cache rows

use crate::models::enrichment::{EnrichmentResult, StatutEnrichissement};
use chrono::{Duration, Utc};
use mutaparc_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Save an enrichment row
pub async fn save_enrichment(pool: &SqlitePool, result: &EnrichmentResult) -> Result<()> {
    // Prepare all data before touching the pool
    let enrichment_id = result.enrichment_id.to_string();
    let source_enrichment_id = result.source_enrichment_id.map(|id| id.to_string());
    let sources_utilisees = serde_json::to_string(&result.sources_utilisees)
        .map_err(|e| Error::Internal(format!("Failed to serialize sources: {}", e)))?;
    let sources_echouees = serde_json::to_string(&result.sources_echouees)
        .map_err(|e| Error::Internal(format!("Failed to serialize sources: {}", e)))?;
    let champs_manquants = serde_json::to_string(&result.champs_manquants)
        .map_err(|e| Error::Internal(format!("Failed to serialize fields: {}", e)))?;
    let parcelle = serde_json::to_string(&result.parcelle)
        .map_err(|e| Error::Internal(format!("Failed to serialize parcel: {}", e)))?;
    let created_at = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO enrichments (
            enrichment_id, id_cadastral, statut,
            sources_utilisees, sources_echouees, champs_manquants,
            fiabilite, parcelle, source_enrichment_id, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&enrichment_id)
    .bind(&result.parcelle.id_cadastral)
    .bind(result.statut.as_str())
    .bind(&sources_utilisees)
    .bind(&sources_echouees)
    .bind(&champs_manquants)
    .bind(result.fiabilite)
    .bind(&parcelle)
    .bind(&source_enrichment_id)
    .bind(&created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Most recent valid cache row for a cadastral id: status SUCCESS, zero
/// failed sources, younger than the TTL. `None` is a plain cache miss.
pub async fn find_valid_cache(
    pool: &SqlitePool,
    id_cadastral: &str,
    ttl_hours: i64,
) -> Result<Option<EnrichmentResult>> {
    let cutoff = (Utc::now() - Duration::hours(ttl_hours)).to_rfc3339();

    let row = sqlx::query(
        r#"
        SELECT enrichment_id, statut,
               sources_utilisees, sources_echouees, champs_manquants,
               fiabilite, parcelle, source_enrichment_id
        FROM enrichments
        WHERE id_cadastral = ?
          AND statut = 'SUCCESS'
          AND sources_echouees = '[]'
          AND created_at >= ?
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(id_cadastral)
    .bind(&cutoff)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    Ok(Some(row_to_result(&row)?))
}

fn row_to_result(row: &sqlx::sqlite::SqliteRow) -> Result<EnrichmentResult> {
    let enrichment_id: String = row.get("enrichment_id");
    let enrichment_id = Uuid::parse_str(&enrichment_id)
        .map_err(|e| Error::Internal(format!("Failed to parse enrichment_id: {}", e)))?;

    let source_enrichment_id: Option<String> = row.get("source_enrichment_id");
    let source_enrichment_id = source_enrichment_id
        .map(|s| Uuid::parse_str(&s))
        .transpose()
        .map_err(|e| Error::Internal(format!("Failed to parse source_enrichment_id: {}", e)))?;

    let statut: String = row.get("statut");
    let statut: StatutEnrichissement = serde_json::from_str(&format!("\"{}\"", statut))
        .map_err(|e| Error::Internal(format!("Failed to deserialize statut: {}", e)))?;

    let sources_utilisees: String = row.get("sources_utilisees");
    let sources_utilisees: Vec<String> = serde_json::from_str(&sources_utilisees)
        .map_err(|e| Error::Internal(format!("Failed to deserialize sources: {}", e)))?;

    let sources_echouees: String = row.get("sources_echouees");
    let sources_echouees: Vec<String> = serde_json::from_str(&sources_echouees)
        .map_err(|e| Error::Internal(format!("Failed to deserialize sources: {}", e)))?;

    let champs_manquants: String = row.get("champs_manquants");
    let champs_manquants: Vec<String> = serde_json::from_str(&champs_manquants)
        .map_err(|e| Error::Internal(format!("Failed to deserialize fields: {}", e)))?;

    let parcelle: String = row.get("parcelle");
    let parcelle = serde_json::from_str(&parcelle)
        .map_err(|e| Error::Internal(format!("Failed to deserialize parcel: {}", e)))?;

    Ok(EnrichmentResult {
        enrichment_id,
        source_enrichment_id,
        parcelle,
        statut,
        sources_utilisees,
        sources_echouees,
        champs_manquants,
        fiabilite: row.get("fiabilite"),
    })
}

/// Age out an enrichment row for tests: rewrites its timestamp
#[cfg(test)]
pub async fn backdate_enrichment(
    pool: &SqlitePool,
    enrichment_id: Uuid,
    to: chrono::DateTime<Utc>,
) -> Result<()> {
    sqlx::query("UPDATE enrichments SET created_at = ? WHERE enrichment_id = ?")
        .bind(to.to_rfc3339())
        .bind(enrichment_id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}
