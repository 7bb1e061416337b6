//! Database access for the evaluation service

pub mod enrichments;
pub mod evaluations;

use mutaparc_common::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool and service tables
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    let pool = mutaparc_common::db::connect(db_path).await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Create service tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS enrichments (
            enrichment_id TEXT PRIMARY KEY,
            id_cadastral TEXT NOT NULL,
            statut TEXT NOT NULL,
            sources_utilisees TEXT NOT NULL DEFAULT '[]',
            sources_echouees TEXT NOT NULL DEFAULT '[]',
            champs_manquants TEXT NOT NULL DEFAULT '[]',
            fiabilite REAL NOT NULL DEFAULT 0.0,
            parcelle TEXT NOT NULL,
            source_enrichment_id TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_enrichments_cadastral
        ON enrichments(id_cadastral, created_at)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS evaluations (
            evaluation_id TEXT PRIMARY KEY,
            enrichment_id TEXT NOT NULL,
            id_cadastral TEXT NOT NULL,
            criteres TEXT NOT NULL,
            resultat TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (enrichments, evaluations)");

    Ok(())
}
