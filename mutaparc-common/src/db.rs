//! Shared SQLite database access

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Open (or create) the SQLite database and return a connection pool
///
/// Service-specific tables are created by each service's own `db` module.
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    Ok(pool)
}
