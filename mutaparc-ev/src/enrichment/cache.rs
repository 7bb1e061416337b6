//! Enrichment cache
//!
//! Keyed by cadastral identifier over the `enrichments` table. A row is
//! valid when its status is SUCCESS, it recorded zero failed sources, and it
//! is younger than the TTL. Rows are never invalidated explicitly; expiry is
//! the only eviction. Concurrent enrichments for one id may race to insert
//! two rows; reads always pick the most recent valid one.

use crate::db;
use crate::models::enrichment::EnrichmentResult;
use mutaparc_common::Result;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct EnrichmentCache {
    pool: SqlitePool,
    ttl_hours: i64,
}

impl EnrichmentCache {
    pub fn new(pool: SqlitePool, ttl_hours: i64) -> Self {
        Self { pool, ttl_hours }
    }

    /// `Ok(None)` is a plain cache miss, not an error
    pub async fn find_valid(&self, id_cadastral: &str) -> Result<Option<EnrichmentResult>> {
        db::enrichments::find_valid_cache(&self.pool, id_cadastral, self.ttl_hours).await
    }
}
