//! mutaparc-ev - Parcel Mutability Evaluation Service
//!
//! Enriches a derelict parcel from the public geodata registries, then
//! scores its redevelopment potential for 7 candidate land uses.

use anyhow::Result;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mutaparc_ev::scoring::matrix::Bareme;
use mutaparc_ev::sources::Sources;
use mutaparc_ev::AppState;

const DEFAULT_PORT: u16 = 5741;
const DEFAULT_CACHE_TTL_HOURS: i64 = 24;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting mutaparc-ev (Parcel Mutability Evaluation) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // The scoring table is a startup invariant: refuse to serve with holes
    Bareme::global()
        .verifier_exhaustivite()
        .map_err(|e| anyhow::anyhow!("Scoring matrix is incomplete: {}", e))?;

    let config = mutaparc_common::config::load_toml_config().unwrap_or_default();

    let root_folder = mutaparc_common::config::resolve_root_folder("MUTAPARC_ROOT");
    let db_path = mutaparc_common::config::ensure_root_folder(&root_folder)
        .map_err(|e| anyhow::anyhow!("Failed to initialize root folder: {}", e))?;
    info!("Database: {}", db_path.display());

    let db_pool = mutaparc_ev::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    let timeout = Duration::from_secs(config.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS));
    let sources = Sources::production(timeout);
    let cache_ttl_hours = config.cache_ttl_hours.unwrap_or(DEFAULT_CACHE_TTL_HOURS);

    let state = AppState::new(db_pool, sources, cache_ttl_hours);
    let app = mutaparc_ev::build_router(state);

    let port = config.port.unwrap_or(DEFAULT_PORT);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
