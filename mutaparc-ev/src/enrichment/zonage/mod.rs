//! Zonage orchestrator
//!
//! Runs the three zoning evaluators concurrently, merges their per-domain
//! results and deduplicates source attribution across evaluators (the
//! heritage and regulatory evaluators both hit the Géoportail de
//! l'Urbanisme).

pub mod environnemental;
pub mod patrimonial;
pub mod reglementaire;

use crate::enrichment::fanout::dedup_sources;
use crate::models::parcelle::{
    GeoPoint, ZonageEnvironnemental, ZonagePatrimonial, ZonageReglementaire,
};
use crate::sources::{NatureSource, PatrimoineSource, UrbanismeSource};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ZonageResult {
    /// At least one domain produced a classification
    pub success: bool,
    pub environnemental: Option<ZonageEnvironnemental>,
    pub patrimonial: Option<ZonagePatrimonial>,
    pub reglementaire: Option<ZonageReglementaire>,
    pub trame_verte_bleue: Option<bool>,
    pub sources_utilisees: Vec<String>,
    pub sources_echouees: Vec<String>,
}

pub async fn evaluer(
    nature: &Arc<dyn NatureSource>,
    patrimoine: &Arc<dyn PatrimoineSource>,
    urbanisme: &Arc<dyn UrbanismeSource>,
    point: &GeoPoint,
    code_insee: &str,
) -> ZonageResult {
    let (env, pat, reg) = tokio::join!(
        environnemental::evaluer(nature, point),
        patrimonial::evaluer(patrimoine, point),
        reglementaire::evaluer(urbanisme, point, code_insee),
    );

    let sources_utilisees = dedup_sources(
        env.sources_utilisees
            .iter()
            .chain(pat.sources_utilisees.iter())
            .chain(reg.sources_utilisees.iter())
            .map(String::as_str),
    );
    let sources_echouees = dedup_sources(
        env.sources_echouees
            .iter()
            .chain(pat.sources_echouees.iter())
            .chain(reg.sources_echouees.iter())
            .map(String::as_str),
    );

    let success =
        env.classification.is_some() || pat.classification.is_some() || reg.classification.is_some();

    debug!(
        success,
        environnemental = ?env.classification,
        patrimonial = ?pat.classification,
        reglementaire = ?reg.classification,
        "Zonage evaluation complete"
    );

    ZonageResult {
        success,
        environnemental: env.classification,
        patrimonial: pat.classification,
        reglementaire: reg.classification,
        trame_verte_bleue: env.trame_verte_bleue,
        sources_utilisees,
        sources_echouees,
    }
}
