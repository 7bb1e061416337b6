//! Enrichment pipeline
//!
//! Sequences the mandatory cadastral lookup, then fans out every remaining
//! enrichment in parallel, assembles the normalized parcel record, derives
//! the pass status and reliability, and persists a non-blocking log row.
//! Every optional source failure is recorded, never raised; only a missing
//! cadastral base aborts the pass.

pub mod cache;
pub mod fanout;
pub mod fiabilite;
pub mod georisques;
pub mod zonage;

use crate::db;
use crate::models::enrichment::{EnrichmentResult, StatutEnrichissement};
use crate::models::parcelle::{Geometrie, Parcelle};
use crate::sources::Sources;
use self::cache::EnrichmentCache;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// A classified installation closer than this flags the technological risk
const RAYON_ICPE_M: f64 = 500.0;

/// A town hall closer than this flags the urban-centre context
const SEUIL_CENTRE_VILLE_M: f64 = 1_000.0;

/// Enrichment failure surfaced to the caller
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The mandatory cadastral lookup produced no base geometry/commune;
    /// no partial result is possible without it.
    #[error("Cadastral parcel not found: {0}")]
    CadastreIntrouvable(String),

    #[error(transparent)]
    Interne(#[from] mutaparc_common::Error),
}

pub struct EnrichmentOrchestrator {
    sources: Sources,
    pool: SqlitePool,
    cache: EnrichmentCache,
}

impl EnrichmentOrchestrator {
    pub fn new(sources: Sources, pool: SqlitePool, cache_ttl_hours: i64) -> Self {
        let cache = EnrichmentCache::new(pool.clone(), cache_ttl_hours);
        Self {
            sources,
            pool,
            cache,
        }
    }

    /// Run one enrichment pass for a cadastral identifier
    pub async fn enrich(&self, id_cadastral: &str) -> Result<EnrichmentResult, EnrichError> {
        // Cache short-circuit: a valid prior row skips every external call
        // and is returned tagged with its originating record id, without
        // re-deriving reliability.
        if let Some(cached) = self.cache.find_valid(id_cadastral).await? {
            info!(
                id_cadastral,
                enrichment_id = %cached.enrichment_id,
                "Enrichment served from cache"
            );
            let origin = cached.enrichment_id;
            let mut result = cached;
            result.source_enrichment_id = Some(origin);
            return Ok(result);
        }

        // Mandatory cadastral base
        let base = match self.sources.cadastre.parcelle(id_cadastral).await {
            Ok(Some(base)) => base,
            Ok(None) => {
                return Err(EnrichError::CadastreIntrouvable(id_cadastral.to_string()));
            }
            Err(e) => {
                warn!(id_cadastral, error = %e, "Mandatory cadastral lookup failed");
                return Err(EnrichError::CadastreIntrouvable(format!(
                    "{} ({})",
                    id_cadastral, e
                )));
            }
        };

        let mut sources_utilisees = vec![self.sources.cadastre.source_name().to_string()];
        let mut sources_echouees: Vec<String> = Vec::new();
        let mut champs_manquants: Vec<String> = Vec::new();

        let geometrie = Geometrie::from_contour(base.contour);
        let centroide = geometrie.centroide;
        let mut parcelle = Parcelle::base(
            base.id_cadastral,
            base.code_insee,
            base.commune,
            geometrie,
            base.contenance_m2,
        );
        if parcelle.surface_site.is_none() {
            champs_manquants.push("surface_site".to_string());
        }

        // Fan out every optional enrichment; a slow or failing member never
        // blocks or cancels its siblings.
        let insee = parcelle.code_insee.clone();
        let (surface_batie, raccordement, transport, mairie, commerces, vacance, icpe, zonage, risques) = tokio::join!(
            self.sources.batiments.surface_batie(id_cadastral),
            self.sources.raccordement.raccordement(&centroide),
            self.sources.transports.distance_arret(&centroide),
            self.sources.annuaire.mairie(&insee),
            self.sources.commerces.commerces_a_proximite(&centroide),
            self.sources.vacance.taux_vacance(&insee),
            self.sources
                .risques
                .installations_classees(&centroide, RAYON_ICPE_M),
            zonage::evaluer(
                &self.sources.nature,
                &self.sources.patrimoine,
                &self.sources.urbanisme,
                &centroide,
                &insee,
            ),
            georisques::evaluer(&self.sources.risques, &centroide, &insee),
        );

        // Built footprint
        match surface_batie.and_then(require_data) {
            Ok(surface) => {
                parcelle.surface_batie = Some(surface);
                note_source(&mut sources_utilisees, self.sources.batiments.source_name());
            }
            Err(e) => {
                record_failure(
                    &mut sources_echouees,
                    &mut champs_manquants,
                    self.sources.batiments.source_name(),
                    &["surface_batie"],
                    &e,
                );
            }
        }

        // Grid connection
        match raccordement {
            Ok(r) => {
                parcelle.raccordement_electrique = Some(r.raccorde);
                parcelle.distance_raccordement = Some(r.distance_m);
                note_source(
                    &mut sources_utilisees,
                    self.sources.raccordement.source_name(),
                );
            }
            Err(e) => {
                record_failure(
                    &mut sources_echouees,
                    &mut champs_manquants,
                    self.sources.raccordement.source_name(),
                    &["raccordement_electrique", "distance_raccordement"],
                    &e,
                );
            }
        }

        // Transport distance
        match transport.and_then(require_data) {
            Ok(distance) => {
                parcelle.distance_transport = Some(distance);
                note_source(
                    &mut sources_utilisees,
                    self.sources.transports.source_name(),
                );
            }
            Err(e) => {
                record_failure(
                    &mut sources_echouees,
                    &mut champs_manquants,
                    self.sources.transports.source_name(),
                    &["distance_transport"],
                    &e,
                );
            }
        }

        // Urban centre, from the town-hall distance
        match mairie.and_then(require_data) {
            Ok(hotel_de_ville) => {
                let distance = centroide.distance_m(&hotel_de_ville);
                parcelle.centre_ville = Some(distance <= SEUIL_CENTRE_VILLE_M);
                note_source(&mut sources_utilisees, self.sources.annuaire.source_name());
            }
            Err(e) => {
                record_failure(
                    &mut sources_echouees,
                    &mut champs_manquants,
                    self.sources.annuaire.source_name(),
                    &["centre_ville"],
                    &e,
                );
            }
        }

        // Commerce proximity
        match commerces {
            Ok(proche) => {
                parcelle.proximite_commerces = Some(proche);
                note_source(&mut sources_utilisees, self.sources.commerces.source_name());
            }
            Err(e) => {
                record_failure(
                    &mut sources_echouees,
                    &mut champs_manquants,
                    self.sources.commerces.source_name(),
                    &["proximite_commerces"],
                    &e,
                );
            }
        }

        // Vacancy rate
        match vacance.and_then(require_data) {
            Ok(taux) => {
                parcelle.taux_vacance = Some(taux);
                note_source(&mut sources_utilisees, self.sources.vacance.source_name());
            }
            Err(e) => {
                record_failure(
                    &mut sources_echouees,
                    &mut champs_manquants,
                    self.sources.vacance.source_name(),
                    &["taux_vacance"],
                    &e,
                );
            }
        }

        // Technological risk (ICPE), outside the 5-hazard bundle
        match icpe {
            Ok(installations) => {
                parcelle.risque_technologique = Some(installations.present);
                note_source(&mut sources_utilisees, self.sources.risques.source_name());
            }
            Err(e) => {
                record_failure(
                    &mut sources_echouees,
                    &mut champs_manquants,
                    self.sources.risques.source_name(),
                    &["risque_technologique"],
                    &e,
                );
            }
        }

        // Zonings
        for source in &zonage.sources_utilisees {
            note_source(&mut sources_utilisees, source);
        }
        for source in &zonage.sources_echouees {
            note_source(&mut sources_echouees, source);
        }
        parcelle.zonage_environnemental = zonage.environnemental;
        parcelle.zonage_patrimonial = zonage.patrimonial;
        parcelle.zonage_reglementaire = zonage.reglementaire;
        parcelle.trame_verte_bleue = zonage.trame_verte_bleue;
        for (field, populated) in [
            ("zonage_environnemental", zonage.environnemental.is_some()),
            ("zonage_patrimonial", zonage.patrimonial.is_some()),
            ("zonage_reglementaire", zonage.reglementaire.is_some()),
            ("trame_verte_bleue", zonage.trame_verte_bleue.is_some()),
        ] {
            if !populated {
                champs_manquants.push(field.to_string());
            }
        }

        // Natural hazards
        for source in &risques.sources_utilisees {
            note_source(&mut sources_utilisees, source);
        }
        for source in &risques.sources_echouees {
            note_source(&mut sources_echouees, source);
        }
        match risques.bundle {
            Some(bundle) => {
                parcelle.risque_naturel = Some(bundle.niveau);
            }
            None => {
                champs_manquants.push("risque_naturel".to_string());
            }
        }

        let statut = derive_statut(&sources_utilisees, &sources_echouees);
        let fiabilite = fiabilite::fiabilite(sources_utilisees.len(), champs_manquants.len());

        let result = EnrichmentResult {
            enrichment_id: Uuid::new_v4(),
            source_enrichment_id: None,
            parcelle,
            statut,
            sources_utilisees,
            sources_echouees,
            champs_manquants,
            fiabilite,
        };

        info!(
            id_cadastral,
            enrichment_id = %result.enrichment_id,
            statut = result.statut.as_str(),
            fiabilite = result.fiabilite,
            sources = result.sources_utilisees.len(),
            manquants = result.champs_manquants.len(),
            "Enrichment complete"
        );

        // Fire-and-forget log row; its own failure is swallowed
        let log_row = result.clone();
        let pool = self.pool.clone();
        tokio::spawn(async move {
            if let Err(e) = db::enrichments::save_enrichment(&pool, &log_row).await {
                warn!(error = %e, "Failed to persist enrichment log row");
            }
        });

        Ok(result)
    }
}

/// Success-with-no-data counts as a failed source + missing field, keeping
/// the invariant "unpopulated field ⇔ failed+missing entry" strict.
fn require_data<T>(value: Option<T>) -> Result<T, crate::sources::SourceError> {
    value.ok_or_else(|| {
        crate::sources::SourceError::NotAvailable("source returned no data".to_string())
    })
}

fn note_source(list: &mut Vec<String>, source: &str) {
    if !list.iter().any(|s| s == source) {
        list.push(source.to_string());
    }
}

fn record_failure(
    sources_echouees: &mut Vec<String>,
    champs_manquants: &mut Vec<String>,
    source: &str,
    fields: &[&str],
    error: &crate::sources::SourceError,
) {
    warn!(source, error = %error, "Optional enrichment failed");
    note_source(sources_echouees, source);
    for field in fields {
        champs_manquants.push((*field).to_string());
    }
}

/// SUCCESS with no failures, PARTIAL when mixed, FAILURE when nothing
/// answered beyond the mandatory cadastre.
fn derive_statut(
    sources_utilisees: &[String],
    sources_echouees: &[String],
) -> StatutEnrichissement {
    let succes_optionnels = sources_utilisees.len() > 1;
    if !succes_optionnels {
        StatutEnrichissement::Failure
    } else if sources_echouees.is_empty() {
        StatutEnrichissement::Success
    } else {
        StatutEnrichissement::Partial
    }
}
