//! Natural-hazard orchestrator
//!
//! Fans out the five Géorisques hazard queries by coordinate/commune and
//! aggregates them into one bundle with its own success ratio. Returns no
//! bundle at all (rather than an empty one) when all five fail, so the
//! caller can tell "no hazard data" from "zero hazard".

use crate::enrichment::fanout::{settle_all, Settled, SubQuery};
use crate::models::parcelle::{GeoPoint, NiveauRisque};
use crate::sources::{FeatureSet, RisquesSource};
use std::sync::Arc;
use tracing::debug;

const NOMBRE_ALEAS: usize = 5;

/// Heterogeneous answers of the five hazard sub-queries
#[derive(Debug, Clone)]
pub enum ReponseRisque {
    Emprise(FeatureSet),
    Compte(u32),
    Zone(u8),
}

/// Aggregated hazard bundle
#[derive(Debug, Clone, PartialEq)]
pub struct RisquesNaturels {
    pub mouvement_terrain: Option<bool>,
    /// Number of CatNat orders for the commune
    pub catnat: Option<u32>,
    pub zone_inondable: Option<bool>,
    /// Seismic zone, 1 (very low) to 5 (high)
    pub zone_sismique: Option<u8>,
    pub cavites: Option<bool>,
    /// Aggregated exposure level over the hazards that answered
    pub niveau: NiveauRisque,
    /// `(answered / 5) × 10`, one decimal
    pub fiabilite: f64,
}

#[derive(Debug, Clone)]
pub struct RisquesEvaluation {
    /// `None` when every hazard query failed
    pub bundle: Option<RisquesNaturels>,
    pub sources_utilisees: Vec<String>,
    pub sources_echouees: Vec<String>,
}

pub async fn evaluer(
    risques: &Arc<dyn RisquesSource>,
    point: &GeoPoint,
    code_insee: &str,
) -> RisquesEvaluation {
    let source = risques.source_name();
    let p = *point;

    let mvt = {
        let client = Arc::clone(risques);
        SubQuery::new(
            "mouvement_terrain",
            source,
            Box::pin(async move {
                client
                    .mouvements_terrain(&p)
                    .await
                    .map(ReponseRisque::Emprise)
            }),
        )
    };
    let catnat = {
        let client = Arc::clone(risques);
        let insee = code_insee.to_string();
        SubQuery::new(
            "catnat",
            source,
            Box::pin(async move { client.catnat(&insee).await.map(ReponseRisque::Compte) }),
        )
    };
    let inondation = {
        let client = Arc::clone(risques);
        SubQuery::new(
            "zone_inondable",
            source,
            Box::pin(async move {
                client
                    .zonage_inondation(&p)
                    .await
                    .map(ReponseRisque::Emprise)
            }),
        )
    };
    let sismique = {
        let client = Arc::clone(risques);
        let insee = code_insee.to_string();
        SubQuery::new(
            "zone_sismique",
            source,
            Box::pin(async move {
                client
                    .zonage_sismique(&insee)
                    .await
                    .map(ReponseRisque::Zone)
            }),
        )
    };
    let cavites = {
        let client = Arc::clone(risques);
        SubQuery::new(
            "cavites",
            source,
            Box::pin(async move { client.cavites(&p).await.map(ReponseRisque::Emprise) }),
        )
    };

    let settled = settle_all(vec![mvt, catnat, inondation, sismique, cavites]).await;

    let bundle = assembler(&settled);
    debug!(bundle = ?bundle, "Hazard evaluation complete");

    RisquesEvaluation {
        bundle,
        sources_utilisees: settled.sources_utilisees(),
        sources_echouees: settled.sources_echouees(),
    }
}

fn presence(settled: &Settled<ReponseRisque>, key: &str) -> Option<bool> {
    match settled.value(key) {
        Some(ReponseRisque::Emprise(fs)) => Some(fs.present),
        _ => None,
    }
}

fn assembler(settled: &Settled<ReponseRisque>) -> Option<RisquesNaturels> {
    if settled.all_failed() {
        return None;
    }

    let mouvement_terrain = presence(settled, "mouvement_terrain");
    let zone_inondable = presence(settled, "zone_inondable");
    let cavites = presence(settled, "cavites");
    let catnat = match settled.value("catnat") {
        Some(ReponseRisque::Compte(n)) => Some(*n),
        _ => None,
    };
    let zone_sismique = match settled.value("zone_sismique") {
        Some(ReponseRisque::Zone(z)) => Some(*z),
        _ => None,
    };

    let niveau = niveau_global(mouvement_terrain, catnat, zone_inondable, zone_sismique, cavites);
    let fiabilite =
        (settled.succeeded.len() as f64 / NOMBRE_ALEAS as f64 * 10.0 * 10.0).round() / 10.0;

    Some(RisquesNaturels {
        mouvement_terrain,
        catnat,
        zone_inondable,
        zone_sismique,
        cavites,
        niveau,
        fiabilite,
    })
}

/// Aggregate exposure level, computed only from hazards that answered
fn niveau_global(
    mouvement_terrain: Option<bool>,
    catnat: Option<u32>,
    zone_inondable: Option<bool>,
    zone_sismique: Option<u8>,
    cavites: Option<bool>,
) -> NiveauRisque {
    if zone_inondable == Some(true) || mouvement_terrain == Some(true) {
        NiveauRisque::Fort
    } else if catnat.is_some_and(|n| n >= 3) || cavites == Some(true) {
        NiveauRisque::Moyen
    } else if zone_sismique.is_some_and(|z| z >= 3) {
        NiveauRisque::Faible
    } else {
        NiveauRisque::Aucun
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::fanout::{SubFailure, SubResult};
    use crate::sources::SourceError;

    fn emprise(present: bool) -> ReponseRisque {
        ReponseRisque::Emprise(if present {
            FeatureSet::from_features(vec![Default::default()])
        } else {
            FeatureSet::empty()
        })
    }

    fn settled_with(
        succeeded: Vec<(&'static str, ReponseRisque)>,
        failed_keys: Vec<&'static str>,
    ) -> Settled<ReponseRisque> {
        Settled {
            succeeded: succeeded
                .into_iter()
                .map(|(key, value)| SubResult {
                    key,
                    source: "Géorisques",
                    value,
                })
                .collect(),
            failed: failed_keys
                .into_iter()
                .map(|key| SubFailure {
                    key,
                    source: "Géorisques",
                    error: SourceError::Api("down".to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn all_failed_yields_no_bundle() {
        let settled = settled_with(
            vec![],
            vec!["mouvement_terrain", "catnat", "zone_inondable", "zone_sismique", "cavites"],
        );
        assert!(assembler(&settled).is_none());
    }

    #[test]
    fn partial_bundle_carries_success_ratio() {
        let settled = settled_with(
            vec![
                ("mouvement_terrain", emprise(false)),
                ("catnat", ReponseRisque::Compte(1)),
                ("zone_sismique", ReponseRisque::Zone(2)),
            ],
            vec!["zone_inondable", "cavites"],
        );
        let bundle = assembler(&settled).unwrap();
        assert_eq!(bundle.fiabilite, 6.0);
        assert_eq!(bundle.zone_inondable, None);
        assert_eq!(bundle.niveau, NiveauRisque::Aucun);
    }

    #[test]
    fn flood_zone_dominates_the_level() {
        let settled = settled_with(
            vec![
                ("mouvement_terrain", emprise(false)),
                ("catnat", ReponseRisque::Compte(0)),
                ("zone_inondable", emprise(true)),
                ("zone_sismique", ReponseRisque::Zone(1)),
                ("cavites", emprise(false)),
            ],
            vec![],
        );
        let bundle = assembler(&settled).unwrap();
        assert_eq!(bundle.niveau, NiveauRisque::Fort);
        assert_eq!(bundle.fiabilite, 10.0);
    }

    #[test]
    fn repeated_catnat_orders_raise_the_level() {
        assert_eq!(
            niveau_global(Some(false), Some(4), Some(false), Some(1), Some(false)),
            NiveauRisque::Moyen
        );
        assert_eq!(
            niveau_global(Some(false), Some(2), Some(false), Some(1), Some(false)),
            NiveauRisque::Aucun
        );
    }

    #[test]
    fn seismic_zone_three_is_a_weak_signal() {
        assert_eq!(
            niveau_global(Some(false), Some(0), Some(false), Some(3), Some(false)),
            NiveauRisque::Faible
        );
    }
}
