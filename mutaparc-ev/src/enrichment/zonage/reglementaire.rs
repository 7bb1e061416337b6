//! Regulatory zoning evaluator
//!
//! PLU zone first (code prefix, with the dominant-destination override),
//! then the simplified municipal map, then the RNU / no-data fallback.

use crate::enrichment::fanout::{settle_all, Settled, SubQuery};
use crate::models::parcelle::{GeoPoint, ZonageReglementaire};
use crate::sources::{SecteurCc, UrbanismeSource, ZonePlu};
use std::sync::Arc;

const MOTS_NON_CONSTRUCTIBLE: &[&str] = &["non", "inconstructible", "interdit"];

/// Heterogeneous answers of the three planning sub-queries
#[derive(Debug, Clone)]
pub enum ReponseReglementaire {
    Plu(Option<ZonePlu>),
    CarteCommunale(Option<SecteurCc>),
    Rnu(bool),
}

#[derive(Debug, Clone)]
pub struct ZonageRegEvaluation {
    pub classification: Option<ZonageReglementaire>,
    pub sources_utilisees: Vec<String>,
    pub sources_echouees: Vec<String>,
}

pub async fn evaluer(
    urbanisme: &Arc<dyn UrbanismeSource>,
    point: &GeoPoint,
    code_insee: &str,
) -> ZonageRegEvaluation {
    let source = urbanisme.source_name();
    let p = *point;
    let insee = code_insee.to_string();

    let plu = {
        let client = Arc::clone(urbanisme);
        SubQuery::new(
            "zone_plu",
            source,
            Box::pin(async move { client.zone_plu(&p).await.map(ReponseReglementaire::Plu) }),
        )
    };
    let cc = {
        let client = Arc::clone(urbanisme);
        SubQuery::new(
            "secteur_cc",
            source,
            Box::pin(async move {
                client
                    .secteur_carte_communale(&p)
                    .await
                    .map(ReponseReglementaire::CarteCommunale)
            }),
        )
    };
    let rnu = {
        let client = Arc::clone(urbanisme);
        SubQuery::new(
            "commune_rnu",
            source,
            Box::pin(async move {
                client
                    .commune_rnu(&insee)
                    .await
                    .map(ReponseReglementaire::Rnu)
            }),
        )
    };

    let settled = settle_all(vec![plu, cc, rnu]).await;

    ZonageRegEvaluation {
        classification: classifier(&settled),
        sources_utilisees: settled.sources_utilisees(),
        sources_echouees: settled.sources_echouees(),
    }
}

fn classifier(settled: &Settled<ReponseReglementaire>) -> Option<ZonageReglementaire> {
    let keys = ["zone_plu", "secteur_cc", "commune_rnu"];
    if !keys.iter().any(|k| settled.value(k).is_some()) {
        return None;
    }

    if let Some(ReponseReglementaire::Plu(Some(zone))) = settled.value("zone_plu") {
        return Some(classer_zone_plu(zone));
    }
    if let Some(ReponseReglementaire::CarteCommunale(Some(secteur))) = settled.value("secteur_cc") {
        return Some(classer_secteur(secteur));
    }
    // RNU municipality, or no planning document covering the point
    Some(ZonageReglementaire::Inconnu)
}

/// Zone code prefix mapping, with the "activité" dominant-destination
/// override taking precedence over any prefix.
fn classer_zone_plu(zone: &ZonePlu) -> ZonageReglementaire {
    if let Some(destination) = &zone.destination_dominante {
        if destination.to_lowercase().contains("activit") {
            return ZonageReglementaire::ZoneActivite;
        }
    }

    let code = zone.libelle.trim().to_uppercase();
    if code.starts_with("AU") {
        ZonageReglementaire::ZoneAUrbaniser
    } else if code.starts_with('U') {
        ZonageReglementaire::ZoneUrbaine
    } else if code.starts_with('A') {
        ZonageReglementaire::ZoneAgricole
    } else if code.starts_with('N') {
        ZonageReglementaire::ZoneNaturelle
    } else {
        ZonageReglementaire::Inconnu
    }
}

/// Constructible vs non-constructible from the sector's free text.
/// Negation keywords are checked first: "inconstructible" contains
/// "constructible".
fn classer_secteur(secteur: &SecteurCc) -> ZonageReglementaire {
    let texte = secteur.libelle.to_lowercase();
    if MOTS_NON_CONSTRUCTIBLE.iter().any(|kw| texte.contains(kw)) {
        ZonageReglementaire::SecteurNonConstructible
    } else if texte.contains("constructible") {
        ZonageReglementaire::SecteurConstructible
    } else {
        ZonageReglementaire::Inconnu
    }
}
