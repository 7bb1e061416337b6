//! Heritage zoning evaluator
//!
//! Three servitude queries (AC1 monuments, AC2 sites, AC4 heritage areas),
//! fixed priority order with keyword sub-classification over the features'
//! free-text properties.

use crate::enrichment::fanout::{settle_all, Settled, SubQuery};
use crate::models::parcelle::{GeoPoint, ZonagePatrimonial};
use crate::sources::{FeatureProps, FeatureSet, PatrimoineSource};
use std::sync::Arc;

const MOTS_PERIMETRE: &[&str] = &["périmètre", "perimetre", "protection", "abord"];

#[derive(Debug, Clone)]
pub struct ZonagePatEvaluation {
    pub classification: Option<ZonagePatrimonial>,
    pub sources_utilisees: Vec<String>,
    pub sources_echouees: Vec<String>,
}

pub async fn evaluer(
    patrimoine: &Arc<dyn PatrimoineSource>,
    point: &GeoPoint,
) -> ZonagePatEvaluation {
    let source = patrimoine.source_name();
    let p = *point;

    macro_rules! query {
        ($key:literal, $method:ident) => {{
            let client = Arc::clone(patrimoine);
            SubQuery::new(
                $key,
                source,
                Box::pin(async move { client.$method(&p).await }),
            )
        }};
    }

    let settled = settle_all(vec![
        query!("monuments_historiques", monuments_historiques),
        query!("sites_proteges", sites_proteges),
        query!("zones_patrimoniales", zones_patrimoniales),
    ])
    .await;

    ZonagePatEvaluation {
        classification: classifier(&settled),
        sources_utilisees: settled.sources_utilisees(),
        sources_echouees: settled.sources_echouees(),
    }
}

fn classifier(settled: &Settled<FeatureSet>) -> Option<ZonagePatrimonial> {
    let keys = ["monuments_historiques", "sites_proteges", "zones_patrimoniales"];
    if !keys.iter().any(|k| settled.value(k).is_some()) {
        return None;
    }

    if let Some(fs) = settled.value("monuments_historiques") {
        if fs.present {
            return Some(classer_monument(&fs.features));
        }
    }
    if let Some(fs) = settled.value("sites_proteges") {
        if fs.present {
            return Some(ZonagePatrimonial::SiteInscritClasse);
        }
    }
    if let Some(fs) = settled.value("zones_patrimoniales") {
        if fs.present {
            return Some(classer_zone_patrimoniale(&fs.features));
        }
    }
    Some(ZonagePatrimonial::NonConcerne)
}

fn free_text(feature: &FeatureProps) -> String {
    let mut text = String::new();
    if let Some(kind) = &feature.kind {
        text.push_str(kind);
        text.push(' ');
    }
    if let Some(name) = &feature.name {
        text.push_str(name);
    }
    text.to_lowercase()
}

/// Monument vs protection perimeter, by keyword over `type`/`name`.
///
/// First matching feature wins; no keyword anywhere defaults to perimeter.
fn classer_monument(features: &[FeatureProps]) -> ZonagePatrimonial {
    for feature in features {
        let text = free_text(feature);
        if text.contains("monument") {
            return ZonagePatrimonial::MonumentHistorique;
        }
        if MOTS_PERIMETRE.iter().any(|kw| text.contains(kw)) {
            return ZonagePatrimonial::PerimetreMonumentHistorique;
        }
    }
    ZonagePatrimonial::PerimetreMonumentHistorique
}

/// ZPPAUP vs AVAP vs SPR, by keyword; SPR is the generic default.
fn classer_zone_patrimoniale(features: &[FeatureProps]) -> ZonagePatrimonial {
    for feature in features {
        let text = free_text(feature);
        if text.contains("zppaup") {
            return ZonagePatrimonial::Zppaup;
        }
        if text.contains("avap") {
            return ZonagePatrimonial::Avap;
        }
        if text.contains("spr") || text.contains("site patrimonial") {
            return ZonagePatrimonial::Spr;
        }
    }
    ZonagePatrimonial::Spr
}
