//! Environmental zoning evaluator
//!
//! Fans out the six nature-registry queries (plus the green/blue corridor)
//! and applies the fixed priority order. First matching rule wins; later
//! rules are not evaluated. A sub-query that failed is simply absent from
//! the rule walk.

use crate::enrichment::fanout::{settle_all, Settled, SubQuery};
use crate::models::parcelle::{GeoPoint, ZonageEnvironnemental};
use crate::sources::{FeatureSet, NatureSource};
use std::sync::Arc;

/// Fixed priority order, strongest protection first
const PRIORITE: &[(&str, ZonageEnvironnemental)] = &[
    ("natura2000", ZonageEnvironnemental::Natura2000),
    ("znieff1", ZonageEnvironnemental::Znieff1),
    ("znieff2", ZonageEnvironnemental::Znieff2),
    ("parc_national", ZonageEnvironnemental::ParcNational),
    ("parc_naturel_regional", ZonageEnvironnemental::ParcNaturelRegional),
    ("reserve_naturelle", ZonageEnvironnemental::ReserveNaturelle),
];

#[derive(Debug, Clone)]
pub struct ZonageEnvEvaluation {
    pub classification: Option<ZonageEnvironnemental>,
    pub trame_verte_bleue: Option<bool>,
    pub sources_utilisees: Vec<String>,
    pub sources_echouees: Vec<String>,
}

pub async fn evaluer(nature: &Arc<dyn NatureSource>, point: &GeoPoint) -> ZonageEnvEvaluation {
    let source = nature.source_name();
    let p = *point;

    macro_rules! query {
        ($key:literal, $method:ident) => {{
            let client = Arc::clone(nature);
            SubQuery::new(
                $key,
                source,
                Box::pin(async move { client.$method(&p).await }),
            )
        }};
    }

    let settled = settle_all(vec![
        query!("natura2000", natura2000),
        query!("znieff1", znieff1),
        query!("znieff2", znieff2),
        query!("parc_national", parc_national),
        query!("parc_naturel_regional", parc_naturel_regional),
        query!("reserve_naturelle", reserve_naturelle),
        query!("trame_verte_bleue", trame_verte_bleue),
    ])
    .await;

    ZonageEnvEvaluation {
        classification: classifier(&settled),
        trame_verte_bleue: settled.value("trame_verte_bleue").map(|fs| fs.present),
        sources_utilisees: settled.sources_utilisees(),
        sources_echouees: settled.sources_echouees(),
    }
}

/// Walk the priority order over the settled sub-results.
///
/// `None` when every zoning sub-query failed; `HorsZone` only when at least
/// one answered and no rule matched. `present` is honored as-is, including
/// the inconsistent `present=true, count=0` upstream state.
fn classifier(settled: &Settled<FeatureSet>) -> Option<ZonageEnvironnemental> {
    let answered = PRIORITE.iter().any(|(key, _)| settled.value(key).is_some());
    if !answered {
        return None;
    }

    for (key, classification) in PRIORITE {
        if let Some(fs) = settled.value(key) {
            if fs.present {
                return Some(*classification);
            }
        }
    }
    Some(ZonageEnvironnemental::HorsZone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::fanout::{SubFailure, SubResult};
    use crate::sources::SourceError;

    fn present() -> FeatureSet {
        FeatureSet::from_features(vec![Default::default()])
    }

    fn absent() -> FeatureSet {
        FeatureSet::empty()
    }

    fn settled_with(entries: Vec<(&'static str, FeatureSet)>) -> Settled<FeatureSet> {
        Settled {
            succeeded: entries
                .into_iter()
                .map(|(key, value)| SubResult {
                    key,
                    source: "API Carto Nature",
                    value,
                })
                .collect(),
            failed: vec![],
        }
    }

    #[test]
    fn natura2000_short_circuits_everything() {
        let settled = settled_with(vec![
            ("natura2000", present()),
            ("znieff1", present()),
            ("reserve_naturelle", present()),
        ]);
        assert_eq!(
            classifier(&settled),
            Some(ZonageEnvironnemental::Natura2000)
        );
    }

    #[test]
    fn inconsistent_present_with_zero_count_still_short_circuits() {
        // Upstream sometimes flags presence without returning features;
        // the rule honors `present` alone.
        let incoherent = FeatureSet {
            present: true,
            count: 0,
            features: vec![],
        };
        let settled = settled_with(vec![
            ("natura2000", incoherent),
            ("znieff2", present()),
        ]);
        assert_eq!(
            classifier(&settled),
            Some(ZonageEnvironnemental::Natura2000)
        );
    }

    #[test]
    fn znieff_outranks_parks_and_reserves() {
        let settled = settled_with(vec![
            ("natura2000", absent()),
            ("znieff2", present()),
            ("parc_national", present()),
            ("reserve_naturelle", present()),
        ]);
        assert_eq!(classifier(&settled), Some(ZonageEnvironnemental::Znieff2));
    }

    #[test]
    fn no_match_yields_hors_zone() {
        let settled = settled_with(vec![
            ("natura2000", absent()),
            ("znieff1", absent()),
            ("znieff2", absent()),
            ("parc_national", absent()),
            ("parc_naturel_regional", absent()),
            ("reserve_naturelle", absent()),
        ]);
        assert_eq!(classifier(&settled), Some(ZonageEnvironnemental::HorsZone));
    }

    #[test]
    fn all_failed_yields_no_classification() {
        let settled: Settled<FeatureSet> = Settled {
            succeeded: vec![],
            failed: vec![SubFailure {
                key: "natura2000",
                source: "API Carto Nature",
                error: SourceError::Api("down".to_string()),
            }],
        };
        assert_eq!(classifier(&settled), None);
    }

    #[test]
    fn failed_sub_query_is_skipped_in_the_walk() {
        // natura2000 failed, znieff1 present: the walk starts at the first
        // answered sub-domain.
        let mut settled = settled_with(vec![("znieff1", present())]);
        settled.failed.push(SubFailure {
            key: "natura2000",
            source: "API Carto Nature",
            error: SourceError::Network("timeout".to_string()),
        });
        assert_eq!(classifier(&settled), Some(ZonageEnvironnemental::Znieff1));
    }
}
