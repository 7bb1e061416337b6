//! Enrichment pass output and status

use crate::models::parcelle::Parcelle;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived outcome of one enrichment pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatutEnrichissement {
    /// Every optional source answered
    Success,
    /// At least one source answered and at least one failed
    Partial,
    /// No optional source answered (beyond the mandatory cadastre)
    Failure,
}

impl StatutEnrichissement {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatutEnrichissement::Success => "SUCCESS",
            StatutEnrichissement::Partial => "PARTIAL",
            StatutEnrichissement::Failure => "FAILURE",
        }
    }
}

/// Result of one enrichment pass
///
/// Invariant: every populated `Parcelle` field has a matching entry in
/// `sources_utilisees`; every unpopulated field expected from the pipeline
/// has matching entries in `champs_manquants` and `sources_echouees`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    /// Identifier of this enrichment row
    pub enrichment_id: Uuid,
    /// Cache traceability: the row this result reused, if any
    pub source_enrichment_id: Option<Uuid>,

    pub parcelle: Parcelle,
    pub statut: StatutEnrichissement,

    pub sources_utilisees: Vec<String>,
    pub sources_echouees: Vec<String>,
    pub champs_manquants: Vec<String>,

    /// Completeness/trust score, 0–10, one decimal
    pub fiabilite: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statut_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&StatutEnrichissement::Partial).unwrap(),
            "\"PARTIAL\""
        );
        assert_eq!(StatutEnrichissement::Success.as_str(), "SUCCESS");
    }
}
