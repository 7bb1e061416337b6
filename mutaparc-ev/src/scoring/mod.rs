//! Mutability scoring engine
//!
//! Consumes the enriched parcel plus the manual criteria and scores the 7
//! candidate usages against the fixed matrix. Unknown criteria are skipped
//! entirely: they feed neither advantages nor constraints and are excluded
//! from the completeness denominator. The whole stage is pure: scoring the
//! same parcel twice yields identical output.

pub mod criteres;
pub mod fiabilite;
pub mod matrix;

use crate::models::criteres::CriteresManuels;
use crate::models::evaluation::{DetailCritere, Mutabilite, Usage, UsageScore};
use crate::models::parcelle::Parcelle;
use self::criteres::{Critere, ValeurCritere};
use self::matrix::Bareme;
use thiserror::Error;
use tracing::debug;

/// Scoring failure surfaced to the caller
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Required fields for scoring are absent (e.g. zero site area)
    #[error("Parcel incomplete for scoring: {0}")]
    ParcelleIncomplete(String),
}

/// Qualitative band for a mutability index
fn qualification(indice: f64) -> &'static str {
    if indice >= 70.0 {
        "Excellent"
    } else if indice >= 60.0 {
        "Favorable"
    } else if indice >= 50.0 {
        "Modéré"
    } else if indice >= 40.0 {
        "Faible"
    } else {
        "Défavorable"
    }
}

/// `advantages / (advantages + constraints)` as a percentage, one decimal;
/// 0 when nothing contributed either way.
fn indice_mutabilite(avantages: f64, contraintes: f64) -> f64 {
    let total = avantages + contraintes;
    if total == 0.0 {
        return 0.0;
    }
    (avantages / total * 1000.0).round() / 10.0
}

#[derive(Default)]
pub struct MutabilityScorer;

impl MutabilityScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(
        &self,
        parcelle: &Parcelle,
        manuels: &CriteresManuels,
    ) -> Result<Mutabilite, ScoringError> {
        match parcelle.surface_site {
            Some(surface) if surface > 0.0 => {}
            _ => {
                return Err(ScoringError::ParcelleIncomplete(
                    "site area is missing or zero".to_string(),
                ))
            }
        }

        let bareme = Bareme::global();

        // Extract every criterion once; unknowns stay None
        let valeurs: Vec<(Critere, Option<ValeurCritere>)> = Critere::ALL
            .iter()
            .map(|c| (*c, criteres::valeur(parcelle, manuels, *c)))
            .collect();
        let renseignes = valeurs.iter().filter(|(_, v)| v.is_some()).count();

        let mut scores: Vec<UsageScore> = Usage::ALL
            .iter()
            .map(|usage| self.score_usage(bareme, *usage, &valeurs))
            .collect();

        // Rank 1 = weakest. Stable ascending sort: equal indexes keep the
        // usage declaration order.
        scores.sort_by(|a, b| {
            a.indice
                .partial_cmp(&b.indice)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (i, score) in scores.iter_mut().enumerate() {
            score.rang = (i + 1) as u8;
        }
        scores.reverse();

        debug!(
            id_cadastral = %parcelle.id_cadastral,
            renseignes,
            meilleur = scores[0].usage.as_str(),
            indice = scores[0].indice,
            "Mutability scoring complete"
        );

        Ok(Mutabilite {
            fiabilite: fiabilite::note_fiabilite(renseignes, Critere::ALL.len()),
            usages: scores,
        })
    }

    fn score_usage(
        &self,
        bareme: &Bareme,
        usage: Usage,
        valeurs: &[(Critere, Option<ValeurCritere>)],
    ) -> UsageScore {
        let mut avantages = 0.0;
        let mut contraintes = 0.0;
        let mut details = Vec::new();

        for (critere, valeur) in valeurs {
            let Some(valeur) = valeur else {
                // Unknown criterion: skipped entirely
                continue;
            };
            let contribution = bareme.contribution(usage, *critere, valeur);
            if contribution > 0.0 {
                avantages += contribution;
            } else if contribution < 0.0 {
                contraintes += -contribution;
            }
            details.push(DetailCritere {
                critere: critere.as_str().to_string(),
                valeur: valeur.libelle(),
                contribution,
            });
        }

        let indice = indice_mutabilite(avantages, contraintes);
        UsageScore {
            usage,
            rang: 0,
            indice,
            qualification: qualification(indice).to_string(),
            avantages,
            contraintes,
            details,
        }
    }
}
