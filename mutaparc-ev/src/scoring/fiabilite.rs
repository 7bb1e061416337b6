//! Data-completeness note for a scoring call
//!
//! `(populated / total) × 10`, rounded to the nearest 0.5, mapped against an
//! ordered band table: first band whose threshold is ≤ the note wins.

use crate::models::evaluation::NoteFiabilite;

const BANDES: &[(f64, &str, &str)] = &[
    (9.0, "Très fiable", "Critères quasi complets, évaluation robuste"),
    (7.0, "Fiable", "Données largement renseignées"),
    (5.0, "Moyennement fiable", "Plusieurs critères manquants, à consolider"),
    (3.0, "Peu fiable", "Données lacunaires, résultat indicatif"),
    (0.0, "Très peu fiable", "Trop peu de critères renseignés"),
];

pub fn note_fiabilite(criteres_renseignes: usize, criteres_total: usize) -> NoteFiabilite {
    let brut = if criteres_total == 0 {
        0.0
    } else {
        criteres_renseignes as f64 / criteres_total as f64 * 10.0
    };
    let note = (brut * 2.0).round() / 2.0;

    let (_, label, description) = BANDES
        .iter()
        .find(|(seuil, _, _)| *seuil <= note)
        .unwrap_or(&BANDES[BANDES.len() - 1]);

    NoteFiabilite {
        note,
        label: (*label).to_string(),
        description: (*description).to_string(),
        criteres_renseignes,
        criteres_total,
    }
}
