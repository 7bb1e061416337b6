//! Enrichment reliability score
//!
//! `r = clamp(10 − 0.3 × missing − (used > 2 ? 0 : 2), 0, 10)`,
//! rounded to one decimal. Fewer than three answering sources takes a flat
//! two-point penalty on top of the per-field one.

/// Reliability of one enrichment pass, 0–10, one decimal
pub fn fiabilite(sources_utilisees: usize, champs_manquants: usize) -> f64 {
    let penalite_sources = if sources_utilisees > 2 { 0.0 } else { 2.0 };
    let brut = 10.0 - 0.3 * champs_manquants as f64 - penalite_sources;
    (brut.clamp(0.0, 10.0) * 10.0).round() / 10.0
}
