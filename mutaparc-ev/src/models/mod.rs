//! Domain model types for the evaluation service

pub mod criteres;
pub mod enrichment;
pub mod evaluation;
pub mod parcelle;

pub use criteres::CriteresManuels;
pub use enrichment::{EnrichmentResult, StatutEnrichissement};
pub use evaluation::{MutabiliteResult, Usage, UsageScore};
pub use parcelle::{GeoPoint, Geometrie, NiveauRisque, Parcelle};
