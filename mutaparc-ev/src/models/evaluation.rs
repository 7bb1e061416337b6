//! Mutability scoring output types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The 7 candidate land uses, in fixed declaration order.
///
/// Declaration order is the rank tie-break: equal mutability indexes keep
/// this order under the stable ascending sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Usage {
    ResidentielMixte,
    EquipementsPublics,
    CultureTourisme,
    Tertiaire,
    IndustrieArtisanat,
    Renaturation,
    PhotovoltaiqueSol,
}

impl Usage {
    pub const ALL: [Usage; 7] = [
        Usage::ResidentielMixte,
        Usage::EquipementsPublics,
        Usage::CultureTourisme,
        Usage::Tertiaire,
        Usage::IndustrieArtisanat,
        Usage::Renaturation,
        Usage::PhotovoltaiqueSol,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Usage::ResidentielMixte => "residentiel_mixte",
            Usage::EquipementsPublics => "equipements_publics",
            Usage::CultureTourisme => "culture_tourisme",
            Usage::Tertiaire => "tertiaire",
            Usage::IndustrieArtisanat => "industrie_artisanat",
            Usage::Renaturation => "renaturation",
            Usage::PhotovoltaiqueSol => "photovoltaique_sol",
        }
    }
}

/// One weighted criterion contribution, kept for the per-usage breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailCritere {
    pub critere: String,
    pub valeur: String,
    /// Weighted contribution; positive feeds advantages, negative constraints
    pub contribution: f64,
}

/// Score of one usage for one parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageScore {
    pub usage: Usage,
    /// 1 = weakest candidate, 7 = strongest
    pub rang: u8,
    /// Mutability index, 0–100, one decimal
    pub indice: f64,
    /// Qualitative band for the index
    pub qualification: String,
    pub avantages: f64,
    pub contraintes: f64,
    pub details: Vec<DetailCritere>,
}

/// Data-completeness note for one scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteFiabilite {
    /// 0–10, rounded to the nearest 0.5
    pub note: f64,
    pub label: String,
    pub description: String,
    pub criteres_renseignes: usize,
    pub criteres_total: usize,
}

/// Raw scoring output: the 7 usages ranked, plus the global reliability
/// note. Computed fresh on every scoring call; never cached, never random.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutabilite {
    pub fiabilite: NoteFiabilite,
    /// Sorted strongest first (rank 7 down to rank 1)
    pub usages: Vec<UsageScore>,
}

/// Persisted scoring output, tied to the enrichment it consumed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutabiliteResult {
    pub evaluation_id: Uuid,
    pub enrichment_id: Uuid,
    pub fiabilite: NoteFiabilite,
    /// Sorted strongest first (rank 7 down to rank 1)
    pub usages: Vec<UsageScore>,
}
