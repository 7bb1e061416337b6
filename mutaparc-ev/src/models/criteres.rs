//! User-supplied manual criteria
//!
//! Every field carries an `Inconnu` variant; unknown values are skipped by
//! the scoring engine (they feed neither advantages nor constraints).

use serde::{Deserialize, Serialize};

/// Owner type of the parcel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeProprietaire {
    Public,
    Prive,
    Mixte,
    Copropriete,
    #[default]
    Inconnu,
}

impl TypeProprietaire {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            TypeProprietaire::Public => Some("public"),
            TypeProprietaire::Prive => Some("prive"),
            TypeProprietaire::Mixte => Some("mixte"),
            TypeProprietaire::Copropriete => Some("copropriete"),
            TypeProprietaire::Inconnu => None,
        }
    }
}

/// Site servicing (roads, water, sewer) state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtatViabilisation {
    Viabilise,
    PartiellementViabilise,
    NonViabilise,
    #[default]
    Inconnu,
}

impl EtatViabilisation {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            EtatViabilisation::Viabilise => Some("viabilise"),
            EtatViabilisation::PartiellementViabilise => Some("partiellement_viabilise"),
            EtatViabilisation::NonViabilise => Some("non_viabilise"),
            EtatViabilisation::Inconnu => None,
        }
    }
}

/// Condition of existing buildings and infrastructure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtatBati {
    BonEtat,
    DegradationMoyenne,
    DegradationImportante,
    DegradationHeterogene,
    #[default]
    Inconnu,
}

impl EtatBati {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            EtatBati::BonEtat => Some("bon_etat"),
            EtatBati::DegradationMoyenne => Some("degradation_moyenne"),
            EtatBati::DegradationImportante => Some("degradation_importante"),
            EtatBati::DegradationHeterogene => Some("degradation_heterogene"),
            EtatBati::Inconnu => None,
        }
    }
}

/// Known or suspected soil pollution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresencePollution {
    Non,
    Supposee,
    Averee,
    Traitee,
    #[default]
    Inconnu,
}

impl PresencePollution {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            PresencePollution::Non => Some("non"),
            PresencePollution::Supposee => Some("supposee"),
            PresencePollution::Averee => Some("averee"),
            PresencePollution::Traitee => Some("traitee"),
            PresencePollution::Inconnu => None,
        }
    }
}

/// Architectural/heritage value of the built stock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValeurArchitecturale {
    Exceptionnelle,
    Interessante,
    Banale,
    SansInteret,
    #[default]
    Inconnu,
}

impl ValeurArchitecturale {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            ValeurArchitecturale::Exceptionnelle => Some("exceptionnelle"),
            ValeurArchitecturale::Interessante => Some("interessante"),
            ValeurArchitecturale::Banale => Some("banale"),
            ValeurArchitecturale::SansInteret => Some("sans_interet"),
            ValeurArchitecturale::Inconnu => None,
        }
    }
}

/// Landscape quality of the site and its surroundings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualitePaysage {
    Remarquable,
    Interessante,
    Banale,
    Degradee,
    #[default]
    Inconnu,
}

impl QualitePaysage {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            QualitePaysage::Remarquable => Some("remarquable"),
            QualitePaysage::Interessante => Some("interessante"),
            QualitePaysage::Banale => Some("banale"),
            QualitePaysage::Degradee => Some("degradee"),
            QualitePaysage::Inconnu => None,
        }
    }
}

/// Road access quality
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualiteDesserte {
    Bonne,
    Moyenne,
    Mauvaise,
    #[default]
    Inconnu,
}

impl QualiteDesserte {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            QualiteDesserte::Bonne => Some("bonne"),
            QualiteDesserte::Moyenne => Some("moyenne"),
            QualiteDesserte::Mauvaise => Some("mauvaise"),
            QualiteDesserte::Inconnu => None,
        }
    }
}

/// Manual criteria supplied by the caller; never mutated by the pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteresManuels {
    #[serde(default)]
    pub type_proprietaire: TypeProprietaire,
    #[serde(default)]
    pub viabilisation: EtatViabilisation,
    #[serde(default)]
    pub etat_bati: EtatBati,
    #[serde(default)]
    pub pollution: PresencePollution,
    #[serde(default)]
    pub valeur_architecturale: ValeurArchitecturale,
    #[serde(default)]
    pub qualite_paysage: QualitePaysage,
    #[serde(default)]
    pub qualite_desserte: QualiteDesserte,
}
