//! Mapped criteria catalogue
//!
//! The 21 criteria the scoring matrix knows about, and the extraction of
//! their values from the enriched parcel + manual criteria. A criterion
//! whose value is unknown extracts to `None` and is skipped entirely by the
//! engine.

use crate::models::criteres::CriteresManuels;
use crate::models::parcelle::Parcelle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Critere {
    // Numeric, threshold-bucketed
    SurfaceSite,
    SurfaceBatie,
    DistanceTransport,
    DistanceRaccordement,
    TauxVacance,
    // Boolean
    RaccordementElectrique,
    CentreVille,
    ProximiteCommerces,
    RisqueTechnologique,
    TrameVerteBleue,
    // Categorical
    RisqueNaturel,
    ZonageEnvironnemental,
    ZonagePatrimonial,
    ZonageReglementaire,
    TypeProprietaire,
    Viabilisation,
    EtatBati,
    PresencePollution,
    ValeurArchitecturale,
    QualitePaysage,
    QualiteDesserte,
}

impl Critere {
    pub const ALL: [Critere; 21] = [
        Critere::SurfaceSite,
        Critere::SurfaceBatie,
        Critere::DistanceTransport,
        Critere::DistanceRaccordement,
        Critere::TauxVacance,
        Critere::RaccordementElectrique,
        Critere::CentreVille,
        Critere::ProximiteCommerces,
        Critere::RisqueTechnologique,
        Critere::TrameVerteBleue,
        Critere::RisqueNaturel,
        Critere::ZonageEnvironnemental,
        Critere::ZonagePatrimonial,
        Critere::ZonageReglementaire,
        Critere::TypeProprietaire,
        Critere::Viabilisation,
        Critere::EtatBati,
        Critere::PresencePollution,
        Critere::ValeurArchitecturale,
        Critere::QualitePaysage,
        Critere::QualiteDesserte,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Critere::SurfaceSite => "surface_site",
            Critere::SurfaceBatie => "surface_batie",
            Critere::DistanceTransport => "distance_transport",
            Critere::DistanceRaccordement => "distance_raccordement",
            Critere::TauxVacance => "taux_vacance",
            Critere::RaccordementElectrique => "raccordement_electrique",
            Critere::CentreVille => "centre_ville",
            Critere::ProximiteCommerces => "proximite_commerces",
            Critere::RisqueTechnologique => "risque_technologique",
            Critere::TrameVerteBleue => "trame_verte_bleue",
            Critere::RisqueNaturel => "risque_naturel",
            Critere::ZonageEnvironnemental => "zonage_environnemental",
            Critere::ZonagePatrimonial => "zonage_patrimonial",
            Critere::ZonageReglementaire => "zonage_reglementaire",
            Critere::TypeProprietaire => "type_proprietaire",
            Critere::Viabilisation => "viabilisation",
            Critere::EtatBati => "etat_bati",
            Critere::PresencePollution => "pollution",
            Critere::ValeurArchitecturale => "valeur_architecturale",
            Critere::QualitePaysage => "qualite_paysage",
            Critere::QualiteDesserte => "qualite_desserte",
        }
    }

    /// Keys a categorical scoring entry must cover for this criterion;
    /// empty for numeric criteria.
    pub fn cles_attendues(&self) -> &'static [&'static str] {
        match self {
            Critere::SurfaceSite
            | Critere::SurfaceBatie
            | Critere::DistanceTransport
            | Critere::DistanceRaccordement
            | Critere::TauxVacance => &[],
            Critere::RaccordementElectrique
            | Critere::CentreVille
            | Critere::ProximiteCommerces
            | Critere::RisqueTechnologique
            | Critere::TrameVerteBleue => &["oui", "non"],
            Critere::RisqueNaturel => &["aucun", "faible", "moyen", "fort"],
            Critere::ZonageEnvironnemental => &[
                "natura2000",
                "znieff1",
                "znieff2",
                "parc_national",
                "parc_naturel_regional",
                "reserve_naturelle",
                "hors_zone",
            ],
            Critere::ZonagePatrimonial => &[
                "monument_historique",
                "perimetre_monument_historique",
                "site_inscrit_classe",
                "zppaup",
                "avap",
                "spr",
                "non_concerne",
            ],
            Critere::ZonageReglementaire => &[
                "zone_urbaine",
                "zone_a_urbaniser",
                "zone_agricole",
                "zone_naturelle",
                "zone_activite",
                "secteur_constructible",
                "secteur_non_constructible",
                "inconnu",
            ],
            Critere::TypeProprietaire => &["public", "prive", "mixte", "copropriete"],
            Critere::Viabilisation => &["viabilise", "partiellement_viabilise", "non_viabilise"],
            Critere::EtatBati => &[
                "bon_etat",
                "degradation_moyenne",
                "degradation_importante",
                "degradation_heterogene",
            ],
            Critere::PresencePollution => &["non", "supposee", "averee", "traitee"],
            Critere::ValeurArchitecturale => {
                &["exceptionnelle", "interessante", "banale", "sans_interet"]
            }
            Critere::QualitePaysage => &["remarquable", "interessante", "banale", "degradee"],
            Critere::QualiteDesserte => &["bonne", "moyenne", "mauvaise"],
        }
    }
}

/// Extracted value of one criterion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValeurCritere {
    Nombre(f64),
    Categorie(&'static str),
}

impl ValeurCritere {
    pub fn libelle(&self) -> String {
        match self {
            ValeurCritere::Nombre(x) => format!("{}", x),
            ValeurCritere::Categorie(c) => (*c).to_string(),
        }
    }
}

fn booleen(value: Option<bool>) -> Option<ValeurCritere> {
    value.map(|b| ValeurCritere::Categorie(if b { "oui" } else { "non" }))
}

/// Value of a criterion for this parcel, `None` when unknown
pub fn valeur(
    parcelle: &Parcelle,
    manuels: &CriteresManuels,
    critere: Critere,
) -> Option<ValeurCritere> {
    match critere {
        Critere::SurfaceSite => parcelle.surface_site.map(ValeurCritere::Nombre),
        Critere::SurfaceBatie => parcelle.surface_batie.map(ValeurCritere::Nombre),
        Critere::DistanceTransport => parcelle.distance_transport.map(ValeurCritere::Nombre),
        Critere::DistanceRaccordement => parcelle.distance_raccordement.map(ValeurCritere::Nombre),
        Critere::TauxVacance => parcelle.taux_vacance.map(ValeurCritere::Nombre),
        Critere::RaccordementElectrique => booleen(parcelle.raccordement_electrique),
        Critere::CentreVille => booleen(parcelle.centre_ville),
        Critere::ProximiteCommerces => booleen(parcelle.proximite_commerces),
        Critere::RisqueTechnologique => booleen(parcelle.risque_technologique),
        Critere::TrameVerteBleue => booleen(parcelle.trame_verte_bleue),
        Critere::RisqueNaturel => parcelle
            .risque_naturel
            .map(|n| ValeurCritere::Categorie(n.as_str())),
        Critere::ZonageEnvironnemental => parcelle
            .zonage_environnemental
            .map(|z| ValeurCritere::Categorie(z.as_str())),
        Critere::ZonagePatrimonial => parcelle
            .zonage_patrimonial
            .map(|z| ValeurCritere::Categorie(z.as_str())),
        Critere::ZonageReglementaire => parcelle
            .zonage_reglementaire
            .map(|z| ValeurCritere::Categorie(z.as_str())),
        Critere::TypeProprietaire => manuels
            .type_proprietaire
            .as_str()
            .map(ValeurCritere::Categorie),
        Critere::Viabilisation => manuels.viabilisation.as_str().map(ValeurCritere::Categorie),
        Critere::EtatBati => manuels.etat_bati.as_str().map(ValeurCritere::Categorie),
        Critere::PresencePollution => manuels.pollution.as_str().map(ValeurCritere::Categorie),
        Critere::ValeurArchitecturale => manuels
            .valeur_architecturale
            .as_str()
            .map(ValeurCritere::Categorie),
        Critere::QualitePaysage => manuels
            .qualite_paysage
            .as_str()
            .map(ValeurCritere::Categorie),
        Critere::QualiteDesserte => manuels
            .qualite_desserte
            .as_str()
            .map(ValeurCritere::Categorie),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::criteres::PresencePollution;
    use crate::models::parcelle::{Geometrie, GeoPoint, NiveauRisque};

    fn parcelle_vide() -> Parcelle {
        Parcelle::base(
            "76231000AB0042".to_string(),
            "76231".to_string(),
            "Saint-Wandrille-Rançon".to_string(),
            Geometrie::from_contour(vec![
                GeoPoint::new(0.76, 49.52),
                GeoPoint::new(0.77, 49.52),
                GeoPoint::new(0.77, 49.53),
            ]),
            None,
        )
    }

    #[test]
    fn unknown_values_extract_to_none() {
        let parcelle = parcelle_vide();
        let manuels = CriteresManuels::default();
        for critere in Critere::ALL {
            assert!(
                valeur(&parcelle, &manuels, critere).is_none(),
                "{:?} should be unknown",
                critere
            );
        }
    }

    #[test]
    fn populated_values_extract() {
        let mut parcelle = parcelle_vide();
        parcelle.surface_site = Some(42_780.0);
        parcelle.centre_ville = Some(true);
        parcelle.risque_naturel = Some(NiveauRisque::Moyen);

        let mut manuels = CriteresManuels::default();
        manuels.pollution = PresencePollution::Averee;

        assert_eq!(
            valeur(&parcelle, &manuels, Critere::SurfaceSite),
            Some(ValeurCritere::Nombre(42_780.0))
        );
        assert_eq!(
            valeur(&parcelle, &manuels, Critere::CentreVille),
            Some(ValeurCritere::Categorie("oui"))
        );
        assert_eq!(
            valeur(&parcelle, &manuels, Critere::RisqueNaturel),
            Some(ValeurCritere::Categorie("moyen"))
        );
        assert_eq!(
            valeur(&parcelle, &manuels, Critere::PresencePollution),
            Some(ValeurCritere::Categorie("averee"))
        );
    }

    #[test]
    fn catalogue_has_21_criteria_without_duplicates() {
        let mut names: Vec<&str> = Critere::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 21);
    }
}
