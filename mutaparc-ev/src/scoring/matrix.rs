//! Fixed scoring matrix
//!
//! One entry per usage × criterion. Numeric criteria use ordered threshold
//! buckets (upper bound exclusive, last bucket unbounded); categorical
//! criteria use a keyed lookup on the stringified value. `NonPondere` marks
//! a pair the matrix deliberately ignores. The whole table is validated at
//! startup: every pair present, every bucket list well-formed, every
//! categorical entry covering the full key set of its criterion.

use crate::models::evaluation::Usage;
use crate::scoring::criteres::{Critere, ValeurCritere};
use std::collections::HashMap;
use std::sync::OnceLock;

const INF: f64 = f64::INFINITY;

/// Scoring rule for one usage × criterion pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notation {
    /// `(upper bound exclusive, score)`, ordered, last bound infinite
    Seuils(&'static [(f64, f64)]),
    /// `(stringified value, score)`
    Categories(&'static [(&'static str, f64)]),
    /// Explicit unweighted default: the pair contributes nothing
    NonPondere,
}

use self::Notation::{Categories, NonPondere, Seuils};
use crate::scoring::criteres::Critere as C;

const RESIDENTIEL_MIXTE: &[(Critere, Notation)] = &[
    (C::SurfaceSite, Seuils(&[(1_000.0, -1.0), (10_000.0, 1.0), (50_000.0, 2.0), (INF, 1.0)])),
    (C::SurfaceBatie, Seuils(&[(1.0, 0.5), (1_000.0, 1.0), (10_000.0, 1.0), (INF, -1.0)])),
    (C::DistanceTransport, Seuils(&[(500.0, 2.0), (1_500.0, 1.0), (INF, -1.0)])),
    (C::DistanceRaccordement, Seuils(&[(100.0, 1.0), (500.0, 0.5), (INF, -1.0)])),
    (C::TauxVacance, Seuils(&[(5.0, 1.0), (10.0, -0.5), (INF, -2.0)])),
    (C::RaccordementElectrique, Categories(&[("oui", 1.0), ("non", -1.0)])),
    (C::CentreVille, Categories(&[("oui", 2.0), ("non", -0.5)])),
    (C::ProximiteCommerces, Categories(&[("oui", 2.0), ("non", -1.0)])),
    (C::RisqueTechnologique, Categories(&[("oui", -2.0), ("non", 1.0)])),
    (C::TrameVerteBleue, Categories(&[("oui", -1.0), ("non", 0.5)])),
    (C::RisqueNaturel, Categories(&[("aucun", 1.0), ("faible", 0.5), ("moyen", -1.0), ("fort", -2.0)])),
    (C::ZonageEnvironnemental, Categories(&[
        ("natura2000", -2.0), ("znieff1", -1.0), ("znieff2", -0.5), ("parc_national", -2.0),
        ("parc_naturel_regional", -0.5), ("reserve_naturelle", -2.0), ("hors_zone", 1.0),
    ])),
    (C::ZonagePatrimonial, Categories(&[
        ("monument_historique", -1.0), ("perimetre_monument_historique", -0.5),
        ("site_inscrit_classe", -0.5), ("zppaup", -0.5), ("avap", -0.5), ("spr", -0.5),
        ("non_concerne", 0.5),
    ])),
    (C::ZonageReglementaire, Categories(&[
        ("zone_urbaine", 2.0), ("zone_a_urbaniser", 1.5), ("zone_agricole", -2.0),
        ("zone_naturelle", -2.0), ("zone_activite", -1.0), ("secteur_constructible", 1.0),
        ("secteur_non_constructible", -2.0), ("inconnu", 0.0),
    ])),
    (C::TypeProprietaire, Categories(&[("public", 1.0), ("prive", 0.5), ("mixte", 0.0), ("copropriete", -1.0)])),
    (C::Viabilisation, Categories(&[("viabilise", 2.0), ("partiellement_viabilise", 0.5), ("non_viabilise", -1.0)])),
    (C::EtatBati, Categories(&[
        ("bon_etat", 2.0), ("degradation_moyenne", 0.5), ("degradation_importante", -2.0),
        ("degradation_heterogene", -0.5),
    ])),
    (C::PresencePollution, Categories(&[("non", 1.0), ("supposee", -1.0), ("averee", -2.0), ("traitee", 0.5)])),
    (C::ValeurArchitecturale, Categories(&[("exceptionnelle", 1.0), ("interessante", 0.5), ("banale", 0.0), ("sans_interet", 0.0)])),
    (C::QualitePaysage, Categories(&[("remarquable", 1.0), ("interessante", 0.5), ("banale", 0.0), ("degradee", -0.5)])),
    (C::QualiteDesserte, Categories(&[("bonne", 1.0), ("moyenne", 0.0), ("mauvaise", -1.0)])),
];

const EQUIPEMENTS_PUBLICS: &[(Critere, Notation)] = &[
    (C::SurfaceSite, Seuils(&[(1_000.0, -1.0), (10_000.0, 1.0), (50_000.0, 2.0), (INF, 2.0)])),
    (C::SurfaceBatie, Seuils(&[(1.0, 0.5), (1_000.0, 1.0), (10_000.0, -1.0), (INF, -2.0)])),
    (C::DistanceTransport, Seuils(&[(500.0, 2.0), (1_500.0, 1.0), (INF, -1.0)])),
    (C::DistanceRaccordement, Seuils(&[(100.0, 1.0), (500.0, 0.5), (INF, -1.0)])),
    (C::TauxVacance, Seuils(&[(5.0, 0.5), (10.0, 0.0), (INF, -0.5)])),
    (C::RaccordementElectrique, Categories(&[("oui", 1.0), ("non", -1.0)])),
    (C::CentreVille, Categories(&[("oui", 1.0), ("non", 0.0)])),
    (C::ProximiteCommerces, Categories(&[("oui", 1.0), ("non", -0.5)])),
    (C::RisqueTechnologique, Categories(&[("oui", -2.0), ("non", 1.0)])),
    (C::TrameVerteBleue, Categories(&[("oui", -1.0), ("non", 0.5)])),
    (C::RisqueNaturel, Categories(&[("aucun", 1.0), ("faible", 0.5), ("moyen", -1.0), ("fort", -2.0)])),
    (C::ZonageEnvironnemental, Categories(&[
        ("natura2000", -2.0), ("znieff1", -1.0), ("znieff2", -0.5), ("parc_national", -2.0),
        ("parc_naturel_regional", -0.5), ("reserve_naturelle", -2.0), ("hors_zone", 1.0),
    ])),
    (C::ZonagePatrimonial, Categories(&[
        ("monument_historique", -0.5), ("perimetre_monument_historique", -0.5),
        ("site_inscrit_classe", -0.5), ("zppaup", -0.5), ("avap", -0.5), ("spr", -0.5),
        ("non_concerne", 0.5),
    ])),
    (C::ZonageReglementaire, Categories(&[
        ("zone_urbaine", 2.0), ("zone_a_urbaniser", 1.5), ("zone_agricole", -1.0),
        ("zone_naturelle", -1.0), ("zone_activite", -0.5), ("secteur_constructible", 1.0),
        ("secteur_non_constructible", -2.0), ("inconnu", 0.0),
    ])),
    (C::TypeProprietaire, Categories(&[("public", 2.0), ("prive", -0.5), ("mixte", 0.5), ("copropriete", -1.0)])),
    (C::Viabilisation, Categories(&[("viabilise", 1.5), ("partiellement_viabilise", 0.5), ("non_viabilise", -1.0)])),
    (C::EtatBati, Categories(&[
        ("bon_etat", 2.0), ("degradation_moyenne", 0.5), ("degradation_importante", -2.0),
        ("degradation_heterogene", -0.5),
    ])),
    (C::PresencePollution, Categories(&[("non", 1.0), ("supposee", -1.0), ("averee", -2.0), ("traitee", 0.5)])),
    (C::ValeurArchitecturale, Categories(&[("exceptionnelle", 1.0), ("interessante", 0.5), ("banale", 0.0), ("sans_interet", 0.0)])),
    (C::QualitePaysage, Categories(&[("remarquable", 0.5), ("interessante", 0.5), ("banale", 0.0), ("degradee", 0.0)])),
    (C::QualiteDesserte, Categories(&[("bonne", 1.0), ("moyenne", 0.0), ("mauvaise", -1.0)])),
];

const CULTURE_TOURISME: &[(Critere, Notation)] = &[
    (C::SurfaceSite, Seuils(&[(1_000.0, 0.5), (10_000.0, 1.0), (50_000.0, -1.0), (INF, -2.0)])),
    (C::SurfaceBatie, Seuils(&[(1.0, 0.0), (1_000.0, 1.0), (10_000.0, 1.0), (INF, -1.0)])),
    (C::DistanceTransport, Seuils(&[(500.0, 1.0), (1_500.0, 0.5), (INF, -0.5)])),
    (C::DistanceRaccordement, Seuils(&[(100.0, 1.0), (500.0, 0.5), (INF, -0.5)])),
    (C::TauxVacance, Seuils(&[(5.0, 0.5), (10.0, 0.0), (INF, -1.0)])),
    (C::RaccordementElectrique, Categories(&[("oui", 1.0), ("non", -0.5)])),
    (C::CentreVille, Categories(&[("oui", 2.0), ("non", -1.0)])),
    (C::ProximiteCommerces, Categories(&[("oui", 1.0), ("non", 0.0)])),
    (C::RisqueTechnologique, Categories(&[("oui", -2.0), ("non", 0.5)])),
    (C::TrameVerteBleue, Categories(&[("oui", 0.5), ("non", 0.0)])),
    (C::RisqueNaturel, Categories(&[("aucun", 1.0), ("faible", 0.5), ("moyen", -0.5), ("fort", -2.0)])),
    (C::ZonageEnvironnemental, Categories(&[
        ("natura2000", -1.0), ("znieff1", -0.5), ("znieff2", -0.5), ("parc_national", 0.5),
        ("parc_naturel_regional", 1.0), ("reserve_naturelle", -1.0), ("hors_zone", 0.5),
    ])),
    (C::ZonagePatrimonial, Categories(&[
        ("monument_historique", 2.0), ("perimetre_monument_historique", 1.0),
        ("site_inscrit_classe", 1.0), ("zppaup", 0.5), ("avap", 0.5), ("spr", 0.5),
        ("non_concerne", 0.0),
    ])),
    (C::ZonageReglementaire, Categories(&[
        ("zone_urbaine", 1.0), ("zone_a_urbaniser", 0.5), ("zone_agricole", -0.5),
        ("zone_naturelle", -0.5), ("zone_activite", -0.5), ("secteur_constructible", 0.5),
        ("secteur_non_constructible", -1.0), ("inconnu", 0.0),
    ])),
    (C::TypeProprietaire, Categories(&[("public", 1.0), ("prive", 0.0), ("mixte", 0.5), ("copropriete", -1.0)])),
    (C::Viabilisation, Categories(&[("viabilise", 1.0), ("partiellement_viabilise", 0.5), ("non_viabilise", -0.5)])),
    (C::EtatBati, Categories(&[
        ("bon_etat", 2.0), ("degradation_moyenne", 1.0), ("degradation_importante", -1.0),
        ("degradation_heterogene", 0.0),
    ])),
    (C::PresencePollution, Categories(&[("non", 1.0), ("supposee", -0.5), ("averee", -1.5), ("traitee", 0.5)])),
    (C::ValeurArchitecturale, Categories(&[("exceptionnelle", 2.0), ("interessante", 1.0), ("banale", -0.5), ("sans_interet", -1.0)])),
    (C::QualitePaysage, Categories(&[("remarquable", 2.0), ("interessante", 1.0), ("banale", -0.5), ("degradee", -1.0)])),
    (C::QualiteDesserte, Categories(&[("bonne", 1.0), ("moyenne", 0.0), ("mauvaise", -1.0)])),
];

const TERTIAIRE: &[(Critere, Notation)] = &[
    (C::SurfaceSite, Seuils(&[(1_000.0, 0.0), (10_000.0, 2.0), (50_000.0, -1.0), (INF, -2.0)])),
    (C::SurfaceBatie, Seuils(&[(1.0, 0.0), (1_000.0, 1.0), (10_000.0, 2.0), (INF, -1.0)])),
    (C::DistanceTransport, Seuils(&[(500.0, 2.0), (1_500.0, 0.5), (INF, -2.0)])),
    (C::DistanceRaccordement, Seuils(&[(100.0, 1.0), (500.0, 0.5), (INF, -1.0)])),
    (C::TauxVacance, Seuils(&[(5.0, 1.0), (10.0, -0.5), (INF, -2.0)])),
    (C::RaccordementElectrique, Categories(&[("oui", 1.0), ("non", -1.0)])),
    (C::CentreVille, Categories(&[("oui", 2.0), ("non", -1.0)])),
    (C::ProximiteCommerces, Categories(&[("oui", 1.5), ("non", -1.0)])),
    (C::RisqueTechnologique, Categories(&[("oui", -1.0), ("non", 0.5)])),
    (C::TrameVerteBleue, Categories(&[("oui", -1.0), ("non", 0.5)])),
    (C::RisqueNaturel, Categories(&[("aucun", 1.0), ("faible", 0.5), ("moyen", -1.0), ("fort", -2.0)])),
    (C::ZonageEnvironnemental, Categories(&[
        ("natura2000", -2.0), ("znieff1", -1.0), ("znieff2", -0.5), ("parc_national", -2.0),
        ("parc_naturel_regional", -1.0), ("reserve_naturelle", -2.0), ("hors_zone", 1.0),
    ])),
    (C::ZonagePatrimonial, Categories(&[
        ("monument_historique", -1.0), ("perimetre_monument_historique", -0.5),
        ("site_inscrit_classe", -0.5), ("zppaup", -0.5), ("avap", -0.5), ("spr", -0.5),
        ("non_concerne", 0.5),
    ])),
    (C::ZonageReglementaire, Categories(&[
        ("zone_urbaine", 2.0), ("zone_a_urbaniser", 1.5), ("zone_agricole", -2.0),
        ("zone_naturelle", -2.0), ("zone_activite", 1.0), ("secteur_constructible", 1.0),
        ("secteur_non_constructible", -2.0), ("inconnu", 0.0),
    ])),
    (C::TypeProprietaire, Categories(&[("public", 0.5), ("prive", 1.0), ("mixte", 0.0), ("copropriete", -1.0)])),
    (C::Viabilisation, Categories(&[("viabilise", 1.5), ("partiellement_viabilise", 0.5), ("non_viabilise", -1.0)])),
    (C::EtatBati, Categories(&[
        ("bon_etat", 2.0), ("degradation_moyenne", 0.5), ("degradation_importante", -2.0),
        ("degradation_heterogene", -0.5),
    ])),
    (C::PresencePollution, Categories(&[("non", 1.0), ("supposee", -0.5), ("averee", -1.5), ("traitee", 0.5)])),
    (C::ValeurArchitecturale, Categories(&[("exceptionnelle", 0.5), ("interessante", 0.5), ("banale", 0.0), ("sans_interet", 0.0)])),
    (C::QualitePaysage, Categories(&[("remarquable", 0.5), ("interessante", 0.5), ("banale", 0.0), ("degradee", -0.5)])),
    (C::QualiteDesserte, Categories(&[("bonne", 1.5), ("moyenne", 0.0), ("mauvaise", -1.5)])),
];

const INDUSTRIE_ARTISANAT: &[(Critere, Notation)] = &[
    (C::SurfaceSite, Seuils(&[(1_000.0, -2.0), (10_000.0, -1.0), (50_000.0, 2.0), (INF, 2.0)])),
    (C::SurfaceBatie, Seuils(&[(1.0, 1.0), (1_000.0, 0.5), (10_000.0, 2.0), (INF, 1.0)])),
    (C::DistanceTransport, Seuils(&[(500.0, 0.5), (1_500.0, 0.5), (INF, 0.0)])),
    (C::DistanceRaccordement, Seuils(&[(100.0, 2.0), (500.0, 1.0), (INF, -2.0)])),
    (C::TauxVacance, Seuils(&[(5.0, 0.5), (10.0, 0.0), (INF, -0.5)])),
    (C::RaccordementElectrique, Categories(&[("oui", 2.0), ("non", -2.0)])),
    (C::CentreVille, Categories(&[("oui", -2.0), ("non", 1.0)])),
    (C::ProximiteCommerces, NonPondere),
    (C::RisqueTechnologique, Categories(&[("oui", 1.0), ("non", 0.0)])),
    (C::TrameVerteBleue, Categories(&[("oui", -2.0), ("non", 0.5)])),
    (C::RisqueNaturel, Categories(&[("aucun", 1.0), ("faible", 0.5), ("moyen", -0.5), ("fort", -2.0)])),
    (C::ZonageEnvironnemental, Categories(&[
        ("natura2000", -2.0), ("znieff1", -2.0), ("znieff2", -1.0), ("parc_national", -2.0),
        ("parc_naturel_regional", -1.0), ("reserve_naturelle", -2.0), ("hors_zone", 1.0),
    ])),
    (C::ZonagePatrimonial, Categories(&[
        ("monument_historique", -2.0), ("perimetre_monument_historique", -1.0),
        ("site_inscrit_classe", -1.0), ("zppaup", -1.0), ("avap", -1.0), ("spr", -1.0),
        ("non_concerne", 0.5),
    ])),
    (C::ZonageReglementaire, Categories(&[
        ("zone_urbaine", 1.0), ("zone_a_urbaniser", 1.0), ("zone_agricole", -1.0),
        ("zone_naturelle", -2.0), ("zone_activite", 2.0), ("secteur_constructible", 0.5),
        ("secteur_non_constructible", -2.0), ("inconnu", 0.0),
    ])),
    (C::TypeProprietaire, Categories(&[("public", 0.5), ("prive", 1.0), ("mixte", 0.0), ("copropriete", -1.0)])),
    (C::Viabilisation, Categories(&[("viabilise", 1.5), ("partiellement_viabilise", 0.5), ("non_viabilise", -1.0)])),
    (C::EtatBati, Categories(&[
        ("bon_etat", 1.0), ("degradation_moyenne", 0.5), ("degradation_importante", -1.0),
        ("degradation_heterogene", 0.0),
    ])),
    (C::PresencePollution, Categories(&[("non", 0.5), ("supposee", 0.0), ("averee", -0.5), ("traitee", 0.5)])),
    (C::ValeurArchitecturale, Categories(&[("exceptionnelle", -1.0), ("interessante", -0.5), ("banale", 0.5), ("sans_interet", 0.5)])),
    (C::QualitePaysage, Categories(&[("remarquable", -1.0), ("interessante", -0.5), ("banale", 0.5), ("degradee", 0.5)])),
    (C::QualiteDesserte, Categories(&[("bonne", 2.0), ("moyenne", 0.0), ("mauvaise", -2.0)])),
];

const RENATURATION: &[(Critere, Notation)] = &[
    (C::SurfaceSite, Seuils(&[(1_000.0, -1.0), (10_000.0, 0.5), (50_000.0, 1.0), (INF, 2.0)])),
    (C::SurfaceBatie, Seuils(&[(1.0, 2.0), (1_000.0, 1.0), (10_000.0, -2.0), (INF, -2.0)])),
    (C::DistanceTransport, Seuils(&[(500.0, 0.0), (1_500.0, 0.0), (INF, 0.5)])),
    (C::DistanceRaccordement, NonPondere),
    (C::TauxVacance, Seuils(&[(5.0, -0.5), (10.0, 0.5), (INF, 2.0)])),
    (C::RaccordementElectrique, NonPondere),
    (C::CentreVille, Categories(&[("oui", 1.0), ("non", 0.5)])),
    (C::ProximiteCommerces, NonPondere),
    (C::RisqueTechnologique, Categories(&[("oui", 0.5), ("non", 0.0)])),
    (C::TrameVerteBleue, Categories(&[("oui", 2.0), ("non", 0.0)])),
    (C::RisqueNaturel, Categories(&[("aucun", 0.0), ("faible", 0.5), ("moyen", 1.0), ("fort", 2.0)])),
    (C::ZonageEnvironnemental, Categories(&[
        ("natura2000", 2.0), ("znieff1", 1.5), ("znieff2", 1.0), ("parc_national", 2.0),
        ("parc_naturel_regional", 1.0), ("reserve_naturelle", 2.0), ("hors_zone", 0.0),
    ])),
    (C::ZonagePatrimonial, Categories(&[
        ("monument_historique", -0.5), ("perimetre_monument_historique", 0.0),
        ("site_inscrit_classe", 0.0), ("zppaup", 0.0), ("avap", 0.0), ("spr", 0.0),
        ("non_concerne", 0.0),
    ])),
    (C::ZonageReglementaire, Categories(&[
        ("zone_urbaine", -0.5), ("zone_a_urbaniser", -0.5), ("zone_agricole", 1.0),
        ("zone_naturelle", 2.0), ("zone_activite", -0.5), ("secteur_constructible", 0.0),
        ("secteur_non_constructible", 1.5), ("inconnu", 0.0),
    ])),
    (C::TypeProprietaire, Categories(&[("public", 2.0), ("prive", -0.5), ("mixte", 0.5), ("copropriete", -1.0)])),
    (C::Viabilisation, Categories(&[("viabilise", -0.5), ("partiellement_viabilise", 0.0), ("non_viabilise", 1.0)])),
    (C::EtatBati, Categories(&[
        ("bon_etat", -1.0), ("degradation_moyenne", 0.0), ("degradation_importante", 2.0),
        ("degradation_heterogene", 1.0),
    ])),
    (C::PresencePollution, Categories(&[("non", 0.5), ("supposee", 0.0), ("averee", -1.0), ("traitee", 0.5)])),
    (C::ValeurArchitecturale, Categories(&[("exceptionnelle", -1.0), ("interessante", -0.5), ("banale", 0.5), ("sans_interet", 1.0)])),
    (C::QualitePaysage, Categories(&[("remarquable", 1.0), ("interessante", 0.5), ("banale", 0.0), ("degradee", 1.0)])),
    (C::QualiteDesserte, NonPondere),
];

const PHOTOVOLTAIQUE_SOL: &[(Critere, Notation)] = &[
    (C::SurfaceSite, Seuils(&[(1_000.0, -2.0), (10_000.0, -1.0), (50_000.0, 1.0), (INF, 2.0)])),
    (C::SurfaceBatie, Seuils(&[(1.0, 2.0), (1_000.0, 0.5), (10_000.0, -1.0), (INF, -2.0)])),
    (C::DistanceTransport, Seuils(&[(500.0, 0.0), (1_500.0, 0.0), (INF, 0.5)])),
    (C::DistanceRaccordement, Seuils(&[(100.0, 2.0), (500.0, 1.0), (INF, -2.0)])),
    (C::TauxVacance, Seuils(&[(5.0, 0.0), (10.0, 0.5), (INF, 1.0)])),
    (C::RaccordementElectrique, Categories(&[("oui", 2.0), ("non", -2.0)])),
    (C::CentreVille, Categories(&[("oui", -2.0), ("non", 1.0)])),
    (C::ProximiteCommerces, NonPondere),
    (C::RisqueTechnologique, Categories(&[("oui", 1.0), ("non", 0.0)])),
    (C::TrameVerteBleue, Categories(&[("oui", -1.0), ("non", 0.5)])),
    (C::RisqueNaturel, Categories(&[("aucun", 0.5), ("faible", 0.5), ("moyen", -0.5), ("fort", -1.0)])),
    (C::ZonageEnvironnemental, Categories(&[
        ("natura2000", -2.0), ("znieff1", -1.0), ("znieff2", -0.5), ("parc_national", -2.0),
        ("parc_naturel_regional", -1.0), ("reserve_naturelle", -2.0), ("hors_zone", 1.0),
    ])),
    (C::ZonagePatrimonial, Categories(&[
        ("monument_historique", -2.0), ("perimetre_monument_historique", -1.5),
        ("site_inscrit_classe", -1.5), ("zppaup", -1.0), ("avap", -1.0), ("spr", -1.0),
        ("non_concerne", 0.5),
    ])),
    (C::ZonageReglementaire, Categories(&[
        ("zone_urbaine", -1.0), ("zone_a_urbaniser", -0.5), ("zone_agricole", 1.0),
        ("zone_naturelle", -0.5), ("zone_activite", 1.5), ("secteur_constructible", 0.0),
        ("secteur_non_constructible", 1.0), ("inconnu", 0.0),
    ])),
    (C::TypeProprietaire, Categories(&[("public", 1.0), ("prive", 0.5), ("mixte", 0.0), ("copropriete", -1.0)])),
    (C::Viabilisation, Categories(&[("viabilise", 0.5), ("partiellement_viabilise", 0.0), ("non_viabilise", 0.0)])),
    (C::EtatBati, Categories(&[
        ("bon_etat", -1.0), ("degradation_moyenne", 0.0), ("degradation_importante", 1.0),
        ("degradation_heterogene", 0.5),
    ])),
    (C::PresencePollution, Categories(&[("non", 1.0), ("supposee", 0.5), ("averee", 0.5), ("traitee", 0.5)])),
    (C::ValeurArchitecturale, Categories(&[("exceptionnelle", -1.0), ("interessante", -0.5), ("banale", 0.5), ("sans_interet", 1.0)])),
    (C::QualitePaysage, Categories(&[("remarquable", -1.0), ("interessante", -0.5), ("banale", 0.5), ("degradee", 1.0)])),
    (C::QualiteDesserte, Categories(&[("bonne", 0.5), ("moyenne", 0.0), ("mauvaise", -0.5)])),
];

/// Per-criterion weight; 1 unless listed here
pub fn poids(critere: Critere) -> f64 {
    match critere {
        Critere::PresencePollution => 2.0,
        Critere::ZonageReglementaire => 1.5,
        Critere::RisqueNaturel => 1.5,
        _ => 1.0,
    }
}

pub struct Bareme {
    table: HashMap<(Usage, Critere), &'static Notation>,
}

impl Bareme {
    /// The process-wide scoring table
    pub fn global() -> &'static Bareme {
        static BAREME: OnceLock<Bareme> = OnceLock::new();
        BAREME.get_or_init(Bareme::charger)
    }

    fn charger() -> Self {
        let mut table = HashMap::new();
        let par_usage: [(Usage, &'static [(Critere, Notation)]); 7] = [
            (Usage::ResidentielMixte, RESIDENTIEL_MIXTE),
            (Usage::EquipementsPublics, EQUIPEMENTS_PUBLICS),
            (Usage::CultureTourisme, CULTURE_TOURISME),
            (Usage::Tertiaire, TERTIAIRE),
            (Usage::IndustrieArtisanat, INDUSTRIE_ARTISANAT),
            (Usage::Renaturation, RENATURATION),
            (Usage::PhotovoltaiqueSol, PHOTOVOLTAIQUE_SOL),
        ];
        for (usage, entries) in par_usage {
            for (critere, notation) in entries {
                table.insert((usage, *critere), notation);
            }
        }
        Self { table }
    }

    /// Startup validation: every usage × criterion pair has an entry, every
    /// bucket list is well-formed, every categorical entry covers the full
    /// key set of its criterion.
    pub fn verifier_exhaustivite(&self) -> Result<(), String> {
        for usage in Usage::ALL {
            for critere in Critere::ALL {
                let Some(notation) = self.table.get(&(usage, critere)).copied() else {
                    return Err(format!(
                        "missing scoring entry for {} × {}",
                        usage.as_str(),
                        critere.as_str()
                    ));
                };
                match notation {
                    Notation::Seuils(buckets) => {
                        if buckets.is_empty() || buckets[buckets.len() - 1].0 != INF {
                            return Err(format!(
                                "bucket list for {} × {} must end with an unbounded bucket",
                                usage.as_str(),
                                critere.as_str()
                            ));
                        }
                    }
                    Notation::Categories(entries) => {
                        for key in critere.cles_attendues() {
                            if !entries.iter().any(|(k, _)| k == key) {
                                return Err(format!(
                                    "scoring entry for {} × {} misses key '{}'",
                                    usage.as_str(),
                                    critere.as_str(),
                                    key
                                ));
                            }
                        }
                    }
                    Notation::NonPondere => {}
                }
            }
        }
        Ok(())
    }

    /// Weighted contribution of one populated criterion for one usage.
    /// An unknown categorical key contributes nothing, like the unweighted
    /// default.
    pub fn contribution(&self, usage: Usage, critere: Critere, valeur: &ValeurCritere) -> f64 {
        let Some(notation) = self.table.get(&(usage, critere)).copied() else {
            return 0.0;
        };
        score_brut(notation, valeur) * poids(critere)
    }
}

fn score_brut(notation: &Notation, valeur: &ValeurCritere) -> f64 {
    match (notation, valeur) {
        (Notation::Seuils(buckets), ValeurCritere::Nombre(x)) => buckets
            .iter()
            .find(|(borne, _)| *x < *borne)
            .map(|(_, score)| *score)
            .unwrap_or(0.0),
        (Notation::Categories(entries), ValeurCritere::Categorie(key)) => entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, score)| *score)
            .unwrap_or(0.0),
        _ => 0.0,
    }
}
