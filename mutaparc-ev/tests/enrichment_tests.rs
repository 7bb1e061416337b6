// Enrichment pipeline integration tests
//
// Stub-driven scenarios against the orchestrator: nominal full success,
// per-domain partial failures, the all-zonage-down case, the mandatory
// cadastre failure and the cache short-circuit.

mod helpers;

use helpers::*;
use mutaparc_ev::db;
use mutaparc_ev::enrichment::{EnrichError, EnrichmentOrchestrator};
use mutaparc_ev::models::enrichment::StatutEnrichissement;
use mutaparc_ev::models::parcelle::{
    NiveauRisque, ZonageEnvironnemental, ZonagePatrimonial, ZonageReglementaire,
};
use std::sync::Arc;

#[tokio::test]
async fn nominal_enrichment_populates_every_field() {
    let (pool, _dir) = test_pool().await;
    let orchestrator = EnrichmentOrchestrator::new(sources_nominales(), pool, 24);

    let result = orchestrator.enrich(ID_CADASTRAL).await.unwrap();

    assert_eq!(result.statut, StatutEnrichissement::Success);
    assert_eq!(result.fiabilite, 10.0);
    assert!(result.sources_echouees.is_empty());
    assert!(result.champs_manquants.is_empty());
    assert!(result.source_enrichment_id.is_none());

    let p = &result.parcelle;
    assert_eq!(p.id_cadastral, ID_CADASTRAL);
    assert_eq!(p.code_insee, "76231");
    assert_eq!(p.surface_site, Some(42_780.0));
    assert_eq!(p.surface_batie, Some(6_600.0));
    assert_eq!(p.raccordement_electrique, Some(true));
    assert_eq!(p.distance_raccordement, Some(45.0));
    assert_eq!(p.distance_transport, Some(250.0));
    assert_eq!(p.centre_ville, Some(true));
    assert_eq!(p.proximite_commerces, Some(true));
    assert_eq!(p.taux_vacance, Some(4.2));
    assert_eq!(p.risque_technologique, Some(false));
    assert_eq!(p.risque_naturel, Some(NiveauRisque::Aucun));
    assert_eq!(p.zonage_environnemental, Some(ZonageEnvironnemental::HorsZone));
    assert_eq!(p.zonage_patrimonial, Some(ZonagePatrimonial::NonConcerne));
    assert_eq!(p.zonage_reglementaire, Some(ZonageReglementaire::ZoneUrbaine));
    assert_eq!(p.trame_verte_bleue, Some(false));

    // Every populated field has its provider in the used list
    for source in [
        "API Carto Cadastre",
        "BDNB",
        "Enedis Open Data",
        "transport.data.gouv.fr",
        "Annuaire de l'Administration",
        "INSEE BPE",
        "LOVAC",
        "Géorisques",
        "API Carto Nature",
        "Géoportail de l'Urbanisme",
    ] {
        assert!(
            result.sources_utilisees.iter().any(|s| s == source),
            "missing source attribution: {}",
            source
        );
    }
    // The GPU serves both heritage and regulatory queries: one entry
    assert_eq!(
        result
            .sources_utilisees
            .iter()
            .filter(|s| s.as_str() == "Géoportail de l'Urbanisme")
            .count(),
        1
    );
}

#[tokio::test]
async fn missing_cadastre_aborts_the_pipeline() {
    let (pool, _dir) = test_pool().await;
    let mut sources = sources_nominales();
    sources.cadastre = Arc::new(StubCadastre { result: Ok(None) });
    let orchestrator = EnrichmentOrchestrator::new(sources, pool, 24);

    let err = orchestrator.enrich(ID_CADASTRAL).await.unwrap_err();
    assert!(matches!(err, EnrichError::CadastreIntrouvable(_)));
}

#[tokio::test]
async fn cadastre_adapter_failure_is_also_fatal() {
    let (pool, _dir) = test_pool().await;
    let mut sources = sources_nominales();
    sources.cadastre = Arc::new(StubCadastre { result: Err(down()) });
    let orchestrator = EnrichmentOrchestrator::new(sources, pool, 24);

    assert!(matches!(
        orchestrator.enrich(ID_CADASTRAL).await,
        Err(EnrichError::CadastreIntrouvable(_))
    ));
}

#[tokio::test]
async fn all_zonage_evaluators_down() {
    let (pool, _dir) = test_pool().await;
    let mut sources = sources_nominales();
    sources.nature = Arc::new(StubNature::failing());
    sources.patrimoine = Arc::new(StubPatrimoine::failing());
    sources.urbanisme = Arc::new(StubUrbanisme::failing());
    let orchestrator = EnrichmentOrchestrator::new(sources, pool, 24);

    let result = orchestrator.enrich(ID_CADASTRAL).await.unwrap();

    assert_ne!(result.statut, StatutEnrichissement::Success);
    assert_eq!(result.parcelle.zonage_environnemental, None);
    assert_eq!(result.parcelle.zonage_patrimonial, None);
    assert_eq!(result.parcelle.zonage_reglementaire, None);
    assert_eq!(result.parcelle.trame_verte_bleue, None);
    assert!(!result.sources_echouees.is_empty());
    assert!(result
        .sources_echouees
        .iter()
        .any(|s| s == "API Carto Nature"));
    assert!(result
        .sources_echouees
        .iter()
        .any(|s| s == "Géoportail de l'Urbanisme"));
    for field in [
        "zonage_environnemental",
        "zonage_patrimonial",
        "zonage_reglementaire",
        "trame_verte_bleue",
    ] {
        assert!(
            result.champs_manquants.iter().any(|f| f == field),
            "missing field entry: {}",
            field
        );
    }
}

#[tokio::test]
async fn single_optional_failure_yields_partial() {
    let (pool, _dir) = test_pool().await;
    let mut sources = sources_nominales();
    sources.vacance = Arc::new(StubVacance(Err(down())));
    let orchestrator = EnrichmentOrchestrator::new(sources, pool, 24);

    let result = orchestrator.enrich(ID_CADASTRAL).await.unwrap();

    assert_eq!(result.statut, StatutEnrichissement::Partial);
    assert_eq!(result.parcelle.taux_vacance, None);
    assert_eq!(result.sources_echouees, vec!["LOVAC".to_string()]);
    assert_eq!(result.champs_manquants, vec!["taux_vacance".to_string()]);
    // 10 − 0.3 × 1, no small-source penalty
    assert_eq!(result.fiabilite, 9.7);
}

#[tokio::test]
async fn success_with_no_data_counts_as_missing_and_failed() {
    let (pool, _dir) = test_pool().await;
    let mut sources = sources_nominales();
    sources.vacance = Arc::new(StubVacance(Ok(None)));
    let orchestrator = EnrichmentOrchestrator::new(sources, pool, 24);

    let result = orchestrator.enrich(ID_CADASTRAL).await.unwrap();

    assert_eq!(result.statut, StatutEnrichissement::Partial);
    assert!(result.sources_echouees.iter().any(|s| s == "LOVAC"));
    assert!(result.champs_manquants.iter().any(|f| f == "taux_vacance"));
}

#[tokio::test]
async fn every_optional_source_down_is_a_failure() {
    let (pool, _dir) = test_pool().await;
    let mut sources = sources_nominales();
    sources.batiments = Arc::new(StubBatiments(Err(down())));
    sources.raccordement = Arc::new(StubRaccordement(Err(down())));
    sources.transports = Arc::new(StubTransports(Err(down())));
    sources.annuaire = Arc::new(StubAnnuaire(Err(down())));
    sources.commerces = Arc::new(StubCommerces(Err(down())));
    sources.vacance = Arc::new(StubVacance(Err(down())));
    sources.risques = Arc::new(StubRisques::failing());
    sources.nature = Arc::new(StubNature::failing());
    sources.patrimoine = Arc::new(StubPatrimoine::failing());
    sources.urbanisme = Arc::new(StubUrbanisme::failing());
    let orchestrator = EnrichmentOrchestrator::new(sources, pool, 24);

    let result = orchestrator.enrich(ID_CADASTRAL).await.unwrap();

    assert_eq!(result.statut, StatutEnrichissement::Failure);
    assert_eq!(result.sources_utilisees, vec!["API Carto Cadastre".to_string()]);
    // 13 missing fields, single source: 10 − 3.9 − 2
    assert_eq!(result.champs_manquants.len(), 13);
    assert_eq!(result.fiabilite, 4.1);
    // The base record still carries the mandatory cadastral data
    assert_eq!(result.parcelle.surface_site, Some(42_780.0));
}

#[tokio::test]
async fn partial_hazard_bundle_still_yields_a_level() {
    let (pool, _dir) = test_pool().await;
    let mut sources = sources_nominales();
    sources.risques = Arc::new(StubRisques {
        inondation: Ok(feature("TRI", "Vallée de Seine")),
        sismique: Err(down()),
        cavites: Err(down()),
        ..StubRisques::calme()
    });
    let orchestrator = EnrichmentOrchestrator::new(sources, pool, 24);

    let result = orchestrator.enrich(ID_CADASTRAL).await.unwrap();

    assert_eq!(result.parcelle.risque_naturel, Some(NiveauRisque::Fort));
    assert_eq!(result.statut, StatutEnrichissement::Partial);
    // Géorisques answered some queries and failed others: attributed on
    // both sides, deduplicated
    assert!(result.sources_utilisees.iter().any(|s| s == "Géorisques"));
    assert!(result.sources_echouees.iter().any(|s| s == "Géorisques"));
}

#[tokio::test]
async fn cache_hit_short_circuits_every_adapter() {
    let (pool, _dir) = test_pool().await;

    // Seed a valid cache row directly
    let seeded = enrichment_result_nominal();
    db::enrichments::save_enrichment(&pool, &seeded).await.unwrap();

    // Orchestrator whose adapters all blow up: only the cache can produce
    // a result
    let mut sources = sources_nominales();
    sources.cadastre = Arc::new(StubCadastre { result: Err(down()) });
    sources.batiments = Arc::new(StubBatiments(Err(down())));
    let orchestrator = EnrichmentOrchestrator::new(sources, pool, 24);

    let served = orchestrator.enrich(ID_CADASTRAL).await.unwrap();

    assert_eq!(served.enrichment_id, seeded.enrichment_id);
    assert_eq!(served.source_enrichment_id, Some(seeded.enrichment_id));
    assert_eq!(served.parcelle, seeded.parcelle);
    // Reliability is the cached one, not re-derived
    assert_eq!(served.fiabilite, seeded.fiabilite);
}

#[tokio::test]
async fn partial_rows_never_serve_as_cache() {
    let (pool, _dir) = test_pool().await;

    // Seed a partial row: it must not short-circuit anything
    let mut partial = enrichment_result_nominal();
    partial.statut = StatutEnrichissement::Partial;
    partial.sources_echouees = vec!["LOVAC".to_string()];
    partial.champs_manquants = vec!["taux_vacance".to_string()];
    partial.parcelle.taux_vacance = None;
    partial.fiabilite = 9.7;
    db::enrichments::save_enrichment(&pool, &partial).await.unwrap();

    // A fresh pass runs the adapters again instead of reusing the row
    let orchestrator = EnrichmentOrchestrator::new(sources_nominales(), pool, 24);
    let fresh = orchestrator.enrich(ID_CADASTRAL).await.unwrap();
    assert_eq!(fresh.statut, StatutEnrichissement::Success);
    assert_ne!(fresh.enrichment_id, partial.enrichment_id);
    assert!(fresh.source_enrichment_id.is_none());
    assert_eq!(fresh.parcelle.taux_vacance, Some(4.2));
}
