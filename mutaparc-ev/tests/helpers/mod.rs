//! Shared test helpers: stub sources and database utilities
//!
//! Stubs implement the source traits with canned outcomes so the
//! orchestrators run without network access.

#![allow(dead_code)]

use async_trait::async_trait;
use mutaparc_ev::models::parcelle::GeoPoint;
use mutaparc_ev::sources::{
    AnnuaireSource, BatimentSource, CadastreSource, CommercesSource, FeatureProps, FeatureSet,
    NatureSource, ParcelleCadastrale, PatrimoineSource, Raccordement, RaccordementSource,
    RisquesSource, SecteurCc, SourceError, Sources, TransportSource, UrbanismeSource,
    VacanceSource, ZonePlu,
};
use sqlx::SqlitePool;
use std::sync::Arc;

pub const ID_CADASTRAL: &str = "76231000AB0042";

pub fn down() -> SourceError {
    SourceError::Api("stub: source down".to_string())
}

pub fn feature(kind: &str, name: &str) -> FeatureSet {
    FeatureSet::from_features(vec![FeatureProps {
        kind: Some(kind.to_string()),
        name: Some(name.to_string()),
    }])
}

pub fn parcelle_cadastrale() -> ParcelleCadastrale {
    ParcelleCadastrale {
        id_cadastral: ID_CADASTRAL.to_string(),
        code_insee: "76231".to_string(),
        commune: "Saint-Wandrille-Rançon".to_string(),
        contenance_m2: Some(42_780.0),
        contour: vec![
            GeoPoint::new(0.76, 49.52),
            GeoPoint::new(0.77, 49.52),
            GeoPoint::new(0.77, 49.53),
        ],
    }
}

// ============================================================================
// Stubs
// ============================================================================

pub struct StubCadastre {
    pub result: Result<Option<ParcelleCadastrale>, SourceError>,
}

#[async_trait]
impl CadastreSource for StubCadastre {
    fn source_name(&self) -> &'static str {
        "API Carto Cadastre"
    }
    async fn parcelle(&self, _id: &str) -> Result<Option<ParcelleCadastrale>, SourceError> {
        self.result.clone()
    }
}

pub struct StubBatiments(pub Result<Option<f64>, SourceError>);

#[async_trait]
impl BatimentSource for StubBatiments {
    fn source_name(&self) -> &'static str {
        "BDNB"
    }
    async fn surface_batie(&self, _id: &str) -> Result<Option<f64>, SourceError> {
        self.0.clone()
    }
}

pub struct StubRaccordement(pub Result<Raccordement, SourceError>);

#[async_trait]
impl RaccordementSource for StubRaccordement {
    fn source_name(&self) -> &'static str {
        "Enedis Open Data"
    }
    async fn raccordement(&self, _point: &GeoPoint) -> Result<Raccordement, SourceError> {
        self.0.clone()
    }
}

pub struct StubTransports(pub Result<Option<f64>, SourceError>);

#[async_trait]
impl TransportSource for StubTransports {
    fn source_name(&self) -> &'static str {
        "transport.data.gouv.fr"
    }
    async fn distance_arret(&self, _point: &GeoPoint) -> Result<Option<f64>, SourceError> {
        self.0.clone()
    }
}

pub struct StubAnnuaire(pub Result<Option<GeoPoint>, SourceError>);

#[async_trait]
impl AnnuaireSource for StubAnnuaire {
    fn source_name(&self) -> &'static str {
        "Annuaire de l'Administration"
    }
    async fn mairie(&self, _code_insee: &str) -> Result<Option<GeoPoint>, SourceError> {
        self.0.clone()
    }
}

pub struct StubCommerces(pub Result<bool, SourceError>);

#[async_trait]
impl CommercesSource for StubCommerces {
    fn source_name(&self) -> &'static str {
        "INSEE BPE"
    }
    async fn commerces_a_proximite(&self, _point: &GeoPoint) -> Result<bool, SourceError> {
        self.0.clone()
    }
}

pub struct StubVacance(pub Result<Option<f64>, SourceError>);

#[async_trait]
impl VacanceSource for StubVacance {
    fn source_name(&self) -> &'static str {
        "LOVAC"
    }
    async fn taux_vacance(&self, _code_insee: &str) -> Result<Option<f64>, SourceError> {
        self.0.clone()
    }
}

pub struct StubRisques {
    pub mouvements: Result<FeatureSet, SourceError>,
    pub catnat: Result<u32, SourceError>,
    pub inondation: Result<FeatureSet, SourceError>,
    pub sismique: Result<u8, SourceError>,
    pub cavites: Result<FeatureSet, SourceError>,
    pub icpe: Result<FeatureSet, SourceError>,
}

impl StubRisques {
    /// Every hazard answers, nothing present
    pub fn calme() -> Self {
        Self {
            mouvements: Ok(FeatureSet::empty()),
            catnat: Ok(0),
            inondation: Ok(FeatureSet::empty()),
            sismique: Ok(1),
            cavites: Ok(FeatureSet::empty()),
            icpe: Ok(FeatureSet::empty()),
        }
    }

    pub fn failing() -> Self {
        Self {
            mouvements: Err(down()),
            catnat: Err(down()),
            inondation: Err(down()),
            sismique: Err(down()),
            cavites: Err(down()),
            icpe: Err(down()),
        }
    }
}

#[async_trait]
impl RisquesSource for StubRisques {
    fn source_name(&self) -> &'static str {
        "Géorisques"
    }
    async fn mouvements_terrain(&self, _point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.mouvements.clone()
    }
    async fn catnat(&self, _code_insee: &str) -> Result<u32, SourceError> {
        self.catnat.clone()
    }
    async fn zonage_inondation(&self, _point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.inondation.clone()
    }
    async fn zonage_sismique(&self, _code_insee: &str) -> Result<u8, SourceError> {
        self.sismique.clone()
    }
    async fn cavites(&self, _point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.cavites.clone()
    }
    async fn installations_classees(
        &self,
        _point: &GeoPoint,
        _rayon_m: f64,
    ) -> Result<FeatureSet, SourceError> {
        self.icpe.clone()
    }
}

pub struct StubNature {
    pub natura2000: Result<FeatureSet, SourceError>,
    pub znieff1: Result<FeatureSet, SourceError>,
    pub znieff2: Result<FeatureSet, SourceError>,
    pub parc_national: Result<FeatureSet, SourceError>,
    pub parc_naturel_regional: Result<FeatureSet, SourceError>,
    pub reserve_naturelle: Result<FeatureSet, SourceError>,
    pub trame_verte_bleue: Result<FeatureSet, SourceError>,
}

impl StubNature {
    pub fn hors_zone() -> Self {
        Self {
            natura2000: Ok(FeatureSet::empty()),
            znieff1: Ok(FeatureSet::empty()),
            znieff2: Ok(FeatureSet::empty()),
            parc_national: Ok(FeatureSet::empty()),
            parc_naturel_regional: Ok(FeatureSet::empty()),
            reserve_naturelle: Ok(FeatureSet::empty()),
            trame_verte_bleue: Ok(FeatureSet::empty()),
        }
    }

    pub fn failing() -> Self {
        Self {
            natura2000: Err(down()),
            znieff1: Err(down()),
            znieff2: Err(down()),
            parc_national: Err(down()),
            parc_naturel_regional: Err(down()),
            reserve_naturelle: Err(down()),
            trame_verte_bleue: Err(down()),
        }
    }
}

#[async_trait]
impl NatureSource for StubNature {
    fn source_name(&self) -> &'static str {
        "API Carto Nature"
    }
    async fn natura2000(&self, _p: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.natura2000.clone()
    }
    async fn znieff1(&self, _p: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.znieff1.clone()
    }
    async fn znieff2(&self, _p: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.znieff2.clone()
    }
    async fn parc_national(&self, _p: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.parc_national.clone()
    }
    async fn parc_naturel_regional(&self, _p: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.parc_naturel_regional.clone()
    }
    async fn reserve_naturelle(&self, _p: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.reserve_naturelle.clone()
    }
    async fn trame_verte_bleue(&self, _p: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.trame_verte_bleue.clone()
    }
}

pub struct StubPatrimoine {
    pub monuments: Result<FeatureSet, SourceError>,
    pub sites: Result<FeatureSet, SourceError>,
    pub zones: Result<FeatureSet, SourceError>,
}

impl StubPatrimoine {
    pub fn non_concerne() -> Self {
        Self {
            monuments: Ok(FeatureSet::empty()),
            sites: Ok(FeatureSet::empty()),
            zones: Ok(FeatureSet::empty()),
        }
    }

    pub fn failing() -> Self {
        Self {
            monuments: Err(down()),
            sites: Err(down()),
            zones: Err(down()),
        }
    }
}

#[async_trait]
impl PatrimoineSource for StubPatrimoine {
    fn source_name(&self) -> &'static str {
        "Géoportail de l'Urbanisme"
    }
    async fn monuments_historiques(&self, _p: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.monuments.clone()
    }
    async fn sites_proteges(&self, _p: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.sites.clone()
    }
    async fn zones_patrimoniales(&self, _p: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.zones.clone()
    }
}

pub struct StubUrbanisme {
    pub zone_plu: Result<Option<ZonePlu>, SourceError>,
    pub secteur: Result<Option<SecteurCc>, SourceError>,
    pub rnu: Result<bool, SourceError>,
}

impl StubUrbanisme {
    pub fn zone_urbaine() -> Self {
        Self {
            zone_plu: Ok(Some(ZonePlu {
                libelle: "UB".to_string(),
                destination_dominante: None,
            })),
            secteur: Ok(None),
            rnu: Ok(false),
        }
    }

    pub fn failing() -> Self {
        Self {
            zone_plu: Err(down()),
            secteur: Err(down()),
            rnu: Err(down()),
        }
    }
}

#[async_trait]
impl UrbanismeSource for StubUrbanisme {
    fn source_name(&self) -> &'static str {
        "Géoportail de l'Urbanisme"
    }
    async fn zone_plu(&self, _p: &GeoPoint) -> Result<Option<ZonePlu>, SourceError> {
        self.zone_plu.clone()
    }
    async fn secteur_carte_communale(&self, _p: &GeoPoint) -> Result<Option<SecteurCc>, SourceError> {
        self.secteur.clone()
    }
    async fn commune_rnu(&self, _code_insee: &str) -> Result<bool, SourceError> {
        self.rnu.clone()
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// Every source answers with the reference parcel's values
pub fn sources_nominales() -> Sources {
    Sources {
        cadastre: Arc::new(StubCadastre {
            result: Ok(Some(parcelle_cadastrale())),
        }),
        batiments: Arc::new(StubBatiments(Ok(Some(6_600.0)))),
        raccordement: Arc::new(StubRaccordement(Ok(Raccordement {
            raccorde: true,
            distance_m: 45.0,
        }))),
        transports: Arc::new(StubTransports(Ok(Some(250.0)))),
        // Town hall right next to the centroid: urban centre
        annuaire: Arc::new(StubAnnuaire(Ok(Some(GeoPoint::new(0.7667, 49.5235))))),
        commerces: Arc::new(StubCommerces(Ok(true))),
        vacance: Arc::new(StubVacance(Ok(Some(4.2)))),
        risques: Arc::new(StubRisques::calme()),
        nature: Arc::new(StubNature::hors_zone()),
        patrimoine: Arc::new(StubPatrimoine::non_concerne()),
        urbanisme: Arc::new(StubUrbanisme::zone_urbaine()),
    }
}

/// Fully-populated enrichment result matching `sources_nominales()`,
/// usable as a deterministic cache seed.
pub fn enrichment_result_nominal() -> mutaparc_ev::models::enrichment::EnrichmentResult {
    use mutaparc_ev::models::enrichment::{EnrichmentResult, StatutEnrichissement};
    use mutaparc_ev::models::parcelle::{
        Geometrie, NiveauRisque, Parcelle, ZonageEnvironnemental, ZonagePatrimonial,
        ZonageReglementaire,
    };

    let base = parcelle_cadastrale();
    let mut parcelle = Parcelle::base(
        base.id_cadastral,
        base.code_insee,
        base.commune,
        Geometrie::from_contour(base.contour),
        base.contenance_m2,
    );
    parcelle.surface_batie = Some(6_600.0);
    parcelle.raccordement_electrique = Some(true);
    parcelle.distance_raccordement = Some(45.0);
    parcelle.distance_transport = Some(250.0);
    parcelle.centre_ville = Some(true);
    parcelle.proximite_commerces = Some(true);
    parcelle.taux_vacance = Some(4.2);
    parcelle.risque_technologique = Some(false);
    parcelle.risque_naturel = Some(NiveauRisque::Aucun);
    parcelle.zonage_environnemental = Some(ZonageEnvironnemental::HorsZone);
    parcelle.zonage_patrimonial = Some(ZonagePatrimonial::NonConcerne);
    parcelle.zonage_reglementaire = Some(ZonageReglementaire::ZoneUrbaine);
    parcelle.trame_verte_bleue = Some(false);

    EnrichmentResult {
        enrichment_id: uuid::Uuid::new_v4(),
        source_enrichment_id: None,
        parcelle,
        statut: StatutEnrichissement::Success,
        sources_utilisees: [
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
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        sources_echouees: vec![],
        champs_manquants: vec![],
        fiabilite: 10.0,
    }
}

pub async fn test_pool() -> (SqlitePool, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let pool = mutaparc_ev::db::init_database_pool(&dir.path().join("test.db"))
        .await
        .unwrap();
    (pool, dir)
}
