//! Upstream geodata/registry sources
//!
//! One reqwest client per upstream provider, each fronted by an async trait
//! so orchestrators can run against mocks in tests. Every call either
//! returns typed data or a `SourceError`; failures never escape an
//! orchestrator boundary, they are converted into source-attribution
//! bookkeeping there.

pub mod annuaire;
pub mod bdnb;
pub mod cadastre;
pub mod commerces;
pub mod enedis;
pub mod georisques;
pub mod lovac;
pub mod nature;
pub mod patrimoine;
pub mod transport;
pub mod urbanisme;

use crate::models::parcelle::GeoPoint;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error from one upstream call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream API returned a non-success status or an error payload
    #[error("API error: {0}")]
    Api(String),

    /// Failed to parse the upstream response
    #[error("Parse error: {0}")]
    Parse(String),

    /// The source has no data for this query
    #[error("No data: {0}")]
    NotAvailable(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::Network(e.to_string())
    }
}

/// Raw spatial sub-result: feature presence over the queried footprint
///
/// `present` is a stored field, not derived from `count`: some providers
/// return inconsistent envelopes (`present=true` with zero features) and the
/// priority rules downstream honor `present` alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub present: bool,
    pub count: u32,
    pub features: Vec<FeatureProps>,
}

/// Free-text properties kept per feature for keyword classification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProps {
    pub kind: Option<String>,
    pub name: Option<String>,
}

impl FeatureSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_features(features: Vec<FeatureProps>) -> Self {
        Self {
            present: !features.is_empty(),
            count: features.len() as u32,
            features,
        }
    }
}

// ============================================================================
// GeoJSON envelope shared by the API Carto / GPU / Géorisques clients
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Feature {
    #[serde(default)]
    pub properties: serde_json::Value,
}

/// Collapse a GeoJSON collection into a `FeatureSet`, extracting the first
/// matching property of each key list as the free-text discriminators.
pub(crate) fn collapse_collection(
    fc: FeatureCollection,
    kind_keys: &[&str],
    name_keys: &[&str],
) -> FeatureSet {
    let features = fc
        .features
        .into_iter()
        .map(|f| FeatureProps {
            kind: first_string(&f.properties, kind_keys),
            name: first_string(&f.properties, name_keys),
        })
        .collect();
    FeatureSet::from_features(features)
}

fn first_string(properties: &serde_json::Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| properties.get(k).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}

// ============================================================================
// HTTP plumbing
// ============================================================================

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("mutaparc/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .expect("Failed to build HTTP client (system error)")
}

pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, SourceError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Api(format!("upstream returned {}", status)));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| SourceError::Parse(e.to_string()))
}

pub(crate) type DirectRateLimiter = governor::RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

pub(crate) fn per_second(quota: u32) -> DirectRateLimiter {
    // Safe: callers pass non-zero literals
    let quota = governor::Quota::per_second(std::num::NonZeroU32::new(quota).unwrap());
    governor::RateLimiter::direct(quota)
}

// ============================================================================
// Source traits (one per upstream provider)
// ============================================================================

/// Cadastral base record for a parcel
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelleCadastrale {
    pub id_cadastral: String,
    pub code_insee: String,
    pub commune: String,
    /// Cadastral contenance in m²
    pub contenance_m2: Option<f64>,
    /// Exterior ring, WGS84
    pub contour: Vec<GeoPoint>,
}

/// Mandatory parcel lookup (IGN API Carto, cadastre module)
#[async_trait]
pub trait CadastreSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// `Ok(None)` when the identifier matches no parcel
    async fn parcelle(&self, id_cadastral: &str) -> Result<Option<ParcelleCadastrale>, SourceError>;
}

/// National building registry: built footprint on the parcel
#[async_trait]
pub trait BatimentSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn surface_batie(&self, id_cadastral: &str) -> Result<Option<f64>, SourceError>;
}

/// Grid-connection registry answer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raccordement {
    pub raccorde: bool,
    pub distance_m: f64,
}

#[async_trait]
pub trait RaccordementSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn raccordement(&self, point: &GeoPoint) -> Result<Raccordement, SourceError>;
}

/// Public-transport stop distance
#[async_trait]
pub trait TransportSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn distance_arret(&self, point: &GeoPoint) -> Result<Option<f64>, SourceError>;
}

/// Administration directory: town-hall location for a municipality
#[async_trait]
pub trait AnnuaireSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn mairie(&self, code_insee: &str) -> Result<Option<GeoPoint>, SourceError>;
}

/// Commerce/services proximity
#[async_trait]
pub trait CommercesSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn commerces_a_proximite(&self, point: &GeoPoint) -> Result<bool, SourceError>;
}

/// Municipal housing vacancy registry
#[async_trait]
pub trait VacanceSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn taux_vacance(&self, code_insee: &str) -> Result<Option<f64>, SourceError>;
}

/// Géorisques hazard endpoints
#[async_trait]
pub trait RisquesSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn mouvements_terrain(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
    /// Number of CatNat (post-disaster compensation) orders for the commune
    async fn catnat(&self, code_insee: &str) -> Result<u32, SourceError>;
    async fn zonage_inondation(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
    /// Seismic zone, 1 (very low) to 5 (high)
    async fn zonage_sismique(&self, code_insee: &str) -> Result<u8, SourceError>;
    async fn cavites(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
    /// Classified installations (ICPE) within the given radius
    async fn installations_classees(
        &self,
        point: &GeoPoint,
        rayon_m: f64,
    ) -> Result<FeatureSet, SourceError>;
}

/// Nature zonings (IGN API Carto, nature module)
#[async_trait]
pub trait NatureSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn natura2000(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
    async fn znieff1(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
    async fn znieff2(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
    async fn parc_national(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
    async fn parc_naturel_regional(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
    async fn reserve_naturelle(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
    /// Green/blue ecological corridor (SRCE)
    async fn trame_verte_bleue(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
}

/// Heritage servitudes (Géoportail de l'Urbanisme)
#[async_trait]
pub trait PatrimoineSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// AC1: historic monuments and their protection perimeters
    async fn monuments_historiques(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
    /// AC2: inscribed/classified sites
    async fn sites_proteges(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
    /// AC4: heritage protection areas (ZPPAUP / AVAP / SPR)
    async fn zones_patrimoniales(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError>;
}

/// Local land-use-plan zone covering a point
#[derive(Debug, Clone, PartialEq)]
pub struct ZonePlu {
    /// Zone code, e.g. "UB", "AUc", "N"
    pub libelle: String,
    /// Dominant destination free text, when the plan carries one
    pub destination_dominante: Option<String>,
}

/// Simplified municipal-map sector covering a point
#[derive(Debug, Clone, PartialEq)]
pub struct SecteurCc {
    /// Free-text sector descriptor
    pub libelle: String,
}

/// Urban-planning zonings (Géoportail de l'Urbanisme)
#[async_trait]
pub trait UrbanismeSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn zone_plu(&self, point: &GeoPoint) -> Result<Option<ZonePlu>, SourceError>;
    async fn secteur_carte_communale(
        &self,
        point: &GeoPoint,
    ) -> Result<Option<SecteurCc>, SourceError>;
    /// Whether the municipality has no local plan (national rules, RNU)
    async fn commune_rnu(&self, code_insee: &str) -> Result<bool, SourceError>;
}

/// The full adapter set the orchestrators fan out to
#[derive(Clone)]
pub struct Sources {
    pub cadastre: Arc<dyn CadastreSource>,
    pub batiments: Arc<dyn BatimentSource>,
    pub raccordement: Arc<dyn RaccordementSource>,
    pub transports: Arc<dyn TransportSource>,
    pub annuaire: Arc<dyn AnnuaireSource>,
    pub commerces: Arc<dyn CommercesSource>,
    pub vacance: Arc<dyn VacanceSource>,
    pub risques: Arc<dyn RisquesSource>,
    pub nature: Arc<dyn NatureSource>,
    pub patrimoine: Arc<dyn PatrimoineSource>,
    pub urbanisme: Arc<dyn UrbanismeSource>,
}

impl Sources {
    /// Wire the production clients against the public endpoints
    pub fn production(timeout: Duration) -> Self {
        Self {
            cadastre: Arc::new(cadastre::CadastreClient::new(timeout)),
            batiments: Arc::new(bdnb::BdnbClient::new(timeout)),
            raccordement: Arc::new(enedis::EnedisClient::new(timeout)),
            transports: Arc::new(transport::TransportClient::new(timeout)),
            annuaire: Arc::new(annuaire::AnnuaireClient::new(timeout)),
            commerces: Arc::new(commerces::BpeClient::new(timeout)),
            vacance: Arc::new(lovac::LovacClient::new(timeout)),
            risques: Arc::new(georisques::GeorisquesClient::new(timeout)),
            nature: Arc::new(nature::NatureClient::new(timeout)),
            patrimoine: Arc::new(patrimoine::PatrimoineClient::new(timeout)),
            urbanisme: Arc::new(urbanisme::UrbanismeClient::new(timeout)),
        }
    }
}
