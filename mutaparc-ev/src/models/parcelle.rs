//! Normalized parcel record assembled by the enrichment pipeline

use serde::{Deserialize, Serialize};

/// WGS84 coordinate (longitude, latitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Great-circle distance to another point, in meters (haversine)
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

/// Parcel geometry: exterior ring plus derived centroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometrie {
    pub contour: Vec<GeoPoint>,
    pub centroide: GeoPoint,
}

impl Geometrie {
    /// Build a geometry from an exterior ring, deriving the centroid.
    ///
    /// Uses the shoelace centroid; degenerate rings (fewer than 3 distinct
    /// vertices, or zero signed area) fall back to the vertex mean.
    pub fn from_contour(contour: Vec<GeoPoint>) -> Self {
        let centroide = polygon_centroid(&contour).unwrap_or_else(|| vertex_mean(&contour));
        Self { contour, centroide }
    }
}

fn vertex_mean(ring: &[GeoPoint]) -> GeoPoint {
    if ring.is_empty() {
        return GeoPoint::new(0.0, 0.0);
    }
    let n = ring.len() as f64;
    GeoPoint::new(
        ring.iter().map(|p| p.lon).sum::<f64>() / n,
        ring.iter().map(|p| p.lat).sum::<f64>() / n,
    )
}

fn polygon_centroid(ring: &[GeoPoint]) -> Option<GeoPoint> {
    if ring.len() < 3 {
        return None;
    }
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let cross = a.lon * b.lat - b.lon * a.lat;
        area2 += cross;
        cx += (a.lon + b.lon) * cross;
        cy += (a.lat + b.lat) * cross;
    }
    if area2.abs() < f64::EPSILON {
        return None;
    }
    Some(GeoPoint::new(cx / (3.0 * area2), cy / (3.0 * area2)))
}

/// Aggregated natural-hazard exposure level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NiveauRisque {
    Aucun,
    Faible,
    Moyen,
    Fort,
}

impl NiveauRisque {
    pub fn as_str(&self) -> &'static str {
        match self {
            NiveauRisque::Aucun => "aucun",
            NiveauRisque::Faible => "faible",
            NiveauRisque::Moyen => "moyen",
            NiveauRisque::Fort => "fort",
        }
    }
}

/// Environmental zoning classification (fixed priority order, strongest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZonageEnvironnemental {
    Natura2000,
    Znieff1,
    Znieff2,
    ParcNational,
    ParcNaturelRegional,
    ReserveNaturelle,
    HorsZone,
}

impl ZonageEnvironnemental {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZonageEnvironnemental::Natura2000 => "natura2000",
            ZonageEnvironnemental::Znieff1 => "znieff1",
            ZonageEnvironnemental::Znieff2 => "znieff2",
            ZonageEnvironnemental::ParcNational => "parc_national",
            ZonageEnvironnemental::ParcNaturelRegional => "parc_naturel_regional",
            ZonageEnvironnemental::ReserveNaturelle => "reserve_naturelle",
            ZonageEnvironnemental::HorsZone => "hors_zone",
        }
    }
}

/// Heritage zoning classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZonagePatrimonial {
    MonumentHistorique,
    PerimetreMonumentHistorique,
    SiteInscritClasse,
    Zppaup,
    Avap,
    Spr,
    NonConcerne,
}

impl ZonagePatrimonial {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZonagePatrimonial::MonumentHistorique => "monument_historique",
            ZonagePatrimonial::PerimetreMonumentHistorique => "perimetre_monument_historique",
            ZonagePatrimonial::SiteInscritClasse => "site_inscrit_classe",
            ZonagePatrimonial::Zppaup => "zppaup",
            ZonagePatrimonial::Avap => "avap",
            ZonagePatrimonial::Spr => "spr",
            ZonagePatrimonial::NonConcerne => "non_concerne",
        }
    }
}

/// Regulatory (urban-planning) zoning classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZonageReglementaire {
    ZoneUrbaine,
    ZoneAUrbaniser,
    ZoneAgricole,
    ZoneNaturelle,
    ZoneActivite,
    SecteurConstructible,
    SecteurNonConstructible,
    Inconnu,
}

impl ZonageReglementaire {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZonageReglementaire::ZoneUrbaine => "zone_urbaine",
            ZonageReglementaire::ZoneAUrbaniser => "zone_a_urbaniser",
            ZonageReglementaire::ZoneAgricole => "zone_agricole",
            ZonageReglementaire::ZoneNaturelle => "zone_naturelle",
            ZonageReglementaire::ZoneActivite => "zone_activite",
            ZonageReglementaire::SecteurConstructible => "secteur_constructible",
            ZonageReglementaire::SecteurNonConstructible => "secteur_non_constructible",
            ZonageReglementaire::Inconnu => "inconnu",
        }
    }
}

/// Normalized parcel record
///
/// Mutated field by field during the single enrichment pass, immutable once
/// returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcelle {
    /// Cadastral identifier (IDU)
    pub id_cadastral: String,
    /// INSEE municipality code
    pub code_insee: String,
    /// Municipality name
    pub commune: String,
    /// Parcel geometry
    pub geometrie: Geometrie,

    /// Site area in m² (cadastral contenance)
    pub surface_site: Option<f64>,
    /// Built footprint area in m²
    pub surface_batie: Option<f64>,

    /// Grid connection flag
    pub raccordement_electrique: Option<bool>,
    /// Distance to the nearest substation, in meters
    pub distance_raccordement: Option<f64>,
    /// Distance to the nearest public-transport stop, in meters
    pub distance_transport: Option<f64>,

    /// Parcel sits in the municipal urban centre
    pub centre_ville: Option<bool>,
    /// Commerce/services within walking distance
    pub proximite_commerces: Option<bool>,
    /// Municipal housing vacancy rate, percent
    pub taux_vacance: Option<f64>,

    /// Technological-risk installation nearby
    pub risque_technologique: Option<bool>,
    /// Aggregated natural-hazard level
    pub risque_naturel: Option<NiveauRisque>,

    pub zonage_environnemental: Option<ZonageEnvironnemental>,
    pub zonage_patrimonial: Option<ZonagePatrimonial>,
    pub zonage_reglementaire: Option<ZonageReglementaire>,

    /// Parcel intersects a green/blue ecological corridor
    pub trame_verte_bleue: Option<bool>,
}

impl Parcelle {
    /// Fresh record carrying only the mandatory cadastral base data
    pub fn base(
        id_cadastral: String,
        code_insee: String,
        commune: String,
        geometrie: Geometrie,
        surface_site: Option<f64>,
    ) -> Self {
        Self {
            id_cadastral,
            code_insee,
            commune,
            geometrie,
            surface_site,
            surface_batie: None,
            raccordement_electrique: None,
            distance_raccordement: None,
            distance_transport: None,
            centre_ville: None,
            proximite_commerces: None,
            taux_vacance: None,
            risque_technologique: None,
            risque_naturel: None,
            zonage_environnemental: None,
            zonage_patrimonial: None,
            zonage_reglementaire: None,
            trame_verte_bleue: None,
        }
    }
}
