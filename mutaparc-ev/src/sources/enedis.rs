// Enedis open data - grid-connection registry
//
// Distance from the parcel centroid to the nearest HTA/BT substation.
// A parcel within the connection threshold is reported as connected.

use super::{fetch_json, http_client, Raccordement, RaccordementSource, SourceError};
use crate::models::parcelle::GeoPoint;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const ENEDIS_URL: &str =
    "https://data.enedis.fr/api/explore/v2.1/catalog/datasets/poste-electrique/records";

/// Below this distance the parcel counts as grid-connected
const SEUIL_RACCORDEMENT_M: f64 = 100.0;

#[derive(Debug, Deserialize)]
struct EnedisResponse {
    #[serde(default)]
    results: Vec<EnedisPoste>,
}

#[derive(Debug, Deserialize)]
struct EnedisPoste {
    geo_point_2d: Option<EnedisPoint>,
}

#[derive(Debug, Deserialize)]
struct EnedisPoint {
    lon: f64,
    lat: f64,
}

pub struct EnedisClient {
    client: reqwest::Client,
}

impl EnedisClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }
}

fn nearest_distance_m(point: &GeoPoint, postes: &[EnedisPoste]) -> Option<f64> {
    postes
        .iter()
        .filter_map(|p| p.geo_point_2d.as_ref())
        .map(|g| point.distance_m(&GeoPoint::new(g.lon, g.lat)))
        .min_by(|a, b| a.total_cmp(b))
}

#[async_trait]
impl RaccordementSource for EnedisClient {
    fn source_name(&self) -> &'static str {
        "Enedis Open Data"
    }

    async fn raccordement(&self, point: &GeoPoint) -> Result<Raccordement, SourceError> {
        debug!("Fetching nearest substation for ({}, {})", point.lon, point.lat);

        let geofilter = format!("within_distance(geo_point_2d, geom'POINT({} {})', 5km)",
            point.lon, point.lat);
        let response: EnedisResponse = fetch_json(self.client.get(ENEDIS_URL).query(&[
            ("where", geofilter.as_str()),
            ("limit", "20"),
        ]))
        .await?;

        let Some(distance_m) = nearest_distance_m(point, &response.results) else {
            return Err(SourceError::NotAvailable(
                "no substation within search radius".to_string(),
            ));
        };

        Ok(Raccordement {
            raccorde: distance_m <= SEUIL_RACCORDEMENT_M,
            distance_m,
        })
    }
}
