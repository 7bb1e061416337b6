// INSEE Base Permanente des Équipements
//
// Commerce/service equipment within walking distance of the parcel.

use super::{fetch_json, http_client, CommercesSource, SourceError};
use crate::models::parcelle::GeoPoint;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const BPE_URL: &str = "https://api.insee.fr/melodi/data/DS_BPE";

/// Walking-distance radius for "commerces à proximité"
const RAYON_COMMERCES_M: f64 = 500.0;

#[derive(Debug, Deserialize)]
struct BpeResponse {
    #[serde(default)]
    observations: Vec<BpeEquipement>,
}

#[derive(Debug, Deserialize)]
struct BpeEquipement {
    longitude: Option<f64>,
    latitude: Option<f64>,
}

pub struct BpeClient {
    client: reqwest::Client,
}

impl BpeClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }
}

fn any_within(point: &GeoPoint, equipements: &[BpeEquipement], rayon_m: f64) -> bool {
    equipements.iter().any(|e| match (e.longitude, e.latitude) {
        (Some(lon), Some(lat)) => point.distance_m(&GeoPoint::new(lon, lat)) <= rayon_m,
        _ => false,
    })
}

#[async_trait]
impl CommercesSource for BpeClient {
    fn source_name(&self) -> &'static str {
        "INSEE BPE"
    }

    async fn commerces_a_proximite(&self, point: &GeoPoint) -> Result<bool, SourceError> {
        debug!("Fetching commerce equipment near ({}, {})", point.lon, point.lat);

        let bbox = format!(
            "{},{},{},{}",
            point.lon - 0.01,
            point.lat - 0.01,
            point.lon + 0.01,
            point.lat + 0.01
        );
        let response: BpeResponse = fetch_json(self.client.get(BPE_URL).query(&[
            ("bbox", bbox.as_str()),
            // Commerce domain of the BPE typology
            ("TYPEQU", "B"),
        ]))
        .await?;

        Ok(any_within(point, &response.observations, RAYON_COMMERCES_M))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equipment_within_radius_flags_proximity() {
        let origin = GeoPoint::new(2.0, 48.0);
        let equipements = vec![BpeEquipement {
            longitude: Some(2.002),
            latitude: Some(48.0),
        }];
        assert!(any_within(&origin, &equipements, 500.0));
        assert!(!any_within(&origin, &equipements, 50.0));
    }

    #[test]
    fn equipment_without_coordinates_is_ignored() {
        let origin = GeoPoint::new(2.0, 48.0);
        let equipements = vec![BpeEquipement {
            longitude: None,
            latitude: None,
        }];
        assert!(!any_within(&origin, &equipements, 500.0));
    }
}
