// Géoportail de l'Urbanisme - regulatory zonings
//
// PLU zone, carte communale sector, and the municipality RNU flag.

use super::{fetch_json, http_client, SecteurCc, SourceError, UrbanismeSource, ZonePlu};
use crate::models::parcelle::GeoPoint;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const GPU_URL: &str = "https://apicarto.ign.fr/api/gpu";

#[derive(Debug, Deserialize)]
struct ZoneUrbaCollection {
    #[serde(default)]
    features: Vec<ZoneUrbaFeature>,
}

#[derive(Debug, Deserialize)]
struct ZoneUrbaFeature {
    properties: ZoneUrbaProps,
}

#[derive(Debug, Deserialize)]
struct ZoneUrbaProps {
    libelle: Option<String>,
    destdomi: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SecteurCcCollection {
    #[serde(default)]
    features: Vec<SecteurCcFeature>,
}

#[derive(Debug, Deserialize)]
struct SecteurCcFeature {
    properties: SecteurCcProps,
}

#[derive(Debug, Deserialize)]
struct SecteurCcProps {
    libelle: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MunicipalityRecord {
    #[serde(default)]
    is_rnu: bool,
}

pub struct UrbanismeClient {
    client: reqwest::Client,
}

impl UrbanismeClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }

    fn point_geom(point: &GeoPoint) -> String {
        format!(
            r#"{{"type":"Point","coordinates":[{},{}]}}"#,
            point.lon, point.lat
        )
    }
}

#[async_trait]
impl UrbanismeSource for UrbanismeClient {
    fn source_name(&self) -> &'static str {
        "Géoportail de l'Urbanisme"
    }

    async fn zone_plu(&self, point: &GeoPoint) -> Result<Option<ZonePlu>, SourceError> {
        debug!("Querying PLU zone at ({}, {})", point.lon, point.lat);
        let geom = Self::point_geom(point);

        let url = format!("{}/zone-urba", GPU_URL);
        let collection: ZoneUrbaCollection =
            fetch_json(self.client.get(&url).query(&[("geom", geom.as_str())])).await?;

        Ok(collection.features.into_iter().next().and_then(|f| {
            f.properties.libelle.map(|libelle| ZonePlu {
                libelle,
                destination_dominante: f.properties.destdomi,
            })
        }))
    }

    async fn secteur_carte_communale(
        &self,
        point: &GeoPoint,
    ) -> Result<Option<SecteurCc>, SourceError> {
        debug!("Querying carte communale sector at ({}, {})", point.lon, point.lat);
        let geom = Self::point_geom(point);

        let url = format!("{}/secteur-cc", GPU_URL);
        let collection: SecteurCcCollection =
            fetch_json(self.client.get(&url).query(&[("geom", geom.as_str())])).await?;

        Ok(collection
            .features
            .into_iter()
            .next()
            .and_then(|f| f.properties.libelle.map(|libelle| SecteurCc { libelle })))
    }

    async fn commune_rnu(&self, code_insee: &str) -> Result<bool, SourceError> {
        debug!("Querying planning status for commune {}", code_insee);

        let url = format!("{}/municipality", GPU_URL);
        let record: MunicipalityRecord =
            fetch_json(self.client.get(&url).query(&[("insee", code_insee)])).await?;

        Ok(record.is_rnu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_urba_parses_libelle_and_destdomi() {
        let json = r#"{"features": [{"properties": {"libelle": "AUc", "destdomi": "Habitat"}}]}"#;
        let collection: ZoneUrbaCollection = serde_json::from_str(json).unwrap();
        let f = &collection.features[0];
        assert_eq!(f.properties.libelle.as_deref(), Some("AUc"));
        assert_eq!(f.properties.destdomi.as_deref(), Some("Habitat"));
    }

    #[test]
    fn municipality_rnu_defaults_to_false() {
        let record: MunicipalityRecord = serde_json::from_str("{}").unwrap();
        assert!(!record.is_rnu);
    }
}
