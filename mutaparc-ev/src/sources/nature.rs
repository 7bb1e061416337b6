// IGN API Carto - nature module
//
// Seven point-in-zoning queries against the national nature registries.
// All sub-queries share the one provider; attribution dedups to one name.

use super::{collapse_collection, fetch_json, http_client, per_second, DirectRateLimiter,
            FeatureCollection, FeatureSet, NatureSource, SourceError};
use crate::models::parcelle::GeoPoint;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const APICARTO_NATURE_URL: &str = "https://apicarto.ign.fr/api/nature";

pub struct NatureClient {
    client: reqwest::Client,
    rate_limiter: DirectRateLimiter,
}

impl NatureClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            // API Carto asks clients to stay under 5 requests/second
            rate_limiter: per_second(5),
        }
    }

    async fn zonage(&self, endpoint: &str, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.rate_limiter.until_ready().await;

        let geom = format!(
            r#"{{"type":"Point","coordinates":[{},{}]}}"#,
            point.lon, point.lat
        );
        debug!("Querying nature zoning {} at ({}, {})", endpoint, point.lon, point.lat);

        let url = format!("{}/{}", APICARTO_NATURE_URL, endpoint);
        let collection: FeatureCollection =
            fetch_json(self.client.get(&url).query(&[("geom", geom.as_str())])).await?;

        Ok(collapse_collection(
            collection,
            &["type", "nature"],
            &["sitename", "nom", "nom_site"],
        ))
    }
}

#[async_trait]
impl NatureSource for NatureClient {
    fn source_name(&self) -> &'static str {
        "API Carto Nature"
    }

    async fn natura2000(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        // Habitat and bird directives are one registry on this endpoint
        self.zonage("natura-habitat", point).await
    }

    async fn znieff1(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.zonage("znieff1", point).await
    }

    async fn znieff2(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.zonage("znieff2", point).await
    }

    async fn parc_national(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.zonage("pn", point).await
    }

    async fn parc_naturel_regional(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.zonage("pnr", point).await
    }

    async fn reserve_naturelle(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.zonage("rnn", point).await
    }

    async fn trame_verte_bleue(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.zonage("srce", point).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::Feature;

    #[test]
    fn nature_collection_collapses_with_site_names() {
        let fc = FeatureCollection {
            features: vec![Feature {
                properties: serde_json::json!({
                    "sitename": "Boucles de la Seine",
                    "type": "SIC",
                }),
            }],
        };
        let fs = collapse_collection(fc, &["type", "nature"], &["sitename", "nom", "nom_site"]);
        assert!(fs.present);
        assert_eq!(fs.features[0].name.as_deref(), Some("Boucles de la Seine"));
        assert_eq!(fs.features[0].kind.as_deref(), Some("SIC"));
    }
}
