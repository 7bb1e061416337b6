// Géoportail de l'Urbanisme - heritage servitudes
//
// AC1 (historic monuments), AC2 (sites), AC4 (heritage protection areas).
// The free-text `typeass`/`nomsuplitt` properties feed the keyword
// classification in the patrimonial evaluator.

use super::{collapse_collection, fetch_json, http_client, FeatureCollection, FeatureSet,
            PatrimoineSource, SourceError};
use crate::models::parcelle::GeoPoint;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const GPU_URL: &str = "https://apicarto.ign.fr/api/gpu";

pub struct PatrimoineClient {
    client: reqwest::Client,
}

impl PatrimoineClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }

    async fn servitude(&self, categorie: &str, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        let geom = format!(
            r#"{{"type":"Point","coordinates":[{},{}]}}"#,
            point.lon, point.lat
        );
        debug!("Querying {} servitudes at ({}, {})", categorie, point.lon, point.lat);

        let url = format!("{}/assiette-sup-s", GPU_URL);
        let collection: FeatureCollection = fetch_json(self.client.get(&url).query(&[
            ("geom", geom.as_str()),
            ("categorie", categorie),
        ]))
        .await?;

        Ok(collapse_collection(
            collection,
            &["typeass", "type"],
            &["nomsuplitt", "nom", "libelle"],
        ))
    }
}

#[async_trait]
impl PatrimoineSource for PatrimoineClient {
    fn source_name(&self) -> &'static str {
        "Géoportail de l'Urbanisme"
    }

    async fn monuments_historiques(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.servitude("AC1", point).await
    }

    async fn sites_proteges(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.servitude("AC2", point).await
    }

    async fn zones_patrimoniales(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        self.servitude("AC4", point).await
    }
}
