// Annuaire de l'Administration - town-hall directory
//
// Town-hall coordinates for a municipality; the orchestrator derives the
// urban-centre flag from the centroid-to-mairie distance.

use super::{fetch_json, http_client, AnnuaireSource, SourceError};
use crate::models::parcelle::GeoPoint;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const ANNUAIRE_URL: &str =
    "https://api-lannuaire.service-public.fr/api/explore/v2.1/catalog/datasets/api-lannuaire-administration/records";

#[derive(Debug, Deserialize)]
struct AnnuaireResponse {
    #[serde(default)]
    results: Vec<Etablissement>,
}

#[derive(Debug, Deserialize)]
struct Etablissement {
    latitude: Option<String>,
    longitude: Option<String>,
}

pub struct AnnuaireClient {
    client: reqwest::Client,
}

impl AnnuaireClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }
}

fn coordinates(etablissement: &Etablissement) -> Option<GeoPoint> {
    let lon = etablissement.longitude.as_deref()?.parse::<f64>().ok()?;
    let lat = etablissement.latitude.as_deref()?.parse::<f64>().ok()?;
    Some(GeoPoint::new(lon, lat))
}

#[async_trait]
impl AnnuaireSource for AnnuaireClient {
    fn source_name(&self) -> &'static str {
        "Annuaire de l'Administration"
    }

    async fn mairie(&self, code_insee: &str) -> Result<Option<GeoPoint>, SourceError> {
        debug!("Fetching town hall for commune {}", code_insee);

        let filter = format!(
            "pivot like \"mairie\" and code_insee_commune = \"{}\"",
            code_insee
        );
        let response: AnnuaireResponse = fetch_json(
            self.client
                .get(ANNUAIRE_URL)
                .query(&[("where", filter.as_str()), ("limit", "1")]),
        )
        .await?;

        Ok(response.results.first().and_then(coordinates))
    }
}
