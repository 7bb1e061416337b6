// Géorisques - natural and technological hazard registry
//
// Six endpoints behind one client: five natural-hazard queries consumed by
// the hazard orchestrator, plus the ICPE technological-risk query consumed
// directly by the enrichment fan-out.

use super::{fetch_json, http_client, per_second, DirectRateLimiter, FeatureProps, FeatureSet,
            RisquesSource, SourceError};
use crate::models::parcelle::GeoPoint;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const GEORISQUES_URL: &str = "https://georisques.gouv.fr/api/v1";

/// Paginated Géorisques envelope; only the current page matters here
#[derive(Debug, Deserialize)]
struct GeorisquesPage {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

impl GeorisquesPage {
    fn into_feature_set(self, kind_keys: &[&str], name_keys: &[&str]) -> FeatureSet {
        let features = self
            .data
            .iter()
            .map(|entry| FeatureProps {
                kind: first_string(entry, kind_keys),
                name: first_string(entry, name_keys),
            })
            .collect();
        FeatureSet::from_features(features)
    }
}

fn first_string(entry: &serde_json::Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| entry.get(k).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}

pub struct GeorisquesClient {
    client: reqwest::Client,
    rate_limiter: DirectRateLimiter,
}

impl GeorisquesClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            // Géorisques documents a 10 requests/second quota
            rate_limiter: per_second(10),
        }
    }

    async fn page(&self, path: &str, query: &[(&str, String)]) -> Result<GeorisquesPage, SourceError> {
        self.rate_limiter.until_ready().await;
        let url = format!("{}/{}", GEORISQUES_URL, path);
        fetch_json(self.client.get(&url).query(query)).await
    }

    fn latlon(point: &GeoPoint) -> (&'static str, String) {
        ("latlon", format!("{},{}", point.lon, point.lat))
    }
}

#[async_trait]
impl RisquesSource for GeorisquesClient {
    fn source_name(&self) -> &'static str {
        "Géorisques"
    }

    async fn mouvements_terrain(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        debug!("Fetching ground movements at ({}, {})", point.lon, point.lat);
        let page = self.page("mvt", &[Self::latlon(point)]).await?;
        Ok(page.into_feature_set(&["type"], &["lieu", "commune"]))
    }

    async fn catnat(&self, code_insee: &str) -> Result<u32, SourceError> {
        debug!("Fetching CatNat orders for commune {}", code_insee);
        let page = self
            .page("gaspar/catnat", &[("code_insee", code_insee.to_string())])
            .await?;
        Ok(page.data.len() as u32)
    }

    async fn zonage_inondation(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        debug!("Fetching flood zoning at ({}, {})", point.lon, point.lat);
        let page = self.page("gaspar/tri", &[Self::latlon(point)]).await?;
        Ok(page.into_feature_set(&["code_national_tri"], &["libelle_tri"]))
    }

    async fn zonage_sismique(&self, code_insee: &str) -> Result<u8, SourceError> {
        debug!("Fetching seismic zoning for commune {}", code_insee);
        let page = self
            .page("zonage_sismique", &[("code_insee", code_insee.to_string())])
            .await?;

        let zone = page
            .data
            .first()
            .and_then(|entry| entry.get("zone_sismicite"))
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<u8>().ok());

        zone.ok_or_else(|| {
            SourceError::NotAvailable(format!("no seismic zone for commune {}", code_insee))
        })
    }

    async fn cavites(&self, point: &GeoPoint) -> Result<FeatureSet, SourceError> {
        debug!("Fetching cavities at ({}, {})", point.lon, point.lat);
        let page = self.page("cavites", &[Self::latlon(point)]).await?;
        Ok(page.into_feature_set(&["type"], &["nom", "commune"]))
    }

    async fn installations_classees(
        &self,
        point: &GeoPoint,
        rayon_m: f64,
    ) -> Result<FeatureSet, SourceError> {
        debug!(
            "Fetching classified installations within {} m of ({}, {})",
            rayon_m, point.lon, point.lat
        );
        let page = self
            .page(
                "installations_classees",
                &[Self::latlon(point), ("rayon", format!("{}", rayon_m))],
            )
            .await?;
        Ok(page.into_feature_set(&["regime"], &["nom_ets", "raison_sociale"]))
    }
}
