// IGN API Carto - cadastre module
//
// Mandatory parcel lookup: geometry, contenance, commune. The whole
// enrichment pipeline aborts when this source has no match.

use super::{fetch_json, http_client, per_second, CadastreSource, DirectRateLimiter,
            ParcelleCadastrale, SourceError};
use crate::models::parcelle::GeoPoint;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const APICARTO_CADASTRE_URL: &str = "https://apicarto.ign.fr/api/cadastre/parcelle";

#[derive(Debug, Deserialize)]
struct CadastreCollection {
    #[serde(default)]
    features: Vec<CadastreFeature>,
}

#[derive(Debug, Deserialize)]
struct CadastreFeature {
    properties: CadastreProps,
    geometry: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CadastreProps {
    idu: Option<String>,
    code_insee: Option<String>,
    nom_com: Option<String>,
    contenance: Option<f64>,
}

pub struct CadastreClient {
    client: reqwest::Client,
    rate_limiter: DirectRateLimiter,
}

impl CadastreClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            // API Carto asks clients to stay under 5 requests/second
            rate_limiter: per_second(5),
        }
    }
}

/// Split a 14-character cadastral identifier (IDU) into its query parts:
/// INSEE code (5), section (2, after the 3-char prefix), number (4).
fn split_idu(id_cadastral: &str) -> Result<(&str, &str, &str), SourceError> {
    if id_cadastral.len() != 14 || !id_cadastral.is_ascii() {
        return Err(SourceError::Parse(format!(
            "invalid cadastral identifier: {}",
            id_cadastral
        )));
    }
    Ok((
        &id_cadastral[0..5],
        &id_cadastral[8..10],
        &id_cadastral[10..14],
    ))
}

/// Extract the exterior ring of a GeoJSON Polygon/MultiPolygon geometry
fn exterior_ring(geometry: &serde_json::Value) -> Vec<GeoPoint> {
    let coordinates = match geometry.get("type").and_then(|t| t.as_str()) {
        Some("Polygon") => geometry.get("coordinates").and_then(|c| c.get(0)),
        Some("MultiPolygon") => geometry
            .get("coordinates")
            .and_then(|c| c.get(0))
            .and_then(|p| p.get(0)),
        _ => None,
    };

    coordinates
        .and_then(|ring| ring.as_array())
        .map(|points| {
            points
                .iter()
                .filter_map(|p| {
                    let lon = p.get(0)?.as_f64()?;
                    let lat = p.get(1)?.as_f64()?;
                    Some(GeoPoint::new(lon, lat))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl CadastreSource for CadastreClient {
    fn source_name(&self) -> &'static str {
        "API Carto Cadastre"
    }

    async fn parcelle(
        &self,
        id_cadastral: &str,
    ) -> Result<Option<ParcelleCadastrale>, SourceError> {
        let (code_insee, section, numero) = split_idu(id_cadastral)?;

        self.rate_limiter.until_ready().await;

        debug!("Looking up cadastral parcel {}", id_cadastral);
        let collection: CadastreCollection = fetch_json(self.client.get(APICARTO_CADASTRE_URL).query(
            &[
                ("code_insee", code_insee),
                ("section", section),
                ("numero", numero),
            ],
        ))
        .await?;

        let Some(feature) = collection.features.into_iter().next() else {
            debug!("No cadastral match for {}", id_cadastral);
            return Ok(None);
        };

        let contour = exterior_ring(&feature.geometry);
        if contour.is_empty() {
            return Err(SourceError::Parse(format!(
                "cadastral feature for {} has no usable geometry",
                id_cadastral
            )));
        }

        Ok(Some(ParcelleCadastrale {
            id_cadastral: feature
                .properties
                .idu
                .unwrap_or_else(|| id_cadastral.to_string()),
            code_insee: feature
                .properties
                .code_insee
                .unwrap_or_else(|| code_insee.to_string()),
            commune: feature.properties.nom_com.unwrap_or_default(),
            contenance_m2: feature.properties.contenance,
            contour,
        }))
    }
}
