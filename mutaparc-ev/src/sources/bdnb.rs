// Base de Données Nationale des Bâtiments
//
// Built footprint area on a parcel, summed across the buildings the
// registry attaches to the cadastral identifier.

use super::{fetch_json, http_client, BatimentSource, SourceError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const BDNB_URL: &str = "https://api.bdnb.io/v1/bdnb/donnees/batiment_groupe";

#[derive(Debug, Deserialize)]
struct BdnbResponse {
    #[serde(default)]
    results: Vec<BdnbBatiment>,
}

#[derive(Debug, Deserialize)]
struct BdnbBatiment {
    surface_emprise_sol: Option<f64>,
}

pub struct BdnbClient {
    client: reqwest::Client,
}

impl BdnbClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }
}

fn sum_footprints(batiments: &[BdnbBatiment]) -> Option<f64> {
    let mut total = 0.0;
    let mut any = false;
    for b in batiments {
        if let Some(s) = b.surface_emprise_sol {
            total += s;
            any = true;
        }
    }
    any.then_some(total)
}

#[async_trait]
impl BatimentSource for BdnbClient {
    fn source_name(&self) -> &'static str {
        "BDNB"
    }

    async fn surface_batie(&self, id_cadastral: &str) -> Result<Option<f64>, SourceError> {
        debug!("Fetching built footprint for {}", id_cadastral);

        let response: BdnbResponse = fetch_json(
            self.client
                .get(BDNB_URL)
                .query(&[("parcelle_id", id_cadastral)]),
        )
        .await?;

        Ok(sum_footprints(&response.results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprints_are_summed() {
        let batiments = vec![
            BdnbBatiment {
                surface_emprise_sol: Some(4100.0),
            },
            BdnbBatiment {
                surface_emprise_sol: None,
            },
            BdnbBatiment {
                surface_emprise_sol: Some(2500.0),
            },
        ];
        assert_eq!(sum_footprints(&batiments), Some(6600.0));
    }

    #[test]
    fn no_known_footprint_yields_none() {
        assert_eq!(sum_footprints(&[]), None);
        let unknown = vec![BdnbBatiment {
            surface_emprise_sol: None,
        }];
        assert_eq!(sum_footprints(&unknown), None);
    }
}
