// LOVAC - housing vacancy registry
//
// Municipal private-stock vacancy rate, percent.

use super::{fetch_json, http_client, SourceError, VacanceSource};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const LOVAC_URL: &str = "https://www.data.gouv.fr/api/1/datasets/lovac/communes";

#[derive(Debug, Deserialize)]
struct LovacResponse {
    #[serde(default)]
    data: Vec<LovacCommune>,
}

#[derive(Debug, Deserialize)]
struct LovacCommune {
    taux_vacance: Option<f64>,
}

pub struct LovacClient {
    client: reqwest::Client,
}

impl LovacClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }
}

#[async_trait]
impl VacanceSource for LovacClient {
    fn source_name(&self) -> &'static str {
        "LOVAC"
    }

    async fn taux_vacance(&self, code_insee: &str) -> Result<Option<f64>, SourceError> {
        debug!("Fetching vacancy rate for commune {}", code_insee);

        let response: LovacResponse = fetch_json(
            self.client
                .get(LOVAC_URL)
                .query(&[("code_insee", code_insee)]),
        )
        .await?;

        Ok(response.data.first().and_then(|c| c.taux_vacance))
    }
}
