// transport.data.gouv.fr - public transport stops
//
// Distance from the parcel centroid to the nearest stop of any mode.

use super::{fetch_json, http_client, SourceError, TransportSource};
use crate::models::parcelle::GeoPoint;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const TRANSPORT_URL: &str = "https://transport.data.gouv.fr/api/stops/nearby";

#[derive(Debug, Deserialize)]
struct StopsResponse {
    #[serde(default)]
    stops: Vec<Stop>,
}

#[derive(Debug, Deserialize)]
struct Stop {
    lon: f64,
    lat: f64,
}

pub struct TransportClient {
    client: reqwest::Client,
}

impl TransportClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }
}

fn nearest_stop_m(point: &GeoPoint, stops: &[Stop]) -> Option<f64> {
    stops
        .iter()
        .map(|s| point.distance_m(&GeoPoint::new(s.lon, s.lat)))
        .min_by(|a, b| a.total_cmp(b))
}

#[async_trait]
impl TransportSource for TransportClient {
    fn source_name(&self) -> &'static str {
        "transport.data.gouv.fr"
    }

    async fn distance_arret(&self, point: &GeoPoint) -> Result<Option<f64>, SourceError> {
        debug!("Fetching nearby transport stops for ({}, {})", point.lon, point.lat);

        let response: StopsResponse = fetch_json(self.client.get(TRANSPORT_URL).query(&[
            ("lon", point.lon.to_string().as_str()),
            ("lat", point.lat.to_string().as_str()),
            ("radius", "3000"),
        ]))
        .await?;

        Ok(nearest_stop_m(point, &response.stops))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_stop_is_selected() {
        let origin = GeoPoint::new(2.0, 48.0);
        let stops = vec![
            Stop { lon: 2.02, lat: 48.0 },
            Stop { lon: 2.003, lat: 48.0 },
        ];
        let d = nearest_stop_m(&origin, &stops).unwrap();
        assert!(d < 300.0, "got {}", d);
    }

    #[test]
    fn no_stops_yields_none() {
        let origin = GeoPoint::new(2.0, 48.0);
        assert!(nearest_stop_m(&origin, &[]).is_none());
    }
}
