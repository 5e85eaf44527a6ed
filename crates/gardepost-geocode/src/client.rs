use serde::Deserialize;
use tracing::{debug, warn};

use gardepost_core::types::GeoPoint;

use crate::error::{GeocodeError, Result};

/// Client for a Google-style geocoding endpoint.
pub struct GeocodeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeocodeClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Resolve `address` to coordinates.
    ///
    /// Fails with [`GeocodeError::NoResult`] when the service reports a
    /// non-OK status or an empty result list.
    pub async fn lookup(&self, address: &str) -> Result<GeoPoint> {
        debug!(%address, "geocoding address");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("address", address), ("key", &self.api_key)])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!(status, body = %body, "geocoding API error");
            return Err(GeocodeError::Api { status, body });
        }

        let api_resp: ApiResponse = resp.json().await?;
        if api_resp.status != "OK" {
            warn!(%address, status = %api_resp.status, "geocoding returned no result");
            return Err(GeocodeError::NoResult {
                address: address.to_string(),
            });
        }

        let location = api_resp
            .results
            .into_iter()
            .next()
            .map(|r| r.geometry.location)
            .ok_or_else(|| GeocodeError::NoResult {
                address: address.to_string(),
            })?;

        Ok(GeoPoint::new(location.lat, location.lng))
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}
