//! Nominatim geocoding client

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::GeocodeError;
use crate::types::Coordinates;

/// Nominatim API response
#[derive(Debug, Deserialize)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

/// Nominatim geocoding client
pub struct NominatimClient {
    base_url: String,
    client: reqwest::Client,
}

impl NominatimClient {
    /// Create a new client identified by `user_agent`
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Geocode a free-text address to coordinates.
    ///
    /// `Ok(None)` means the provider answered with no match.
    pub async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = self.search_url(address);
        debug!("Nominatim search: {}", address);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Status { status, body });
        }

        let body = response.text().await?;
        parse_search_response(&body)
    }

    fn search_url(&self, address: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(address)
        )
    }
}

/// Decode a search response body and take its first match
pub fn parse_search_response(body: &str) -> Result<Option<Coordinates>, GeocodeError> {
    let results: Vec<NominatimResult> = serde_json::from_str(body).map_err(|e| GeocodeError::Parse {
        message: format!("unexpected search response: {}", e),
    })?;
    first_coordinates(&results)
}

/// Take the best (first) match from a search response
pub fn first_coordinates(results: &[NominatimResult]) -> Result<Option<Coordinates>, GeocodeError> {
    let Some(result) = results.first() else {
        return Ok(None);
    };

    let lat = parse_degrees(&result.lat, 90.0, "latitude")?;
    let lng = parse_degrees(&result.lon, 180.0, "longitude")?;

    Ok(Some(Coordinates { lat, lng }))
}

/// Finite angle within `[-limit, limit]`
fn parse_degrees(raw: &str, limit: f64, axis: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
        .ok_or_else(|| GeocodeError::Parse {
            message: format!("invalid {} '{}'", axis, raw),
        })
}
