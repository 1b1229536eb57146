//! OpenRouteService directions client
//!
//! API documentation:
//! https://openrouteservice.org/dev/#/api-docs/v2/directions/{profile}/get

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::RoutingService;
use crate::error::RoutingError;
use crate::types::Coordinates;

/// ORS error codes meaning "no route" rather than a broken request
const ORS_ROUTE_NOT_FOUND: u32 = 2009;
const ORS_POINT_NOT_FOUND: u32 = 2010;

/// OpenRouteService client configuration
#[derive(Debug, Clone)]
pub struct OrsConfig {
    /// Base URL (e.g., "https://api.openrouteservice.org")
    pub base_url: String,
    /// Routing profile
    pub profile: String,
    /// API key sent in the Authorization header
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl OrsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            profile: "driving-car".to_string(),
            api_key: api_key.into(),
            timeout_seconds: 10,
        }
    }
}

/// OpenRouteService routing client
pub struct OrsClient {
    client: Client,
    config: OrsConfig,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    fn directions_url(&self) -> String {
        format!(
            "{}/v2/directions/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile
        )
    }
}

#[async_trait]
impl RoutingService for OrsClient {
    async fn distance_meters(&self, from: &Coordinates, to: &Coordinates) -> Result<f64, RoutingError> {
        let start = lon_lat(from);
        let end = lon_lat(to);

        debug!("Requesting ORS route start={} end={}", start, end);

        let response = self
            .client
            .get(self.directions_url())
            .header("Authorization", &self.config.api_key)
            .query(&[("start", start.as_str()), ("end", end.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_error(status.as_u16(), body, from, to));
        }

        parse_directions(&body, from, to)
    }

    fn name(&self) -> &str {
        "OpenRouteService"
    }
}

/// Format coordinates as ORS expects them: longitude first
fn lon_lat(coords: &Coordinates) -> String {
    format!("{},{}", coords.lng, coords.lat)
}

// ORS API types

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    /// Distance in meters
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: Option<u32>,
}

/// Extract `features[0].properties.segments[0].distance` in meters
fn parse_directions(body: &str, from: &Coordinates, to: &Coordinates) -> Result<f64, RoutingError> {
    let response: DirectionsResponse = serde_json::from_str(body)
        .map_err(|e| RoutingError::Malformed { message: e.to_string() })?;

    let feature = match response.features.as_slice() {
        [] => {
            return Err(RoutingError::NoRoute {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
        [feature] => feature,
        features => {
            return Err(RoutingError::Malformed {
                message: format!("expected one feature, got {}", features.len()),
            })
        }
    };

    let segment = feature.properties.segments.first().ok_or_else(|| RoutingError::Malformed {
        message: "route has no segments".to_string(),
    })?;

    if !segment.distance.is_finite() || segment.distance < 0.0 {
        return Err(RoutingError::Malformed {
            message: format!("invalid segment distance {}", segment.distance),
        });
    }

    Ok(segment.distance)
}

fn classify_error(status: u16, body: String, from: &Coordinates, to: &Coordinates) -> RoutingError {
    let code = serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .and_then(|r| r.error.code);

    match code {
        Some(ORS_ROUTE_NOT_FOUND) | Some(ORS_POINT_NOT_FOUND) => RoutingError::NoRoute {
            from: from.to_string(),
            to: to.to_string(),
        },
        _ => RoutingError::Status { status, body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> Coordinates {
        Coordinates { lat: 30.3541, lng: -97.7601 }
    }

    fn work() -> Coordinates {
        Coordinates { lat: 30.2896, lng: -97.7437 }
    }

    #[test]
    fn test_lon_lat_puts_longitude_first() {
        assert_eq!(lon_lat(&home()), "-97.7601,30.3541");
    }

    #[test]
    fn test_directions_url() {
        let mut config = OrsConfig::new("key");
        config.base_url = "http://localhost:8080/ors/".to_string();
        let client = OrsClient::new(config).unwrap();
        assert_eq!(client.directions_url(), "http://localhost:8080/ors/v2/directions/driving-car");
    }

    #[test]
    fn test_ors_config_defaults() {
        let config = OrsConfig::new("secret");
        assert_eq!(config.base_url, "https://api.openrouteservice.org");
        assert_eq!(config.profile, "driving-car");
        assert_eq!(config.timeout_seconds, 10);
    }

    #[test]
    fn test_parse_directions_extracts_first_segment() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "segments": [{"distance": 9834.2, "duration": 812.4, "steps": []}],
                    "summary": {"distance": 9834.2, "duration": 812.4}
                },
                "geometry": {"type": "LineString", "coordinates": []}
            }]
        }"#;

        let meters = parse_directions(body, &home(), &work()).unwrap();
        assert_eq!(meters, 9834.2);
    }

    #[test]
    fn test_parse_directions_no_features_is_no_route() {
        let body = r#"{"type": "FeatureCollection", "features": []}"#;
        let err = parse_directions(body, &home(), &work()).unwrap_err();
        assert!(matches!(err, RoutingError::NoRoute { .. }));
    }

    #[test]
    fn test_parse_directions_multiple_features_is_malformed() {
        let body = r#"{"features": [
            {"properties": {"segments": [{"distance": 1.0}]}},
            {"properties": {"segments": [{"distance": 2.0}]}}
        ]}"#;
        let err = parse_directions(body, &home(), &work()).unwrap_err();
        assert!(matches!(err, RoutingError::Malformed { .. }));
    }

    #[test]
    fn test_parse_directions_missing_segments_is_malformed() {
        let body = r#"{"features": [{"properties": {"summary": {}}}]}"#;
        let err = parse_directions(body, &home(), &work()).unwrap_err();
        assert!(matches!(err, RoutingError::Malformed { .. }));
    }

    #[test]
    fn test_parse_directions_not_json_is_malformed() {
        let err = parse_directions("<html>", &home(), &work()).unwrap_err();
        assert!(matches!(err, RoutingError::Malformed { .. }));
    }

    #[test]
    fn test_classify_error_route_not_found() {
        let body = r#"{"error": {"code": 2010, "message": "Could not find routable point"}}"#;
        let err = classify_error(404, body.to_string(), &home(), &work());
        assert!(matches!(err, RoutingError::NoRoute { .. }));
    }

    #[test]
    fn test_classify_error_other_status() {
        let err = classify_error(403, "Access to this API has been disallowed".to_string(), &home(), &work());
        assert!(matches!(err, RoutingError::Status { status: 403, .. }));
    }

    #[tokio::test]
    #[ignore = "Requires ORS_API_KEY and network access"]
    async fn test_ors_integration_austin() {
        let key = std::env::var("ORS_API_KEY").unwrap();
        let client = OrsClient::new(OrsConfig::new(key)).unwrap();

        let meters = client.distance_meters(&home(), &work()).await.unwrap();
        assert!(meters > 5000.0 && meters < 20000.0, "got {} m", meters);
    }
}
