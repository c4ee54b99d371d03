use crate::models::{Coordinate, ProviderRoute, RouteStep};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling an external provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Source of walking directions between two points
///
/// `Ok(None)` means the provider answered but had no route, which is a
/// normal outcome.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn walking_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Option<ProviderRoute>, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<MapboxRoute>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MapboxRoute {
    distance: f64,
    geometry: MapboxGeometry,
    #[serde(default)]
    legs: Vec<MapboxLeg>,
}

#[derive(Debug, Deserialize)]
struct MapboxGeometry {
    /// `[longitude, latitude]` pairs
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct MapboxLeg {
    #[serde(default)]
    steps: Vec<MapboxStep>,
}

#[derive(Debug, Deserialize)]
struct MapboxStep {
    distance: f64,
    maneuver: MapboxManeuver,
}

#[derive(Debug, Deserialize)]
struct MapboxManeuver {
    #[serde(default)]
    instruction: String,
    #[serde(rename = "type", default)]
    kind: String,
}

impl From<MapboxRoute> for ProviderRoute {
    fn from(route: MapboxRoute) -> Self {
        let polyline = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coordinate::new(lat, lon))
            .collect();

        // Two waypoints produce a single leg
        let steps = route
            .legs
            .into_iter()
            .next()
            .map(|leg| leg.steps)
            .unwrap_or_default()
            .into_iter()
            .map(|step| RouteStep {
                distance: step.distance.max(0.0),
                instruction: step.maneuver.instruction,
                maneuver: step.maneuver.kind,
            })
            .collect();

        ProviderRoute {
            distance: route.distance,
            polyline,
            steps,
        }
    }
}

/// Mapbox Directions API client
pub struct MapboxDirections {
    base_url: String,
    access_token: String,
    profile: String,
    client: Client,
}

impl MapboxDirections {
    pub fn new(
        base_url: String,
        access_token: String,
        profile: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            access_token,
            profile,
            client,
        })
    }

    fn route_url(&self, start: Coordinate, end: Coordinate) -> String {
        format!(
            "{}/directions/v5/mapbox/{}/{},{};{},{}?geometries=geojson&steps=true&access_token={}",
            self.base_url.trim_end_matches('/'),
            self.profile,
            start.longitude,
            start.latitude,
            end.longitude,
            end.latitude,
            urlencoding::encode(&self.access_token)
        )
    }
}

#[async_trait]
impl DirectionsProvider for MapboxDirections {
    async fn walking_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Option<ProviderRoute>, ProviderError> {
        if self.access_token.is_empty() {
            return Err(ProviderError::NotConfigured("Mapbox access token".into()));
        }

        tracing::debug!("Fetching {} route from {:?} to {:?}", self.profile, start, end);

        let response = self.client.get(self.route_url(start, end)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<DirectionsResponse>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| "Failed to fetch route".to_string());
            return Err(ProviderError::ApiError(format!("{}: {}", status, message)));
        }

        let body: DirectionsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(body.routes.into_iter().next().map(ProviderRoute::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_url() {
        let client = MapboxDirections::new(
            "https://api.mapbox.com/".to_string(),
            "pk.test".to_string(),
            "walking".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        let url = client.route_url(Coordinate::new(43.6577, -79.3788), Coordinate::new(43.65834, -79.38189));
        assert_eq!(
            url,
            "https://api.mapbox.com/directions/v5/mapbox/walking/-79.3788,43.6577;-79.38189,43.65834\
             ?geometries=geojson&steps=true&access_token=pk.test"
        );
    }

    #[test]
    fn test_parse_route() {
        let json = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 412.5,
                "geometry": {"type": "LineString", "coordinates": [[-79.3788, 43.6577], [-79.3799, 43.6519]]},
                "legs": [{"steps": [
                    {"distance": 400.0, "maneuver": {"type": "depart", "instruction": "Walk south on Church Street"}},
                    {"distance": 12.5, "maneuver": {"type": "arrive", "instruction": "You have arrived"}}
                ]}]
            }]
        }"#;

        let body: DirectionsResponse = serde_json::from_str(json).unwrap();
        let route = ProviderRoute::from(body.routes.into_iter().next().unwrap());

        assert_eq!(route.distance, 412.5);
        assert_eq!(route.polyline[0], Coordinate::new(43.6577, -79.3788));
        assert_eq!(route.steps.len(), 2);
        assert_eq!(route.steps[0].maneuver, "depart");
        assert_eq!(route.steps[1].instruction, "You have arrived");
    }

    #[test]
    fn test_parse_no_routes() {
        let body: DirectionsResponse =
            serde_json::from_str(r#"{"code": "NoRoute", "message": "No route found"}"#).unwrap();
        assert!(body.routes.is_empty());
        assert_eq!(body.message.as_deref(), Some("No route found"));
    }
}
