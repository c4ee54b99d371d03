use crate::models::{Coordinate, GeocodeCandidate};
use crate::services::directions::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Free-text place lookup
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Candidates in provider order; the first one is the default pick
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ProviderError>;
}

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde(default)]
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn into_candidate(self) -> Option<GeocodeCandidate> {
        let latitude = self.lat.parse().ok()?;
        let longitude = self.lon.parse().ok()?;
        let coordinate = Coordinate::validated(latitude, longitude).ok()?;

        Some(GeocodeCandidate {
            name: self.display_name,
            coordinate,
        })
    }
}

/// OpenStreetMap Nominatim search client
pub struct NominatimGeocoder {
    base_url: String,
    limit: u8,
    client: Client,
}

impl NominatimGeocoder {
    pub fn new(
        base_url: String,
        user_agent: &str,
        limit: u8,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        // Nominatim's usage policy requires an identifying User-Agent
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url,
            limit,
            client,
        })
    }
}

#[async_trait]
impl GeocodingProvider for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ProviderError> {
        let url = format!(
            "{}/search?format=json&limit={}&q={}",
            self.base_url.trim_end_matches('/'),
            self.limit,
            urlencoding::encode(query)
        );

        tracing::debug!("Geocoding {:?}", query);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::ApiError(format!(
                "Failed to geocode: {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(places
            .into_iter()
            .filter_map(NominatimPlace::into_candidate)
            .collect())
    }
}
