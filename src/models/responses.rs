use serde::{Deserialize, Serialize};
use crate::models::domain::{GeocodeCandidate, RouteBounds, RouteResult};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub directory: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for the route endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub route: RouteResult,
    pub bounds: Option<RouteBounds>,
    pub arrived: bool,
    /// Spoken directions, present only when the route has steps
    pub narration: Option<String>,
}

/// Response for the proximity endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityResponse {
    #[serde(rename = "distanceMeters")]
    pub distance_meters: f64,
    #[serde(rename = "thresholdMeters")]
    pub threshold_meters: f64,
    pub arrived: bool,
}

/// Whether a result came from the live collaborator or a fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStatus {
    Ok,
    Degraded,
}

/// Response for the geocoding endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub status: LookupStatus,
    pub candidates: Vec<GeocodeCandidate>,
    /// First candidate, the default pick
    pub best: Option<GeocodeCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Report submission response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub success: bool,
    #[serde(rename = "reportId")]
    pub report_id: String,
}
