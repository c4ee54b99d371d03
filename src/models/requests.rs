use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{ClassroomPatch, ClassroomRecord, Coordinate, FavoriteSet};

/// Request to add a classroom
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClassroomRequest {
    #[validate(length(min = 1, max = 32))]
    pub id: String,
    pub coordinates: Coordinate,
    #[validate(length(min = 1))]
    pub building: Option<String>,
    pub floor: Option<i32>,
    pub description: Option<String>,
}

impl From<CreateClassroomRequest> for ClassroomRecord {
    fn from(req: CreateClassroomRequest) -> Self {
        ClassroomRecord {
            id: req.id,
            coordinates: req.coordinates,
            building: req.building,
            floor: req.floor,
            description: req.description,
        }
    }
}

/// Partial update of a classroom
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateClassroomRequest {
    pub coordinates: Option<Coordinate>,
    #[validate(length(min = 1))]
    pub building: Option<String>,
    pub floor: Option<i32>,
    pub description: Option<String>,
}

impl From<UpdateClassroomRequest> for ClassroomPatch {
    fn from(req: UpdateClassroomRequest) -> Self {
        ClassroomPatch {
            coordinates: req.coordinates,
            building: req.building,
            floor: req.floor,
            description: req.description,
        }
    }
}

/// Query string of the search endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    /// Comma-separated favorite classroom ids
    #[serde(default)]
    pub favorites: Option<String>,
}

impl SearchParams {
    pub fn favorite_set(&self) -> FavoriteSet {
        parse_favorites(self.favorites.as_deref())
    }
}

/// Parse a comma-separated list of classroom ids
pub fn parse_favorites(raw: Option<&str>) -> FavoriteSet {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Query string of the route endpoint
///
/// The destination is either an explicit coordinate or a classroom id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteQuery {
    pub from_lat: f64,
    pub from_lon: f64,
    pub to_lat: Option<f64>,
    pub to_lon: Option<f64>,
    pub classroom: Option<String>,
}

/// Query string of the proximity endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityQuery {
    pub from_lat: f64,
    pub from_lon: f64,
    pub to_lat: f64,
    pub to_lon: f64,
    pub threshold: Option<f64>,
}

/// Query string of the geocoding endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeQuery {
    pub q: Option<String>,
}

/// Report of a classroom missing from the directory
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportClassroomRequest {
    #[validate(length(min = 1, max = 200))]
    pub building: String,
    #[validate(length(min = 1, max = 50))]
    #[serde(rename = "roomNumber", alias = "room_number")]
    pub room_number: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
}
