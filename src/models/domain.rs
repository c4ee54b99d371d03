use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a required argument is missing or structurally invalid
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidArgument {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),

    #[error("missing required parameter: {0}")]
    Missing(&'static str),
}

/// A point on the Earth's surface in decimal degrees
///
/// Serialized as a `[latitude, longitude]` pair, the same shape the
/// classroom documents have always used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a coordinate, rejecting values outside the valid ranges
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self, InvalidArgument> {
        let coordinate = Self::new(latitude, longitude);
        coordinate.validate()?;
        Ok(coordinate)
    }

    pub fn validate(&self) -> Result<(), InvalidArgument> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(InvalidArgument::Latitude(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(InvalidArgument::Longitude(self.longitude));
        }
        Ok(())
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self { latitude, longitude }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.latitude, c.longitude]
    }
}

/// A classroom in the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassroomRecord {
    pub id: String,
    pub coordinates: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ClassroomRecord {
    pub fn new(id: impl Into<String>, coordinates: Coordinate) -> Self {
        Self {
            id: id.into(),
            coordinates,
            building: None,
            floor: None,
            description: None,
        }
    }

    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = Some(building.into());
        self
    }

    pub fn with_floor(mut self, floor: i32) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Apply a partial update; absent fields are left untouched
    pub fn apply(&mut self, patch: ClassroomPatch) {
        if let Some(coordinates) = patch.coordinates {
            self.coordinates = coordinates;
        }
        if let Some(building) = patch.building {
            self.building = Some(building);
        }
        if let Some(floor) = patch.floor {
            self.floor = Some(floor);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
    }
}

/// Partial update of a classroom record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassroomPatch {
    pub coordinates: Option<Coordinate>,
    pub building: Option<String>,
    pub floor: Option<i32>,
    pub description: Option<String>,
}

impl ClassroomPatch {
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_none()
            && self.building.is_none()
            && self.floor.is_none()
            && self.description.is_none()
    }
}

/// Ordered set of favorited classroom ids
///
/// Insertion order is kept; adding an id twice is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    ids: Vec<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the id was not already present
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Returns true if the id was present
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    /// Add the id if absent, remove it otherwise. Returns whether it is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = FavoriteSet::new();
        for id in iter {
            set.add(id);
        }
        set
    }
}

/// One instruction of a walking route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Meters, non-negative
    pub distance: f64,
    pub instruction: String,
    #[serde(default)]
    pub maneuver: String,
}

/// Whether a route came from the directions provider or the straight-line fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Routed,
    Approximate,
}

/// Result of resolving a route between two coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub status: RouteStatus,
    /// Total walking distance as reported by the provider; absent for fallbacks
    #[serde(rename = "distanceMeters")]
    pub distance_meters: Option<f64>,
    #[serde(rename = "straightLineMeters")]
    pub straight_line_meters: f64,
    pub polyline: Vec<Coordinate>,
    pub steps: Vec<RouteStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl RouteResult {
    pub fn is_approximate(&self) -> bool {
        self.status == RouteStatus::Approximate
    }
}

/// Route geometry as handed back by a directions provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRoute {
    pub distance: f64,
    pub polyline: Vec<Coordinate>,
    pub steps: Vec<RouteStep>,
}

/// Axis-aligned bounds of a route, for fitting the map viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteBounds {
    #[serde(rename = "southWest")]
    pub south_west: Coordinate,
    #[serde(rename = "northEast")]
    pub north_east: Coordinate,
}

/// A geocoding hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub name: String,
    pub coordinate: Coordinate,
}

/// Display font size preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "small" => Some(FontSize::Small),
            "medium" => Some(FontSize::Medium),
            "large" => Some(FontSize::Large),
            _ => None,
        }
    }
}

/// Accessibility display settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilitySettings {
    #[serde(rename = "darkMode")]
    pub dark_mode: bool,
    #[serde(rename = "fontSize")]
    pub font_size: FontSize,
}
