use crate::core::distance::haversine_distance;
use crate::models::{Coordinate, RouteBounds, RouteResult, RouteStatus};
use crate::services::DirectionsProvider;
use geo::{BoundingRect, Coord, LineString};
use std::sync::Arc;

const FALLBACK_WARNING: &str = "Directions unavailable, showing a straight line to the destination";

/// Resolves walking routes through a directions provider
///
/// Any provider failure, or a provider answer without a usable route,
/// yields the straight-line fallback instead of an error.
#[derive(Clone)]
pub struct RouteResolver {
    provider: Arc<dyn DirectionsProvider>,
}

impl RouteResolver {
    pub fn new(provider: Arc<dyn DirectionsProvider>) -> Self {
        Self { provider }
    }

    pub async fn resolve_route(&self, start: Coordinate, end: Coordinate) -> RouteResult {
        match self.provider.walking_route(start, end).await {
            Ok(Some(route)) if route.polyline.len() >= 2 => RouteResult {
                status: RouteStatus::Routed,
                distance_meters: Some(route.distance),
                straight_line_meters: haversine_distance(start, end),
                polyline: route.polyline,
                steps: route.steps,
                warning: None,
            },
            Ok(_) => {
                tracing::info!("No route found between {:?} and {:?}, using direct line", start, end);
                fallback_route(start, end)
            }
            Err(e) => {
                tracing::warn!("Directions provider failed, using direct line: {}", e);
                fallback_route(start, end)
            }
        }
    }
}

/// Direct two-point line between the endpoints, flagged approximate
pub fn fallback_route(start: Coordinate, end: Coordinate) -> RouteResult {
    RouteResult {
        status: RouteStatus::Approximate,
        distance_meters: None,
        straight_line_meters: haversine_distance(start, end),
        polyline: vec![start, end],
        steps: Vec::new(),
        warning: Some(FALLBACK_WARNING.to_string()),
    }
}

/// Bounding box of a polyline, `None` when it is empty
pub fn route_bounds(polyline: &[Coordinate]) -> Option<RouteBounds> {
    let line: LineString<f64> = polyline
        .iter()
        .map(|c| Coord { x: c.longitude, y: c.latitude })
        .collect();

    line.bounding_rect().map(|rect| RouteBounds {
        south_west: Coordinate::new(rect.min().y, rect.min().x),
        north_east: Coordinate::new(rect.max().y, rect.max().x),
    })
}
