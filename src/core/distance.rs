use crate::models::Coordinate;

/// Earth's radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Distance under which the user is considered to have arrived
pub const DEFAULT_ARRIVAL_THRESHOLD_METERS: f64 = 10.0;

/// Calculate the Haversine distance between two points in meters
///
/// Uses the `2 * atan2(sqrt(h), sqrt(1 - h))` form so the result stays
/// accurate for both short hops across a quad and antipodal points.
#[inline]
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Whether the user is within `threshold_meters` of the destination (inclusive)
#[inline]
pub fn proximity_alert(user: Coordinate, destination: Coordinate, threshold_meters: f64) -> bool {
    haversine_distance(user, destination) <= threshold_meters
}
