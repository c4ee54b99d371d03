use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use crate::core::{directions_script, haversine_distance, proximity_alert, route_bounds};
use crate::models::{
    Coordinate, GeocodeCandidate, GeocodeQuery, GeocodeResponse, InvalidArgument, LookupStatus,
    ProximityQuery, ProximityResponse, RouteQuery, RouteResponse, RouteResult, RouteStatus,
};
use crate::routes::{error_response, AppState};
use crate::services::CacheKey;

const GEOCODE_UNAVAILABLE: &str = "Geocoding service unavailable";

/// Configure navigation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/route", web::get().to(get_route))
        .route("/proximity", web::get().to(get_proximity))
        .route("/geocode", web::get().to(geocode));
}

fn invalid_argument(err: InvalidArgument) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, "invalid_argument", err.to_string())
}

/// GET /api/route?from_lat=&from_lon=&(to_lat=&to_lon=|classroom=)
///
/// Always answers with a route for valid input. Provider failures come back
/// as an approximate straight-line route.
async fn get_route(state: web::Data<AppState>, query: web::Query<RouteQuery>) -> impl Responder {
    let start = match Coordinate::validated(query.from_lat, query.from_lon) {
        Ok(c) => c,
        Err(e) => return invalid_argument(e),
    };

    let (end, label) = match (&query.classroom, query.to_lat, query.to_lon) {
        (Some(id), _, _) => match state.directory.get(id).await {
            Some(classroom) => (classroom.coordinates, classroom.id),
            None => {
                return error_response(StatusCode::NOT_FOUND, "not_found", "Classroom not found")
            }
        },
        (None, Some(lat), Some(lon)) => match Coordinate::validated(lat, lon) {
            Ok(c) => (c, "your destination".to_string()),
            Err(e) => return invalid_argument(e),
        },
        (None, _, _) => return invalid_argument(InvalidArgument::Missing("destination")),
    };

    let route = resolve_cached(&state, start, end).await;

    let bounds = route_bounds(&route.polyline);
    let arrived = proximity_alert(start, end, state.arrival_threshold_meters);
    let narration = directions_script(&label, route.distance_meters, &route.steps);

    HttpResponse::Ok().json(RouteResponse {
        route,
        bounds,
        arrived,
        narration,
    })
}

/// Routed results are cached; fallbacks are recomputed so the provider is retried.
async fn resolve_cached(state: &AppState, start: Coordinate, end: Coordinate) -> RouteResult {
    let key = CacheKey::route(start, end);

    if let Ok(route) = state.cache.get::<RouteResult>(&key).await {
        return route;
    }

    let route = state.resolver.resolve_route(start, end).await;

    if route.status == RouteStatus::Routed {
        if let Err(e) = state.cache.set(&key, &route).await {
            tracing::warn!("Failed to cache route: {}", e);
        }
    }

    route
}

/// GET /api/proximity?from_lat=&from_lon=&to_lat=&to_lon=&threshold=
async fn get_proximity(
    state: web::Data<AppState>,
    query: web::Query<ProximityQuery>,
) -> impl Responder {
    let user = match Coordinate::validated(query.from_lat, query.from_lon) {
        Ok(c) => c,
        Err(e) => return invalid_argument(e),
    };
    let destination = match Coordinate::validated(query.to_lat, query.to_lon) {
        Ok(c) => c,
        Err(e) => return invalid_argument(e),
    };

    let threshold = query.threshold.unwrap_or(state.arrival_threshold_meters);
    if !threshold.is_finite() || threshold < 0.0 {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_argument",
            format!("Invalid threshold: {}", threshold),
        );
    }

    HttpResponse::Ok().json(ProximityResponse {
        distance_meters: haversine_distance(user, destination),
        threshold_meters: threshold,
        arrived: proximity_alert(user, destination, threshold),
    })
}

/// GET /api/geocode?q={address}
async fn geocode(state: web::Data<AppState>, query: web::Query<GeocodeQuery>) -> impl Responder {
    let q = query.q.as_deref().map(str::trim).unwrap_or("");
    if q.is_empty() {
        return invalid_argument(InvalidArgument::Missing("q"));
    }

    let key = CacheKey::geocode(q);
    if let Ok(candidates) = state.cache.get::<Vec<GeocodeCandidate>>(&key).await {
        return HttpResponse::Ok().json(geocode_response(candidates));
    }

    match state.geocoder.geocode(q).await {
        Ok(candidates) => {
            if let Err(e) = state.cache.set(&key, &candidates).await {
                tracing::warn!("Failed to cache geocode result: {}", e);
            }
            HttpResponse::Ok().json(geocode_response(candidates))
        }
        Err(e) => {
            tracing::warn!("Geocoding {:?} failed: {}", q, e);
            HttpResponse::Ok().json(GeocodeResponse {
                status: LookupStatus::Degraded,
                candidates: Vec::new(),
                best: None,
                warning: Some(GEOCODE_UNAVAILABLE.to_string()),
            })
        }
    }
}

fn geocode_response(candidates: Vec<GeocodeCandidate>) -> GeocodeResponse {
    GeocodeResponse {
        status: LookupStatus::Ok,
        best: candidates.first().cloned(),
        candidates,
        warning: None,
    }
}
