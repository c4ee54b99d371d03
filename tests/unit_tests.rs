// Unit tests for GoWhere

use geo::{HaversineDistance, Point};
use gowhere::core::{
    directions_script, fallback_route, haversine_distance, match_classrooms, normalize,
    proximity_alert, route_bounds, tokenize, RouteResolver,
};
use gowhere::models::{
    ClassroomRecord, Coordinate, FavoriteSet, ProviderRoute, RouteStatus, RouteStep,
};
use gowhere::services::{seed_classrooms, DirectionsProvider, ProviderError};
use async_trait::async_trait;
use std::sync::Arc;

const METERS_PER_DEGREE_LAT: f64 = 6_371_000.0 * std::f64::consts::PI / 180.0;

fn record(id: &str, building: Option<&str>) -> ClassroomRecord {
    let record = ClassroomRecord::new(id, Coordinate::new(43.6577, -79.3788));
    match building {
        Some(b) => record.with_building(b),
        None => record,
    }
}

fn ids(records: &[ClassroomRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

/// Point `meters` due north of `origin`
fn north_of(origin: Coordinate, meters: f64) -> Coordinate {
    Coordinate::new(origin.latitude + meters / METERS_PER_DEGREE_LAT, origin.longitude)
}

#[test]
fn test_empty_query_returns_everything_favorites_first() {
    let directory = seed_classrooms();
    let favorites: FavoriteSet = ["RCC-301", "ENG-101"].into_iter().collect();

    let results = match_classrooms("", &directory, &favorites);

    assert_eq!(results.len(), directory.len());
    assert_eq!(
        ids(&results),
        vec!["ENG-101", "RCC-301", "KHE-123", "KHE-321", "ENG-202", "RCC-201"]
    );
}

#[test]
fn test_empty_query_never_duplicates() {
    let mut directory = seed_classrooms();
    directory.push(directory[0].clone());
    let favorites: FavoriteSet = ["KHE-123"].into_iter().collect();

    let results = match_classrooms("   ", &directory, &favorites);

    let mut seen = ids(&results);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), results.len());
    assert_eq!(results[0].id, "KHE-123");
}

#[test]
fn test_every_token_must_match() {
    let directory = vec![record("KHE-123", Some("Kerr Hall East")), record("ENG-101", None)];

    let results = match_classrooms("khe 1", &directory, &FavoriteSet::new());

    assert_eq!(ids(&results), vec!["KHE-123"]);
}

#[test]
fn test_tokens_match_building_name() {
    let directory = seed_classrooms();

    let results = match_classrooms("rogers 3", &directory, &FavoriteSet::new());

    assert_eq!(ids(&results), vec!["RCC-301"]);
}

#[test]
fn test_matching_ignores_case_and_punctuation() {
    let directory = seed_classrooms();
    let favorites = FavoriteSet::new();

    let hyphenated = match_classrooms("khe-123", &directory, &favorites);
    let spaced = match_classrooms("KHE 123", &directory, &favorites);

    assert_eq!(hyphenated, spaced);
    assert_eq!(ids(&spaced), vec!["KHE-123"]);
}

#[test]
fn test_punctuation_only_query_matches_nothing() {
    let directory = seed_classrooms();

    assert!(match_classrooms("!!!", &directory, &FavoriteSet::new()).is_empty());
    assert!(match_classrooms("eng ---", &directory, &FavoriteSet::new()).is_empty());
}

#[test]
fn test_favorites_ordering() {
    let directory = vec![record("A", None), record("B", None), record("C", None)];
    let favorites: FavoriteSet = ["C"].into_iter().collect();

    let results = match_classrooms("", &directory, &favorites);

    assert_eq!(ids(&results), vec!["C", "A", "B"]);
}

#[test]
fn test_normalize_and_tokenize() {
    assert_eq!(normalize("KHE-123"), "khe123");
    assert_eq!(normalize("Café #2"), "caf2");
    assert_eq!(tokenize("  Kerr  hall-EAST "), vec!["kerr", "halleast"]);
}

#[test]
fn test_haversine_zero_and_symmetric() {
    let points = [
        Coordinate::new(43.6577, -79.3788),
        Coordinate::new(-33.8688, 151.2093),
        Coordinate::new(90.0, 0.0),
        Coordinate::new(0.0, -180.0),
    ];

    for a in points {
        assert_eq!(haversine_distance(a, a), 0.0);
        for b in points {
            assert!((haversine_distance(a, b) - haversine_distance(b, a)).abs() < 1e-6);
        }
    }
}

#[test]
fn test_haversine_agrees_with_geo() {
    let a = Coordinate::new(43.6577, -79.3788);
    let b = Coordinate::new(45.5017, -73.5673);

    let ours = haversine_distance(a, b);
    let theirs = Point::new(a.longitude, a.latitude)
        .haversine_distance(&Point::new(b.longitude, b.latitude));

    // geo uses the mean radius 6371008.8 m
    assert!((ours - theirs).abs() / theirs < 1e-5, "ours {} vs geo {}", ours, theirs);
}

#[test]
fn test_proximity_boundary_is_inclusive() {
    let destination = Coordinate::new(43.6577, -79.3788);
    let ten = north_of(destination, 10.0);
    let eleven = north_of(destination, 11.0);

    let d10 = haversine_distance(ten, destination);
    assert!((d10 - 10.0).abs() < 1e-6, "expected 10 m, got {}", d10);

    assert!(proximity_alert(ten, destination, d10));
    assert!(proximity_alert(ten, destination, 10.0));
    assert!(proximity_alert(north_of(destination, 9.99), destination, 10.0));
    assert!(!proximity_alert(eleven, destination, 10.0));
}

struct FailingProvider;

#[async_trait]
impl DirectionsProvider for FailingProvider {
    async fn walking_route(
        &self,
        _start: Coordinate,
        _end: Coordinate,
    ) -> Result<Option<ProviderRoute>, ProviderError> {
        Err(ProviderError::ApiError("503 Service Unavailable".to_string()))
    }
}

struct FixedProvider(ProviderRoute);

#[async_trait]
impl DirectionsProvider for FixedProvider {
    async fn walking_route(
        &self,
        _start: Coordinate,
        _end: Coordinate,
    ) -> Result<Option<ProviderRoute>, ProviderError> {
        Ok(Some(self.0.clone()))
    }
}

#[test]
fn test_resolve_route_falls_back_on_provider_failure() {
    let resolver = RouteResolver::new(Arc::new(FailingProvider));
    let start = Coordinate::new(43.6577, -79.3788);
    let end = Coordinate::new(43.65834, -79.38189);

    let route = tokio_test::block_on(resolver.resolve_route(start, end));

    assert_eq!(route.status, RouteStatus::Approximate);
    assert_eq!(route.polyline, vec![start, end]);
    assert!(route.steps.is_empty());
    assert!(route.warning.is_some());
    assert_eq!(route, fallback_route(start, end));
}

#[test]
fn test_resolve_route_uses_provider_geometry() {
    let start = Coordinate::new(43.6577, -79.3788);
    let end = Coordinate::new(43.65834, -79.38189);
    let provided = ProviderRoute {
        distance: 312.4,
        polyline: vec![start, Coordinate::new(43.6581, -79.3790), end],
        steps: vec![RouteStep {
            distance: 312.4,
            instruction: "Walk west on Gould Street".to_string(),
            maneuver: "depart".to_string(),
        }],
    };
    let resolver = RouteResolver::new(Arc::new(FixedProvider(provided.clone())));

    let route = tokio_test::block_on(resolver.resolve_route(start, end));

    assert_eq!(route.status, RouteStatus::Routed);
    assert_eq!(route.distance_meters, Some(312.4));
    assert_eq!(route.polyline, provided.polyline);
    assert_eq!(route.steps.len(), 1);
    assert!(route.warning.is_none());
}

#[test]
fn test_route_bounds_cover_polyline() {
    let polyline = vec![
        Coordinate::new(43.6577, -79.3788),
        Coordinate::new(43.6590, -79.3810),
        Coordinate::new(43.6583, -79.3770),
    ];

    let bounds = route_bounds(&polyline).unwrap();

    assert_eq!(bounds.south_west, Coordinate::new(43.6577, -79.3810));
    assert_eq!(bounds.north_east, Coordinate::new(43.6590, -79.3770));
    assert!(route_bounds(&[]).is_none());
}

#[test]
fn test_directions_script() {
    let steps = vec![
        RouteStep {
            distance: 120.0,
            instruction: "Head north on Church Street.".to_string(),
            maneuver: "depart".to_string(),
        },
        RouteStep {
            distance: 0.0,
            instruction: "You have arrived".to_string(),
            maneuver: "arrive".to_string(),
        },
    ];

    let script = directions_script("KHE-123", Some(1600.0), &steps).unwrap();

    assert_eq!(
        script,
        "Directions to KHE-123. Total distance: 1.6 kilometers. \
         Step 1: Head north on Church Street. Distance: 120 meters. \
         Step 2: You have arrived. Distance: 0 meters."
    );
    assert!(directions_script("KHE-123", Some(100.0), &[]).is_none());
}
