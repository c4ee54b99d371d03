//! GoWhere - campus classroom navigation service
//!
//! This library provides the classroom directory, the fuzzy classroom
//! matcher and walking-route resolution with a straight-line fallback
//! used by the GoWhere campus map.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{haversine_distance, match_classrooms, proximity_alert, RouteResolver, SearchSession};
pub use models::{ClassroomRecord, Coordinate, FavoriteSet, RouteResult, RouteStatus};
pub use services::{seed_classrooms, Directory};
