// Core algorithm exports
pub mod distance;
pub mod matcher;
pub mod narration;
pub mod route;
pub mod search;

pub use distance::{haversine_distance, proximity_alert, DEFAULT_ARRIVAL_THRESHOLD_METERS};
pub use matcher::{match_classrooms, normalize, order_favorites_first, tokenize};
pub use narration::{directions_script, format_distance};
pub use route::{fallback_route, route_bounds, RouteResolver};
pub use search::{SearchOrigin, SearchOutcome, SearchSession, SearchTicket, SnapshotSource};
