// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AccessibilitySettings, ClassroomPatch, ClassroomRecord, Coordinate, FavoriteSet, FontSize,
    GeocodeCandidate, InvalidArgument, ProviderRoute, RouteBounds, RouteResult, RouteStatus,
    RouteStep,
};
pub use requests::{
    CreateClassroomRequest, GeocodeQuery, ProximityQuery, ReportClassroomRequest, RouteQuery,
    SearchParams, UpdateClassroomRequest,
};
pub use responses::{
    ErrorResponse, GeocodeResponse, HealthResponse, LookupStatus, MessageResponse,
    ProximityResponse, ReportResponse, RouteResponse,
};
