// Route exports
pub mod classrooms;
pub mod navigation;
pub mod reports;

use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use crate::core::RouteResolver;
use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{CacheManager, Directory, DirectoryError, GeocodingProvider, ReportSink};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<Directory>,
    pub resolver: RouteResolver,
    pub geocoder: Arc<dyn GeocodingProvider>,
    pub cache: Arc<CacheManager>,
    /// `None` when report delivery is not configured
    pub reports: Option<Arc<dyn ReportSink>>,
    pub arrival_threshold_meters: f64,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .configure(classrooms::configure)
            .configure(navigation::configure)
            .configure(reports::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.directory.health_check().await;

    // Running on the built-in list is a supported mode, but not a healthy one
    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        directory: state.directory.backend().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Build a JSON error response
pub(crate) fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

fn directory_status(err: &DirectoryError) -> StatusCode {
    match err {
        DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
        DirectoryError::AlreadyExists(_) => StatusCode::CONFLICT,
        DirectoryError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        DirectoryError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn directory_error_response(err: &DirectoryError) -> HttpResponse {
    let status = directory_status(err);
    let (error, message) = match err {
        DirectoryError::NotFound(_) => ("not_found", "Classroom not found".to_string()),
        DirectoryError::AlreadyExists(id) => ("already_exists", format!("Classroom {} already exists", id)),
        DirectoryError::Unavailable => ("unavailable", "Database not available".to_string()),
        DirectoryError::InvalidArgument(msg) => ("invalid_argument", msg.clone()),
        other => ("server_error", other.to_string()),
    };
    error_response(status, error, message)
}
