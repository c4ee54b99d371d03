use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use gowhere::config::Settings;
use gowhere::core::RouteResolver;
use gowhere::routes::{self, AppState};
use gowhere::services::{
    CacheManager, ClassroomStore, Directory, EmailJsClient, GeocodingProvider, MapboxDirections,
    NominatimGeocoder, PostgresStore, ReportSink,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_argument".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(level: &str, format: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

async fn build_directory(settings: &Settings) -> Directory {
    let Some(url) = settings.database.url.as_deref() else {
        warn!("No database configured, serving the built-in classroom list read-only");
        return Directory::fallback();
    };

    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);
    let acquire_timeout = Duration::from_secs(settings.database.acquire_timeout_secs.unwrap_or(5));

    match PostgresStore::connect(url, db_max_conn, db_min_conn, acquire_timeout).await {
        Ok(store) => {
            info!("PostgreSQL directory initialized (max: {} connections)", db_max_conn);
            let store: Arc<dyn ClassroomStore> = Arc::new(store);
            let directory = Directory::new(store);

            if settings.database.seed_on_startup {
                match directory.seed_if_empty().await {
                    Ok(0) => {}
                    Ok(n) => info!("Inserted {} built-in classrooms", n),
                    Err(e) => warn!("Failed to seed directory: {}", e),
                }
            }

            directory
        }
        Err(e) => {
            error!("Failed to connect to PostgreSQL ({}), serving the built-in classroom list", e);
            Directory::fallback()
        }
    }
}

fn to_io_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        to_io_error(e)
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting GoWhere navigation service...");

    let directory = Arc::new(build_directory(&settings).await);

    if settings.directions.access_token.is_empty() {
        warn!("No Mapbox access token, routes will be straight lines");
    }

    let directions = MapboxDirections::new(
        settings.directions.base_url.clone(),
        settings.directions.access_token.clone(),
        settings.directions.profile.clone(),
        Duration::from_secs(settings.directions.timeout_secs),
    )
    .map_err(to_io_error)?;

    let geocoder: Arc<dyn GeocodingProvider> = Arc::new(
        NominatimGeocoder::new(
            settings.geocoding.base_url.clone(),
            &settings.geocoding.user_agent,
            settings.geocoding.limit,
            Duration::from_secs(settings.geocoding.timeout_secs),
        )
        .map_err(to_io_error)?,
    );

    let reports: Option<Arc<dyn ReportSink>> = match settings.reports.credentials() {
        Some((service_id, template_id, public_key)) => {
            let client = EmailJsClient::new(
                settings.reports.endpoint.clone(),
                service_id,
                template_id,
                public_key,
                Duration::from_secs(10),
            )
            .map_err(to_io_error)?;
            Some(Arc::new(client))
        }
        None => {
            warn!("EmailJS not configured, classroom reports are disabled");
            None
        }
    };

    // Cache manager runs in memory when Redis is not available
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);
    let cache = Arc::new(
        CacheManager::new(settings.cache.redis_url.as_deref(), l1_cache_size, cache_ttl).await,
    );

    info!(
        "Cache manager initialized (L1: {} entries, TTL: {}s, redis: {})",
        l1_cache_size,
        cache_ttl,
        cache.has_redis()
    );

    // Build application state
    let app_state = AppState {
        directory,
        resolver: RouteResolver::new(Arc::new(directions)),
        geocoder,
        cache,
        reports,
        arrival_threshold_meters: settings.navigation.arrival_threshold_meters,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
