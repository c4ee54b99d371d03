use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub directions: DirectionsSettings,
    #[serde(default)]
    pub geocoding: GeocodingSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub navigation: NavigationSettings,
    #[serde(default)]
    pub reports: ReportSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

/// Without a URL the directory serves the built-in classroom list read-only
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    #[serde(default = "default_true")]
    pub seed_on_startup: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: None,
            min_connections: None,
            acquire_timeout_secs: None,
            seed_on_startup: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsSettings {
    #[serde(default = "default_mapbox_url")]
    pub base_url: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DirectionsSettings {
    fn default() -> Self {
        Self {
            base_url: default_mapbox_url(),
            access_token: String::new(),
            profile: default_profile(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_mapbox_url() -> String { "https://api.mapbox.com".to_string() }
fn default_profile() -> String { "walking".to_string() }
fn default_timeout_secs() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingSettings {
    #[serde(default = "default_nominatim_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocode_limit")]
    pub limit: u8,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            base_url: default_nominatim_url(),
            user_agent: default_user_agent(),
            limit: default_geocode_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_nominatim_url() -> String { "https://nominatim.openstreetmap.org".to_string() }
fn default_user_agent() -> String { format!("gowhere/{}", env!("CARGO_PKG_VERSION")) }
fn default_geocode_limit() -> u8 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            redis_url: None,
            ttl_secs: Some(300),
            l1_cache_size: Some(1000),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigationSettings {
    #[serde(default = "default_arrival_threshold")]
    pub arrival_threshold_meters: f64,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            arrival_threshold_meters: default_arrival_threshold(),
        }
    }
}

fn default_arrival_threshold() -> f64 { crate::core::DEFAULT_ARRIVAL_THRESHOLD_METERS }

/// EmailJS credentials; reports are disabled unless all three ids are set
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_emailjs_endpoint")]
    pub endpoint: String,
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            endpoint: default_emailjs_endpoint(),
            service_id: None,
            template_id: None,
            public_key: None,
        }
    }
}

impl ReportSettings {
    /// `(service_id, template_id, public_key)` when fully configured
    pub fn credentials(&self) -> Option<(String, String, String)> {
        Some((
            self.service_id.clone().filter(|s| !s.is_empty())?,
            self.template_id.clone().filter(|s| !s.is_empty())?,
            self.public_key.clone().filter(|s| !s.is_empty())?,
        ))
    }
}

fn default_emailjs_endpoint() -> String { "https://api.emailjs.com/api/v1.0/email/send".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }
fn default_true() -> bool { true }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with GOWHERE__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., GOWHERE__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("GOWHERE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Well-known variables that take precedence over the config files:
/// `DATABASE_URL`, `REDIS_URL` and `MAPBOX_ACCESS_TOKEN`
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", url)?;
    }
    if let Ok(token) = env::var("MAPBOX_ACCESS_TOKEN") {
        builder = builder.set_override("directions.access_token", token)?;
    }

    builder.build()
}
