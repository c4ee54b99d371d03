// Service exports
pub mod api_client;
pub mod cache;
pub mod directions;
pub mod directory;
pub mod geocoding;
pub mod postgres;
pub mod preferences;
pub mod reports;

pub use api_client::DirectoryClient;
pub use cache::{CacheError, CacheKey, CacheManager};
pub use directions::{DirectionsProvider, MapboxDirections, ProviderError};
pub use directory::{
    seed_classrooms, ClassroomStore, Directory, DirectoryError, DirectorySource, MemoryStore,
};
pub use geocoding::{GeocodingProvider, NominatimGeocoder};
pub use postgres::PostgresStore;
pub use preferences::{
    ClientPreferences, FilePreferences, MemoryPreferences, PreferenceError, PreferenceStore,
};
pub use reports::{EmailJsClient, ReportSink};
