use crate::models::Coordinate;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Two-tier cache for provider responses
///
/// L1 is an in-process moka cache. L2 is Redis, shared across instances,
/// and optional: when it is not configured or unreachable the cache runs
/// on L1 alone.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a cache manager, connecting to Redis when a URL is given
    pub async fn new(redis_url: Option<&str>, l1_size: u64, ttl_secs: u64) -> Self {
        let redis = match redis_url {
            Some(url) => match connect_redis(url).await {
                Ok(conn) => Some(Arc::new(tokio::sync::Mutex::new(conn))),
                Err(e) => {
                    tracing::warn!("Failed to connect to Redis ({}), caching in memory only", e);
                    None
                }
            },
            None => None,
        };

        Self {
            redis,
            l1_cache: build_l1(l1_size, ttl_secs),
            ttl_secs,
        }
    }

    /// Cache manager without a Redis tier
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            redis: None,
            l1_cache: build_l1(l1_size, ttl_secs),
            ttl_secs,
        }
    }

    pub fn has_redis(&self) -> bool {
        self.redis.is_some()
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        // Try L1 cache first
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let Some(l2) = &self.redis else {
            return Err(CacheError::CacheMiss(key.to_string()));
        };

        let mut conn = l2.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        if let Some(json) = value {
            tracing::trace!("L2 cache hit: {}", key);

            // Populate L1 cache
            self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;

            return Ok(serde_json::from_str(&json)?);
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache (both tiers)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;

        if let Some(l2) = &self.redis {
            let mut conn = l2.lock().await;
            let _: () = redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async(&mut *conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from both cache tiers
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate(key).await;

        if let Some(l2) = &self.redis {
            let mut conn = l2.lock().await;
            let _: () = redis::cmd("DEL").arg(key).query_async(&mut *conn).await?;
        }

        Ok(())
    }
}

async fn connect_redis(url: &str) -> Result<ConnectionManager, CacheError> {
    let client = redis::Client::open(url)?;
    Ok(ConnectionManager::new(client).await?)
}

fn build_l1(l1_size: u64, ttl_secs: u64) -> moka::future::Cache<String, Vec<u8>> {
    moka::future::CacheBuilder::new(l1_size)
        .time_to_live(Duration::from_secs(ttl_secs))
        .build()
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a walking route; coordinates are rounded to ~0.1 m
    pub fn route(start: Coordinate, end: Coordinate) -> String {
        format!(
            "route:{:.6},{:.6}:{:.6},{:.6}",
            start.latitude, start.longitude, end.latitude, end.longitude
        )
    }

    /// Build a cache key for a geocoding query
    pub fn geocode(query: &str) -> String {
        format!("geocode:{}", query.trim().to_lowercase())
    }
}
