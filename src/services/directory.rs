use crate::core::matcher::match_classrooms;
use crate::models::{ClassroomPatch, ClassroomRecord, Coordinate, FavoriteSet};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur when reading or writing the classroom directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Classroom not found: {0}")]
    NotFound(String),

    #[error("Classroom already exists: {0}")]
    AlreadyExists(String),

    #[error("Database not available")]
    Unavailable,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Persistent, document-style storage of classrooms keyed by id
#[async_trait]
pub trait ClassroomStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<ClassroomRecord>, DirectoryError>;

    async fn get(&self, id: &str) -> Result<Option<ClassroomRecord>, DirectoryError>;

    /// Fails with `AlreadyExists` if the id is taken
    async fn insert(&self, record: &ClassroomRecord) -> Result<(), DirectoryError>;

    /// Insert all records or none of them
    async fn insert_all(&self, records: &[ClassroomRecord]) -> Result<(), DirectoryError>;

    async fn update(
        &self,
        id: &str,
        patch: &ClassroomPatch,
    ) -> Result<Option<ClassroomRecord>, DirectoryError>;

    /// Returns whether a record was removed
    async fn delete(&self, id: &str) -> Result<bool, DirectoryError>;

    async fn count(&self) -> Result<i64, DirectoryError>;

    async fn health_check(&self) -> bool;
}

/// Anything that can hand out the classroom list, optionally with its own search
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn list_all(&self) -> Result<Vec<ClassroomRecord>, DirectoryError>;

    /// Search on the source side. Sources without a search endpoint report `Unavailable`.
    async fn search_remote(&self, _query: &str) -> Result<Vec<ClassroomRecord>, DirectoryError> {
        Err(DirectoryError::Unavailable)
    }
}

/// Built-in classrooms served when no store is reachable
pub fn seed_classrooms() -> Vec<ClassroomRecord> {
    let kerr_hall = Coordinate::new(43.65196973085074, -79.37990394697654);
    let engineering = Coordinate::new(43.65897, -79.37834);
    let rogers = Coordinate::new(43.65834, -79.38189);

    vec![
        ClassroomRecord::new("KHE-123", kerr_hall).with_building("Kerr Hall East").with_floor(1),
        ClassroomRecord::new("KHE-321", kerr_hall).with_building("Kerr Hall East").with_floor(3),
        ClassroomRecord::new("ENG-101", engineering).with_building("Engineering Building").with_floor(1),
        ClassroomRecord::new("ENG-202", engineering).with_building("Engineering Building").with_floor(2),
        ClassroomRecord::new("RCC-201", rogers).with_building("Rogers Communications Centre").with_floor(2),
        ClassroomRecord::new("RCC-301", rogers).with_building("Rogers Communications Centre").with_floor(3),
    ]
}

/// In-memory classroom store
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<ClassroomRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ClassroomRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl ClassroomStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<ClassroomRecord>, DirectoryError> {
        Ok(self.records.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<ClassroomRecord>, DirectoryError> {
        Ok(self.records.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, record: &ClassroomRecord) -> Result<(), DirectoryError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(DirectoryError::AlreadyExists(record.id.clone()));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn insert_all(&self, new_records: &[ClassroomRecord]) -> Result<(), DirectoryError> {
        let mut records = self.records.write().await;
        let mut taken: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        for record in new_records {
            if !taken.insert(record.id.as_str()) {
                return Err(DirectoryError::AlreadyExists(record.id.clone()));
            }
        }
        records.extend(new_records.iter().cloned());
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        patch: &ClassroomPatch,
    ) -> Result<Option<ClassroomRecord>, DirectoryError> {
        let mut records = self.records.write().await;
        Ok(records.iter_mut().find(|r| r.id == id).map(|record| {
            record.apply(patch.clone());
            record.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool, DirectoryError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }

    async fn count(&self) -> Result<i64, DirectoryError> {
        Ok(self.records.read().await.len() as i64)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// The classroom directory served by the API
///
/// Backed by a store when one is connected, otherwise by the read-only
/// seed list. Reads never fail: a store error degrades to the seed list.
/// Writes require a store.
pub struct Directory {
    store: Option<Arc<dyn ClassroomStore>>,
    seed: Vec<ClassroomRecord>,
}

impl Directory {
    pub fn new(store: Arc<dyn ClassroomStore>) -> Self {
        Self {
            store: Some(store),
            seed: seed_classrooms(),
        }
    }

    /// Directory without a store, serving only the seed list
    pub fn fallback() -> Self {
        Self {
            store: None,
            seed: seed_classrooms(),
        }
    }

    pub fn backend(&self) -> &'static str {
        if self.store.is_some() {
            "database"
        } else {
            "fallback"
        }
    }

    fn store(&self) -> Result<&Arc<dyn ClassroomStore>, DirectoryError> {
        self.store.as_ref().ok_or(DirectoryError::Unavailable)
    }

    pub async fn list_all(&self) -> Vec<ClassroomRecord> {
        let Some(store) = &self.store else {
            return self.seed.clone();
        };

        match store.list_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Failed to list classrooms, serving built-in list: {}", e);
                self.seed.clone()
            }
        }
    }

    pub async fn get(&self, id: &str) -> Option<ClassroomRecord> {
        let Some(store) = &self.store else {
            return self.seed.iter().find(|r| r.id == id).cloned();
        };

        match store.get(id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Failed to fetch classroom {}, checking built-in list: {}", id, e);
                self.seed.iter().find(|r| r.id == id).cloned()
            }
        }
    }

    /// Run the matcher over the current directory contents
    pub async fn search(&self, query: &str, favorites: &FavoriteSet) -> Vec<ClassroomRecord> {
        let records = self.list_all().await;
        match_classrooms(query, &records, favorites)
    }

    pub async fn create(&self, record: ClassroomRecord) -> Result<ClassroomRecord, DirectoryError> {
        let store = self.store()?;

        if record.id.trim().is_empty() {
            return Err(DirectoryError::InvalidArgument("id must not be empty".into()));
        }
        record
            .coordinates
            .validate()
            .map_err(|e| DirectoryError::InvalidArgument(e.to_string()))?;

        store.insert(&record).await?;
        tracing::info!("Created classroom {}", record.id);
        Ok(record)
    }

    pub async fn update(
        &self,
        id: &str,
        patch: ClassroomPatch,
    ) -> Result<ClassroomRecord, DirectoryError> {
        let store = self.store()?;

        if patch.is_empty() {
            return Err(DirectoryError::InvalidArgument("no fields to update".into()));
        }
        if let Some(coordinates) = &patch.coordinates {
            coordinates
                .validate()
                .map_err(|e| DirectoryError::InvalidArgument(e.to_string()))?;
        }

        let updated = store
            .update(id, &patch)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))?;

        tracing::info!("Updated classroom {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), DirectoryError> {
        let store = self.store()?;

        if !store.delete(id).await? {
            return Err(DirectoryError::NotFound(id.to_string()));
        }

        tracing::info!("Deleted classroom {}", id);
        Ok(())
    }

    /// Insert the seed list into an empty store. Returns the number of records inserted.
    pub async fn seed_if_empty(&self) -> Result<usize, DirectoryError> {
        let store = self.store()?;

        if store.count().await? > 0 {
            return Ok(0);
        }

        store.insert_all(&self.seed).await?;

        tracing::info!("Seeded directory with {} classrooms", self.seed.len());
        Ok(self.seed.len())
    }

    pub async fn health_check(&self) -> bool {
        match &self.store {
            Some(store) => store.health_check().await,
            None => false,
        }
    }
}

#[async_trait]
impl DirectorySource for Directory {
    async fn list_all(&self) -> Result<Vec<ClassroomRecord>, DirectoryError> {
        Ok(Directory::list_all(self).await)
    }

    async fn search_remote(&self, query: &str) -> Result<Vec<ClassroomRecord>, DirectoryError> {
        Ok(self.search(query, &FavoriteSet::new()).await)
    }
}
