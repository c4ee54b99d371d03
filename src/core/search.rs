use crate::core::matcher::{match_classrooms, order_favorites_first};
use crate::models::{ClassroomRecord, FavoriteSet};
use crate::services::directory::{seed_classrooms, DirectorySource};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Sequence number handed out when a search is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Where a set of search results came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOrigin {
    /// The directory source's own search endpoint
    Remote,
    /// The local matcher over the last snapshot
    Local,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Current {
        results: Vec<ClassroomRecord>,
        origin: SearchOrigin,
    },
    /// A newer search was issued while this one was in flight
    Superseded,
}

impl SearchOutcome {
    pub fn results(&self) -> Option<&[ClassroomRecord]> {
        match self {
            SearchOutcome::Current { results, .. } => Some(results),
            SearchOutcome::Superseded => None,
        }
    }
}

/// Which data the local snapshot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Directory,
    Seed,
}

/// Client-side search over a directory source with last-request-wins semantics
///
/// Every call to [`SearchSession::search`] takes a new ticket. When the
/// lookup finishes, its results are only returned if no other search has
/// been dispatched in the meantime.
pub struct SearchSession<S> {
    source: S,
    snapshot: RwLock<Vec<ClassroomRecord>>,
    sequence: AtomicU64,
}

impl<S: DirectorySource> SearchSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: RwLock::new(Vec::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Create a session and load the initial snapshot
    pub async fn load(source: S) -> Self {
        let session = Self::new(source);
        session.refresh().await;
        session
    }

    /// Reload the snapshot, falling back to the seed list when the source is down
    pub async fn refresh(&self) -> SnapshotSource {
        match self.source.list_all().await {
            Ok(records) => {
                tracing::debug!("Loaded {} classrooms into search snapshot", records.len());
                *self.snapshot.write().await = records;
                SnapshotSource::Directory
            }
            Err(e) => {
                tracing::warn!("Failed to load classrooms, using built-in list: {}", e);
                *self.snapshot.write().await = seed_classrooms();
                SnapshotSource::Seed
            }
        }
    }

    pub async fn snapshot(&self) -> Vec<ClassroomRecord> {
        self.snapshot.read().await.clone()
    }

    /// Issue a new ticket, invalidating all earlier ones
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.sequence.load(Ordering::SeqCst) == ticket.0
    }

    /// Search the directory, preferring the source's remote search
    pub async fn search(&self, query: &str, favorites: &FavoriteSet) -> SearchOutcome {
        let ticket = self.begin();

        let (results, origin) = if query.trim().is_empty() {
            let snapshot = self.snapshot.read().await;
            (match_classrooms(query, &snapshot, favorites), SearchOrigin::Local)
        } else {
            match self.source.search_remote(query).await {
                Ok(records) => (order_favorites_first(records, favorites), SearchOrigin::Remote),
                Err(e) => {
                    tracing::debug!("Remote search for {:?} failed, matching locally: {}", query, e);
                    let snapshot = self.snapshot.read().await;
                    (match_classrooms(query, &snapshot, favorites), SearchOrigin::Local)
                }
            }
        };

        if !self.is_current(ticket) {
            tracing::debug!("Discarding stale results for {:?}", query);
            return SearchOutcome::Superseded;
        }

        SearchOutcome::Current { results, origin }
    }
}
