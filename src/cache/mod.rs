// Snapshot cache for read-heavy, low-churn collections

use metrics::counter;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Immutable, shared point-in-time view of a whole collection.
pub type Snapshot<T> = Arc<Vec<T>>;

/// How long a snapshot is served before the store is queried again.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug)]
struct CacheEntry<T> {
    items: Snapshot<T>,
    fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// Single-slot TTL cache holding one collection snapshot.
///
/// Population and invalidation go through the same mutex, and the lock is held
/// while the loader runs, so a write that invalidates the slot can never be
/// overwritten by a read that started before it. A loader that fails or is
/// dropped mid-flight leaves the slot untouched.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    name: &'static str,
    ttl: Duration,
    slot: Mutex<Option<CacheEntry<T>>>,
}

impl<T> SnapshotCache<T> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached snapshot while it is younger than the TTL, otherwise
    /// runs `load` and caches its result.
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<Snapshot<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.as_ref() {
            if entry.is_fresh(self.ttl, Instant::now()) {
                trace!(cache = self.name, "snapshot cache hit");
                counter!("warehouse_manager_cache.hit", 1, "slot" => self.name);
                return Ok(Arc::clone(&entry.items));
            }
        }

        debug!(cache = self.name, "snapshot cache miss, loading from store");
        counter!("warehouse_manager_cache.miss", 1, "slot" => self.name);

        let items: Snapshot<T> = Arc::new(load().await?);
        *slot = Some(CacheEntry {
            items: Arc::clone(&items),
            fetched_at: Instant::now(),
        });

        Ok(items)
    }

    /// Drops the snapshot and its timestamp unconditionally.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            debug!(cache = self.name, "snapshot cache invalidated");
        }
    }

    /// The current snapshot if one is held and still fresh. Never loads.
    pub async fn peek(&self) -> Option<Snapshot<T>> {
        let slot = self.slot.lock().await;
        slot.as_ref()
            .filter(|entry| entry.is_fresh(self.ttl, Instant::now()))
            .map(|entry| Arc::clone(&entry.items))
    }
}
