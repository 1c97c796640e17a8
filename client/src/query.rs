//! Query keys and the request-deduplicating response cache.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::debug;

use crate::client::FuelTrackClient;
use crate::error::Result;
use crate::types::{PaginatedResponse, Trip, TripListParams};

/// Fresh entries are served without refetching for this long.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Hierarchical cache key, e.g. `trips/list/page=2&limit=10`.
///
/// Invalidating a key drops every key it prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn trips() -> Self {
        Self::new(["trips"])
    }

    pub fn trip_lists() -> Self {
        Self::new(["trips", "list"])
    }

    pub fn trip_list(params: &TripListParams) -> Self {
        Self::new(["trips".to_string(), "list".to_string(), params.to_query_string()])
    }

    pub fn trip_details() -> Self {
        Self::new(["trips", "detail"])
    }

    pub fn trip_detail(id: &str) -> Self {
        Self::new(["trips", "detail", id])
    }

    pub fn auth_user() -> Self {
        Self::new(["auth", "user"])
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

type Slot<V> = Arc<OnceCell<(V, Instant)>>;

/// Response cache keyed by [`QueryKey`].
///
/// Concurrent fetches of the same key share one request. Entries older than
/// the stale time are refetched on the next access.
pub struct QueryCache<V> {
    stale_time: Duration,
    slots: DashMap<QueryKey, Slot<V>>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            stale_time,
            slots: DashMap::new(),
        }
    }

    fn is_fresh(&self, slot: &Slot<V>) -> bool {
        slot.get()
            .map_or(true, |(_, fetched)| fetched.elapsed() < self.stale_time)
    }

    /// Cached value when fresh, otherwise run `fetcher` (once per key across
    /// concurrent callers). Failures are not cached.
    pub async fn fetch<F, Fut, E>(&self, key: QueryKey, fetcher: F) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        let slot = match self.slots.entry(key) {
            Entry::Occupied(entry) if self.is_fresh(entry.get()) => entry.get().clone(),
            entry => {
                debug!(key = %entry.key(), "Cache miss");
                let slot: Slot<V> = Arc::new(OnceCell::new());
                entry.insert(slot.clone());
                slot
            }
        };

        let (value, _) = slot
            .get_or_try_init(|| async move { fetcher().await.map(|v| (v, Instant::now())) })
            .await?;
        Ok(value.clone())
    }

    pub fn get(&self, key: &QueryKey) -> Option<V> {
        let slot = self.slots.get(key)?;
        if !self.is_fresh(slot.value()) {
            return None;
        }
        slot.value().get().map(|(v, _)| v.clone())
    }

    pub fn set(&self, key: QueryKey, value: V) {
        let slot = Arc::new(OnceCell::new_with(Some((value, Instant::now()))));
        self.slots.insert(key, slot);
    }

    /// Drop every entry under `prefix`. Returns how many were removed.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let before = self.slots.len();
        self.slots.retain(|key, _| !key.starts_with(prefix));
        before.saturating_sub(self.slots.len())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_TIME)
    }
}

/// Cached trip reads on top of [`FuelTrackClient`].
pub struct TripQueries {
    client: Arc<FuelTrackClient>,
    lists: QueryCache<PaginatedResponse<Trip>>,
    details: QueryCache<Trip>,
}

impl TripQueries {
    pub fn new(client: Arc<FuelTrackClient>) -> Self {
        Self::with_stale_time(client, DEFAULT_STALE_TIME)
    }

    pub fn with_stale_time(client: Arc<FuelTrackClient>, stale_time: Duration) -> Self {
        Self {
            client,
            lists: QueryCache::new(stale_time),
            details: QueryCache::new(stale_time),
        }
    }

    pub fn client(&self) -> &Arc<FuelTrackClient> {
        &self.client
    }

    pub async fn list(&self, params: &TripListParams) -> Result<PaginatedResponse<Trip>> {
        self.lists
            .fetch(QueryKey::trip_list(params), || self.client.list_trips(params))
            .await
    }

    pub async fn detail(&self, id: &str) -> Result<Trip> {
        self.details
            .fetch(QueryKey::trip_detail(id), || self.client.get_trip(id))
            .await
    }

    /// Invalidate list and detail entries under `prefix`.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let removed = self.lists.invalidate(prefix) + self.details.invalidate(prefix);
        debug!(prefix = %prefix, removed, "Queries invalidated");
        removed
    }

    pub fn cached_entries(&self) -> usize {
        self.lists.len() + self.details.len()
    }
}
