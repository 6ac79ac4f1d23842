use crate::errors::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Outcome of a cache read. `Stale` is the last known good value served
/// after a failed refresh; `Unavailable` means nothing was ever fetched.
#[derive(Debug)]
pub enum Cached<T> {
    Fresh(Arc<T>),
    Stale(Arc<T>),
    Unavailable,
}

impl<T> Cached<T> {
    pub fn value(&self) -> Option<&Arc<T>> {
        match self {
            Cached::Fresh(value) | Cached::Stale(value) => Some(value),
            Cached::Unavailable => None,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Cached::Fresh(_))
    }
}

impl<T> Clone for Cached<T> {
    fn clone(&self) -> Self {
        match self {
            Cached::Fresh(value) => Cached::Fresh(Arc::clone(value)),
            Cached::Stale(value) => Cached::Stale(Arc::clone(value)),
            Cached::Unavailable => Cached::Unavailable,
        }
    }
}

struct Entry<T> {
    value: Arc<T>,
    refreshed_at: Instant,
}

/// A single cached value with its last refresh time.
///
/// Values are immutable snapshots swapped in whole, so concurrent refreshes
/// are safe: the last writer wins. A `ttl` of `None` never expires.
pub struct TtlCache<T> {
    name: &'static str,
    ttl: Option<Duration>,
    entry: RwLock<Option<Entry<T>>>,
}

impl<T> TtlCache<T> {
    pub fn new(name: &'static str, ttl: Option<Duration>) -> Self {
        TtlCache {
            name,
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// The held value regardless of age.
    pub async fn peek(&self) -> Option<Arc<T>> {
        self.entry
            .read()
            .await
            .as_ref()
            .map(|entry| Arc::clone(&entry.value))
    }

    pub async fn insert(&self, value: T) -> Arc<T> {
        let value = Arc::new(value);

        *self.entry.write().await = Some(Entry {
            value: Arc::clone(&value),
            refreshed_at: Instant::now(),
        });

        value
    }

    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }

    /// Returns the held value while it is within the TTL, otherwise awaits
    /// `fetch` and swaps the result in. Failed fetches are not cached.
    pub async fn get_or_refresh<F, Fut>(&self, fetch: F) -> Cached<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.live().await {
            return Cached::Fresh(value);
        }

        debug!(cache = self.name, "refreshing");

        match fetch().await {
            Ok(value) => Cached::Fresh(self.insert(value).await),
            Err(e) => {
                warn!(cache = self.name, "refresh failed: {}", e);

                match self.peek().await {
                    Some(value) => Cached::Stale(value),
                    None => Cached::Unavailable,
                }
            }
        }
    }

    async fn live(&self) -> Option<Arc<T>> {
        let guard = self.entry.read().await;

        guard
            .as_ref()
            .filter(|entry| match self.ttl {
                Some(ttl) => entry.refreshed_at.elapsed() < ttl,
                None => true,
            })
            .map(|entry| Arc::clone(&entry.value))
    }
}
