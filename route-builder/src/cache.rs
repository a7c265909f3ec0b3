//! Cache of in-progress searches.
//!
//! A search enumerates paths lazily, so a client asking for the next page of
//! results can continue where the previous request stopped instead of
//! searching again. Searches are kept under the client's request id, bounded
//! in number and expired after a time-to-live.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use moka::sync::Cache as MokaCache;

/// Configuration for the request cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached searches.
    pub ttl: Duration,

    /// Maximum number of cached searches. Zero disables caching.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 5,
        }
    }
}

/// A shared, lockable search kept between requests.
pub type CachedSearch<A> = Arc<Mutex<A>>;

/// Bounded cache of searches keyed by request id.
///
/// Request id `0` means "no id" and is never cached.
pub struct RequestCache<A> {
    searches: Option<MokaCache<u64, CachedSearch<A>>>,
}

impl<A: Send + 'static> RequestCache<A> {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let searches = (config.max_capacity > 0).then(|| {
            MokaCache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_capacity)
                .build()
        });
        Self { searches }
    }

    /// Get a cached search.
    pub fn get(&self, request_id: u64) -> Option<CachedSearch<A>> {
        if request_id == 0 {
            return None;
        }
        self.searches.as_ref()?.get(&request_id)
    }

    /// Keep a search for later requests with the same id.
    ///
    /// Returns the shared handle, or `None` when the search is not cached.
    pub fn insert(&self, request_id: u64, search: A) -> Option<CachedSearch<A>> {
        if request_id == 0 {
            return None;
        }
        let searches = self.searches.as_ref()?;
        let handle = Arc::new(Mutex::new(search));
        searches.insert(request_id, Arc::clone(&handle));
        Some(handle)
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.searches.as_ref().map_or(0, |s| {
            s.run_pending_tasks();
            s.entry_count()
        })
    }

    /// Invalidate all cached searches.
    pub fn invalidate_all(&self) {
        if let Some(searches) = &self.searches {
            searches.invalidate_all();
        }
    }
}
