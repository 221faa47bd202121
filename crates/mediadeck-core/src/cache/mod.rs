// ── Shared query cache ──
//
// Concurrent map from `QueryKey` to a type-erased `CacheEntry<T>`.
// Entries are created on first observation and evicted by
// `collect_garbage` once unobserved for longer than `gc_time`, or
// least-recently-released first when over `max_entries`.

mod entry;
mod key;
mod snapshot;

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::CacheConfig;

pub(crate) use entry::{CacheEntry, FetchResult, Fetcher, into_outcome};
pub use entry::FetchOutcome;
pub use key::QueryKey;
pub use snapshot::{QuerySnapshot, QueryStatus};

use entry::ErasedEntry;

pub struct QueryCache {
    entries: DashMap<QueryKey, Arc<dyn ErasedEntry>>,
    config: CacheConfig,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Attach one observer to the typed entry for `key`, creating it on
    /// first use.
    ///
    /// The observer is registered while the map slot is still locked, so
    /// `collect_garbage` can never evict the entry between lookup and
    /// attach. An entry stored under the same key with a different data
    /// type is replaced; keys are expected to be unique per use case.
    pub(crate) fn observe<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        active: bool,
    ) -> Arc<CacheEntry<T>> {
        match self.entries.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                if let Ok(typed) = Arc::clone(occupied.get()).as_any().downcast::<CacheEntry<T>>() {
                    typed.observe(active);
                    return typed;
                }
                warn!(%key, "cache entry holds a different type, replacing");
                let fresh = Arc::new(CacheEntry::new(key.clone()));
                fresh.observe(active);
                occupied.insert(Arc::clone(&fresh) as Arc<dyn ErasedEntry>);
                fresh
            }
            Entry::Vacant(vacant) => {
                let fresh = Arc::new(CacheEntry::new(key.clone()));
                fresh.observe(active);
                vacant.insert(Arc::clone(&fresh) as Arc<dyn ErasedEntry>);
                fresh
            }
        }
    }

    fn typed<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<CacheEntry<T>>> {
        let erased = self.entries.get(key).map(|e| Arc::clone(e.value()))?;
        erased.as_any().downcast::<CacheEntry<T>>().ok()
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current snapshot for `key`, without creating an entry.
    pub fn snapshot<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<QuerySnapshot<T>> {
        self.typed::<T>(key).map(|entry| entry.snapshot())
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Number of hooks currently attached to `key`.
    pub fn observers(&self, key: &QueryKey) -> usize {
        self.entries.get(key).map_or(0, |e| e.value().observers())
    }

    // ── Invalidation ─────────────────────────────────────────────────

    /// Mark `key` stale; enabled observers refetch immediately.
    /// Returns `false` if the key is not cached.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let Some(entry) = self.entries.get(key).map(|e| Arc::clone(e.value())) else {
            return false;
        };
        debug!(%key, "invalidating");
        entry.invalidate();
        true
    }

    /// Invalidate every key of one use case, whatever its parameters.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let matching: Vec<Arc<dyn ErasedEntry>> = self
            .entries
            .iter()
            .filter(|e| e.key().tag() == tag)
            .map(|e| Arc::clone(e.value()))
            .collect();
        let count = matching.len();
        for entry in matching {
            entry.invalidate();
        }
        debug!(tag, count, "invalidated tag");
        count
    }

    // ── Eviction ─────────────────────────────────────────────────────

    /// Drop an unobserved entry. Observed entries are kept.
    pub fn remove(&self, key: &QueryKey) -> bool {
        self.entries
            .remove_if(key, |_, entry| entry.observers() == 0)
            .is_some()
    }

    /// Evict expired and surplus unobserved entries. Returns how many
    /// were dropped.
    pub fn collect_garbage(&self) -> usize {
        let now = Instant::now();
        let gc_time = self.config.gc_time;
        let mut evicted = 0;

        self.entries.retain(|key, entry| {
            let expired = entry
                .released_at()
                .is_some_and(|at| now.duration_since(at) >= gc_time);
            if expired {
                debug!(%key, "evicting expired entry");
                evicted += 1;
            }
            !expired
        });

        let surplus = self.entries.len().saturating_sub(self.config.max_entries);
        if surplus > 0 {
            let mut idle: Vec<(QueryKey, Instant)> = self
                .entries
                .iter()
                .filter_map(|e| e.value().released_at().map(|at| (e.key().clone(), at)))
                .collect();
            idle.sort_by_key(|(_, at)| *at);

            for (key, _) in idle.into_iter().take(surplus) {
                if self
                    .entries
                    .remove_if(&key, |_, entry| entry.released_at().is_some())
                    .is_some()
                {
                    debug!(%key, "evicting least recently used entry");
                    evicted += 1;
                }
            }
        }

        evicted
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn cache(gc_secs: u64, max_entries: usize) -> QueryCache {
        QueryCache::new(CacheConfig {
            gc_time: Duration::from_secs(gc_secs),
            max_entries,
            gc_interval: Duration::from_secs(60),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn unobserved_entries_expire_after_gc_time() {
        let cache = cache(300, 256);
        cache.observe::<u32>(&QueryKey::new("watched"), true);
        cache
            .observe::<u32>(&QueryKey::new("abandoned"), true)
            .release(true);

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.collect_garbage(), 0);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.collect_garbage(), 1);
        assert_eq!(cache.keys(), vec![QueryKey::new("watched")]);
    }

    #[tokio::test(start_paused = true)]
    async fn surplus_entries_evicted_least_recent_first() {
        let cache = cache(3600, 2);
        for tag in ["a", "b", "c"] {
            cache.observe::<u32>(&QueryKey::new(tag), false).release(false);
            tokio::time::advance(Duration::from_secs(1)).await;
        }
        cache.observe::<u32>(&QueryKey::new("a"), false);

        assert_eq!(cache.collect_garbage(), 1);
        assert_eq!(cache.keys(), vec![QueryKey::new("a"), QueryKey::new("c")]);
    }

    #[test]
    fn snapshot_does_not_create_entries() {
        let cache = QueryCache::default();
        assert!(cache.snapshot::<u32>(&QueryKey::new("missing")).is_none());
        assert!(cache.is_empty());
        assert!(!cache.invalidate(&QueryKey::new("missing")));
    }

    #[test]
    fn type_mismatch_replaces_entry() {
        let cache = QueryCache::default();
        let key = QueryKey::new("shared");
        cache.observe::<u32>(&key, false);
        cache.observe::<String>(&key, false);
        assert!(cache.snapshot::<u32>(&key).is_none());
        assert!(cache.snapshot::<String>(&key).is_some());
        assert_eq!(cache.observers(&key), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn attaching_revives_an_expired_entry() {
        let cache = cache(0, 256);
        let key = QueryKey::new("revived");

        cache.observe::<u32>(&key, true).release(true);
        tokio::time::advance(Duration::from_secs(1)).await;

        // Lookup and attach are one step: the collector sees an observer.
        let attached = cache.observe::<u32>(&key, true);
        assert_eq!(cache.collect_garbage(), 0);
        assert_eq!(cache.observers(&key), 1);

        let again = cache.observe::<u32>(&key, false);
        assert!(Arc::ptr_eq(&attached, &again));
        assert_eq!(cache.observers(&key), 2);
    }
}
