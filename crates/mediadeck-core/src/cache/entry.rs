// ── Single cache entry ──
//
// One entry per `QueryKey`. Holds the latest snapshot in a `watch`
// channel, the in-flight fetch (shared so concurrent triggers join it),
// and the bookkeeping the collector needs.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use mediadeck_api::ApiResult;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use super::{QueryKey, QuerySnapshot};
use crate::error::QueryError;

pub(crate) type FetchResult<T> = Result<ApiResult<T>, mediadeck_api::Error>;
pub(crate) type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, FetchResult<T>> + Send + Sync>;

/// Result of one fetch as seen by whoever awaited it.
pub type FetchOutcome<T> = Result<Arc<T>, QueryError>;
pub(crate) type SharedFetch<T> = Shared<BoxFuture<'static, FetchOutcome<T>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Collapse a transport result and the envelope it carried into one outcome.
pub(crate) fn into_outcome<T>(result: FetchResult<T>) -> FetchOutcome<T> {
    match result {
        Ok(ApiResult::Success(data)) => Ok(Arc::new(data)),
        Ok(ApiResult::Failure(failure)) => Err(QueryError::from(failure)),
        Err(e) => Err(QueryError::from(&e)),
    }
}

struct InFlight<T> {
    id: u64,
    future: SharedFetch<T>,
}

#[derive(Default)]
struct Usage {
    observers: usize,
    /// Observers that are enabled and may trigger fetches.
    active: usize,
    released_at: Option<Instant>,
    fetched_at: Option<Instant>,
    invalidated: bool,
}

pub(crate) struct CacheEntry<T> {
    key: QueryKey,
    state: watch::Sender<QuerySnapshot<T>>,
    in_flight: Mutex<Option<InFlight<T>>>,
    fetcher: Mutex<Option<Fetcher<T>>>,
    usage: Mutex<Usage>,
    next_fetch_id: AtomicU64,
}

impl<T: Send + Sync + 'static> CacheEntry<T> {
    pub(crate) fn new(key: QueryKey) -> Self {
        let (state, _) = watch::channel(QuerySnapshot::default());
        Self {
            key,
            state,
            in_flight: Mutex::new(None),
            fetcher: Mutex::new(None),
            usage: Mutex::new(Usage {
                released_at: Some(Instant::now()),
                ..Usage::default()
            }),
            next_fetch_id: AtomicU64::new(0),
        }
    }

    pub(crate) fn key(&self) -> &QueryKey {
        &self.key
    }

    pub(crate) fn snapshot(&self) -> QuerySnapshot<T> {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<QuerySnapshot<T>> {
        self.state.subscribe()
    }

    // ── Observers ────────────────────────────────────────────────────

    pub(crate) fn observe(&self, active: bool) {
        let mut usage = lock(&self.usage);
        usage.observers += 1;
        if active {
            usage.active += 1;
        }
        usage.released_at = None;
    }

    pub(crate) fn release(&self, active: bool) {
        let mut usage = lock(&self.usage);
        usage.observers = usage.observers.saturating_sub(1);
        if active {
            usage.active = usage.active.saturating_sub(1);
        }
        if usage.observers == 0 {
            usage.released_at = Some(Instant::now());
        }
    }

    pub(crate) fn set_fetcher(&self, fetcher: Fetcher<T>) {
        *lock(&self.fetcher) = Some(fetcher);
    }

    /// Fresh data exists and is younger than `stale_time`.
    pub(crate) fn is_fresh(&self, stale_time: Duration) -> bool {
        let usage = lock(&self.usage);
        !usage.invalidated && usage.fetched_at.is_some_and(|at| at.elapsed() < stale_time)
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Start a fetch, or join the one already in flight.
    ///
    /// The fetch runs on its own task, so it completes even if every
    /// caller stops awaiting it. Returns `None` when no enabled observer
    /// has registered a fetcher yet. Must be called inside a Tokio runtime.
    pub(crate) fn fetch(self: &Arc<Self>) -> Option<SharedFetch<T>> {
        let mut slot = lock(&self.in_flight);
        if let Some(running) = slot.as_ref() {
            trace!(key = %self.key, "joining in-flight fetch");
            return Some(running.future.clone());
        }

        let fetcher = lock(&self.fetcher).clone()?;
        let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        self.state.send_modify(QuerySnapshot::begin_fetch);

        let entry = Arc::clone(self);
        let future = async move {
            let result = fetcher().await;
            entry.complete(id, result)
        }
        .boxed()
        .shared();

        *slot = Some(InFlight {
            id,
            future: future.clone(),
        });
        drop(slot);

        debug!(key = %self.key, "fetch started");
        tokio::spawn(future.clone());
        Some(future)
    }

    fn complete(&self, id: u64, result: FetchResult<T>) -> FetchOutcome<T> {
        let outcome = into_outcome(result);

        if self.observer_count() == 0 {
            warn!(key = %self.key, "no observers left, discarding fetch result");
            self.state.send_modify(QuerySnapshot::abandon);
        } else {
            match &outcome {
                Ok(data) => {
                    {
                        let mut usage = lock(&self.usage);
                        usage.fetched_at = Some(Instant::now());
                        usage.invalidated = false;
                    }
                    self.state.send_modify(|snap| snap.resolve(Arc::clone(data)));
                }
                Err(error) => {
                    debug!(key = %self.key, %error, "fetch failed");
                    self.state.send_modify(|snap| snap.reject(error.clone()));
                }
            }
        }

        let mut slot = lock(&self.in_flight);
        if slot.as_ref().is_some_and(|running| running.id == id) {
            *slot = None;
        }
        outcome
    }

    fn observer_count(&self) -> usize {
        lock(&self.usage).observers
    }
}

// ── Type erasure ─────────────────────────────────────────────────────

/// What the cache needs from an entry without knowing its data type.
pub(crate) trait ErasedEntry: Send + Sync {
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    fn observers(&self) -> usize;

    /// When the last observer left; `None` while observed.
    fn released_at(&self) -> Option<Instant>;

    /// Mark stale. Refetches right away if an enabled observer is attached.
    fn invalidate(self: Arc<Self>);
}

impl<T: Send + Sync + 'static> ErasedEntry for CacheEntry<T> {
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn observers(&self) -> usize {
        self.observer_count()
    }

    fn released_at(&self) -> Option<Instant> {
        lock(&self.usage).released_at
    }

    fn invalidate(self: Arc<Self>) {
        let active = {
            let mut usage = lock(&self.usage);
            usage.invalidated = true;
            usage.active
        };
        if active > 0 {
            self.fetch();
        }
    }
}
