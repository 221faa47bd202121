// ── Query hooks ──
//
// A `Query<T>` is one observer of a cache entry. Creating it mounts the
// observer (fetching when enabled and stale, starting its poller), and
// dropping it unmounts. Changing the descriptor moves the observer to
// the entry of the new key.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::FutureExt;
use mediadeck_api::ApiResult;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, FetchOutcome, Fetcher, QueryCache, QueryKey, QuerySnapshot};
use crate::error::QueryError;
use crate::stream::QueryStream;

// ── Options ──────────────────────────────────────────────────────────

/// Freshness, polling and gating policy of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long fetched data counts as fresh. Zero means always stale,
    /// so every mount refetches.
    pub stale_time: Duration,
    /// Refetch on this period while observed, regardless of freshness.
    pub poll_interval: Option<Duration>,
    /// Disabled queries never fetch.
    pub enabled: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            poll_interval: None,
            enabled: true,
        }
    }
}

impl QueryOptions {
    pub fn stale_for(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn poll_every(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

// ── Descriptor ───────────────────────────────────────────────────────

/// Everything needed to run one query: its key, its policy and the
/// closure that performs the request.
pub struct QueryDescriptor<T> {
    key: QueryKey,
    options: QueryOptions,
    fetcher: Fetcher<T>,
}

impl<T> Clone for QueryDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            options: self.options,
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<T> fmt::Debug for QueryDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDescriptor")
            .field("key", &self.key)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: Send + Sync + 'static> QueryDescriptor<T> {
    pub fn new<F, Fut>(key: QueryKey, options: QueryOptions, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ApiResult<T>, mediadeck_api::Error>> + Send + 'static,
    {
        Self {
            key,
            options,
            fetcher: Arc::new(move || fetch().boxed()),
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    /// Combine an external switch with the descriptor's own gate. A query
    /// disabled for missing parameters stays disabled.
    pub fn enabled_if(mut self, enabled: bool) -> Self {
        self.options.enabled &= enabled;
        self
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}

// ── Query ────────────────────────────────────────────────────────────

/// A mounted observer of one cached query.
pub struct Query<T: Send + Sync + 'static> {
    cache: Arc<QueryCache>,
    descriptor: QueryDescriptor<T>,
    view: Arc<watch::Sender<QuerySnapshot<T>>>,
    binding: Binding<T>,
}

/// Attachment of a query to the entry of its current key.
struct Binding<T: Send + Sync + 'static> {
    entry: Arc<CacheEntry<T>>,
    active: bool,
    tasks: CancellationToken,
}

impl<T: Send + Sync + 'static> Binding<T> {
    fn attach(
        cache: &QueryCache,
        descriptor: &QueryDescriptor<T>,
        view: &Arc<watch::Sender<QuerySnapshot<T>>>,
    ) -> Self {
        let options = descriptor.options;
        let entry = cache.observe::<T>(&descriptor.key, options.enabled);

        let tasks = CancellationToken::new();
        let source = entry.subscribe();
        view.send_replace(source.borrow().clone());
        tokio::spawn(forward(source, Arc::clone(view), tasks.clone()));

        if options.enabled {
            entry.set_fetcher(Arc::clone(&descriptor.fetcher));
            if !entry.is_fresh(options.stale_time) {
                entry.fetch();
            }
            if let Some(period) = options.poll_interval {
                tokio::spawn(poll(Arc::clone(&entry), period, tasks.clone()));
            }
        }

        debug!(key = %descriptor.key, enabled = options.enabled, "query mounted");
        Self {
            entry,
            active: options.enabled,
            tasks,
        }
    }

    fn detach(&self) {
        self.tasks.cancel();
        self.entry.release(self.active);
        debug!(key = %self.entry.key(), "query unmounted");
    }
}

impl<T: Send + Sync + 'static> Query<T> {
    /// Mount a query. Must be called inside a Tokio runtime.
    pub fn new(cache: Arc<QueryCache>, descriptor: QueryDescriptor<T>) -> Self {
        let (view, _) = watch::channel(QuerySnapshot::default());
        let view = Arc::new(view);
        let binding = Binding::attach(&cache, &descriptor, &view);
        Self {
            cache,
            descriptor,
            view,
            binding,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.descriptor.key
    }

    pub fn options(&self) -> QueryOptions {
        self.descriptor.options
    }

    pub fn is_enabled(&self) -> bool {
        self.binding.active
    }

    /// Current state of the entry this query observes.
    pub fn snapshot(&self) -> QuerySnapshot<T> {
        self.binding.entry.snapshot()
    }

    pub fn data(&self) -> Option<Arc<T>> {
        self.binding.entry.snapshot().data
    }

    /// Fetch now, joining a fetch already in flight for the same key.
    pub async fn refetch(&self) -> FetchOutcome<T> {
        if !self.binding.active {
            return Err(QueryError::Disabled);
        }
        match self.binding.entry.fetch() {
            Some(fetch) => fetch.await,
            None => Err(QueryError::Disabled),
        }
    }

    /// Fresh cached data, or the result of a fetch when stale.
    pub async fn load(&self) -> FetchOutcome<T> {
        if !self.binding.active {
            return Err(QueryError::Disabled);
        }
        let snapshot = self.snapshot();
        if !snapshot.is_fetching && self.binding.entry.is_fresh(self.descriptor.options.stale_time) {
            if let Some(data) = snapshot.data {
                return Ok(data);
            }
        }
        self.refetch().await
    }

    /// Stream of snapshots. Follows the query across key changes.
    pub fn watch(&self) -> QueryStream<T> {
        QueryStream::new(self.view.subscribe())
    }

    /// Call `callback` with every new snapshot until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(&QuerySnapshot<T>) + Send + 'static,
    {
        let mut receiver = self.view.subscribe();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    changed = receiver.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = receiver.borrow_and_update().clone();
                        callback(&snapshot);
                    }
                }
            }
        });
        Subscription { cancel }
    }

    /// Toggle the gate. Enabling fetches if the entry is stale.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.descriptor.options.enabled == enabled {
            return;
        }
        let options = self.descriptor.options.enabled(enabled);
        let descriptor = self.descriptor.clone().with_options(options);
        self.rebind(descriptor);
    }

    /// Swap in a new descriptor, typically after a parameter change.
    ///
    /// A different key moves the query to that key's entry: it shows the
    /// new entry's state (loading, if never fetched) and never the
    /// previous key's data.
    pub fn set_descriptor(&mut self, descriptor: QueryDescriptor<T>) {
        if descriptor.key == self.descriptor.key && descriptor.options == self.descriptor.options {
            if descriptor.options.enabled {
                self.binding.entry.set_fetcher(Arc::clone(&descriptor.fetcher));
            }
            self.descriptor = descriptor;
            return;
        }
        self.rebind(descriptor);
    }

    fn rebind(&mut self, descriptor: QueryDescriptor<T>) {
        self.binding.detach();
        self.binding = Binding::attach(&self.cache, &descriptor, &self.view);
        self.descriptor = descriptor;
    }
}

impl<T: Send + Sync + 'static> Drop for Query<T> {
    fn drop(&mut self) {
        self.binding.detach();
    }
}

impl<T: Send + Sync + 'static> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("key", &self.descriptor.key)
            .field("options", &self.descriptor.options)
            .finish_non_exhaustive()
    }
}

/// Guard returned by [`Query::subscribe`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    cancel: CancellationToken,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Mirror entry snapshots into the query's own channel. The write is
/// skipped once the binding is gone so a late update from the old key
/// cannot land after the new key's snapshot.
async fn forward<T: Send + Sync + 'static>(
    mut source: watch::Receiver<QuerySnapshot<T>>,
    view: Arc<watch::Sender<QuerySnapshot<T>>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = source.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = source.borrow_and_update().clone();
                view.send_if_modified(|current| {
                    if cancel.is_cancelled() {
                        return false;
                    }
                    *current = snapshot;
                    true
                });
            }
        }
    }
}

/// Refetch every `period` until cancelled. Failures are recorded in the
/// entry and the schedule carries on.
async fn poll<T: Send + Sync + 'static>(
    entry: Arc<CacheEntry<T>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Some(fetch) = entry.fetch() {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        outcome = fetch => {
                            if let Err(error) = outcome {
                                warn!(key = %entry.key(), %error, "poll failed, retrying next interval");
                            }
                        }
                    }
                }
            }
        }
    }
    debug!(key = %entry.key(), "poller stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cache::QueryStatus;

    /// Descriptor whose fetch returns the 1-based call number after `delay`.
    fn counting(
        key: QueryKey,
        options: QueryOptions,
        calls: &Arc<AtomicUsize>,
        delay: Duration,
    ) -> QueryDescriptor<usize> {
        let calls = Arc::clone(calls);
        QueryDescriptor::new(key, options, move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                tokio::time::sleep(delay).await;
                Ok(ApiResult::Success(n))
            }
        })
    }

    fn cache() -> Arc<QueryCache> {
        Arc::new(QueryCache::default())
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_observers_share_one_request() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let descriptor = counting(
            QueryKey::new("stats"),
            QueryOptions::default(),
            &calls,
            Duration::from_millis(100),
        );

        let a = Query::new(Arc::clone(&cache), descriptor.clone());
        let b = Query::new(Arc::clone(&cache), descriptor);
        let (ra, rb) = tokio::join!(a.refetch(), b.refetch());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*ra.unwrap(), 1);
        assert_eq!(*rb.unwrap(), 1);
        assert_eq!(a.snapshot().data_update_count, 1);
        assert_eq!(cache.observers(a.key()), 2);

        let (ra, rb) = tokio::join!(a.refetch(), b.refetch());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(ra.unwrap(), rb.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_query_never_fetches_until_enabled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let descriptor = counting(
            QueryKey::new("search"),
            QueryOptions::default(),
            &calls,
            Duration::ZERO,
        )
        .enabled_if(false);

        let mut query = Query::new(cache(), descriptor);
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(query.snapshot().status, QueryStatus::Idle);
        assert_eq!(query.refetch().await, Err(QueryError::Disabled));

        query.set_enabled(true);
        assert_eq!(*query.load().await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn application_failure_is_recorded_as_error() {
        let descriptor = QueryDescriptor::<usize>::new(
            QueryKey::with_params("tag", &99_u64),
            QueryOptions::default(),
            || async { Ok(ApiResult::failure(["X not found"])) },
        );
        let query = Query::new(cache(), descriptor);

        let err = query.load().await.unwrap_err();
        assert!(err.is_application());
        assert_eq!(err.messages(), ["X not found".to_string()]);

        let snapshot = query.snapshot();
        assert!(snapshot.is_error());
        assert!(snapshot.data.is_none());
        assert!(!snapshot.is_fetching);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_poll_keeps_schedule_and_previous_data() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let descriptor = QueryDescriptor::new(
            QueryKey::new("dashboard"),
            QueryOptions::default().poll_every(Duration::from_secs(20)),
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == 2 {
                        Err(mediadeck_api::Error::Timeout { timeout_secs: 30 })
                    } else {
                        Ok(ApiResult::Success(n))
                    }
                }
            },
        );
        let query = Query::new(cache(), descriptor);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let failed = query.snapshot();
        assert!(failed.is_error());
        assert!(failed.error.as_ref().is_some_and(QueryError::is_transport));
        assert_eq!(failed.data.as_deref(), Some(&1));

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let recovered = query.snapshot();
        assert!(recovered.is_success());
        assert_eq!(recovered.data.as_deref(), Some(&3));
        assert_eq!(recovered.failure_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn poller_stops_when_query_dropped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let descriptor = counting(
            QueryKey::new("resources"),
            QueryOptions::default().poll_every(Duration::from_secs(30)),
            &calls,
            Duration::ZERO,
        );
        let query = Query::new(cache(), descriptor);
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        drop(query);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn key_change_never_shows_previous_data() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let a = counting(
            QueryKey::with_params("task", "a"),
            QueryOptions::default(),
            &calls,
            Duration::ZERO,
        );
        let b = counting(
            QueryKey::with_params("task", "b"),
            QueryOptions::default(),
            &calls,
            Duration::from_millis(500),
        );

        let mut query = Query::new(Arc::clone(&cache), a);
        assert_eq!(*query.load().await.unwrap(), 1);
        let mut stream = query.watch();

        query.set_descriptor(b);
        let switched = query.snapshot();
        assert!(switched.data.is_none());
        assert_eq!(switched.status, QueryStatus::Loading);
        let seen = stream.changed().await.unwrap();
        assert!(seen.data.is_none());

        assert_eq!(*query.load().await.unwrap(), 2);
        assert_eq!(cache.observers(&QueryKey::with_params("task", "a")), 0);
        let old = cache
            .snapshot::<usize>(&QueryKey::with_params("task", "a"))
            .unwrap();
        assert_eq!(old.data.as_deref(), Some(&1));
    }

    #[tokio::test(start_paused = true)]
    async fn result_discarded_after_last_observer_leaves() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("logs");
        let query = Query::new(
            Arc::clone(&cache),
            counting(key.clone(), QueryOptions::default(), &calls, Duration::from_millis(200)),
        );
        assert!(query.snapshot().is_fetching);
        drop(query);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let snapshot = cache.snapshot::<usize>(&key).unwrap();
        assert_eq!(snapshot.status, QueryStatus::Idle);
        assert!(snapshot.data.is_none());
        assert!(!snapshot.is_fetching);
        assert_eq!(snapshot.data_update_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_time_suppresses_mount_refetch() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let descriptor = counting(
            QueryKey::new("logs"),
            QueryOptions::default().stale_for(Duration::from_secs(300)),
            &calls,
            Duration::ZERO,
        );

        let first = Query::new(Arc::clone(&cache), descriptor.clone());
        first.load().await.unwrap();
        let second = Query::new(Arc::clone(&cache), descriptor.clone());
        assert_eq!(*second.load().await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(301)).await;
        let third = Query::new(Arc::clone(&cache), descriptor);
        assert_eq!(*third.load().await.unwrap(), 2);

        assert!(cache.invalidate(first.key()));
        assert_eq!(*first.load().await.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn subscription_receives_updates_until_dropped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let query = Query::new(
            cache(),
            counting(QueryKey::new("tags"), QueryOptions::default(), &calls, Duration::from_millis(10)),
        );
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = query.subscribe(move |snap| {
            sink.lock().unwrap().push(snap.data.as_deref().copied());
        });

        query.load().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(seen.lock().unwrap().last().copied(), Some(Some(1)));

        subscription.unsubscribe();
        let before = seen.lock().unwrap().len();
        query.refetch().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(seen.lock().unwrap().len(), before);
    }
}
