// ── MediaDeck facade ──
//
// Entry point for consumers. Owns the API client, the auth session and
// the shared query cache, runs the cache collector, and hands out
// mounted hooks for every server use case.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use mediadeck_api::models::{
    CreateTag, DashboardStats, DocumentEntry, DocumentQuery, GetMediaDetailsParams, Indexer,
    IndexerSearchParams, LogEntry, LogQuery, MediaSummary, Movie, OmdbDetails, SearchParams,
    SystemResources, Tag, TagQuery, TaskStatus, TelegramMessage, TorrentResult, TvShow,
    UpdateTag, UploadRequest, UploadResult, YtsDetails, YtsMovie,
};
use mediadeck_api::{ApiClient, AuthSession, PagedList};
use secrecy::SecretString;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::{QueryCache, QueryKey};
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::hooks;
use crate::mutation::Mutation;
use crate::query::{Query, QueryDescriptor};

/// Cheaply cloneable via `Arc<DeckInner>`; clones share the session,
/// the cache and the background collector.
#[derive(Clone)]
pub struct MediaDeck {
    inner: Arc<DeckInner>,
}

struct DeckInner {
    client: ApiClient,
    session: AuthSession,
    cache: Arc<QueryCache>,
    cancel: CancellationToken,
    gc_task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for MediaDeck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaDeck")
            .field("client", &self.inner.client)
            .field("session", &self.inner.session)
            .field("cache", &self.inner.cache)
            .finish_non_exhaustive()
    }
}

impl MediaDeck {
    /// Build the client from configuration. Does not touch the network
    /// and spawns nothing; call [`start()`](Self::start) for the collector.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let session = config
            .token
            .clone()
            .map_or_else(AuthSession::new, AuthSession::with_token);
        let client = ApiClient::new(
            config.url.as_str(),
            &config.transport(),
            Arc::new(session.clone()),
        )?;
        Ok(Self::from_parts(client, session, QueryCache::new(config.cache)))
    }

    /// Assemble from an existing client. `session` must be the token
    /// source the client was built with.
    pub fn from_parts(client: ApiClient, session: AuthSession, cache: QueryCache) -> Self {
        Self {
            inner: Arc::new(DeckInner {
                client,
                session,
                cache: Arc::new(cache),
                cancel: CancellationToken::new(),
                gc_task: Mutex::new(None),
            }),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    pub fn session(&self) -> &AuthSession {
        &self.inner.session
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.inner.cache
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Install a bearer token. Cached data is kept; invalidate explicitly
    /// if it depended on the previous identity.
    pub fn login(&self, token: SecretString) {
        self.inner.session.login(token);
    }

    pub fn logout(&self) {
        self.inner.session.logout();
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the cache collector. Idempotent.
    pub fn start(&self) {
        let mut slot = self
            .inner
            .gc_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return;
        }
        let every = self.inner.cache.config().gc_interval;
        if every.is_zero() {
            debug!("cache collector disabled");
            return;
        }
        *slot = Some(tokio::spawn(gc_task(
            Arc::clone(&self.inner.cache),
            every,
            self.inner.cancel.clone(),
        )));
        info!(interval = ?every, "cache collector started");
    }

    /// Stop background work. Mounted queries keep working until dropped.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let handle = self
            .inner
            .gc_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        debug!("media deck shut down");
    }

    // ── Cache control ────────────────────────────────────────────────

    pub fn invalidate(&self, key: &QueryKey) -> bool {
        self.inner.cache.invalidate(key)
    }

    pub fn invalidate_tag(&self, tag: &str) -> usize {
        self.inner.cache.invalidate_tag(tag)
    }

    /// Mount any descriptor against the shared cache.
    pub fn query<T: Send + Sync + 'static>(&self, descriptor: QueryDescriptor<T>) -> Query<T> {
        Query::new(Arc::clone(&self.inner.cache), descriptor)
    }

    // ── Dashboard ────────────────────────────────────────────────────

    pub fn dashboard_stats(&self) -> Query<DashboardStats> {
        self.query(hooks::dashboard_stats(self.client()))
    }

    pub fn system_resources(&self) -> Query<SystemResources> {
        self.query(hooks::system_resources(self.client()))
    }

    // ── Torrents ─────────────────────────────────────────────────────

    pub fn indexer_providers(&self) -> Query<Vec<Indexer>> {
        self.query(hooks::indexer_providers(self.client()))
    }

    pub fn indexer_search(&self, params: IndexerSearchParams) -> Query<PagedList<TorrentResult>> {
        self.query(hooks::indexer_search(self.client(), params))
    }

    pub fn yts_search(&self, params: SearchParams) -> Query<PagedList<YtsMovie>> {
        self.query(hooks::yts_search(self.client(), params))
    }

    pub fn yts_details(&self, id: u64) -> Query<YtsDetails> {
        self.query(hooks::yts_details(self.client(), id))
    }

    // ── Catalog ──────────────────────────────────────────────────────

    pub fn search_movies(&self, params: SearchParams) -> Query<PagedList<MediaSummary>> {
        self.query(hooks::search_movies(self.client(), params))
    }

    pub fn search_tv(&self, params: SearchParams) -> Query<PagedList<MediaSummary>> {
        self.query(hooks::search_tv(self.client(), params))
    }

    pub fn movie_details(&self, id: u64, params: GetMediaDetailsParams) -> Query<Movie> {
        self.query(hooks::movie_details(self.client(), id, params))
    }

    pub fn tv_details(&self, id: u64, params: GetMediaDetailsParams) -> Query<TvShow> {
        self.query(hooks::tv_details(self.client(), id, params))
    }

    pub fn omdb_details(&self, imdb_id: &str) -> Query<OmdbDetails> {
        self.query(hooks::omdb_details(self.client(), imdb_id))
    }

    // ── Library ──────────────────────────────────────────────────────

    pub fn tags(&self, query: TagQuery) -> Query<PagedList<Tag>> {
        self.query(hooks::tags(self.client(), query))
    }

    pub fn tag(&self, id: u64) -> Query<Tag> {
        self.query(hooks::tag(self.client(), id))
    }

    pub fn logs(&self, query: LogQuery) -> Query<PagedList<LogEntry>> {
        self.query(hooks::logs(self.client(), query))
    }

    pub fn tasks(&self) -> Query<Vec<TaskStatus>> {
        self.query(hooks::tasks(self.client()))
    }

    pub fn task_status(&self, task_id: &str) -> Query<TaskStatus> {
        self.query(hooks::task_status(self.client(), task_id))
    }

    pub fn documents(&self, query: DocumentQuery) -> Query<Vec<DocumentEntry>> {
        self.query(hooks::documents(self.client(), query))
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub fn create_tag(&self) -> Mutation<CreateTag, Tag> {
        hooks::create_tag(self.client())
    }

    pub fn update_tag(&self) -> Mutation<(u64, UpdateTag), Tag> {
        hooks::update_tag(self.client())
    }

    pub fn delete_tag(&self) -> Mutation<u64, ()> {
        hooks::delete_tag(self.client())
    }

    pub fn upload_file(&self) -> Mutation<UploadRequest, UploadResult> {
        hooks::upload_file(self.client())
    }

    pub fn send_notification(&self) -> Mutation<TelegramMessage, ()> {
        hooks::send_notification(self.client())
    }
}

// ── Background tasks ─────────────────────────────────────────────────

async fn gc_task(cache: Arc<QueryCache>, every: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(every);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let evicted = cache.collect_garbage();
                if evicted > 0 {
                    debug!(evicted, remaining = cache.len(), "cache collected");
                }
            }
        }
    }
}
