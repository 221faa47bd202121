// ── Use-case hooks ──
//
// One descriptor constructor per server use case. Each fixes the cache
// key, the freshness and polling policy, and the parameter gate.
// `MediaDeck` mounts them as `Query` values; the constructors are public
// so callers can tweak a descriptor before mounting it.

mod dashboard;
mod library;
mod media;
mod torrents;

use std::future::Future;
use std::time::Duration;

use mediadeck_api::{ApiClient, ApiResult};

use crate::cache::QueryKey;
use crate::query::{QueryDescriptor, QueryOptions};

pub use dashboard::{dashboard_stats, system_resources};
pub use library::{
    create_tag, delete_tag, documents, logs, send_notification, tag, tags, task_status, tasks,
    update_tag, upload_file,
};
pub use media::{movie_details, omdb_details, search_movies, search_tv, tv_details};
pub use torrents::{indexer_providers, indexer_search, yts_details, yts_search};

// ── Policy ───────────────────────────────────────────────────────────

pub const DASHBOARD_POLL_INTERVAL: Duration = Duration::from_secs(20);
pub const SYSTEM_RESOURCES_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const LOGS_STALE_TIME: Duration = Duration::from_secs(5 * 60);
pub const TASK_STATUS_STALE_TIME: Duration = Duration::from_secs(5);

/// Cache key tags, one per use case.
pub mod keys {
    pub const DASHBOARD_STATS: &str = "dashboard-stats";
    pub const SYSTEM_RESOURCES: &str = "system-resources";
    pub const INDEXER_PROVIDERS: &str = "indexer-providers";
    pub const INDEXER_SEARCH: &str = "indexer-search";
    pub const TAGS: &str = "tags";
    pub const TAG: &str = "tag";
    pub const SEARCH_MOVIES: &str = "search-movies";
    pub const SEARCH_TV: &str = "search-tv";
    pub const MOVIE_DETAILS: &str = "movie-details";
    pub const TV_DETAILS: &str = "tv-details";
    pub const LOGS: &str = "logs";
    pub const TASKS: &str = "tasks";
    pub const TASK_STATUS: &str = "task-status";
    pub const YTS_SEARCH: &str = "yts-search";
    pub const YTS_DETAILS: &str = "yts-details";
    pub const OMDB_DETAILS: &str = "omdb-details";
    pub const DOCUMENTS: &str = "documents";
}

/// Bind a service call to a key. `call` gets its own client handle and a
/// clone of `params` on every fetch.
fn describe<T, P, F, Fut>(
    client: &ApiClient,
    key: QueryKey,
    options: QueryOptions,
    params: P,
    call: F,
) -> QueryDescriptor<T>
where
    T: Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
    F: Fn(ApiClient, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ApiResult<T>, mediadeck_api::Error>> + Send + 'static,
{
    let client = client.clone();
    QueryDescriptor::new(key, options, move || call(client.clone(), params.clone()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use mediadeck_api::models::{GetMediaDetailsParams, LogQuery, SearchParams};
    use mediadeck_api::{AuthSession, TransportConfig};

    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(
            "http://localhost:8080",
            &TransportConfig::default(),
            Arc::new(AuthSession::new()),
        )
        .unwrap()
    }

    #[test]
    fn policy_table() {
        let client = client();

        let stats = dashboard_stats(&client).options();
        assert_eq!(stats.poll_interval, Some(Duration::from_secs(20)));
        assert_eq!(stats.stale_time, Duration::ZERO);

        let resources = system_resources(&client).options();
        assert_eq!(resources.poll_interval, Some(Duration::from_secs(30)));

        let logs = logs(&client, LogQuery::default()).options();
        assert_eq!(logs.stale_time, Duration::from_secs(300));
        assert_eq!(logs.poll_interval, None);

        let task = task_status(&client, "scan-1").options();
        assert_eq!(task.stale_time, Duration::from_secs(5));

        let tags = tags(&client, mediadeck_api::models::TagQuery::default()).options();
        assert_eq!(tags, QueryOptions::default());
    }

    #[test]
    fn missing_parameters_disable_the_query() {
        let client = client();
        assert!(!search_movies(&client, SearchParams::new("  ")).options().enabled);
        assert!(search_movies(&client, SearchParams::new("dune")).options().enabled);
        assert!(!task_status(&client, "").options().enabled);
        assert!(!tag(&client, 0).options().enabled);
        assert!(!omdb_details(&client, " ").options().enabled);
        assert!(!movie_details(&client, 0, GetMediaDetailsParams::default()).options().enabled);
        assert!(!search_tv(&client, SearchParams::new("severance")).enabled_if(false).options().enabled);
    }

    #[test]
    fn keys_follow_parameters() {
        let client = client();
        let a = search_movies(&client, SearchParams::new("a"));
        let b = search_movies(&client, SearchParams::new("b"));
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key().tag(), keys::SEARCH_MOVIES);
        assert_eq!(
            a.key(),
            search_movies(&client, SearchParams::new("a")).key()
        );
        assert_ne!(
            movie_details(&client, 1, GetMediaDetailsParams::default()).key(),
            movie_details(&client, 1, GetMediaDetailsParams::all()).key()
        );
    }
}
