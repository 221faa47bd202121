#![allow(clippy::unwrap_used)]
// End-to-end tests for `MediaDeck` hooks against a wiremock server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mediadeck_core::hooks::keys;
use mediadeck_core::models::{CreateTag, SearchParams, TagQuery};
use mediadeck_core::{ClientConfig, MediaDeck, MutationStatus, QueryError, QueryStatus};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MediaDeck) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(Url::parse(&server.uri()).unwrap())
        .with_token(SecretString::from("t0ken".to_string()));
    let deck = MediaDeck::new(&config).unwrap();
    (server, deck)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "success",
        "data": data,
        "messages": null
    }))
}

fn tag_page(names: &[&str]) -> serde_json::Value {
    let items: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "id": i + 1, "name": name }))
        .collect();
    json!({
        "items": items,
        "pageNumber": 1,
        "pageSize": 20,
        "totalCount": names.len(),
        "totalPages": 1
    })
}

// ── Queries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_query_uses_session_token() {
    let (server, deck) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ok(json!({ "movieCount": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let stats = deck.dashboard_stats();
    let data = stats.load().await.unwrap();
    assert_eq!(data.movie_count, 42);
    assert_eq!(stats.snapshot().status, QueryStatus::Success);
}

#[tokio::test]
async fn test_two_hooks_on_one_key_issue_one_request() {
    let (server, deck) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tmdb/search/movie"))
        .and(query_param("query", "dune"))
        .respond_with(
            ok(json!({
                "items": [{ "id": 438631, "title": "Dune", "kind": "movie" }],
                "pageNumber": 1,
                "pageSize": 20,
                "totalCount": 1,
                "totalPages": 1
            }))
            .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let first = deck.search_movies(SearchParams::new("dune"));
    let second = deck.search_movies(SearchParams::new("dune"));
    let (a, b) = tokio::join!(first.load(), second.load());

    assert_eq!(a.unwrap().items[0].title, "Dune");
    assert_eq!(b.unwrap().total_count, 1);
}

#[tokio::test]
async fn test_blank_search_sends_nothing() {
    let (server, deck) = setup().await;

    let search = deck.search_movies(SearchParams::new("   "));
    assert_eq!(search.load().await.unwrap_err(), QueryError::Disabled);
    assert_eq!(search.snapshot().status, QueryStatus::Idle);

    let task = deck.task_status("");
    assert!(!task.is_enabled());

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_application_error_reaches_snapshot() {
    let (server, deck) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tags/404"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "data": null,
            "messages": ["X not found"]
        })))
        .mount(&server)
        .await;

    let tag = deck.tag(404);
    let err = tag.load().await.unwrap_err();
    assert_eq!(err.messages(), ["X not found".to_string()]);

    let snapshot = tag.snapshot();
    assert!(snapshot.is_error());
    assert!(snapshot.data.is_none());
}

// ── Mutations & invalidation ────────────────────────────────────────

#[tokio::test]
async fn test_mutation_then_explicit_invalidation() {
    let (server, deck) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ok(tag_page(&["anime"])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/tags"))
        .respond_with(ok(json!({ "id": 2, "name": "4k" })))
        .expect(1)
        .mount(&server)
        .await;

    let tags = deck.tags(TagQuery::default());
    assert_eq!(tags.load().await.unwrap().items.len(), 1);

    let create = deck.create_tag();
    let created = create
        .mutate(CreateTag {
            name: "4k".into(),
            color: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 2);
    assert_eq!(create.snapshot().status, MutationStatus::Success);

    // The mutation leaves the cached list alone.
    assert_eq!(tags.snapshot().data.unwrap().items.len(), 1);

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ok(tag_page(&["anime", "4k"])))
        .mount(&server)
        .await;

    let mut updates = tags.watch();
    assert_eq!(deck.invalidate_tag(keys::TAGS), 1);
    loop {
        let snapshot = updates.changed().await.unwrap();
        if snapshot.data_update_count == 2 {
            assert_eq!(snapshot.data.unwrap().items.len(), 2);
            break;
        }
    }
}

#[tokio::test]
async fn test_logout_drops_authorization() {
    let (server, deck) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    deck.logout();
    assert!(!deck.is_authenticated());
    deck.tasks().load().await.unwrap();

    deck.login(SecretString::from("fresh".to_string()));
    deck.tasks().load().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        requests[1].headers.get("authorization").unwrap(),
        "Bearer fresh"
    );
}

#[tokio::test]
async fn test_shutdown_stops_collector() {
    let (_server, deck) = setup().await;
    deck.start();
    deck.start();
    deck.shutdown().await;
    assert!(deck.cache().is_empty());
}
