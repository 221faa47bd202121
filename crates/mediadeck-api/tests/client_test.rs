#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` and the service modules using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mediadeck_api::models::{
    CreateTag, GetMediaDetailsParams, SearchParams, TagQuery, TaskState, TelegramMessage,
    UploadRequest,
};
use mediadeck_api::{ApiClient, ApiResult, AuthSession, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient, AuthSession) {
    let server = MockServer::start().await;
    let session = AuthSession::new();
    let client =
        ApiClient::from_reqwest(&server.uri(), reqwest::Client::new(), Arc::new(session.clone()))
            .unwrap();
    (server, client, session)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "success",
        "data": data,
        "messages": null
    }))
}

// ── Transport & auth ────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_attached_when_logged_in() {
    let (server, client, session) = setup().await;
    session.login(SecretString::from("s3cret".to_string()));

    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ok(json!({ "movieCount": 12, "tvShowCount": 3, "activeDownloads": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let stats = client.dashboard_stats().await.unwrap().into_result().unwrap();
    assert_eq!(stats.movie_count, 12);
    assert_eq!(stats.tv_show_count, 3);
    assert_eq!(stats.active_downloads, 1);
}

#[tokio::test]
async fn test_no_auth_header_after_logout() {
    let (server, client, session) = setup().await;
    session.login(SecretString::from("s3cret".to_string()));
    session.logout();

    Mock::given(method("GET"))
        .and(path("/api/dashboard/system-resources"))
        .respond_with(ok(json!({ "cpuPercent": 12.5, "memoryUsedBytes": 512, "memoryTotalBytes": 1024 })))
        .mount(&server)
        .await;

    let resources = client.system_resources().await.unwrap().into_result().unwrap();
    assert_eq!(resources.memory_percent(), Some(50.0));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_application_error_is_not_a_transport_error() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tags/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "data": null,
            "messages": ["X not found"]
        })))
        .mount(&server)
        .await;

    let result = client.get_tag(99).await.unwrap();
    assert!(!result.is_success());
    assert!(result.data().is_none());
    assert_eq!(result.messages(), ["X not found".to_string()]);
}

#[tokio::test]
async fn test_non_2xx_is_normalized_into_failure() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/omdb/tt0000000"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "error",
            "data": null,
            "messages": ["Title not found"]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let ApiResult::Failure(not_found) = client.omdb_details("tt0000000").await.unwrap() else {
        panic!("expected failure");
    };
    assert!(not_found.is_not_found());
    assert_eq!(not_found.messages, vec!["Title not found".to_string()]);

    let ApiResult::Failure(unavailable) = client.list_tasks().await.unwrap() else {
        panic!("expected failure");
    };
    assert_eq!(unavailable.http_status, Some(503));
    assert_eq!(
        unavailable.messages,
        vec!["HTTP 503 Service Unavailable: maintenance".to_string()]
    );
}

#[tokio::test]
async fn test_malformed_body_is_a_retryable_transport_error() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let err = client.dashboard_stats().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got {err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_connection_refused_is_retryable() {
    // Grab a free port, then release it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client =
        ApiClient::from_reqwest(&uri, reqwest::Client::new(), Arc::new(AuthSession::new()))
            .unwrap();
    let err = client.dashboard_stats().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
    assert!(err.is_retryable());
}

// ── Service modules ─────────────────────────────────────────────────

#[tokio::test]
async fn test_list_tags_sends_paging_and_search() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .and(query_param("search", "anime"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "10"))
        .respond_with(ok(json!({
            "items": [{ "id": 11, "name": "anime", "mediaCount": 4 }],
            "pageNumber": 2,
            "pageSize": 10,
            "totalCount": 11,
            "totalPages": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = TagQuery {
        search: Some("anime".into()),
        page: 2,
        page_size: 10,
    };
    let page = client.list_tags(&query).await.unwrap().into_result().unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "anime");
    assert!(page.is_consistent());
}

#[tokio::test]
async fn test_create_and_delete_tag() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/tags"))
        .and(body_json(json!({ "name": "4k" })))
        .respond_with(ok(json!({ "id": 5, "name": "4k" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/tags/5"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create_tag(&CreateTag {
            name: "4k".into(),
            color: None,
        })
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(created.id, 5);

    let deleted = client.delete_tag(5).await.unwrap();
    assert_eq!(deleted, ApiResult::Success(()));
}

#[tokio::test]
async fn test_movie_details_requests_sub_resources() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tmdb/movie/438631"))
        .and(query_param("append_to_response", "external_ids,credits"))
        .respond_with(ok(json!({
            "id": 438631,
            "title": "Dune",
            "externalIds": { "imdbId": "tt1160419" },
            "credits": { "cast": [{ "id": 1, "name": "Timothée Chalamet", "character": "Paul" }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = GetMediaDetailsParams {
        external_ids: true,
        credits: true,
        ..GetMediaDetailsParams::default()
    };
    let movie = client
        .movie_details(438_631, params)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(movie.title, "Dune");
    assert_eq!(
        movie.external_ids.and_then(|ids| ids.imdb_id).as_deref(),
        Some("tt1160419")
    );
    assert_eq!(movie.credits.map(|c| c.cast.len()), Some(1));
    assert!(movie.images.is_none());
}

#[tokio::test]
async fn test_search_movies_trims_query() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tmdb/search/movie"))
        .and(query_param("query", "arrival"))
        .and(query_param("page", "1"))
        .respond_with(ok(json!({
            "items": [{ "id": 329865, "title": "Arrival", "kind": "movie", "releaseDate": "2016-11-10" }],
            "pageNumber": 1,
            "pageSize": 20,
            "totalCount": 1,
            "totalPages": 1
        })))
        .mount(&server)
        .await;

    let page = client
        .search_movies(&SearchParams::new("  arrival "))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(page.items[0].year(), Some("2016"));
}

#[tokio::test]
async fn test_task_status() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks/scan-42"))
        .respond_with(ok(json!({
            "id": "scan-42",
            "name": "Library scan",
            "state": "running",
            "progress": 40.0
        })))
        .mount(&server)
        .await;

    let task = client
        .task_status("scan-42")
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(task.state, TaskState::Running);
    assert!(!task.state.is_terminal());
    assert_eq!(task.progress, Some(40.0));
}

#[tokio::test]
async fn test_string_ids_stay_in_one_path_segment() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks/a%2Fb"))
        .respond_with(ok(json!({ "id": "a/b", "name": "Import", "state": "pending" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/omdb/x%3Fy"))
        .respond_with(ok(json!({ "imdbId": "x?y", "title": "Odd" })))
        .expect(1)
        .mount(&server)
        .await;

    let task = client
        .task_status("a/b")
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(task.id, "a/b");

    let omdb = client
        .omdb_details("x?y")
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(omdb.title, "Odd");

    // A traversal attempt must not reach another endpoint.
    let escaped = client.task_status("../dashboard/stats").await.unwrap();
    assert!(matches!(escaped, ApiResult::Failure(_)));
    let received = server.received_requests().await.unwrap();
    assert!(
        received
            .iter()
            .all(|r| !r.url.path().starts_with("/api/dashboard")),
        "request escaped its segment: {received:?}"
    );

    assert!(matches!(client.task_status("..").await, Err(Error::Encode(_))));
}

#[tokio::test]
async fn test_send_notification() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/telegram/send"))
        .and(body_json(json!({ "text": "download finished", "silent": false })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .send_notification(&TelegramMessage::text("download finished"))
        .await
        .unwrap();
    assert!(result.is_success());
}

#[tokio::test]
async fn test_upload_file_sends_multipart() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/uploads"))
        .respond_with(ok(json!({ "path": "/media/inbox/notes.txt", "sizeBytes": 5 })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .upload_file(UploadRequest {
            file_name: "notes.txt".into(),
            content_type: Some("text/plain".into()),
            bytes: b"hello".to_vec(),
            destination: Some("/media/inbox".into()),
        })
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(result.size_bytes, 5);

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("filename=\"notes.txt\""));
    assert!(body.contains("/media/inbox"));
}
