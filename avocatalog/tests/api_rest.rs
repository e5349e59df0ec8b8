//! REST router tests, driven with `tower::ServiceExt::oneshot`

use avocatalog::api_rest::create_router;
use avocatalog::settings::{ApiSettings, CatalogSettings, LegacySettings, SiteSettings};
use avocatalog::{CatalogServerExt, CatalogService, CatalogState};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> CatalogSettings {
    CatalogSettings {
        api: ApiSettings {
            base_url: format!("{}/sites/", server.uri()),
            token: "secret".to_string(),
            site: "12".to_string(),
            timeout_secs: 5,
            ..Default::default()
        },
        legacy: LegacySettings {
            base_url: format!("{}/legacy/", server.uri()),
            user: "user".to_string(),
            password: "pass".to_string(),
        },
        site: SiteSettings {
            detail_page_id: "42".to_string(),
            detail_page_url: "https://example.org/watch/".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn router(server: &MockServer) -> Router {
    let service = CatalogService::new(settings(server)).unwrap();
    create_router(CatalogState::new(Arc::new(service)))
}

async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn mount_recording(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/legacy/recordings/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"recordings": {
                "id": "77",
                "title": "The Sabbath Rest",
                "description": "Rest",
                "presenters": [{"givenName": "Jane", "surname": "Smith"}],
                "mediaFiles": [{"streamURL": "https://cdn.example.org/high.mp4"}]
            }}]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_recordings_returns_formatted_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sites/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1, "title": "One Two", "duration": 61, "extra_key": true}],
            "meta": {"pagination": {"links": {"next": null}}}
        })))
        .mount(&mock_server)
        .await;

    let (status, body) = get(router(&mock_server), "/recordings?tags=a,b").await;
    assert_eq!(status, StatusCode::OK);

    let page: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(page["data"][0]["duration_formatted"], "01:01");
    assert_eq!(page["data"][0]["speaker_name"], "Anonymous Presenter");
    assert_eq!(page["data"][0]["sanitized_title"], "one-two");
    assert_eq!(page["data"][0]["extra_key"], true);
    assert_eq!(page["meta"]["pagination"]["links"]["next"], Value::Null);
}

#[tokio::test]
async fn test_proxy_rejects_foreign_url() {
    let mock_server = MockServer::start().await;

    let (status, body) = get(
        router(&mock_server),
        "/tags?url=https%3A%2F%2Fevil.example.com%2Fsites%2F12",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("evil.example.com"));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_proxy_forwards_trusted_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sites/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let next = format!("{}/sites/12?page=2", mock_server.uri());
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();

    let (status, body) = get(router(&mock_server), &format!("/tags?url={}", encoded)).await;
    assert_eq!(status, StatusCode::OK);
    let page: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(page["data"], json!([]));
}

#[tokio::test]
async fn test_get_recording_and_not_found() {
    let mock_server = MockServer::start().await;
    mount_recording(&mock_server).await;

    let app = router(&mock_server);
    let (status, body) = get(app.clone(), "/recordings/77").await;
    assert_eq!(status, StatusCode::OK);
    let recording: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(recording["title"], "The Sabbath Rest");

    let (status, _) = get(app, "/recordings/78").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_render_routes() {
    let mock_server = MockServer::start().await;
    mount_recording(&mock_server).await;
    let app = router(&mock_server);

    let (status, body) = get(app.clone(), "/render/title").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "No recording id");

    let (_, body) = get(app.clone(), "/render/title?recording_id=77").await;
    assert_eq!(body, "<h1>The Sabbath Rest</h1>");

    let (_, body) = get(app.clone(), "/render/speaker?recording_id=77").await;
    assert_eq!(body, "Jane Smith");

    let (_, body) = get(app.clone(), "/render/detail?recording_id=77").await;
    let fragments: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(fragments["description"], "Rest");
    assert!(fragments["media"].as_str().unwrap().contains("high.mp4"));

    let (_, body) = get(
        app.clone(),
        "/render/document-title?recording_id=77&page_id=42&title=Watch",
    )
    .await;
    assert_eq!(body, "The Sabbath Rest");

    let (_, body) = get(app.clone(), "/render/document-title?page_id=42&title=Watch").await;
    assert_eq!(body, "Watch");

    let (_, body) = get(app, "/render/language-attributes?attributes=lang%3D%22en%22").await;
    assert!(body.starts_with(r#"lang="en" xmlns:og="#));
}

#[tokio::test]
async fn test_cache_routes() {
    let mock_server = MockServer::start().await;
    mount_recording(&mock_server).await;
    let app = router(&mock_server);

    get(app.clone(), "/render/title?recording_id=77").await;

    let (_, body) = get(app.clone(), "/cache/stats").await;
    let stats: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(stats["entry_count"], 1);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cache/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let stats: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(stats["entry_count"], 0);
}

#[tokio::test]
async fn test_server_extension_mounts_api() {
    let mock_server = MockServer::start().await;
    mount_recording(&mock_server).await;

    let mut server = avoserver::Server::new("Test", "localhost", 0);
    server
        .init_catalog_with(settings(&mock_server))
        .await
        .unwrap();

    let app = server.router().await;
    let (status, body) = get(app.clone(), "/api/catalog/render/title?recording_id=77").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>The Sabbath Rest</h1>");

    let (status, body) = get(app, "/api-docs/catalog.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/render/head"));
}
