// End-to-end tests for the HTTP surface with a mocked action API and an in-memory store

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use wikigraph::server::{AppState, create_router};
use wikigraph_core::Explorer;
use wikigraph_core::data::Database;
use wikigraph_fetch::WikipediaClient;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, method, query_param},
};

fn app_for(api_url: &str) -> Router {
    let client = WikipediaClient::with_timeout(api_url, 2).unwrap();
    let state = AppState {
        explorer: Arc::new(Explorer::new(Arc::new(client))),
        store: Arc::new(Database::open_in_memory().unwrap()),
    };
    create_router(state, &["http://localhost:5173".to_string()])
}

fn app(server: &MockServer) -> Router {
    app_for(&format!("{}/w/api.php", server.uri()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    // Extractor rejections answer in plain text.
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn mount_python(server: &MockServer) {
    Mock::given(method("GET"))
        .and(query_param("action", "parse"))
        .and(query_param("page", "Python"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "parse": {
                "title": "Python",
                "text": {"*": "<p><a href=\"/wiki/Guido_van_Rossum\">Guido</a></p>"}
            }
        })))
        .mount(server)
        .await;

    for (title, extract) in [("Python", "A language."), ("Guido van Rossum", "A programmer.")] {
        Mock::given(method("GET"))
            .and(query_param("titles", title))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": {"pages": {"1": {"extract": extract}}}
            })))
            .mount(server)
            .await;
    }
}

// ============================================================================
// Search / Explore Tests
// ============================================================================

#[tokio::test]
async fn test_root() {
    let server = MockServer::start().await;
    let (status, body) = send(&app(&server), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"Hello": "World"}));
}

#[tokio::test]
async fn test_search_passthrough() {
    let server = MockServer::start().await;
    let payload = json!({"query": {"search": [{"title": "Rust", "snippet": "lang"}]}});
    Mock::given(query_param("srsearch", "Rust lang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
        .mount(&server)
        .await;

    let (status, body) = send(&app(&server), get("/api/search?term=Rust%20lang")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, payload);
}

#[tokio::test]
async fn test_explore_returns_scored_graph() {
    let server = MockServer::start().await;
    mount_python(&server).await;

    let (status, body) = send(&app(&server), get("/api/explore/Python?depth=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "nodes": [
                {"id": "Python", "label": "Python", "summary": "A language.", "degree_centrality": 1.0},
                {"id": "Guido van Rossum", "label": "Guido van Rossum", "summary": "A programmer.", "degree_centrality": 1.0}
            ],
            "edges": [{"from": "Python", "to": "Guido van Rossum"}]
        })
    );
}

#[tokio::test]
async fn test_explore_depth_defaults_to_one() {
    let server = MockServer::start().await;
    mount_python(&server).await;

    let (status, _) = send(&app(&server), get("/api/explore/Python")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_explore_depth_two_is_bad_request_without_fetching() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = send(&app(&server), get("/api/explore/Python?depth=2")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("depth=1"));
}

#[tokio::test]
async fn test_explore_unknown_article_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(query_param("action", "parse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": "missingtitle"}
        })))
        .mount(&server)
        .await;

    let (status, body) = send(&app(&server), get("/api/explore/Nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Article \"Nope\" not found.");
}

#[tokio::test]
async fn test_explore_provider_down_is_service_unavailable() {
    let server = MockServer::start().await;
    let url = format!("{}/w/api.php", server.uri());
    drop(server);

    let (status, _) = send(&app_for(&url), get("/api/explore/Python")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Snapshot Tests
// ============================================================================

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_snapshot_lifecycle() {
    let server = MockServer::start().await;
    let app = app(&server);

    let snapshot = json!({
        "name": "python",
        "nodes": [
            {"id": "Python", "label": "Python", "summary": "A language.", "degree_centrality": 1.0},
            {"id": "CPython", "label": "CPython", "summary": "An interpreter.", "degree_centrality": 1.0}
        ],
        "edges": [{"from": "Python", "to": "CPython"}]
    });

    let (status, created) = send(&app, post_json("/api/explorations", &snapshot)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "python");
    assert_eq!(created["nodes"], snapshot["nodes"]);
    assert_eq!(created["edges"], snapshot["edges"]);

    let (status, listed) = send(&app, get("/api/explorations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0], created);

    let (status, _) = send(&app, delete(&format!("/api/explorations/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = send(&app, get("/api/explorations")).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_delete_unknown_is_not_found_and_store_unchanged() {
    let server = MockServer::start().await;
    let app = app(&server);

    let snapshot = json!({"name": "kept", "nodes": [{"id": "A", "label": "A"}], "edges": []});
    send(&app, post_json("/api/explorations", &snapshot)).await;

    let (status, body) = send(&app, delete("/api/explorations/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("does-not-exist"));

    let (_, listed) = send(&app, get("/api/explorations")).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_snapshot_body_is_rejected() {
    let server = MockServer::start().await;
    let (status, _) = send(
        &app(&server),
        post_json("/api/explorations", &json!({"nodes": []})),
    )
    .await;
    assert!(status.is_client_error());
}
