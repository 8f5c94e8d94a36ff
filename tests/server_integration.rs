//! Router-level tests for the HTTP front-end, driven in-process.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pdfscrape::server::{AppState, router};

fn test_app() -> Router {
    router(AppState::default())
}

async fn json_post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_status_json(app: &Router) -> Value {
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_index_serves_dashboard_page() {
    let app = test_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("PDF Scraper"));
    assert!(html.contains("/status"), "page must poll the status endpoint");
}

#[tokio::test]
async fn test_status_starts_idle() {
    let app = test_app();
    let status = get_status_json(&app).await;

    assert_eq!(status["isRunning"], false);
    assert_eq!(status["isComplete"], false);
    assert_eq!(status["foundCount"], 0);
    assert_eq!(status["downloadedCount"], 0);
    assert_eq!(status["failedCount"], 0);
    assert!(status["outcomes"].as_array().unwrap().is_empty());
    assert!(status["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_start_without_url_is_rejected() {
    let app = test_app();

    for body in [json!({}), json!({"url": ""}), json!({"url": "   "})] {
        let (status, response) = json_post(&app, "/start", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "No URL provided");
    }
}

#[tokio::test]
async fn test_start_runs_and_status_reaches_completion() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<html><a href="/a.pdf">a</a></html>"#),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4"))
        .mount(&mock_server)
        .await;

    let app = test_app();
    let page_url = format!("{}/index.html", mock_server.uri());
    let folder = temp_dir.path().to_string_lossy().into_owned();

    let (status, response) =
        json_post(&app, "/start", json!({"url": page_url, "folder": folder})).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(response["status"], "started");

    // Poll like the dashboard does
    let mut snapshot = get_status_json(&app).await;
    for _ in 0..100 {
        if snapshot["isComplete"] == true {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        snapshot = get_status_json(&app).await;
    }

    assert_eq!(snapshot["isComplete"], true);
    assert_eq!(snapshot["isRunning"], false);
    assert_eq!(snapshot["foundCount"], 1);
    assert_eq!(snapshot["downloadedCount"], 1);
    assert_eq!(snapshot["failedCount"], 0);
    assert_eq!(snapshot["outcomes"][0]["name"], "a.pdf");
    assert!(temp_dir.path().join("a.pdf").exists());
}

#[tokio::test]
async fn test_start_while_running_is_rejected() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    // Slow page keeps the first run alive
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let app = test_app();
    let page_url = format!("{}/index.html", mock_server.uri());
    let folder = temp_dir.path().to_string_lossy().into_owned();

    let (status, _) =
        json_post(&app, "/start", json!({"url": page_url, "folder": folder})).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, response) =
        json_post(&app, "/start", json!({"url": page_url, "folder": "ignored"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Already running");

    // The active run is untouched
    let snapshot = get_status_json(&app).await;
    assert_eq!(snapshot["isRunning"], true);
}

#[tokio::test]
async fn test_scan_returns_pdfs_and_count() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html>
                <a href="/docs/a.pdf">a</a>
                <a href="https://elsewhere.org/b.pdf">b</a>
                <a href="/page.html">skip</a>
            </html>"#,
        ))
        .mount(&mock_server)
        .await;

    let app = test_app();
    let page_url = format!("{}/index.html", mock_server.uri());

    let (status, response) = json_post(&app, "/scan", json!({"url": page_url})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["count"], 2);
    assert_eq!(
        response["pdfs"][0]["url"],
        format!("{}/docs/a.pdf", mock_server.uri())
    );
    assert_eq!(response["pdfs"][0]["name"], "a.pdf");
    assert_eq!(response["pdfs"][1]["url"], "https://elsewhere.org/b.pdf");
}

#[tokio::test]
async fn test_scan_without_url_is_rejected() {
    let app = test_app();
    let (status, response) = json_post(&app, "/scan", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "No URL provided");
}

#[tokio::test]
async fn test_scan_fetch_failure_is_internal_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let app = test_app();
    let page_url = format!("{}/index.html", mock_server.uri());

    let (status, response) = json_post(&app, "/scan", json!({"url": page_url})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        response["error"].as_str().unwrap().contains("503"),
        "error must carry the fetch failure: {response}"
    );
}

#[tokio::test]
async fn test_scan_does_not_download_anything() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<html><a href="/a.pdf">a</a></html>"#),
        )
        .mount(&mock_server)
        .await;

    let app = test_app();
    let page_url = format!("{}/index.html", mock_server.uri());
    let (status, _) = json_post(&app, "/scan", json!({"url": page_url})).await;
    assert_eq!(status, StatusCode::OK);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "scan must only fetch the page itself");
}
