//! HTTP API driven through the router without binding a socket.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use ccman::projector::{SettingsProjector, ENV_API_KEY};
use ccman::server::{app, API_PREFIX};
use ccman::store::ProfileStore;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn router() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let store = ProfileStore::open(
        dir.path().join("api_configs.json"),
        SettingsProjector::new(dir.path().join("settings.json")),
    );
    (dir, app(Arc::new(store)))
}

async fn send(router: &Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let resp = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn api(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

async fn create(router: &Router, name: &str, key: &str) -> Value {
    let (status, body) = send(
        router,
        Method::POST,
        &api("/profiles"),
        Some(json!({"name": name, "api_key": key, "base_url": "https://api.example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn root_and_health_describe_the_service() {
    let (_dir, router) = router();
    let (status, body) = send(&router, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "ccman");
    assert_eq!(body["endpoints"]["api_config"], API_PREFIX);

    let (status, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn create_list_and_apply_profiles() {
    let (dir, router) = router();
    let prod = create(&router, "prod", "sk-prod-0123456789").await;
    assert_eq!(prod["is_active"], true);
    let staging = create(&router, "staging", "sk-stage-0123456789").await;
    assert_eq!(staging["is_active"], false);

    let (status, listing) = send(&router, Method::GET, &api("/profiles"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total_count"], 2);
    assert_eq!(listing["active_profile_id"], prod["id"]);

    let staging_id = staging["id"].as_str().unwrap();
    let (status, applied) = send(
        &router,
        Method::POST,
        &api(&format!("/profiles/{staging_id}/apply")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(applied["success"], true);
    assert_eq!(applied["applied_profile"]["id"], staging_id);
    assert_eq!(applied["applied_profile"]["is_active"], true);

    let settings: Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("settings.json")).unwrap()).unwrap();
    assert_eq!(settings["env"][ENV_API_KEY], "sk-stage-0123456789");

    let (_, current) = send(&router, Method::GET, &api("/current"), None).await;
    assert_eq!(current["profile_name"], "staging");
    assert_eq!(current["api_key"], "sk-stage-0123456789");
}

#[tokio::test]
async fn error_statuses_follow_the_failure_kind() {
    let (_dir, router) = router();
    create(&router, "prod", "sk-prod-0123456789").await;

    let (status, body) = send(
        &router,
        Method::POST,
        &api("/profiles"),
        Some(json!({"name": "prod", "api_key": "sk-x-0123456789", "base_url": "https://x.io"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("prod"));

    let (status, body) = send(
        &router,
        Method::POST,
        &api("/profiles"),
        Some(json!({"name": "short", "api_key": "sk-1", "base_url": "https://x.io"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, body) = send(&router, Method::DELETE, &api("/profiles/nope"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "profile not found");

    let (status, _) = send(&router, Method::POST, &api("/profiles/nope/apply"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_and_delete_report_success() {
    let (_dir, router) = router();
    let prod = create(&router, "prod", "sk-prod-0123456789").await;
    let id = prod["id"].as_str().unwrap();

    let (status, body) = send(
        &router,
        Method::PUT,
        &api(&format!("/profiles/{id}")),
        Some(json!({"name": "production"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(&router, Method::DELETE, &api(&format!("/profiles/{id}")), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, status_body) = send(&router, Method::GET, &api("/status"), None).await;
    assert_eq!(status_body["status"], "running");
    assert_eq!(status_body["api_config_count"], 0);
    assert!(status_body["active_profile_id"].is_null());
}

#[tokio::test]
async fn backup_returns_the_backup_location() {
    let (_dir, router) = router();
    create(&router, "prod", "sk-prod-0123456789").await;
    let (status, body) = send(&router, Method::POST, &api("/backup"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("api_configs.bak."));
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let (_dir, router) = router();
    let resp = router
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri(api("/profiles"))
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
