//! Wire-level tests against the full router.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use firework_api::{build_router, AppState};
use firework_core::{BrokerService, Dispatcher, DispatcherConfig};
use firework_infrastructure::{InMemoryTopicRepository, ReqwestTransport, StaticKeyRepository};

const REQ_KEY: &str = "8CF4DF549391B";

fn app() -> Router {
    let keys = StaticKeyRepository::from_config(&[REQ_KEY.to_string()]).unwrap();
    let transport = ReqwestTransport::new(Duration::from_millis(200), "firework-test").unwrap();
    let dispatcher = Dispatcher::new(
        Arc::new(transport),
        DispatcherConfig {
            timeout: Duration::from_millis(200),
            ..DispatcherConfig::default()
        },
    );
    let broker = BrokerService::new(
        Arc::new(InMemoryTopicRepository::new()),
        Arc::new(keys),
        dispatcher,
    );
    broker
        .provision_topics(&["TOPIC1".to_string(), "TOPIC2".to_string()])
        .unwrap();

    build_router(AppState::new(Arc::new(broker)))
}

async fn call(app: &Router, method: Method, uri: &str, body: Body, json: bool) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if json {
        request = request.header("content-type", "application/json");
    }

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    call(app, Method::GET, uri, Body::empty(), false).await
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, method, uri, Body::from(body.to_string()), true).await
}

fn assert_error(status: StatusCode, body: &Value, expected: StatusCode, code: &str) {
    assert_eq!(status, expected, "{}", body);
    assert_eq!(body["success"], false);
    assert_eq!(body["payload"]["code"], code);
    assert!(body["timestamp"].is_i64());
}

#[tokio::test]
async fn list_topics_returns_envelope() {
    let app = app();

    let (status, body) = get(&app, "/topic").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["payload"],
        json!([{"name": "TOPIC1", "message": []}, {"name": "TOPIC2", "message": []}])
    );
    assert!(body["timestamp"].is_i64());
}

#[tokio::test]
async fn publish_then_read_back() {
    let app = app();

    let (status, body) = call(
        &app,
        Method::POST,
        "/topic/TOPIC1",
        Body::from(r#"{"key1":"value1"}"#),
        false,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"], true);

    let (_, body) = get(&app, "/topic/TOPIC1").await;
    assert_eq!(body["payload"], json!({"name": "TOPIC1", "message": [r#"{"key1":"value1"}"#]}));
}

#[tokio::test]
async fn publish_to_unknown_topic_is_not_accepted() {
    let app = app();

    let (status, body) = call(&app, Method::POST, "/topic/GHOST", Body::from("hello"), false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"], false);

    let (status, body) = get(&app, "/topic/GHOST").await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "00002");
    assert_eq!(body["payload"]["message"], "request does not exists");
    assert_eq!(body["payload"]["method"], "GET");
    assert_eq!(body["payload"]["path"], "/topic/GHOST");
}

#[tokio::test]
async fn publish_empty_body_is_not_accepted() {
    let app = app();

    let (status, body) = call(&app, Method::POST, "/topic/TOPIC1", Body::empty(), false).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"], false);
}

#[tokio::test]
async fn publish_non_utf8_body_is_unexpected() {
    let app = app();

    let (status, body) = call(
        &app,
        Method::POST,
        "/topic/TOPIC1",
        Body::from(vec![0xff, 0xfe, 0xfd]),
        false,
    )
    .await;

    assert_error(status, &body, StatusCode::INTERNAL_SERVER_ERROR, "00000");
    assert_eq!(body["payload"]["message"], "INTERNAL_SERVER_ERROR");
}

#[tokio::test]
async fn subscribe_and_unsubscribe() {
    let app = app();
    let request = json!({"reqKey": REQ_KEY, "url": "http://127.0.0.1:9/hit/me", "method": "POST"});

    let (status, body) = send_json(&app, Method::POST, "/topic/TOPIC1/subscriber", request.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let handle = body["payload"].as_str().unwrap().to_string();
    assert!(!handle.is_empty());

    let (status, body) = send_json(&app, Method::POST, "/topic/TOPIC1/subscriber", request).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "00004");

    let uri = format!("/topic/TOPIC1/subscriber/{}", handle);
    let (status, body) = call(&app, Method::DELETE, &uri, Body::empty(), false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"], true);

    let (status, body) = call(&app, Method::DELETE, &uri, Body::empty(), false).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "00005");
    assert_eq!(body["payload"]["method"], "DELETE");
}

#[tokio::test]
async fn subscribe_with_invalid_key() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/topic/GHOST/subscriber",
        json!({"reqKey": "INVALID_REQ_KEY", "url": "http://a.example/x", "method": "POST"}),
    )
    .await;

    assert_error(status, &body, StatusCode::BAD_REQUEST, "00003");
    assert_eq!(body["payload"]["message"], "you sent the invalid request key");
}

#[tokio::test]
async fn invalid_key_wins_over_malformed_url_and_method() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/topic/TOPIC1/subscriber",
        json!({"reqKey": "INVALID_REQ_KEY", "url": "not a url", "method": "CONNECT"}),
    )
    .await;

    assert_error(status, &body, StatusCode::BAD_REQUEST, "00003");
}

#[tokio::test]
async fn subscribe_with_malformed_payload_is_unexpected() {
    let app = app();

    for payload in [
        json!({"url": "http://a.example/x", "method": "POST"}),
        json!({"reqKey": REQ_KEY, "url": "not a url", "method": "POST"}),
        json!({"reqKey": REQ_KEY, "url": "http://a.example/x", "method": "CONNECT"}),
    ] {
        let (status, body) = send_json(&app, Method::POST, "/topic/TOPIC1/subscriber", payload).await;
        assert_error(status, &body, StatusCode::INTERNAL_SERVER_ERROR, "00000");
    }
}

#[tokio::test]
async fn create_topic_requires_key_and_valid_name() {
    let app = app();

    let (status, body) = send_json(&app, Method::PUT, "/topic/ALERTS", json!({"reqKey": REQ_KEY})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"], true);

    let (_, body) = send_json(&app, Method::PUT, "/topic/ALERTS", json!({"reqKey": REQ_KEY})).await;
    assert_eq!(body["payload"], false);

    let (status, body) = send_json(&app, Method::PUT, "/topic/OTHER", json!({"reqKey": "nope"})).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "00003");

    let (status, body) = send_json(&app, Method::PUT, "/topic/bad%20name", json!({"reqKey": REQ_KEY})).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST, "00006");
}

#[tokio::test]
async fn health_endpoints() {
    let app = app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&app, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topics"], 2);
}
