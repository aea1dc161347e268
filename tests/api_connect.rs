mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use connect_proxy::{app, config::Config};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

use common::{dead_endpoint, spawn_backend};

fn router(endpoint: &Url, headers: &str) -> Router {
    let endpoint = endpoint.to_string();
    let headers = headers.to_string();
    let config = Config::from_lookup(|key| match key {
        "PROXY_CONNECT_ENDPOINT" => Some(endpoint.clone()),
        "PROXY_HTTP_HEADERS" => Some(headers.clone()),
        _ => None,
    })
    .unwrap();

    let state = app::build_state(&config).unwrap();
    app::build_router(state, &config)
}

async fn post_connect(router: Router, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/connect")
        .header("content-type", "application/json")
        .header("cookie", "sid=xyz")
        .header("user-agent", "test")
        .body(Body::from(body.to_string()))
        .unwrap();

    let res = router.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_is_ok() {
    let router = router(&dead_endpoint().await, "");
    let req = Request::builder()
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();

    let res = router.oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "ok", "service": "connect-proxy"}));
}

#[tokio::test]
async fn binary_encoding_name_reaches_backend() {
    let (url, seen) = spawn_backend(
        StatusCode::OK,
        r#"{"result":{"user":"u2","b64info":"eyJ4IjoxfQ=="}}"#,
    )
    .await;

    let (status, body) = post_connect(
        router(&url, ""),
        json!({
            "client": "c2",
            "transport": {"name": "websocket", "protocol": "protobuf", "encoding": "binary"},
            "b64data": "CAE="
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": {"user": "u2", "b64info": "eyJ4IjoxfQ=="}}));

    let requests = seen.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0].1;
    assert_eq!(req["encoding"], "binary");
    assert_eq!(req["protocol"], "protobuf");
    assert_eq!(req["b64data"], "CAE=");
}

#[tokio::test]
async fn accept_returns_user_and_base64_info() {
    let (url, seen) = spawn_backend(
        StatusCode::OK,
        r#"{"result":{"user":"u1","info":{"x":1}}}"#,
    )
    .await;

    let (status, body) = post_connect(
        router(&url, "cookie"),
        json!({
            "client": "c1",
            "transport": {"name": "websocket", "protocol": "json", "encoding": "json"},
            "data": {"room": "lobby"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": {"user": "u1", "b64info": "eyJ4IjoxfQ=="}}));

    let requests = seen.requests();
    assert_eq!(requests.len(), 1);
    let (headers, req) = &requests[0];
    assert_eq!(req["client"], "c1");
    assert_eq!(req["data"]["room"], "lobby");
    assert_eq!(headers.get("cookie").unwrap(), "sid=xyz");
    assert_ne!(headers.get("user-agent").map(|v| v.as_bytes()), Some("test".as_bytes()));
}

#[tokio::test]
async fn disconnect_is_returned_verbatim() {
    let (url, _) = spawn_backend(
        StatusCode::OK,
        r#"{"result":{"user":"u1"},"disconnect":{"code":4001,"reason":"banned"}}"#,
    )
    .await;

    let (status, body) = post_connect(
        router(&url, ""),
        json!({
            "client": "c1",
            "transport": {"name": "websocket", "protocol": "json", "encoding": "json"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"disconnect": {"code": 4001, "reason": "banned"}}));
}

#[tokio::test]
async fn unreachable_backend_is_opaque_internal_error() {
    let (status, body) = post_connect(
        router(&dead_endpoint().await, ""),
        json!({
            "client": "c1",
            "transport": {"name": "websocket", "protocol": "json", "encoding": "json"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"error": {"code": 100, "message": "internal server error"}})
    );
}

#[tokio::test]
async fn token_skips_backend() {
    let (url, seen) = spawn_backend(StatusCode::OK, r#"{"result":{"user":"u1"}}"#).await;

    let (status, body) = post_connect(
        router(&url, ""),
        json!({
            "client": "c1",
            "token": "pre-issued",
            "transport": {"name": "websocket", "protocol": "json", "encoding": "json"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
    assert_eq!(seen.count(), 0);
}

#[tokio::test]
async fn invalid_b64data_is_bad_request() {
    let (url, seen) = spawn_backend(StatusCode::OK, "{}").await;

    let (status, body) = post_connect(
        router(&url, ""),
        json!({
            "client": "c1",
            "transport": {"name": "websocket", "protocol": "protobuf", "encoding": "protobuf"},
            "b64data": "***"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_CONNECT_EVENT");
    assert_eq!(seen.count(), 0);
}
