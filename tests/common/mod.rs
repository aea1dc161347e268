#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    routing::post,
};
use serde_json::Value;
use url::Url;

/// What the mock backend saw.
#[derive(Clone, Default)]
pub struct Seen(Arc<Mutex<Vec<(HeaderMap, Value)>>>);

impl Seen {
    pub fn requests(&self) -> Vec<(HeaderMap, Value)> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

/// Start a connect backend answering every request with `status` + `body`.
pub async fn spawn_backend(status: StatusCode, body: &'static str) -> (Url, Seen) {
    spawn_backend_with_delay(status, body, Duration::ZERO).await
}

pub async fn spawn_backend_with_delay(
    status: StatusCode,
    body: &'static str,
    delay: Duration,
) -> (Url, Seen) {
    let seen = Seen::default();
    let recorder = seen.clone();

    let app = Router::new().route(
        "/connect",
        post(move |headers: HeaderMap, Json(req): Json<Value>| {
            let recorder = recorder.clone();
            async move {
                recorder.0.lock().unwrap().push((headers, req));
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let url = Url::parse(&format!("http://{addr}/connect")).unwrap();
    (url, seen)
}

/// An endpoint nothing listens on.
pub async fn dead_endpoint() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/connect")).unwrap()
}
