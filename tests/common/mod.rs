#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Once;
use tower::ServiceExt;
use venturehub::{config::Config, create_app, db, AppState};

static INIT: Once = Once::new();

fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

/// Router backed by a fresh, migrated in-memory SQLite database.
pub async fn test_app() -> (Router, AppState) {
    test_app_with(Config::for_tests()).await
}

pub async fn test_app_with(config: Config) -> (Router, AppState) {
    setup_tracing();
    let db = db::connect(&config).await.expect("in-memory database");
    let state = AppState::new(db, &config);
    (create_app(state.clone(), &config), state)
}

async fn into_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(Method::GET)
        .body(Body::empty())
        .unwrap();
    into_json(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    into_json(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn delete(app: &Router, uri: &str) -> StatusCode {
    let request = Request::builder()
        .uri(uri)
        .method(Method::DELETE)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

pub async fn post_csv(app: &Router, uri: &str, csv: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(Method::POST)
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(csv.to_string()))
        .unwrap();
    into_json(app.clone().oneshot(request).await.unwrap()).await
}

/// Raw text body, for the CSV template download.
pub async fn get_text(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, disposition, String::from_utf8(bytes.to_vec()).unwrap())
}
