//! When the role callback cannot produce an answer, the public tier is served.

use crate::common::*;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::json;
use std::time::{Duration, Instant};
use tiergate_core::DELEGATED_COOKIE_NAME;

async fn spawn_role_endpoint(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/role", addr)
}

fn admin_claim() -> axum::Json<serde_json::Value> {
    axum::Json(json!({ "role": "admin", "username": "alice", "isAdmin": true }))
}

#[tokio::test]
async fn test_auth_server_down_serves_public() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (_dir, content) = content_dir();
    let gateway = spawn_gateway(
        format!("http://{}/api/role", addr),
        Duration::from_secs(2),
        content,
    )
    .await;

    let text = fetch_content(&gateway, Some("any-token")).await;
    assert!(text.contains(PUBLIC_MARKER));
}

#[tokio::test]
async fn test_slow_role_endpoint_is_bounded() {
    let role_url = spawn_role_endpoint(Router::new().route(
        "/api/role",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            admin_claim()
        }),
    ))
    .await;

    let (_dir, content) = content_dir();
    let gateway = spawn_gateway(role_url, Duration::from_millis(300), content).await;

    let started = Instant::now();
    let text = fetch_content(&gateway, Some("any-token")).await;
    assert!(text.contains(PUBLIC_MARKER));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_error_status_serves_public_even_with_admin_body() {
    let role_url = spawn_role_endpoint(Router::new().route(
        "/api/role",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, admin_claim()) }),
    ))
    .await;

    let (_dir, content) = content_dir();
    let gateway = spawn_gateway(role_url, Duration::from_secs(2), content).await;

    let text = fetch_content(&gateway, Some("any-token")).await;
    assert!(text.contains(PUBLIC_MARKER));
}

#[tokio::test]
async fn test_malformed_role_body_serves_public() {
    let role_url = spawn_role_endpoint(Router::new().route(
        "/api/role",
        get(|| async { "{\"role\": \"admin\"" }),
    ))
    .await;

    let (_dir, content) = content_dir();
    let gateway = spawn_gateway(role_url, Duration::from_secs(2), content).await;

    let text = fetch_content(&gateway, Some("any-token")).await;
    assert!(text.contains(PUBLIC_MARKER));
}

#[tokio::test]
async fn test_concurrent_callers_do_not_share_bearers() {
    let stack = Stack::start().await;
    let admin = cookie_value(&stack.session_cookie(ADMIN).await, DELEGATED_COOKIE_NAME);
    let public = cookie_value(
        &stack.session_cookie(PUBLIC_USER).await,
        DELEGATED_COOKIE_NAME,
    );

    let mut handles = Vec::new();
    for i in 0..20 {
        let gateway_url = stack.gateway_url.clone();
        let bearer = match i % 3 {
            0 => Some(admin.clone()),
            1 => Some(public.clone()),
            _ => None,
        };
        handles.push(tokio::spawn(async move {
            let is_admin = i % 3 == 0;
            let text = fetch_content(&gateway_url, bearer.as_deref()).await;
            (is_admin, text)
        }));
    }

    for handle in handles {
        let (is_admin, text) = handle.await.unwrap();
        if is_admin {
            assert!(text.contains(SECRET_MARKER));
        } else {
            assert!(text.contains(PUBLIC_MARKER));
        }
    }
}
