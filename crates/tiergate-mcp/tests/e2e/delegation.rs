//! The full delegation chain: login, chat, intermediary, gateway, role callback.

use crate::common::*;
use serde_json::{Value, json};
use tiergate_core::{ACCESS_COOKIE_NAME, DELEGATED_COOKIE_NAME};
use tiergate_token::Purpose;

async fn chat(stack: &Stack, cookie: Option<&str>) -> reqwest::Response {
    let mut request = reqwest::Client::new()
        .post(format!("{}/api/chat", stack.auth_url))
        .json(&json!({ "message": "What does the document say?" }));
    if let Some(cookie) = cookie {
        request = request.header(reqwest::header::COOKIE, cookie);
    }
    request.send().await.unwrap()
}

#[tokio::test]
async fn test_admin_chat_reaches_secret_content() {
    let stack = Stack::start().await;
    let cookie = stack.session_cookie(ADMIN).await;

    let response = chat(&stack, Some(&cookie)).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.contains(SECRET_MARKER));
    assert!(!reply.contains(PUBLIC_MARKER));
}

#[tokio::test]
async fn test_public_user_chat_gets_public_content() {
    let stack = Stack::start().await;
    let cookie = stack.session_cookie(PUBLIC_USER).await;

    let response = chat(&stack, Some(&cookie)).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.contains(PUBLIC_MARKER));
    assert!(!reply.contains(SECRET_MARKER));
}

#[tokio::test]
async fn test_chat_without_session_is_rejected() {
    let stack = Stack::start().await;
    assert_eq!(chat(&stack, None).await.status(), 401);
}

#[tokio::test]
async fn test_chat_with_only_delegated_cookie_is_rejected() {
    let stack = Stack::start().await;
    let cookie = stack.session_cookie(ADMIN).await;
    let delegated = cookie_value(&cookie, DELEGATED_COOKIE_NAME);

    let only_delegated = format!("{}={}", DELEGATED_COOKIE_NAME, delegated);
    assert_eq!(chat(&stack, Some(&only_delegated)).await.status(), 401);

    let swapped = format!("{}={}", ACCESS_COOKIE_NAME, delegated);
    assert_eq!(chat(&stack, Some(&swapped)).await.status(), 401);
}

#[tokio::test]
async fn test_role_endpoint_after_login() {
    let stack = Stack::start().await;
    let cookie = stack.session_cookie(ADMIN).await;

    let body: Value = reqwest::Client::new()
        .get(format!("{}/api/role", stack.auth_url))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        json!({ "role": "admin", "username": "alice", "isAdmin": true })
    );
}

#[tokio::test]
async fn test_gateway_direct_with_delegated_token() {
    let stack = Stack::start().await;
    let cookie = stack.session_cookie(ADMIN).await;
    let delegated = cookie_value(&cookie, DELEGATED_COOKIE_NAME);

    let text = fetch_content(&stack.gateway_url, Some(&delegated)).await;
    assert!(text.contains(SECRET_MARKER));
}

#[tokio::test]
async fn test_gateway_rejects_access_token_as_bearer() {
    let stack = Stack::start().await;
    let cookie = stack.session_cookie(ADMIN).await;
    let access = cookie_value(&cookie, ACCESS_COOKIE_NAME);

    let text = fetch_content(&stack.gateway_url, Some(&access)).await;
    assert!(text.contains(PUBLIC_MARKER));
}

#[tokio::test]
async fn test_gateway_rejects_expired_and_tampered_tokens() {
    let stack = Stack::start().await;
    let expired = stack
        .state
        .tokens()
        .issue_at(
            "alice",
            Purpose::Delegated,
            chrono::Utc::now() - chrono::Duration::hours(25),
        )
        .unwrap();
    assert!(
        fetch_content(&stack.gateway_url, Some(&expired))
            .await
            .contains(PUBLIC_MARKER)
    );

    let mut tampered = stack
        .state
        .tokens()
        .issue("alice", Purpose::Delegated)
        .unwrap();
    let middle = tampered.len() / 2;
    let flipped = if &tampered[middle..=middle] == "A" { "B" } else { "A" };
    tampered.replace_range(middle..=middle, flipped);
    assert!(
        fetch_content(&stack.gateway_url, Some(&tampered))
            .await
            .contains(PUBLIC_MARKER)
    );
}

#[tokio::test]
async fn test_gateway_without_bearer_is_public() {
    let stack = Stack::start().await;
    let text = fetch_content(&stack.gateway_url, None).await;
    assert!(text.contains(PUBLIC_MARKER));
}

#[tokio::test]
async fn test_wrong_password_sets_no_cookies() {
    let stack = Stack::start().await;
    let response = stack.login(("alice", "not-the-password")).await;

    assert_eq!(response.status(), 401);
    assert!(cookie_header(&response).is_empty());
}
