//! Shared test infrastructure for Tiergate end-to-end tests.
//!
//! Starts the whole deployment on ephemeral localhost ports:
//! - the auth server, with two users and a chat relay
//! - the MCP gateway, calling back to the auth server's role endpoint
//! - a fake intermediary that does what the AI layer would: call the gateway
//!   with the headers it was handed, and reply with the tool output

use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tiergate_auth::credentials::{HashParams, hash_password_with};
use tiergate_auth::{AppState, AuthServer, CredentialRecord, HttpChatRelay, StaticCredentialStore};
use tiergate_core::{Role, RelayConfig, ServerConfig};
use tiergate_mcp::{ContentStore, HttpRoleLookup, HttpServer, McpServer, ResourceGateway};
use tiergate_token::TokenService;
use tokio::net::TcpListener;

pub const SECRET_MARKER: &str = "TOP-SECRET-MARKER-7f3a";
pub const PUBLIC_MARKER: &str = "PUBLIC-MARKER-19c2";

pub const ADMIN: (&str, &str) = ("alice", "wonderland");
pub const PUBLIC_USER: (&str, &str) = ("bob", "builder");

/// A running deployment.
pub struct Stack {
    pub auth_url: String,
    pub gateway_url: String,
    pub state: AppState,
    _content_dir: TempDir,
}

async fn bind() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

fn hash(password: &str) -> String {
    hash_password_with(password, HashParams::new(8, 1, 1, None).unwrap()).unwrap()
}

pub fn content_dir() -> (TempDir, ContentStore) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("secret.md"),
        format!("# Restricted\n{}\n", SECRET_MARKER),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("public.md"),
        format!("# Welcome\n{}\n", PUBLIC_MARKER),
    )
    .unwrap();
    let store = ContentStore::new(dir.path().join("secret.md"), dir.path().join("public.md"));
    (dir, store)
}

/// Gateway serving `content`, resolving roles against `role_url`.
pub async fn spawn_gateway(role_url: String, timeout: Duration, content: ContentStore) -> String {
    let (listener, addr) = bind().await;
    let roles = HttpRoleLookup::new(role_url, timeout).unwrap();
    let server = McpServer::new(ResourceGateway::new(Arc::new(roles), content));
    tokio::spawn(async move {
        HttpServer::new(addr.to_string(), server)
            .serve(listener)
            .await
            .unwrap();
    });
    format!("http://{}/mcp", addr)
}

impl Stack {
    pub async fn start() -> Self {
        let (auth_listener, auth_addr) = bind().await;
        let (intermediary_listener, intermediary_addr) = bind().await;
        let (dir, content) = content_dir();

        let gateway_url = spawn_gateway(
            format!("http://{}/api/role", auth_addr),
            Duration::from_secs(2),
            content,
        )
        .await;

        tokio::spawn(async move {
            let app = Router::new().route("/v1/responses", post(fake_intermediary));
            axum::serve(intermediary_listener, app).await.unwrap();
        });

        let relay = HttpChatRelay::from_config(&RelayConfig {
            url: format!("http://{}/v1/responses", intermediary_addr),
            api_key_env: None,
            model: "test-model".into(),
            gateway_url: gateway_url.clone(),
            server_label: "tiergate".into(),
            timeout: "10s".into(),
        })
        .unwrap();

        let store = StaticCredentialStore::new([
            CredentialRecord {
                username: ADMIN.0.into(),
                password_hash: hash(ADMIN.1),
                role: Role::Admin,
            },
            CredentialRecord {
                username: PUBLIC_USER.0.into(),
                password_hash: hash(PUBLIC_USER.1),
                role: Role::Public,
            },
        ]);
        let tokens = TokenService::ephemeral(Duration::from_secs(86_400)).unwrap();
        let state = AppState::new(tokens, store).with_relay(Arc::new(relay));

        let server_state = state.clone();
        tokio::spawn(async move {
            AuthServer::new(ServerConfig::default(), server_state)
                .serve(auth_listener)
                .await
                .unwrap();
        });

        Self {
            auth_url: format!("http://{}", auth_addr),
            gateway_url,
            state,
            _content_dir: dir,
        }
    }

    /// `POST /api/login`.
    pub async fn login(&self, (username, password): (&str, &str)) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/api/login", self.auth_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap()
    }

    /// Log in and return the `Cookie` header value carrying both tokens.
    pub async fn session_cookie(&self, user: (&str, &str)) -> String {
        let response = self.login(user).await;
        assert!(response.status().is_success(), "login failed: {}", response.status());
        cookie_header(&response)
    }
}

/// `Cookie` header built from a response's `Set-Cookie` headers.
pub fn cookie_header(response: &reqwest::Response) -> String {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|c| c.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Value of one cookie inside a `Cookie` header.
pub fn cookie_value(cookie_header: &str, name: &str) -> String {
    cookie_header
        .split("; ")
        .find_map(|c| c.strip_prefix(&format!("{}=", name)))
        .unwrap()
        .to_string()
}

/// Call `fetch_content` on the gateway and return the text payload.
pub async fn fetch_content(gateway_url: &str, bearer: Option<&str>) -> String {
    let mut request = reqwest::Client::new().post(gateway_url).json(&json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": { "name": "fetch_content", "arguments": {} }
    }));
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let body: Value = request.send().await.unwrap().json().await.unwrap();
    body["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Stands in for the AI layer: calls the MCP tool it was given, with the
/// headers it was given, and answers with the tool output.
async fn fake_intermediary(Json(body): Json<Value>) -> Json<Value> {
    let tool = &body["tools"][0];
    let server_url = tool["server_url"].as_str().unwrap();
    let bearer = tool["headers"]["Authorization"]
        .as_str()
        .and_then(|v| v.strip_prefix("Bearer "));

    let text = fetch_content(server_url, bearer).await;
    Json(json!({ "output_text": text }))
}
