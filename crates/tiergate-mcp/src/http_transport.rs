//! HTTP transport for the MCP server.
//!
//! Each `POST /mcp` carries its own `Authorization: Bearer` header, which
//! becomes that request's [`RequestContext`].

use crate::error::McpError;
use crate::protocol::{JsonRpcRequest, RequestContext};
use crate::server::McpServer;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the HTTP router for MCP.
pub fn create_router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp_post))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

/// Request context from the `Authorization: Bearer` header, if any.
pub fn context_from_headers(headers: &HeaderMap) -> RequestContext {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| RequestContext::with_bearer(token))
        .unwrap_or_default()
}

/// Handle POST requests to /mcp (JSON-RPC over HTTP).
async fn handle_mcp_post(
    State(server): State<Arc<McpServer>>,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    let ctx = context_from_headers(&headers);

    match server.handle_request(request, &ctx).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Handle health check requests.
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "tiergate-mcp",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// HTTP server for MCP transport.
pub struct HttpServer {
    addr: String,
    server: Arc<McpServer>,
}

impl HttpServer {
    /// Create a new HTTP server.
    pub fn new(addr: impl Into<String>, server: McpServer) -> Self {
        Self {
            addr: addr.into(),
            server: Arc::new(server),
        }
    }

    /// Bind and serve until ctrl-c.
    pub async fn run(self) -> Result<(), McpError> {
        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|e| McpError::StartupFailed(format!("Failed to bind {}: {}", self.addr, e)))?;

        tracing::info!(address = %self.addr, "MCP HTTP server listening");
        self.serve(listener).await
    }

    /// Serve on an already-bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), McpError> {
        let app = create_router(self.server);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            })
            .await
            .map_err(|e| McpError::TransportError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ResourceGateway;
    use crate::gateway::tests::{TableLookup, content_fixture};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> (tempfile::TempDir, Router) {
        let (dir, content) = content_fixture();
        let gateway = ResourceGateway::new(Arc::new(TableLookup::with_admin("admin-token")), content);
        (dir, create_router(Arc::new(McpServer::new(gateway))))
    }

    fn mcp_post(body: Value, bearer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json");
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (_dir, app) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bearer_header_selects_tier() {
        let call = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": "fetch_content", "arguments": {} }
        });

        let (_dir, app) = app();
        let response = app
            .clone()
            .oneshot(mcp_post(call.clone(), Some("admin-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["result"]["content"][0]["text"],
            "TOP-SECRET-MARKER"
        );

        let response = app.oneshot(mcp_post(call, None)).await.unwrap();
        assert_eq!(
            body_json(response).await["result"]["content"][0]["text"],
            "PUBLIC-MARKER"
        );
    }

    #[tokio::test]
    async fn test_notification_is_accepted() {
        let (_dir, app) = app();
        let response = app
            .oneshot(mcp_post(
                json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_context_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(context_from_headers(&headers), RequestContext::anonymous());

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(context_from_headers(&headers), RequestContext::anonymous());

        headers.insert(header::AUTHORIZATION, "Bearer tok".parse().unwrap());
        assert_eq!(context_from_headers(&headers).bearer(), Some("tok"));

        // Auth scheme is case-insensitive
        headers.insert(header::AUTHORIZATION, "bearer tok".parse().unwrap());
        assert_eq!(context_from_headers(&headers).bearer(), Some("tok"));
        headers.insert(header::AUTHORIZATION, "BEARER  tok".parse().unwrap());
        assert_eq!(context_from_headers(&headers).bearer(), Some("tok"));

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(context_from_headers(&headers), RequestContext::anonymous());
    }
}
