//! MCP server implementation.
//!
//! Dispatches JSON-RPC requests to the resource gateway. The caller's
//! credential arrives as an explicit [`RequestContext`] on every call.

use crate::content::ContentStore;
use crate::error::McpError;
use crate::gateway::{FETCH_CONTENT_TOOL, ResourceGateway};
use crate::protocol::*;
use crate::role_client::HttpRoleLookup;
use serde_json::{Value, json};
use std::sync::Arc;
use tiergate_core::TiergateConfig;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// The MCP server.
#[derive(Clone)]
pub struct McpServer {
    gateway: ResourceGateway,
}

impl McpServer {
    /// Create a new MCP server around a gateway.
    pub fn new(gateway: ResourceGateway) -> Self {
        Self { gateway }
    }

    /// Build the server from the `gateway` and `content` configuration sections.
    pub fn from_config(config: &TiergateConfig) -> Result<Self, McpError> {
        let roles = HttpRoleLookup::from_config(&config.gateway)?;
        let content = ContentStore::from_config(&config.content);
        content.check();

        tracing::info!(
            role_url = %roles.role_url(),
            admin_path = %config.content.admin_path.display(),
            public_path = %config.content.public_path.display(),
            "Resource gateway configured"
        );
        Ok(Self::new(ResourceGateway::new(Arc::new(roles), content)))
    }

    /// Handle a JSON-RPC request. Notifications yield no response.
    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        ctx: &RequestContext,
    ) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        }

        let id = request.id.clone();
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params, ctx).await,
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": "tiergate-mcp",
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            }
        });
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ListToolsResponse {
            tools: vec![ResourceGateway::tool_definition()],
        };
        to_success(id, &result)
    }

    async fn handle_call_tool(
        &self,
        id: Option<Value>,
        params: Option<Value>,
        ctx: &RequestContext,
    ) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid params: {}", e),
                    );
                }
            },
            None => return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing params"),
        };

        if params.name != FETCH_CONTENT_TOOL {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Tool not found: {}", params.name),
            );
        }

        let result = self.gateway.fetch_content(ctx).await;
        to_success(id, &result)
    }

    /// Serve newline-delimited JSON-RPC over stdin/stdout.
    pub async fn run_stdio(&self, ctx: RequestContext) -> Result<(), McpError> {
        tracing::info!(
            bearer = ctx.bearer().is_some(),
            "Starting MCP server with stdio transport"
        );
        self.serve_lines(tokio::io::stdin(), tokio::io::stdout(), &ctx)
            .await
    }

    /// Serve newline-delimited JSON-RPC from `input` to `output` until EOF.
    pub async fn serve_lines<R, W>(
        &self,
        input: R,
        mut output: W,
        ctx: &RequestContext,
    ) -> Result<(), McpError>
    where
        R: tokio::io::AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(input).lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(line) {
                Ok(request) => self.handle_request(request, ctx).await,
                Err(e) => {
                    tracing::warn!(error = %e, "Unparseable JSON-RPC message");
                    Some(JsonRpcResponse::error(
                        None,
                        error_codes::PARSE_ERROR,
                        format!("Parse error: {}", e),
                    ))
                }
            };

            if let Some(response) = response {
                let mut encoded = serde_json::to_vec(&response)?;
                encoded.push(b'\n');
                output.write_all(&encoded).await?;
                output.flush().await?;
            }
        }

        tracing::info!("stdin closed; MCP server exiting");
        Ok(())
    }
}

fn to_success(id: Option<Value>, result: &impl serde::Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, format!("Internal error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::{TableLookup, content_fixture};
    use std::sync::Arc;

    fn server() -> (tempfile::TempDir, McpServer) {
        let (dir, content) = content_fixture();
        let gateway = ResourceGateway::new(Arc::new(TableLookup::with_admin("admin-token")), content);
        (dir, McpServer::new(gateway))
    }

    async fn call(server: &McpServer, request: JsonRpcRequest, ctx: &RequestContext) -> JsonRpcResponse {
        server.handle_request(request, ctx).await.unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let (_dir, server) = server();
        let response = call(
            &server,
            JsonRpcRequest::new(1, "initialize", None),
            &RequestContext::anonymous(),
        )
        .await;

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "tiergate-mcp");
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_initialized_notification_has_no_response() {
        let (_dir, server) = server();
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .unwrap();
        assert!(
            server
                .handle_request(request, &RequestContext::anonymous())
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_tools() {
        let (_dir, server) = server();
        let response = call(
            &server,
            JsonRpcRequest::new(2, "tools/list", None),
            &RequestContext::anonymous(),
        )
        .await;

        let tools = &response.result.unwrap()["tools"];
        assert_eq!(tools.as_array().unwrap().len(), 1);
        assert_eq!(tools[0]["name"], "fetch_content");
        assert_eq!(tools[0]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_call_fetch_content_uses_context_bearer() {
        let (_dir, server) = server();
        let request = JsonRpcRequest::new(
            3,
            "tools/call",
            Some(json!({ "name": "fetch_content", "arguments": {} })),
        );

        let admin = call(&server, request.clone(), &RequestContext::with_bearer("admin-token")).await;
        assert_eq!(
            admin.result.unwrap(),
            json!({ "content": [{ "type": "text", "text": "TOP-SECRET-MARKER" }] })
        );

        let anonymous = call(&server, request, &RequestContext::anonymous()).await;
        assert_eq!(
            anonymous.result.unwrap()["content"][0]["text"],
            "PUBLIC-MARKER"
        );
    }

    #[tokio::test]
    async fn test_call_nonexistent_tool() {
        let (_dir, server) = server();
        let request = JsonRpcRequest::new(
            4,
            "tools/call",
            Some(json!({ "name": "nonexistent", "arguments": {} })),
        );

        let response = call(&server, request, &RequestContext::anonymous()).await;
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (_dir, server) = server();
        let response = call(
            &server,
            JsonRpcRequest::new(5, "resources/list", None),
            &RequestContext::anonymous(),
        )
        .await;
        assert_eq!(response.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_lines() {
        let (_dir, server) = server();
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            "not json\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"fetch_content"}}"#,
            "\n",
        );
        let mut output = Vec::new();

        server
            .serve_lines(
                input.as_bytes(),
                &mut output,
                &RequestContext::with_bearer("admin-token"),
            )
            .await
            .unwrap();

        let responses: Vec<JsonRpcResponse> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].id, Some(json!(1)));
        assert_eq!(responses[1].error.as_ref().unwrap().code, error_codes::PARSE_ERROR);
        assert_eq!(
            responses[2].result.as_ref().unwrap()["content"][0]["text"],
            "TOP-SECRET-MARKER"
        );
    }
}
