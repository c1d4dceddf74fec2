//! The `fetch_content` tool.

use crate::content::ContentStore;
use crate::protocol::{CallToolResponse, RequestContext, ToolDefinition};
use crate::role_client::{RoleLookup, resolve};
use serde_json::json;
use std::sync::Arc;

/// Name of the single tool the gateway exposes.
pub const FETCH_CONTENT_TOOL: &str = "fetch_content";

/// Serves the content tier the caller's bearer token entitles it to.
#[derive(Clone)]
pub struct ResourceGateway {
    roles: Arc<dyn RoleLookup>,
    content: ContentStore,
}

impl ResourceGateway {
    pub fn new(roles: Arc<dyn RoleLookup>, content: ContentStore) -> Self {
        Self { roles, content }
    }

    /// Tool definition advertised by `tools/list`. Takes no arguments.
    pub fn tool_definition() -> ToolDefinition {
        ToolDefinition {
            name: FETCH_CONTENT_TOOL.to_string(),
            description: Some(
                "Fetch the content document available to the current user. \
                 Admins receive the restricted document; everyone else the public one."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }

    /// Resolve the caller's role, then return the matching document.
    ///
    /// A read failure is reported as text in a normal response.
    pub async fn fetch_content(&self, ctx: &RequestContext) -> CallToolResponse {
        let decision = resolve(self.roles.as_ref(), ctx.bearer()).await;
        let path = self.content.path_for(&decision);

        tracing::info!(
            role = %decision.role(),
            user = ?decision.username(),
            path = %path.display(),
            "Serving content"
        );

        match self.content.read(&decision).await {
            Ok(text) => CallToolResponse::text(text),
            Err(e) => {
                tracing::error!(error = %e, "Content read failed");
                CallToolResponse::text(format!("Error reading content: {}", e))
            }
        }
    }
}
