//! # tiergate-mcp
//!
//! The resource gateway: an MCP server exposing a single `fetch_content`
//! tool. It holds no signing keys; the caller's role is decided by the auth
//! server on every call.
//!
//! ## Architecture
//!
//! ```text
//! AI intermediary
//!       │
//!       │ tools/call fetch_content
//!       │ Authorization: Bearer <delegated token>
//!       ▼
//! ┌──────────────────────┐
//! │  Tiergate gateway    │
//! │  1. Bearer → context │
//! │  2. GET /api/role    │ ──► auth server (cookie: tiergate_delegated)
//! │  3. Pick tier        │
//! │  4. Read file        │
//! └──────────────────────┘
//! ```
//!
//! A missing bearer, or any failure of the role callback (timeout, non-2xx,
//! bad body), selects the public tier.

pub mod content;
pub mod error;
pub mod gateway;
pub mod http_transport;
pub mod protocol;
pub mod role_client;
pub mod server;

pub use content::ContentStore;
pub use error::{McpError, ResourceReadError, RoleLookupError};
pub use gateway::{FETCH_CONTENT_TOOL, ResourceGateway};
pub use http_transport::{HttpServer, create_router};
pub use protocol::{
    CallToolParams, CallToolResponse, JsonRpcRequest, JsonRpcResponse, RequestContext,
    ToolContent, ToolDefinition,
};
pub use role_client::{HttpRoleLookup, RoleLookup};
pub use server::McpServer;
