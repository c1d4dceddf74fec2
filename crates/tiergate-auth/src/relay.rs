//! Chat relay to the AI tool-calling intermediary.
//!
//! The relay forwards the user's message and attaches the gateway as an MCP
//! tool, with the delegated token as the bearer the intermediary must present
//! when it calls back. The access token never leaves the auth server.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;
use tiergate_core::RelayConfig;

/// Errors raised while relaying a chat message.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The relay could not be built from its configuration.
    #[error("invalid relay configuration: {0}")]
    Config(String),

    /// The request did not complete (connect failure, timeout).
    #[error("relay transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The intermediary answered with a non-success status.
    #[error("intermediary returned HTTP {status}")]
    Status { status: u16 },

    /// The intermediary's answer had no reply text.
    #[error("could not decode intermediary response: {0}")]
    Decode(String),
}

/// Forwards a chat message to the intermediary.
#[async_trait]
pub trait ChatRelay: Send + Sync {
    /// Relay `message`. `bearer` is the delegated token the intermediary
    /// presents to the gateway; `None` lets the gateway fall back to public.
    async fn relay(&self, message: &str, bearer: Option<&str>) -> Result<String, RelayError>;
}

/// [`ChatRelay`] speaking an OpenAI Responses-style HTTP API.
#[derive(Debug, Clone)]
pub struct HttpChatRelay {
    client: reqwest::Client,
    url: String,
    model: String,
    gateway_url: String,
    server_label: String,
    api_key: Option<String>,
}

impl HttpChatRelay {
    /// Build from configuration, resolving the API key from the environment.
    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        let timeout = config
            .timeout()
            .map_err(|e| RelayError::Config(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Config(e.to_string()))?;

        Ok(Self::with_client(client, config))
    }

    /// Build with a caller-supplied HTTP client.
    pub fn with_client(client: reqwest::Client, config: &RelayConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            model: config.model.clone(),
            gateway_url: config.gateway_url.clone(),
            server_label: config.server_label.clone(),
            api_key: config.api_key(),
        }
    }

    /// Request body sent to the intermediary.
    fn request_body(&self, message: &str, bearer: Option<&str>) -> Value {
        let mut tool = json!({
            "type": "mcp",
            "server_label": self.server_label,
            "server_url": self.gateway_url,
            "require_approval": "never",
        });
        if let Some(token) = bearer {
            tool["headers"] = json!({ "Authorization": format!("Bearer {}", token) });
        }

        json!({
            "model": self.model,
            "input": message,
            "tools": [tool],
        })
    }
}

#[async_trait]
impl ChatRelay for HttpChatRelay {
    async fn relay(&self, message: &str, bearer: Option<&str>) -> Result<String, RelayError> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&self.request_body(message, bearer));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!(url = %self.url, delegated = bearer.is_some(), "Relaying chat message");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RelayError::Decode(e.to_string()))?;
        extract_reply(&body).ok_or_else(|| RelayError::Decode("no output_text in response".into()))
    }
}

/// Reply text: the top-level `output_text`, else the concatenated
/// `output_text` parts of the `output` messages.
fn extract_reply(body: &Value) -> Option<String> {
    if let Some(text) = body.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let parts: Vec<&str> = body
        .get("output")?
        .as_array()?
        .iter()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.concat())
    }
}
