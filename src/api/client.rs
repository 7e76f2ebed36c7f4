//! OpenAI-compatible chat backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::api::{ChatCompletionResponse, ChatRequest};
use crate::core::capability::{AiClient, ChatError, ChatReply};
use crate::core::readiness::CapabilityProbe;
use crate::utils::auth::add_auth_headers;
use crate::utils::url::{endpoint_url, Endpoint};

#[derive(Clone, Debug)]
pub struct HttpChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpChatClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
        }
    }

    /// Returns true when `GET {base_url}/models` answers with a success status.
    pub async fn is_reachable(&self) -> bool {
        let url = endpoint_url(&self.base_url, Endpoint::Models);
        let request = add_auth_headers(self.client.get(url), self.api_key.as_deref());
        match request.send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                debug!(status = %response.status(), "readiness probe got non-success status");
                false
            }
            Err(err) => {
                debug!(error = %err, "readiness probe failed");
                false
            }
        }
    }
}

#[async_trait]
impl AiClient for HttpChatClient {
    async fn chat(&self, message: &str) -> Result<ChatReply, ChatError> {
        let url = endpoint_url(&self.base_url, Endpoint::ChatCompletions);
        let request = ChatRequest::single_user_message(&self.model, message);
        let http_request = add_auth_headers(
            self.client
                .post(url)
                .header("Content-Type", "application/json"),
            self.api_key.as_deref(),
        );

        let response = http_request
            .json(&request)
            .send()
            .await
            .map_err(|err| ChatError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ChatError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                summary: summarize_error_body(&body),
            });
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|err| ChatError::Decode(err.to_string()))?;
        Ok(reply_from_body(value))
    }
}

/// Picks the part of a completion body that carries `message.content`.
///
/// OpenAI-style bodies nest it under `choices[0]`; some servers put it at
/// the top level. A bare JSON string is taken as the reply text.
pub fn reply_from_body(body: Value) -> ChatReply {
    if body.get("choices").is_some() {
        if let Ok(completion) = serde_json::from_value::<ChatCompletionResponse>(body.clone()) {
            if let Some(first) = completion.choices.into_iter().next() {
                return ChatReply::from(first);
            }
        }
    }
    ChatReply::from(body)
}

fn extract_error_summary(value: &Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| value.get("message").and_then(Value::as_str).map(str::to_owned));

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// One-line description of an error response body for diagnostics.
pub fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&value).filter(|s| !s.is_empty()) {
            return summary;
        }
    }

    let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    const MAX_CHARS: usize = 200;
    if collapsed.chars().count() > MAX_CHARS {
        let mut shortened: String = collapsed.chars().take(MAX_CHARS).collect();
        shortened.push('…');
        shortened
    } else {
        collapsed
    }
}

/// Reports the HTTP backend as present once it answers a models request.
pub struct HttpProbe {
    client: Arc<HttpChatClient>,
}

impl HttpProbe {
    pub fn new(client: Arc<HttpChatClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CapabilityProbe for HttpProbe {
    async fn probe(&self) -> Option<Arc<dyn AiClient>> {
        if self.client.is_reachable().await {
            Some(self.client.clone())
        } else {
            None
        }
    }
}
