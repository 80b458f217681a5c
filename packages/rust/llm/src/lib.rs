//! Language-model access for coursesmith.
//!
//! [`LlmClient`] wraps an OpenAI-compatible chat-completions endpoint: one
//! non-streaming request with a system instruction and a single user message.
//! The two callers live in [`classify`] (link classification) and [`generate`]
//! (teaching-material generation).

pub mod classify;
pub mod generate;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use coursesmith_shared::{CoursesmithError, Result};

/// HTTP timeout for model requests, which can be slow on long prompts.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Client for an OpenAI-compatible chat-completions API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    /// Create a client for `base_url` (e.g. `https://api.openai.com`).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CoursesmithError::Llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// The model this client sends requests for.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one chat completion and return the assistant's text content.
    ///
    /// Errors on transport failure, a non-success status, or a response with
    /// no usable `choices[0].message.content`.
    pub async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: user.to_string(),
                },
            ],
        };

        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(model = %self.model, user_len = user.len(), "sending chat completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| CoursesmithError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoursesmithError::Llm(format!(
                "API returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CoursesmithError::Llm(format!("malformed API response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| CoursesmithError::Llm("empty response content".into()))?;

        debug!(content_len = content.len(), "chat completion received");
        Ok(content)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
