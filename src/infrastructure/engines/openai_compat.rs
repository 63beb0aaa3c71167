//! OpenAI-compatible chat-completions engine.
//!
//! Works against any server exposing `POST <base_url>/chat/completions`:
//! vLLM, Ollama, llama.cpp, or a hosted API. Requests carry a bearer token
//! when `api_key_env` names a set variable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::domain::errors::EngineError;
use crate::domain::models::{EngineConfig, Role, Transcript};
use crate::domain::ports::ReasoningEngine;
use crate::services::response_interpreter::ANALYSIS_CHANNEL;

use super::retry::RetryPolicy;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<String>,
}

/// Reasoning engine over an OpenAI-compatible HTTP API
pub struct OpenAiCompatEngine {
    http_client: ReqwestClient,
    base_url: String,
    model: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    reasoning_effort: Option<String>,
    retry_policy: RetryPolicy,
    call_gate: Mutex<()>,
}

impl OpenAiCompatEngine {
    /// Build the engine from configuration
    ///
    /// # Errors
    /// `EngineError::NotConfigured` if `api_key_env` names an unset or empty
    /// variable, or the HTTP client cannot be built
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(var) = &config.api_key_env {
            let key = std::env::var(var).unwrap_or_default();
            let key = key.trim();
            if key.is_empty() {
                return Err(EngineError::NotConfigured(format!("missing {var}")));
            }
            let value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                EngineError::NotConfigured(format!("invalid Authorization header: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.call_timeout_secs))
            .default_headers(headers)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| EngineError::NotConfigured(format!("http client build: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
            reasoning_effort: config.reasoning_effort.clone(),
            retry_policy: RetryPolicy::from_config(config),
            call_gate: Mutex::new(()),
        })
    }

    fn request<'a>(&'a self, transcript: &'a Transcript) -> ChatRequest<'a> {
        // Empty system turns are dropped; several servers reject them.
        let messages = transcript
            .turns()
            .iter()
            .filter(|turn| !(turn.role == Role::System && turn.content.is_empty()))
            .map(|turn| ChatMessage {
                role: turn.role.as_str(),
                content: &turn.content,
            })
            .collect();

        ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
            reasoning_effort: self.reasoning_effort.as_deref(),
        }
    }

    async fn send_request(&self, request: &ChatRequest<'_>) -> Result<String, EngineError> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(status_error(status, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(format!("chat response decode: {e}")))?;

        let message = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| EngineError::InvalidResponse("missing choices[0]".to_string()))?;

        Ok(raw_text(message))
    }
}

#[async_trait]
impl ReasoningEngine for OpenAiCompatEngine {
    fn engine_id(&self) -> &str {
        "openai-compat"
    }

    #[instrument(skip_all, fields(model = %self.model, turns = transcript.len()))]
    async fn complete(&self, transcript: &Transcript) -> Result<String, EngineError> {
        let _gate = self.call_gate.lock().await;
        let request = self.request(transcript);

        let text = self
            .retry_policy
            .execute(|| self.send_request(&request))
            .await?;
        debug!(chars = text.len(), "Chat completion received");
        Ok(text)
    }

    async fn health_check(&self) -> Result<(), EngineError> {
        let response = self
            .http_client
            .get(format!("{}/models", self.base_url))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(status_error(status, body))
        }
    }
}

/// The answer text; a reasoning-only reply is re-marked as the analysis
/// channel so the interpreter treats it as a degraded answer.
fn raw_text(message: ChatResponseMessage) -> String {
    match (message.content, message.reasoning_content) {
        (Some(content), _) if !content.is_empty() => content,
        (_, Some(reasoning)) if !reasoning.is_empty() => format!("{ANALYSIS_CHANNEL}{reasoning}"),
        _ => String::new(),
    }
}

fn status_error(status: StatusCode, body: String) -> EngineError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        EngineError::RateLimited(body)
    } else {
        EngineError::Http {
            status: status.as_u16(),
            body,
        }
    }
}

fn map_transport_error(error: reqwest::Error) -> EngineError {
    if error.is_timeout() {
        EngineError::Network(format!("request timed out: {error}"))
    } else if error.is_connect() {
        EngineError::Unavailable(error.to_string())
    } else {
        EngineError::Network(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_drops_empty_system_turn() {
        let engine = OpenAiCompatEngine::from_config(&EngineConfig::default()).unwrap();
        let transcript = Transcript::framed("", "Is it correct?", &[]);

        let request = engine.request(&transcript);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "openai/gpt-oss-120b");
        assert_eq!(json["reasoning_effort"], "low");
    }

    #[test]
    fn test_reasoning_only_reply_is_marked() {
        let text = raw_text(ChatResponseMessage {
            content: None,
            reasoning_content: Some("thinking".to_string()),
        });
        assert_eq!(text, "<|channel|>analysis<|message|>thinking");
    }

    #[test]
    fn test_missing_api_key_is_not_configured() {
        temp_env::with_var("PROOF_AGENT_TEST_MISSING_KEY", None::<&str>, || {
            let config = EngineConfig {
                api_key_env: Some("PROOF_AGENT_TEST_MISSING_KEY".to_string()),
                ..EngineConfig::default()
            };
            assert!(matches!(
                OpenAiCompatEngine::from_config(&config),
                Err(EngineError::NotConfigured(_))
            ));
        });
    }
}
