//! Core `LanguageModel` trait and `ApiModel` implementation.
//!
//! `ApiModel` calls any OpenAI-compatible `/v1/chat/completions` endpoint —
//! OpenAI, Groq, LM Studio, Ollama (OpenAI mode), vLLM, etc. All connection
//! details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::LlmConfig;

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

/// Role of one message in a chat sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used by OpenAI-compatible APIs.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message of the sequence sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur during a language-model call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse model response: {0}")]
    Parse(String),

    /// The model returned a response with no usable text content.
    #[error("model returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Request(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// LanguageModel trait
// ---------------------------------------------------------------------------

/// Async trait for directive-producing language models.
///
/// Implementors must be `Send + Sync` so they can be shared across dispatch
/// tasks behind an `Arc<dyn LanguageModel>`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run one completion over `messages` and return the response text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiModel
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// The client is built **without** a request timeout: a call either returns
/// a result or an error outcome, and the listening side's inactivity timer
/// is the only deadline in the system.
pub struct ApiModel {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl ApiModel {
    /// Build an `ApiModel` from application config.
    ///
    /// When `config.api_key` is absent, the `OPENAI_API_KEY` environment
    /// variable is consulted once here; local providers need neither.
    pub fn from_config(config: &LlmConfig) -> Self {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok());

        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
            api_key,
        }
    }
}

#[async_trait]
impl LanguageModel for ApiModel {
    /// Send `messages` to the configured endpoint.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when an API
    /// key is present and non-empty — safe for local providers that require
    /// no authentication.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let wire_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": m.role.as_str(),
                    "content": m.content,
                })
            })
            .collect();

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages":    wire_messages,
            "stream":      false,
            "temperature": self.config.temperature,
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let text = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(LlmError::EmptyResponse)?
            .trim()
            .to_string();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            base_url: "http://localhost:11434".into(),
            api_key: api_key.map(str::to_string),
            model: "gpt-4".into(),
            temperature: 0.0,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _model = ApiModel::from_config(&make_config(None));
    }

    #[test]
    fn from_config_accepts_empty_api_key() {
        let _model = ApiModel::from_config(&make_config(Some("")));
    }

    #[test]
    fn configured_key_wins_over_environment() {
        let model = ApiModel::from_config(&make_config(Some("sk-test-1234")));
        assert_eq!(model.api_key.as_deref(), Some("sk-test-1234"));
    }

    /// Verify that `ApiModel` is object-safe (usable as `dyn LanguageModel`).
    #[test]
    fn model_is_object_safe() {
        let model: Box<dyn LanguageModel> = Box::new(ApiModel::from_config(&make_config(None)));
        drop(model);
    }

    #[test]
    fn role_wire_names() {
        assert_eq!(Role::System.as_str(), "system");
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("a").role, Role::System);
        assert_eq!(ChatMessage::user("b").role, Role::User);
        assert_eq!(ChatMessage::assistant("c").role, Role::Assistant);
    }
}
