use async_trait::async_trait;
use thiserror::Error;

pub mod chat_api;

pub use chat_api::ChatApiProvider;

/// Failure modes of a remote completion call. Every variant is handled the
/// same way by the structurer: log and fall through to the next tier.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion response did not contain any text")]
    MissingCompletion,
}

/// A text-to-structured-text provider: one chat-completion style call that
/// takes a system instruction plus a user message and returns the completion
/// text. The heuristic fallback and any alternative backend substitute here
/// without touching the structurer's control flow.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: None,
            timeout_seconds: 30,
        }
    }
}

impl From<&crate::config::AiConfig> for ProviderConfig {
    fn from(ai: &crate::config::AiConfig) -> Self {
        Self {
            endpoint: ai.endpoint.clone(),
            api_key: ai.api_key.clone(),
            model: ai.model.clone(),
            timeout_seconds: ai.timeout_seconds,
        }
    }
}
