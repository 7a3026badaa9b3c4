use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use super::{CompletionError, CompletionProvider, ProviderConfig};

const OPENAI_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

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

/// Chat-completion provider for OpenAI-compatible endpoints. Also serves
/// self-hosted servers that speak the same protocol; those typically run
/// without an API key.
pub struct ChatApiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl ChatApiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let endpoint = config
            .endpoint
            .unwrap_or_else(|| OPENAI_CHAT_ENDPOINT.to_string());
        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        info!(
            "Initialized chat completion provider: endpoint {}, model {}",
            endpoint, model
        );

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
            model,
        })
    }
}

#[async_trait]
impl CompletionProvider for ChatApiProvider {
    fn name(&self) -> &'static str {
        "Chat completion API"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
            temperature: 0.3,
        };

        debug!(
            "Sending completion request to {} ({} chars of input)",
            self.endpoint,
            user_message.len()
        );

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!(
                "Completion request failed with status {}: {}",
                status, response_text
            );
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&response_text).map_err(|err| {
                error!("Failed to parse completion response: {}", err);
                CompletionError::MissingCompletion
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(CompletionError::MissingCompletion)?;

        debug!("Completion received: {} chars", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_when_config_is_empty() {
        let provider = ChatApiProvider::new(ProviderConfig::default()).unwrap();
        assert_eq!(provider.endpoint, OPENAI_CHAT_ENDPOINT);
        assert_eq!(provider.model, DEFAULT_MODEL);
        assert!(provider.api_key.is_none());
    }

    #[test]
    fn test_chat_request_serializes_both_roles() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "instructions",
                },
                ChatMessage {
                    role: "user",
                    content: "transcript",
                },
            ],
            temperature: 0.3,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"role\":\"system\""));
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"model\":\"gpt-4o-mini\""));
    }

    #[test]
    fn test_response_parsing_extracts_first_choice() {
        let raw = r#"{"choices":[{"message":{"content":"Cleaned up text."}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let content = parsed.choices[0].message.content.as_deref();
        assert_eq!(content, Some("Cleaned up text."));
    }
}
