use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AiConfig;

pub mod heuristics;
pub mod prompts;
pub mod providers;

pub use heuristics::{HeuristicFormatter, SentenceKind};
pub use providers::{ChatApiProvider, CompletionError, CompletionProvider, ProviderConfig};

/// The result of structuring one finished transcript. Owned by the caller
/// after creation; the structurer never mutates it again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedNote {
    pub raw_text: String,
    pub formatted_text: String,
    pub title: String,
}

/// Turns raw transcript text into organized notes. Remote structuring is
/// tried first; any failure degrades silently through the heuristic
/// formatter down to basic bulleting. No tier ever surfaces an error to the
/// caller.
pub struct Structurer {
    provider: Box<dyn CompletionProvider>,
}

impl Structurer {
    pub fn new(provider: Box<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub fn with_provider(provider_name: &str, config: ProviderConfig) -> Result<Self> {
        let provider: Box<dyn CompletionProvider> = match provider_name {
            "openai-chat" => Box::new(ChatApiProvider::new(config)?),
            "openai-compatible" => {
                if config.endpoint.is_none() {
                    bail!("endpoint is required for the openai-compatible provider");
                }
                Box::new(ChatApiProvider::new(config)?)
            }
            _ => bail!(
                "Unknown completion provider '{}'. Supported providers: openai-chat, openai-compatible",
                provider_name
            ),
        };

        info!("Using {} for note structuring", provider.name());

        Ok(Self { provider })
    }

    pub fn from_config(ai: &AiConfig) -> Result<Self> {
        let provider_name = ai.provider.as_deref().unwrap_or("openai-chat");
        Self::with_provider(provider_name, ProviderConfig::from(ai))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Structure a finished transcript into readable notes. Always returns
    /// some text derived from the input, whatever fails along the way.
    pub async fn structure(&self, raw_text: &str) -> String {
        if raw_text.trim().is_empty() {
            return String::new();
        }

        match self.structure_remote(raw_text).await {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    "Remote structuring failed ({}), falling back to heuristic formatting",
                    err
                );
                heuristic_structure(raw_text)
            }
        }
    }

    /// Produce a short single-line title for the note. Blank input short
    /// circuits to an empty title without a remote call.
    pub async fn generate_title(&self, text: &str) -> String {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        match self.title_remote(trimmed).await {
            Ok(title) => title,
            Err(err) => {
                warn!(
                    "Remote title generation failed ({}), using first sentence",
                    err
                );
                fallback_title(trimmed)
            }
        }
    }

    /// Structure the transcript and title it in one go.
    pub async fn format_note(&self, raw_text: &str) -> FormattedNote {
        let formatted_text = self.structure(raw_text).await;
        let title = self.generate_title(raw_text).await;
        FormattedNote {
            raw_text: raw_text.to_string(),
            formatted_text,
            title,
        }
    }

    async fn structure_remote(&self, raw_text: &str) -> Result<String, CompletionError> {
        let completion = self
            .provider
            .complete(
                prompts::STRUCTURE_SYSTEM_PROMPT,
                &prompts::structure_user_message(raw_text),
            )
            .await?;

        let cleaned = prompts::strip_code_fence(&completion);
        if cleaned.is_empty() {
            return Err(CompletionError::MissingCompletion);
        }
        Ok(cleaned)
    }

    async fn title_remote(&self, text: &str) -> Result<String, CompletionError> {
        let completion = self
            .provider
            .complete(prompts::TITLE_SYSTEM_PROMPT, &prompts::title_user_message(text))
            .await?;

        let title = sanitize_title(&prompts::strip_code_fence(&completion));
        if title.is_empty() {
            return Err(CompletionError::MissingCompletion);
        }
        Ok(truncate_title(&title))
    }
}

/// Local rule-based structuring tier. If even the formatter cannot be built
/// the transcript is bulleted per sentence as a last resort.
fn heuristic_structure(raw_text: &str) -> String {
    match HeuristicFormatter::new() {
        Ok(formatter) => formatter.structure(raw_text),
        Err(err) => {
            warn!(
                "Heuristic formatter unavailable ({}), using basic bulleting",
                err
            );
            heuristics::basic_bullets(raw_text)
        }
    }
}

/// First-sentence title: everything up to the first sentence terminator,
/// sanitized and truncated.
pub fn fallback_title(text: &str) -> String {
    let first_sentence = text.split(['.', '!', '?']).next().unwrap_or(text);
    truncate_title(&sanitize_title(first_sentence))
}

fn sanitize_title(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
        .trim()
        .trim_matches(|c: char| {
            matches!(
                c,
                '"' | '\'' | '\u{201c}' | '\u{201d}' | '\u{2018}' | '\u{2019}'
            )
        })
        .trim()
        .to_string()
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() <= 60 {
        return title.to_string();
    }
    let cut: String = title.chars().take(57).collect();
    format!("{}...", cut.trim_end())
}

// ============================================================================
// Provider status and validation
// ============================================================================

/// Status of the configured completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProviderStatus {
    /// Provider is configured and ready
    Ready {
        provider: String,
        model: Option<String>,
        endpoint: Option<String>,
    },
    /// Provider is configured but validation failed
    ConfigError { provider: String, error: String },
    /// No provider configured
    NotConfigured,
}

/// Summary of the provider configuration, safe to expose (no secrets).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub has_api_key: bool,
    pub timeout_seconds: u64,
}

pub fn get_provider_status_from_config(ai: &AiConfig) -> ProviderStatus {
    let provider = match &ai.provider {
        Some(p) if !p.is_empty() => p.clone(),
        _ => return ProviderStatus::NotConfigured,
    };

    if let Some(error) = validate_provider_config(&provider, ai) {
        return ProviderStatus::ConfigError { provider, error };
    }

    match Structurer::with_provider(&provider, ProviderConfig::from(ai)) {
        Ok(_) => ProviderStatus::Ready {
            provider,
            model: ai.model.clone(),
            endpoint: ai.endpoint.clone(),
        },
        Err(e) => ProviderStatus::ConfigError {
            provider,
            error: e.to_string(),
        },
    }
}

/// Validate provider configuration and return an error message if invalid.
pub fn validate_provider_config(provider: &str, ai: &AiConfig) -> Option<String> {
    match provider {
        "openai-chat" => {
            if ai.api_key.is_none() {
                Some("API key required for the OpenAI chat provider".to_string())
            } else {
                None
            }
        }
        "openai-compatible" => {
            if ai.endpoint.is_none() {
                Some("Endpoint URL required for an OpenAI-compatible server".to_string())
            } else {
                None
            }
        }
        _ => Some(format!("Unknown provider: {}", provider)),
    }
}

pub fn get_provider_info_from_config(ai: &AiConfig) -> ProviderInfo {
    ProviderInfo {
        provider: ai.provider.clone(),
        model: ai.model.clone(),
        endpoint: ai.endpoint.clone(),
        has_api_key: ai.api_key.is_some(),
        timeout_seconds: ai.timeout_seconds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticProvider {
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl CompletionProvider for StaticProvider {
        fn name(&self) -> &'static str {
            "static test provider"
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn complete(
            &self,
            _system_prompt: &str,
            _user_message: &str,
        ) -> Result<String, CompletionError> {
            match self.reply {
                Some(reply) => Ok(reply.to_string()),
                None => Err(CompletionError::Status {
                    status: 500,
                    body: "boom".to_string(),
                }),
            }
        }
    }

    fn failing_structurer() -> Structurer {
        Structurer::new(Box::new(StaticProvider { reply: None }))
    }

    #[tokio::test]
    async fn test_structure_uses_remote_completion_when_available() {
        let structurer = Structurer::new(Box::new(StaticProvider {
            reply: Some("```\nCleaned note.\n```"),
        }));
        let output = structurer.structure("raw words here").await;
        assert_eq!(output, "Cleaned note.");
    }

    #[tokio::test]
    async fn test_structure_falls_back_to_heuristics_on_remote_failure() {
        let structurer = failing_structurer();
        let output = structurer
            .structure("The trip went well. The weather held up.")
            .await;
        assert_eq!(output, "The trip went well. The weather held up.");
    }

    #[tokio::test]
    async fn test_structure_never_fails_on_degenerate_input() {
        let structurer = failing_structurer();
        assert_eq!(structurer.structure("").await, "");
        assert_eq!(structurer.structure("x").await, "x");
        assert_eq!(
            structurer.structure("no boundaries anywhere").await,
            "no boundaries anywhere"
        );
    }

    #[tokio::test]
    async fn test_empty_title_short_circuits_without_remote_call() {
        // The provider would return a non-empty reply; blank input must not
        // even reach it.
        let structurer = Structurer::new(Box::new(StaticProvider {
            reply: Some("Unwanted Title"),
        }));
        assert_eq!(structurer.generate_title("   \n  ").await, "");
    }

    #[tokio::test]
    async fn test_title_falls_back_to_first_sentence() {
        let structurer = failing_structurer();
        let title = structurer
            .generate_title(
                "um so basically we need to ship this by Friday. Then we celebrate.",
            )
            .await;
        assert_eq!(title, "um so basically we need to ship this by Friday");
        assert!(title.chars().count() <= 60);
        assert!(!title.contains('\n'));
        assert!(!title.contains('"'));
    }

    #[test]
    fn test_fallback_title_truncates_long_first_sentence() {
        let long = "this first sentence just keeps going and going and going and going and going";
        let title = fallback_title(long);
        assert!(title.chars().count() <= 60);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_fallback_title_strips_quotes_and_newlines() {
        assert_eq!(fallback_title("\"quoted\nstart of a note\""), "quoted start of a note");
    }

    #[test]
    fn test_validate_provider_config() {
        let mut ai = AiConfig::default();

        // Default provider needs an API key.
        ai.api_key = None;
        assert!(validate_provider_config("openai-chat", &ai).is_some());
        ai.api_key = Some("sk-test".to_string());
        assert!(validate_provider_config("openai-chat", &ai).is_none());

        // Compatible servers need an endpoint but no key.
        ai.endpoint = None;
        assert!(validate_provider_config("openai-compatible", &ai).is_some());
        ai.endpoint = Some("http://localhost:11434/v1/chat/completions".to_string());
        assert!(validate_provider_config("openai-compatible", &ai).is_none());

        assert!(validate_provider_config("mystery", &ai).is_some());
    }

    #[test]
    fn test_provider_status_from_config() {
        let mut ai = AiConfig::default();
        ai.provider = None;
        assert!(matches!(
            get_provider_status_from_config(&ai),
            ProviderStatus::NotConfigured
        ));

        ai.provider = Some("openai-chat".to_string());
        ai.api_key = None;
        assert!(matches!(
            get_provider_status_from_config(&ai),
            ProviderStatus::ConfigError { .. }
        ));

        ai.api_key = Some("sk-test".to_string());
        assert!(matches!(
            get_provider_status_from_config(&ai),
            ProviderStatus::Ready { .. }
        ));
    }
}
