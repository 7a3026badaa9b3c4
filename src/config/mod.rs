use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ai: AiConfig,
    pub server: ServerConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: Option<String>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    /// Timeout applied to every completion request. Expiry counts as a
    /// remote failure and routes formatting to the heuristic fallback.
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Copy the formatted note to the clipboard when a session completes.
    pub auto_copy: bool,
    /// Keep the raw transcript alongside the formatted text in saved notes.
    pub save_raw_transcript: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: Some("openai-chat".to_string()),
            endpoint: None,
            api_key: None,
            model: Some("gpt-4o-mini".to_string()),
            timeout_seconds: 30,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3747 }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            auto_copy: false,
            save_raw_transcript: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}
