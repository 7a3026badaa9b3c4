//! CLI handler for completion-provider management.
//!
//! This module handles terminal presentation and user interaction.
//! Core business logic is delegated to the `structurer` module.

use crate::cli::{ProviderCliArgs, ProviderCommand};
use crate::config::{AiConfig, Config};
use crate::structurer::{
    get_provider_status_from_config, ProviderConfig, ProviderStatus, Structurer,
};
use anyhow::{Context, Result};
use chrono::Local;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

const MAX_CONFIG_BACKUPS: usize = 3;

pub async fn handle_provider_command(args: ProviderCliArgs) -> Result<()> {
    match args.command {
        Some(ProviderCommand::Show) => handle_show(),
        Some(ProviderCommand::Configure { dry_run }) => handle_configure(dry_run),
        Some(ProviderCommand::Test { text }) => handle_test(text).await,
        Some(ProviderCommand::Reset { force }) => handle_reset(force),
        None => handle_interactive().await,
    }
}

/// Interactive provider setup menu (default when no subcommand provided)
async fn handle_interactive() -> Result<()> {
    if !io::stdin().is_terminal() {
        info!("Non-interactive session. Use 'voxnote provider configure' for automated setup.");
        return Ok(());
    }

    let theme = ColorfulTheme::default();

    println!();
    println!("Voxnote Provider Setup");
    println!("======================");
    println!();

    let config = Config::load()?;
    let provider_name = config.ai.provider.as_deref().unwrap_or("<not set>");
    let status = get_provider_status_from_config(&config.ai);

    println!("Current provider: {}", provider_name);
    println!("Status: {}", provider_status_display(&status));
    println!();

    let options = vec![
        "Configure provider",
        "Test current provider",
        "Show full configuration",
        "Reset to defaults",
        "Exit",
    ];

    let selection = Select::with_theme(&theme)
        .with_prompt("What would you like to do?")
        .items(&options)
        .default(0)
        .interact()?;

    match selection {
        0 => handle_configure(false),
        1 => handle_test(None).await,
        2 => handle_show(),
        3 => handle_reset(false),
        _ => {
            println!("Exiting provider setup.");
            Ok(())
        }
    }
}

/// Show current provider configuration
fn handle_show() -> Result<()> {
    let config = Config::load()?;
    let ai = &config.ai;

    println!();
    println!("Provider Configuration");
    println!("======================");
    println!();
    println!(
        "Provider:   {}",
        ai.provider.as_deref().unwrap_or("<not set>")
    );
    println!("Model:      {}", ai.model.as_deref().unwrap_or("<default>"));
    println!("Endpoint:   {}", display_value(&ai.endpoint));
    println!("API Key:    {}", mask_secret(&ai.api_key));
    println!("Timeout:    {}s", ai.timeout_seconds);
    println!();
    println!("Config file: {}", crate::global::config_file()?.display());

    Ok(())
}

/// Configure provider with optional dry-run
fn handle_configure(dry_run: bool) -> Result<()> {
    if !io::stdin().is_terminal() {
        info!("Non-interactive session detected. Please edit ~/.config/voxnote/config.toml manually to change providers.");
        return Ok(());
    }

    let theme = ColorfulTheme::default();
    let mut config = Config::load()?;
    let old_config = config.ai.clone();

    println!();
    println!("Provider Configuration");
    println!("======================");
    println!();
    println!(
        "Current provider: {}",
        config.ai.provider.as_deref().unwrap_or("<not set>")
    );
    println!();

    let selection = prompt_provider_selection(&theme, config.ai.provider.as_deref())?;
    config.ai.provider = Some(selection.as_str().to_string());

    match selection {
        ProviderSelection::OpenAiChat => configure_openai_chat(&theme, &mut config.ai)?,
        ProviderSelection::OpenAiCompatible => configure_openai_compatible(&theme, &mut config.ai)?,
    }

    // Show what would change
    println!();
    println!("Configuration Changes");
    println!("---------------------");
    print_config_diff(&old_config, &config.ai);

    if dry_run {
        println!();
        println!("Dry run mode - no changes saved.");
        println!("Remove --dry-run to apply these changes.");
        return Ok(());
    }

    // Confirm before saving
    println!();
    let proceed = Confirm::with_theme(&theme)
        .with_prompt("Save these changes?")
        .default(true)
        .interact()?;

    if !proceed {
        println!("Configuration cancelled.");
        return Ok(());
    }

    // Create backup before saving
    let config_path = crate::global::config_file()?;
    if config_path.exists() {
        let backup_path = create_config_backup(&config_path)?;
        println!("Backup: {}", backup_path.display());
    }

    config.save()?;
    println!();
    println!(
        "Provider updated to '{}'.",
        config.ai.provider.as_deref().unwrap_or_default()
    );
    println!();
    println!("Next steps:");
    println!("  voxnote provider test    - Verify the provider works");
    println!("  Restart the voxnote service to apply the change");

    Ok(())
}

/// Test the provider, optionally by structuring a sample text
async fn handle_test(text: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let provider_name = config
        .ai
        .provider
        .as_deref()
        .context("No completion provider configured. Run `voxnote provider configure` first.")?;

    println!();
    println!("Provider Test");
    println!("=============");
    println!();
    println!("Provider: {}", provider_name);

    print!("Initializing... ");
    let structurer =
        Structurer::with_provider(provider_name, ProviderConfig::from(&config.ai))?;
    println!("OK");

    if let Some(sample) = text {
        println!();
        print!("Structuring sample text... ");

        let start = Instant::now();
        let result = structurer.structure(&sample).await;
        let elapsed = start.elapsed();

        println!("done ({:.2}s)", elapsed.as_secs_f64());
        println!();
        println!("Result:");
        println!("{}", result);
        println!();
        println!(
            "Note: if the endpoint is unreachable, the result above came from \
             the heuristic fallback."
        );
    } else {
        println!();
        println!("Provider '{}' initialized successfully.", provider_name);
        println!();
        println!("To test with sample text:");
        println!("  voxnote provider test --text \"we discussed the launch. we need to ship friday.\"");
    }

    Ok(())
}

/// Reset provider to defaults
fn handle_reset(force: bool) -> Result<()> {
    let config = Config::load()?;
    let current_provider = config.ai.provider.as_deref().unwrap_or("<not set>");

    println!();
    println!("Reset Provider Configuration");
    println!("============================");
    println!();
    println!("Current provider: {}", current_provider);
    println!();
    println!("This will reset to:");
    println!("  Provider: openai-chat (default)");
    println!("  Model:    gpt-4o-mini");
    println!("  The API key and custom endpoint will be cleared.");
    println!();

    if !force {
        if !io::stdin().is_terminal() {
            println!("Non-interactive session. Use --force to reset without confirmation.");
            return Ok(());
        }

        let theme = ColorfulTheme::default();
        let proceed = Confirm::with_theme(&theme)
            .with_prompt("Proceed with reset?")
            .default(false)
            .interact()?;

        if !proceed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    let config_path = crate::global::config_file()?;
    if config_path.exists() {
        let backup_path = create_config_backup(&config_path)?;
        println!("Backup: {}", backup_path.display());
    }

    let mut new_config = config;
    new_config.ai = AiConfig::default();
    new_config.save()?;

    println!();
    println!("Provider configuration reset to defaults.");

    Ok(())
}

// ============================================================================
// Provider status helpers
// ============================================================================

fn provider_status_display(status: &ProviderStatus) -> &'static str {
    match status {
        ProviderStatus::Ready { .. } => "Ready",
        ProviderStatus::ConfigError { .. } => "Configuration error",
        ProviderStatus::NotConfigured => "Not configured",
    }
}

// ============================================================================
// Backup helpers
// ============================================================================

fn create_config_backup(config_path: &Path) -> Result<PathBuf> {
    let backup_dir = crate::global::data_dir()?.join("config-backups");
    fs::create_dir_all(&backup_dir)
        .with_context(|| format!("Failed to create backup directory: {:?}", backup_dir))?;

    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    let backup_name = format!("config.toml.backup-{}", timestamp);
    let backup_path = backup_dir.join(&backup_name);

    fs::copy(config_path, &backup_path)
        .with_context(|| format!("Failed to create backup of {:?}", config_path))?;

    rotate_config_backups(&backup_dir)?;

    Ok(backup_path)
}

fn rotate_config_backups(backup_dir: &Path) -> Result<()> {
    let mut backups: Vec<PathBuf> = fs::read_dir(backup_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("config.toml.backup-"))
                .unwrap_or(false)
        })
        .collect();

    backups.sort_by(|a, b| {
        let a_time = fs::metadata(a).and_then(|m| m.modified()).ok();
        let b_time = fs::metadata(b).and_then(|m| m.modified()).ok();
        b_time.cmp(&a_time)
    });

    for old_backup in backups.iter().skip(MAX_CONFIG_BACKUPS) {
        let _ = fs::remove_file(old_backup);
    }

    Ok(())
}

// ============================================================================
// Configuration diff display
// ============================================================================

fn print_config_diff(old: &AiConfig, new: &AiConfig) {
    print_field_diff("Provider", &old.provider, &new.provider);
    print_field_diff("Model", &old.model, &new.model);
    print_field_diff("Endpoint", &old.endpoint, &new.endpoint);
    print_secret_diff("API Key", &old.api_key, &new.api_key);
    if old.timeout_seconds != new.timeout_seconds {
        println!(
            "  Timeout: {}s -> {}s",
            old.timeout_seconds, new.timeout_seconds
        );
    }
}

fn print_field_diff(name: &str, old: &Option<String>, new: &Option<String>) {
    if old != new {
        let old_display = old.as_deref().unwrap_or("<not set>");
        let new_display = new.as_deref().unwrap_or("<not set>");
        println!("  {}: {} -> {}", name, old_display, new_display);
    }
}

fn print_secret_diff(name: &str, old: &Option<String>, new: &Option<String>) {
    if old != new {
        let old_display = mask_secret(old);
        let new_display = mask_secret(new);
        println!("  {}: {} -> {}", name, old_display, new_display);
    }
}

// ============================================================================
// Provider configuration wizards
// ============================================================================

fn configure_openai_chat(theme: &ColorfulTheme, ai: &mut AiConfig) -> Result<()> {
    let api_key = prompt_secret(theme, "OpenAI API key (sk-...)", ai.api_key.as_ref())?;
    ai.api_key = Some(api_key);

    // The hosted endpoint is the default; only ask for the model.
    ai.endpoint = None;

    let model_default = ai
        .model
        .clone()
        .unwrap_or_else(|| "gpt-4o-mini".to_string());
    ai.model = Some(prompt_string_with_default(
        theme,
        "Model (gpt-4o-mini, gpt-4o, ...)",
        &model_default,
    )?);

    Ok(())
}

fn configure_openai_compatible(theme: &ColorfulTheme, ai: &mut AiConfig) -> Result<()> {
    let endpoint_default = ai
        .endpoint
        .clone()
        .unwrap_or_else(|| "http://localhost:11434/v1/chat/completions".to_string());
    ai.endpoint = Some(prompt_string_with_default(
        theme,
        "Chat completions endpoint",
        &endpoint_default,
    )?);

    let model_default = ai.model.clone().unwrap_or_else(|| "llama3".to_string());
    ai.model = Some(prompt_string_with_default(
        theme,
        "Model name",
        &model_default,
    )?);

    // Self-hosted servers usually run without a key; keep any existing one.
    if ai.api_key.is_none() {
        let wants_key = Confirm::with_theme(theme)
            .with_prompt("Does this endpoint require an API key?")
            .default(false)
            .interact()?;
        if wants_key {
            ai.api_key = Some(prompt_secret(theme, "API key", None)?);
        }
    }

    Ok(())
}

// ============================================================================
// Input prompt helpers
// ============================================================================

fn prompt_provider_selection(
    theme: &ColorfulTheme,
    current: Option<&str>,
) -> Result<ProviderSelection> {
    const OPTIONS: &[(&str, &str)] = &[
        ("openai-chat", "OpenAI chat API (requires API key)"),
        (
            "openai-compatible",
            "Self-hosted OpenAI-compatible server (Ollama, llama.cpp, ...)",
        ),
    ];

    let items: Vec<String> = OPTIONS
        .iter()
        .map(|(name, desc)| format!("{:<18} - {}", name, desc))
        .collect();

    let default_index = current
        .and_then(|value| OPTIONS.iter().position(|(name, _)| *name == value))
        .unwrap_or(0);

    let selection = Select::with_theme(theme)
        .with_prompt("Select a completion provider")
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(ProviderSelection::from_index(selection))
}

fn prompt_secret(theme: &ColorfulTheme, prompt: &str, current: Option<&String>) -> Result<String> {
    if let Some(existing) = current {
        let keep = Confirm::with_theme(theme)
            .with_prompt(format!("Keep existing {}?", prompt))
            .default(true)
            .interact()?;
        if keep {
            return Ok(existing.clone());
        }
    }

    loop {
        let value = Password::new().with_prompt(prompt).interact()?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            println!("{} cannot be empty.", prompt);
            continue;
        }
        return Ok(trimmed.to_string());
    }
}

fn prompt_string_with_default(theme: &ColorfulTheme, label: &str, current: &str) -> Result<String> {
    let prompt = format!("{label} [{current}]");
    let value: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    let trimmed = value.trim();
    if trimmed.is_empty() {
        Ok(current.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

// ============================================================================
// Display helpers
// ============================================================================

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(secret) if secret.len() > 8 => {
            let prefix = &secret[..4];
            let suffix = &secret[secret.len() - 2..];
            format!("{prefix}****{suffix}")
        }
        Some(secret) if !secret.is_empty() => "*".repeat(secret.len()),
        _ => "<not set>".to_string(),
    }
}

// ============================================================================
// Provider selection enum
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum ProviderSelection {
    OpenAiChat,
    OpenAiCompatible,
}

impl ProviderSelection {
    fn as_str(&self) -> &'static str {
        match self {
            ProviderSelection::OpenAiChat => "openai-chat",
            ProviderSelection::OpenAiCompatible => "openai-compatible",
        }
    }

    fn from_index(index: usize) -> Self {
        match index {
            0 => ProviderSelection::OpenAiChat,
            _ => ProviderSelection::OpenAiCompatible,
        }
    }
}
