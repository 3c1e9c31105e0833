// src/core/config_manager.rs
//! Bot configuration: optional YAML file plus the token from the environment

use crate::format::DEFAULT_MESSAGE_LIMIT;
use crate::listings::{ListingSelectors, RenderSettings};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CONFIG_PATH_VAR: &str = "JOBS_BOT_CONFIG";
pub const TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub config: BotConfig,
    pub config_path: PathBuf,
    bot_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub source: SourceConfig,
    pub render: RenderSettings,
    pub selectors: ListingSelectors,
    pub chat: ChatConfig,
    pub export: ExportConfig,
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "https://www.swejobpostings.com/job-listings.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub message_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            message_limit: DEFAULT_MESSAGE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Parent of the per-request directories holding CSV attachments
    pub temp_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir().join("jobs-bot"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub webhook_path: String,
    /// Compared against `X-Telegram-Bot-Api-Secret-Token` when set
    pub webhook_secret: Option<String>,
    /// Externally reachable base URL; when set, `serve` registers the webhook itself
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8000,
            webhook_path: "/telegram".to_string(),
            webhook_secret: None,
            public_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub api_base: String,
    pub poll_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            poll_timeout_secs: 30,
            request_timeout_secs: 90,
        }
    }
}

impl ConfigManager {
    /// Load from `--config`, `JOBS_BOT_CONFIG` or `./config.yaml`, in that order
    pub fn load(explicit_path: Option<PathBuf>) -> Result<Self> {
        let config_path = explicit_path
            .or_else(|| std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let config = Self::load_file(&config_path)?;
        let bot_token = std::env::var(TOKEN_VAR).ok().filter(|t| !t.trim().is_empty());

        Ok(Self {
            config,
            config_path,
            bot_token,
        })
    }

    fn load_file(path: &Path) -> Result<BotConfig> {
        if !path.exists() {
            warn!("{} not found, using built-in defaults", path.display());
            return Ok(BotConfig::default());
        }

        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<BotConfig> {
        if content.trim().is_empty() {
            return Ok(BotConfig::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// The Telegram token; only the bot modes need it
    pub fn bot_token(&self) -> Result<&str> {
        self.bot_token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("{} environment variable not set", TOKEN_VAR))
    }

    /// Ensure the export scratch directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        crate::core::FsOps::ensure_dir_exists(&self.config.export.temp_dir).await
    }
}
