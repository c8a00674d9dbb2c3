//! Configuration types for the review relay

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Environment variable holding the review API OAuth token
pub const API_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token
pub const BOT_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the destination chat id
pub const CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Review status API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

/// Telegram Bot API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: default_telegram_api_url(),
        }
    }
}

/// Poll loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_retry_period")]
    pub retry_period_seconds: u64,
    /// Move `from_date` forward to the cursor returned by the API
    #[serde(default = "default_true")]
    pub advance_cursor: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            retry_period_seconds: default_retry_period(),
            advance_cursor: true,
        }
    }
}

/// Log sink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log file written next to stdout; `null` disables it
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_period() -> u64 {
    600
}

fn default_true() -> bool {
    true
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("log.txt"))
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::RelayError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Secrets required before the relay may start
pub struct Credentials {
    pub api_token: SecretString,
    pub bot_token: SecretString,
    pub chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// Call `dotenvy::dotenv().ok()` first to pick up a local `.env` file.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve credentials through `lookup`. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    crate::RelayError::Config(format!(
                        "required environment variable {name} is not set"
                    ))
                })
        };

        Ok(Self {
            api_token: SecretString::from(required(API_TOKEN_VAR)?),
            bot_token: SecretString::from(required(BOT_TOKEN_VAR)?),
            chat_id: required(CHAT_ID_VAR)?,
        })
    }
}
