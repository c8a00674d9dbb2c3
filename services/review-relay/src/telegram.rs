//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::TelegramConfig;
use crate::io::HttpClient;
use crate::notifier::Notifier;
use crate::RelayError;

/// Subset of the Bot API response envelope
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to one chat through a Telegram bot
pub struct TelegramNotifier {
    api_url: String,
    bot_token: SecretString,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_url", &self.api_url)
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(
        config: &TelegramConfig,
        bot_token: SecretString,
        chat_id: String,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        tracing::debug!(
            "Created TelegramNotifier for chat {} via {}",
            chat_id,
            config.api_url
        );

        Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bot_token,
            chat_id,
            http,
        }
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url,
            self.bot_token.expose_secret()
        )
    }

    async fn post(&self, message: &str) -> crate::Result<()> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": message,
        });
        let response = self.http.post_json(&self.send_message_url(), &body).await?;

        if response.status != 200 {
            return Err(RelayError::SendMessage(format!(
                "Telegram API returned status {}: {}",
                response.status, response.body
            )));
        }

        match serde_json::from_str::<BotApiResponse>(&response.body) {
            Ok(parsed) if parsed.ok => Ok(()),
            Ok(parsed) => Err(RelayError::SendMessage(format!(
                "Telegram API rejected the message: {}",
                parsed.description.unwrap_or_default()
            ))),
            Err(e) => Err(RelayError::SendMessage(format!(
                "Unreadable Telegram API response: {}",
                e
            ))),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, message: &str) -> crate::Result<()> {
        tracing::debug!("Sending Telegram message to chat {}", self.chat_id);

        match self.post(message).await {
            Ok(()) => {
                tracing::debug!("Telegram message sent: \"{}\"", message);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to send Telegram message: {}", e);
                Err(match e {
                    RelayError::SendMessage(_) => e,
                    other => RelayError::SendMessage(other.to_string()),
                })
            }
        }
    }
}
