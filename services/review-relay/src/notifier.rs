//! Notifier trait for sending chat messages

use async_trait::async_trait;

/// Trait for sending notifications
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Send a text message to the configured destination.
    ///
    /// Every failure is reported as [`crate::RelayError::SendMessage`].
    async fn send(&self, message: &str) -> crate::Result<()>;
}

/// Longest message text the Telegram Bot API accepts, in characters
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Cut `text` to at most `max_chars` characters, ending in `…` when shortened
pub fn truncate_message(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
