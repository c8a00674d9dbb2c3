//! Change detection and the in-memory notification state

/// Consecutive send failures after which a warning is logged
pub const SEND_FAILURE_WARN_THRESHOLD: u32 = 5;

/// Returns true if `current` differs from what was last sent
pub fn has_changed(previous: Option<&str>, current: &str) -> bool {
    previous != Some(current)
}

/// State carried across poll cycles. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    last_notified_message: Option<String>,
    last_error_message: Option<String>,
    cursor: i64,
    consecutive_send_failures: u32,
}

impl NotificationState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }

    pub fn last_notified_message(&self) -> Option<&str> {
        self.last_notified_message.as_deref()
    }

    pub fn last_error_message(&self) -> Option<&str> {
        self.last_error_message.as_deref()
    }

    /// `from_date` for the next request
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn consecutive_send_failures(&self) -> u32 {
        self.consecutive_send_failures
    }

    /// Record a status message that reached the chat
    pub fn record_notified(&mut self, message: String) {
        self.last_notified_message = Some(message);
        self.consecutive_send_failures = 0;
    }

    /// Record a failure message that reached the chat
    pub fn record_error_reported(&mut self, message: String) {
        self.last_error_message = Some(message);
        self.consecutive_send_failures = 0;
    }

    /// Count a failed send, returning the new consecutive count
    pub fn record_send_failure(&mut self) -> u32 {
        self.consecutive_send_failures += 1;
        self.consecutive_send_failures
    }

    pub fn advance_cursor(&mut self, cursor: i64) {
        self.cursor = cursor;
    }
}
