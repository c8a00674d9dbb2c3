//! Time source abstraction so the poll loop can run without real delays

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

/// Source of wall-clock time and sleeping
#[async_trait]
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time as unix seconds
    fn now_epoch_seconds(&self) -> i64;

    /// Suspend the caller for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the system time and the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
