//! Engine: the poll → validate → format → compare → notify loop

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::config::PollingConfig;
use crate::fetcher::StatusFetcher;
use crate::notifier::{truncate_message, Notifier, MAX_MESSAGE_CHARS};
use crate::state::{has_changed, NotificationState, SEND_FAILURE_WARN_THRESHOLD};
use crate::status::{format_status, PollResponse};
use crate::RelayError;

/// What a single poll cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message was sent
    Notified,
    /// The latest status matches the last one sent
    Unchanged,
    /// The API returned no records
    NoUpdate,
    /// The API could not be reached
    Skipped,
    /// The cycle failed; `reported` is true if a failure notice was sent
    Failed { reported: bool },
}

/// The engine owns the notification state and drives the poll loop
#[derive(Debug)]
pub struct Engine {
    fetcher: StatusFetcher,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    state: NotificationState,
    interval: Duration,
    advance_cursor: bool,
    cancel: CancellationToken,
}

impl Engine {
    pub fn new(
        fetcher: StatusFetcher,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: &PollingConfig,
        cancel: CancellationToken,
    ) -> Self {
        let state = NotificationState::new(clock.now_epoch_seconds());
        Self {
            fetcher,
            notifier,
            clock,
            state,
            interval: Duration::from_secs(config.retry_period_seconds),
            advance_cursor: config.advance_cursor,
            cancel,
        }
    }

    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    /// Poll until the cancellation token is triggered, sleeping after every cycle
    pub async fn run(&mut self) {
        tracing::info!(
            "Polling every {:?} starting from {}",
            self.interval,
            self.state.cursor()
        );

        loop {
            let outcome = self.run_cycle().await;
            tracing::debug!("Cycle finished: {:?}", outcome);

            let clock = Arc::clone(&self.clock);
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {}
                _ = clock.sleep(self.interval) => {}
            }
            if self.cancel.is_cancelled() {
                tracing::debug!("Polling loop cancelled");
                break;
            }
        }
    }

    /// Run one cycle. Errors never escape; they are reported or logged here.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.poll_once().await {
            Ok(outcome) => outcome,
            Err(e) => self.handle_failure(e).await,
        }
    }

    async fn poll_once(&mut self) -> crate::Result<CycleOutcome> {
        let Some(body) = self.fetcher.fetch(self.state.cursor()).await? else {
            return Ok(CycleOutcome::Skipped);
        };
        let response = PollResponse::validate(&body)?;

        let outcome = match response.latest() {
            None => {
                tracing::debug!("No new statuses in API response");
                CycleOutcome::NoUpdate
            }
            Some(record) => {
                let message = format_status(record)?;
                if has_changed(self.state.last_notified_message(), &message) {
                    self.deliver(&message).await?;
                    tracing::info!("Sent status update: {}", message);
                    self.state.record_notified(message);
                    CycleOutcome::Notified
                } else {
                    tracing::debug!("No new status since last notification");
                    CycleOutcome::Unchanged
                }
            }
        };

        if self.advance_cursor {
            if let Some(cursor) = response.cursor {
                self.state.advance_cursor(cursor);
            }
        }
        Ok(outcome)
    }

    async fn handle_failure(&mut self, error: RelayError) -> CycleOutcome {
        tracing::error!("Program failure: {}", error);
        let message = truncate_message(
            &format!("Program failure: {}", error),
            MAX_MESSAGE_CHARS,
        );
        if !error.is_reportable() {
            return CycleOutcome::Failed { reported: false };
        }

        if !has_changed(self.state.last_error_message(), &message) {
            tracing::debug!("Failure already reported, not sending again");
            return CycleOutcome::Failed { reported: false };
        }

        match self.deliver(&message).await {
            Ok(()) => {
                self.state.record_error_reported(message);
                CycleOutcome::Failed { reported: true }
            }
            Err(e) => {
                tracing::error!("Could not report failure: {}", e);
                CycleOutcome::Failed { reported: false }
            }
        }
    }

    async fn deliver(&mut self, message: &str) -> crate::Result<()> {
        let result = self.notifier.send(message).await;
        if result.is_err() {
            let failures = self.state.record_send_failure();
            if failures % SEND_FAILURE_WARN_THRESHOLD == 0 {
                tracing::warn!(
                    "Notifier '{}' has failed {} times in a row",
                    self.notifier.type_name(),
                    failures
                );
            }
        }
        result
    }
}
