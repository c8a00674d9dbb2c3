//! Review relay - homework review status notifications
//!
//! Polls the review status API, detects status changes, and relays them to a
//! Telegram chat.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod io;
pub mod logging;
pub mod notifier;
pub mod state;
pub mod status;
pub mod telegram;

pub use config::{load_config, Config, Credentials};
pub use engine::{CycleOutcome, Engine};
pub use error::{RelayError, Result};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::clock::{Clock, SystemClock};
use crate::fetcher::StatusFetcher;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::Notifier;
use crate::telegram::TelegramNotifier;

/// Wires configuration, credentials and collaborators into a [`Relay`].
///
/// Collaborators not supplied are replaced by their production versions.
pub struct RelayBuilder {
    config: Config,
    credentials: Option<Credentials>,
    http: Option<Arc<dyn HttpClient>>,
    notifier: Option<Arc<dyn Notifier>>,
    clock: Option<Arc<dyn Clock>>,
    cancel: Option<CancellationToken>,
}

impl RelayBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            credentials: None,
            http: None,
            notifier: None,
            clock: None,
            cancel: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Build the relay. Fails before touching the network if credentials are missing.
    pub fn build(self) -> Result<Relay> {
        let credentials = self.credentials.ok_or_else(|| {
            RelayError::Config("API token, bot token and chat id are required".to_string())
        })?;

        let http = self
            .http
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
        let notifier = self.notifier.unwrap_or_else(|| {
            Arc::new(TelegramNotifier::new(
                &self.config.telegram,
                credentials.bot_token,
                credentials.chat_id,
                Arc::clone(&http),
            ))
        });
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let cancel = self.cancel.unwrap_or_default();

        let fetcher = StatusFetcher::new(&self.config.api, credentials.api_token, http);
        let engine = Engine::new(
            fetcher,
            notifier,
            clock,
            &self.config.polling,
            cancel.clone(),
        );

        Ok(Relay { engine, cancel })
    }
}

/// A ready-to-run relay
#[derive(Debug)]
pub struct Relay {
    engine: Engine,
    cancel: CancellationToken,
}

impl Relay {
    /// Token that stops the poll loop at its next sleep
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run a single poll cycle without sleeping
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.engine.run_cycle().await
    }

    pub fn state(&self) -> &state::NotificationState {
        self.engine.state()
    }

    /// Run until Ctrl-C or cancellation
    pub async fn start(mut self) -> Result<()> {
        let cancel_for_signal = self.cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    cancel_for_signal.cancel();
                }
                Err(e) => tracing::warn!("Failed to listen for ctrl-c: {}", e),
            }
        });

        tracing::info!("Review relay started");
        self.engine.run().await;
        tracing::info!("Review relay stopped");
        Ok(())
    }
}

/// Run the relay with production collaborators
pub async fn run(config: Config, credentials: Credentials) -> Result<()> {
    RelayBuilder::new(config)
        .with_credentials(credentials)
        .build()?
        .start()
        .await
}
