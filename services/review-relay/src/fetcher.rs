//! Review status API client

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::io::HttpClient;
use crate::notifier::truncate_message;
use crate::RelayError;

/// Longest response body kept in an [`RelayError::UnexpectedStatus`], in characters
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Fetches status snapshots from the review API
pub struct StatusFetcher {
    endpoint: String,
    api_token: SecretString,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for StatusFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusFetcher")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl StatusFetcher {
    pub fn new(config: &ApiConfig, api_token: SecretString, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created StatusFetcher for {}", config.endpoint);

        Self {
            endpoint: config.endpoint.clone(),
            api_token,
            http,
        }
    }

    /// Request statuses changed since `cursor` (unix seconds).
    ///
    /// Returns `Ok(None)` when the request never got a response; the failure
    /// is logged here and the caller skips the cycle.
    pub async fn fetch(&self, cursor: i64) -> crate::Result<Option<Value>> {
        let authorization = format!("OAuth {}", self.api_token.expose_secret());
        let from_date = cursor.to_string();

        let response = match self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", authorization.as_str())],
                &[("from_date", from_date.as_str())],
            )
            .await
        {
            Ok(response) => response,
            Err(RelayError::Http(e)) => {
                tracing::error!("Status API request failed: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if response.status != 200 {
            let reason = reqwest::StatusCode::from_u16(response.status)
                .ok()
                .and_then(|status| status.canonical_reason())
                .unwrap_or("Unknown");
            return Err(RelayError::UnexpectedStatus {
                status: response.status,
                reason: reason.to_string(),
                body: truncate_message(&response.body, MAX_ERROR_BODY_CHARS),
                url: response.url,
            });
        }

        let body: Value = serde_json::from_str(&response.body)?;
        Ok(Some(body))
    }
}
