//! HTTP client for Amazon product pages.

mod user_agent;

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::ScraperError;
use crate::retry::{retry_with_linear_backoff, AttemptError};
use pricebot_core::ScraperConfig;

pub use user_agent::{random_user_agent, USER_AGENTS};

pub(super) const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub(super) const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,tr-TR;q=0.8,tr;q=0.7";

/// Fetches product pages the way an ordinary browser would.
///
/// Each attempt uses a freshly drawn User-Agent. Only `200 OK` counts as
/// success; any other status or a network failure is retried with linear
/// backoff until `max_attempts` is reached.
#[derive(Debug)]
pub struct ProductClient {
    client: Client,
    /// Total attempts per fetch, including the first.
    max_attempts: u32,
    /// Wait before attempt `n + 1` is `n * backoff_base_ms`.
    backoff_base_ms: u64,
}

impl ProductClient {
    /// Creates a `ProductClient` with the given per-request timeout and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        max_attempts: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            max_attempts,
            backoff_base_ms,
        })
    }

    /// # Errors
    ///
    /// See [`ProductClient::new`].
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.fetch_timeout_secs,
            config.fetch_max_attempts,
            config.retry_backoff_base_ms,
        )
    }

    /// Fetches `url` and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Retrieval`] once every attempt has failed.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        retry_with_linear_backoff(self.max_attempts, self.backoff_base_ms, move || {
            self.attempt(url)
        })
        .await
        .map_err(|exhausted| ScraperError::Retrieval {
            url: url.to_owned(),
            attempts: exhausted.attempts,
            last_status: exhausted.last_status,
            source: exhausted.last_network_error,
        })
    }

    async fn attempt(&self, url: &str) -> Result<String, AttemptError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, random_user_agent())
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(reqwest::header::CONNECTION, "keep-alive")
            .send()
            .await
            .map_err(AttemptError::Network)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AttemptError::Status(status.as_u16()));
        }

        response.text().await.map_err(AttemptError::Network)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
