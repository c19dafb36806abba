//! Best-effort retrieval through the ScrapingBee proxy service.
//!
//! Used only after the direct fetch hit a bot wall. Nothing in here returns
//! an error to the caller: every failure is logged and collapses to `None`,
//! leaving the original "blocked" outcome to be reported.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::bot_wall::is_bot_wall;
use crate::error::ScraperError;
use crate::parse::parse_product;
use pricebot_core::{ProductInfo, ScraperConfig};

const SCRAPINGBEE_ENDPOINT: &str = "https://app.scrapingbee.com/api/v1/";

/// Client for the ScrapingBee HTML API.
pub struct ProxyFallback {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl std::fmt::Debug for ProxyFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyFallback")
            .field("api_key", &"[redacted]")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl ProxyFallback {
    /// Creates a fallback pointed at the production ScrapingBee endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        Self::with_endpoint(api_key, timeout_secs, SCRAPINGBEE_ENDPOINT)
    }

    /// Creates a fallback with a custom endpoint (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the client cannot be constructed, or
    /// [`ScraperError::InvalidEndpoint`] if `endpoint` is not a valid URL.
    pub fn with_endpoint(
        api_key: &str,
        timeout_secs: u64,
        endpoint: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        let endpoint = Url::parse(endpoint).map_err(|e| ScraperError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    /// Builds the fallback if an API key is configured, `None` otherwise.
    ///
    /// # Errors
    ///
    /// See [`ProxyFallback::new`].
    pub fn from_config(config: &ScraperConfig) -> Result<Option<Self>, ScraperError> {
        config
            .scrapingbee_api_key
            .as_deref()
            .map(|key| Self::new(key, config.fallback_timeout_secs))
            .transpose()
    }

    /// Fetches `url` through the proxy and parses it.
    ///
    /// Returns `None` on any network error, non-2xx status, bot-wall page or
    /// parse failure. The returned product carries `url`, not the proxy URL.
    pub async fn fetch_product(&self, url: &str) -> Option<ProductInfo> {
        tracing::info!(url, "direct fetch blocked; trying proxy fallback");

        let response = match self.client.get(self.request_url(url)).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, error = %e, "proxy fallback request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "proxy fallback rejected request");
            return None;
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url, error = %e, "proxy fallback body could not be read");
                return None;
            }
        };

        if is_bot_wall(&html) {
            tracing::warn!(url, "proxy fallback also returned a bot wall");
            return None;
        }

        match parse_product(&html, url) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::debug!(url, error = %e, "proxy fallback page did not parse");
                None
            }
        }
    }

    /// Endpoint URL with the form-encoded query string ScrapingBee expects.
    fn request_url(&self, target: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("url", target)
            .append_pair("render_js", "false")
            .append_pair("premium_proxy", "true");
        url
    }
}
