//! End-to-end price lookup: direct fetch, bot-wall check, optional proxy
//! fallback, parse.

use crate::bot_wall::is_bot_wall;
use crate::client::ProductClient;
use crate::error::ScraperError;
use crate::fallback::ProxyFallback;
use crate::parse::parse_product;
use pricebot_core::{ProductInfo, ScraperConfig};

/// The price lookup pipeline.
///
/// Holds no mutable state; share one instance behind an `Arc` across
/// concurrent requests.
#[derive(Debug)]
pub struct PriceLookup {
    client: ProductClient,
    fallback: Option<ProxyFallback>,
}

impl PriceLookup {
    #[must_use]
    pub fn new(client: ProductClient, fallback: Option<ProxyFallback>) -> Self {
        Self { client, fallback }
    }

    /// Builds the pipeline from configuration. The proxy fallback is enabled
    /// only when a ScrapingBee key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if an HTTP client cannot be constructed.
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ScraperError> {
        Ok(Self::new(
            ProductClient::from_config(config)?,
            ProxyFallback::from_config(config)?,
        ))
    }

    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Looks up title and price for the product page at `url`.
    ///
    /// Retries happen only inside the direct fetch; the pipeline itself runs
    /// each stage once.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Retrieval`] if the direct fetch exhausts its attempts.
    /// - [`ScraperError::Blocked`] if the page is a bot wall and the fallback
    ///   is not configured or did not produce a result.
    /// - [`ScraperError::PriceNotFound`] if the page has no recognizable price.
    pub async fn lookup(&self, url: &str) -> Result<ProductInfo, ScraperError> {
        let html = self.client.fetch_html(url).await?;

        if is_bot_wall(&html) {
            if let Some(fallback) = &self.fallback {
                if let Some(product) = fallback.fetch_product(url).await {
                    return Ok(product);
                }
            }
            tracing::warn!(url, fallback = self.has_fallback(), "product page blocked");
            return Err(ScraperError::Blocked {
                url: url.to_owned(),
            });
        }

        parse_product(&html, url)
    }
}
