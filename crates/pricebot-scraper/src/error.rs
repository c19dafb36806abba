use thiserror::Error;

/// Failures of the price lookup pipeline.
///
/// The `Display` text of every variant except [`ScraperError::Http`] and
/// [`ScraperError::InvalidEndpoint`] is shown to chat users as-is.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid endpoint \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Every fetch attempt failed. `source` is the last network error seen
    /// during the attempts, if any attempt failed at the network level.
    #[error("Could not fetch the Amazon page (gave up after {attempts} attempts).")]
    Retrieval {
        url: String,
        attempts: u32,
        last_status: Option<u16>,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error(
        "Amazon returned an anti-bot page. Fix: set SCRAPINGBEE_API_KEY to enable \
         the proxy fallback, or use the official Amazon Product Advertising API."
    )]
    Blocked { url: String },

    #[error(
        "Price not found. The product may be out of stock, or the page uses an \
         unrecognized template."
    )]
    PriceNotFound { url: String },
}
