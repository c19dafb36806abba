/// Settings for the scraping pipeline.
///
/// Loaded once at startup and handed to the pipeline by reference; nothing
/// mutates it afterwards.
#[derive(Clone)]
pub struct ScraperConfig {
    /// ScrapingBee key. `None` disables the proxy fallback entirely.
    pub scrapingbee_api_key: Option<String>,
    pub fetch_timeout_secs: u64,
    pub fetch_max_attempts: u32,
    pub retry_backoff_base_ms: u64,
    pub fallback_timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            scrapingbee_api_key: None,
            fetch_timeout_secs: 20,
            fetch_max_attempts: 3,
            retry_backoff_base_ms: 1_500,
            fallback_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for ScraperConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScraperConfig")
            .field(
                "scrapingbee_api_key",
                &self.scrapingbee_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_max_attempts", &self.fetch_max_attempts)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("fallback_timeout_secs", &self.fallback_timeout_secs)
            .finish()
    }
}

/// Full bot configuration: Telegram credentials plus the scraper settings.
#[derive(Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub log_level: String,
    pub poll_timeout_secs: u64,
    pub scraper: ScraperConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("telegram_bot_token", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("scraper", &self.scraper)
            .finish()
    }
}
