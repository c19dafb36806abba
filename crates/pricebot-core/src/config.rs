use crate::app_config::{AppConfig, ScraperConfig};
use crate::ConfigError;

/// Load the bot configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if `TELEGRAM_BOT_TOKEN` is missing or a numeric
/// setting does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load the bot configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load only the scraper settings. Does not require a bot token, so one-off
/// lookups from the command line work without Telegram credentials.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric setting does not parse.
pub fn load_scraper_config() -> Result<ScraperConfig, ConfigError> {
    dotenvy::dotenv().ok();
    let lookup = |key: &str| std::env::var(key);
    build_scraper_config(&lookup)
}

/// Build the bot configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a pure
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let telegram_bot_token = non_empty(&lookup, "TELEGRAM_BOT_TOKEN")
        .ok_or_else(|| ConfigError::MissingEnvVar("TELEGRAM_BOT_TOKEN".to_string()))?;
    let log_level = lookup("PRICEBOT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let poll_timeout_secs = parse_u64(&lookup, "PRICEBOT_POLL_TIMEOUT_SECS", 30)?;
    let scraper = build_scraper_config(&lookup)?;

    Ok(AppConfig {
        telegram_bot_token,
        log_level,
        poll_timeout_secs,
        scraper,
    })
}

fn build_scraper_config<F>(lookup: &F) -> Result<ScraperConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = ScraperConfig::default();

    let fetch_max_attempts = parse_u32(
        lookup,
        "PRICEBOT_FETCH_MAX_ATTEMPTS",
        defaults.fetch_max_attempts,
    )?;
    if fetch_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICEBOT_FETCH_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(ScraperConfig {
        scrapingbee_api_key: non_empty(lookup, "SCRAPINGBEE_API_KEY"),
        fetch_timeout_secs: parse_u64(
            lookup,
            "PRICEBOT_FETCH_TIMEOUT_SECS",
            defaults.fetch_timeout_secs,
        )?,
        fetch_max_attempts,
        retry_backoff_base_ms: parse_u64(
            lookup,
            "PRICEBOT_RETRY_BACKOFF_BASE_MS",
            defaults.retry_backoff_base_ms,
        )?,
        fallback_timeout_secs: parse_u64(
            lookup,
            "PRICEBOT_FALLBACK_TIMEOUT_SECS",
            defaults.fallback_timeout_secs,
        )?,
    })
}

/// Reads `var`, treating an empty or whitespace-only value as unset.
fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    lookup(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_u64<F>(lookup: &F, var: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    match lookup(var) {
        Ok(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_u32<F>(lookup: &F, var: &str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    match lookup(var) {
        Ok(raw) => raw.trim().parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
