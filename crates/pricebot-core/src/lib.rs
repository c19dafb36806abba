pub mod app_config;
pub mod config;
pub mod product;

pub use app_config::{AppConfig, ScraperConfig};
pub use config::{load_app_config, load_app_config_from_env, load_scraper_config};
pub use product::ProductInfo;

use thiserror::Error;

/// Errors raised while reading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
