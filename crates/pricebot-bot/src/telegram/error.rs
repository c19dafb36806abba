use thiserror::Error;

/// Errors returned by the Telegram Bot API client.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Network or TLS failure. The request URL (which embeds the bot token)
    /// is stripped before the error is stored.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with `"ok": false`.
    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Telegram base URL '{0}'")]
    InvalidBaseUrl(String),
}
