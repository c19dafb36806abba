//! HTTP client for the Telegram Bot API.
//!
//! Only the methods the bot needs: `deleteWebhook` and `getMe` at startup,
//! `getUpdates` for long polling and `sendMessage`. Every call is a JSON
//! `POST`; the `{"ok": ..., "result": ...}` envelope is unwrapped here and
//! API-level failures surface as [`TelegramError::Api`].

mod error;
mod types;

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use error::TelegramError;
pub use types::{Chat, Message, Update, User};

use types::{ApiResponse, DeleteWebhook, GetMe, GetUpdates, LinkPreviewOptions, SendMessage};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Extra time on top of the long-poll window before the HTTP request times out.
const POLL_GRACE_SECS: u64 = 15;

/// A message to send back to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Plain-text rendering. Always present; resent as-is when Telegram
    /// rejects the HTML rendering.
    pub text: String,
    /// Sent with `parse_mode=HTML` and link previews disabled when set.
    pub html: Option<String>,
}

impl Reply {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: None,
        }
    }

    #[must_use]
    pub fn html(html: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: Some(html.into()),
        }
    }
}

/// Client for one bot account.
pub struct TelegramClient {
    client: Client,
    /// `<base>/bot<token>/`; method names are joined onto it.
    bot_url: Url,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("bot_url", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Creates a client pointed at the production Bot API.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, poll_timeout_secs: u64) -> Result<Self, TelegramError> {
        Self::with_base_url(token, poll_timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::Http`] if the client cannot be constructed,
    /// or [`TelegramError::InvalidBaseUrl`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        token: &str,
        poll_timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + POLL_GRACE_SECS))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let bot_url = Url::parse(&format!("{}/bot{token}/", base_url.trim_end_matches('/')))
            .map_err(|_| TelegramError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self { client, bot_url })
    }

    /// Removes any webhook so long polling is allowed, optionally discarding
    /// updates that queued up while the bot was offline.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] if the request fails or the API rejects it
    /// (an invalid token shows up here as `Api { code: 401, .. }`).
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), TelegramError> {
        let _: bool = self
            .call("deleteWebhook", &DeleteWebhook { drop_pending_updates })
            .await?;
        Ok(())
    }

    /// Returns the bot's own account, used to recognise `/cmd@username`.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] on network, API or decoding failure.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &GetMe {}).await
    }

    /// Long-polls for new messages.
    ///
    /// Pass the id of the last processed update plus one as `offset` to
    /// acknowledge everything before it.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] on network, API or decoding failure.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: timeout_secs,
                allowed_updates: &["message"],
            },
        )
        .await
    }

    /// Sends `reply` to `chat_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] on network, API or decoding failure. An
    /// HTML reply the API cannot parse comes back as `Api { code: 400, .. }`.
    pub async fn send_message(
        &self,
        chat_id: i64,
        reply: &Reply,
    ) -> Result<Message, TelegramError> {
        let params = SendMessage {
            chat_id,
            text: reply.html.as_deref().unwrap_or(&reply.text),
            parse_mode: reply.html.as_ref().map(|_| "HTML"),
            link_preview_options: reply
                .html
                .as_ref()
                .map(|_| LinkPreviewOptions { is_disabled: true }),
        };
        self.call("sendMessage", &params).await
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self
            .bot_url
            .join(method)
            .map_err(|_| TelegramError::InvalidBaseUrl(method.to_owned()))?;

        let response = self
            .client
            .post(url)
            .json(params)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let body = response.bytes().await.map_err(reqwest::Error::without_url)?;

        let envelope: ApiResponse<R> =
            serde_json::from_slice(&body).map_err(|e| TelegramError::Deserialize {
                context: format!("{method} (HTTP {})", status.as_u16()),
                source: e,
            })?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                ok: true,
                result: None,
                ..
            } => Err(TelegramError::Api {
                code: i64::from(status.as_u16()),
                description: format!("{method} returned no result"),
            }),
            ApiResponse {
                description,
                error_code,
                ..
            } => Err(TelegramError::Api {
                code: error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                description: description.unwrap_or_else(|| "unknown error".to_owned()),
            }),
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
