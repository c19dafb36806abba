//! Long-polling loop and per-message command handling.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pricebot_scraper::{extract_product_url, PriceLookup};
use tokio::task::JoinSet;

use crate::commands::{
    format_error, format_product, Command, ANTI_BOT_TEXT, CHECKING_TEXT, NO_URL_TEXT, START_TEXT,
};
use crate::telegram::{Message, Reply, TelegramClient, TelegramError};

/// Pause after a failed `getUpdates` call before polling again.
const POLL_ERROR_PAUSE: Duration = Duration::from_secs(5);

/// Polls Telegram until `shutdown` resolves, handling each message on its
/// own task so one slow lookup does not hold up other chats.
///
/// Pending updates from before startup are dropped. On shutdown, in-flight
/// messages are allowed to finish before returning.
///
/// # Errors
///
/// Returns [`TelegramError`] only if the startup `deleteWebhook` or `getMe`
/// call fails (typically a bad token). Polling errors are logged and retried.
pub async fn run<S>(
    telegram: Arc<TelegramClient>,
    lookup: Arc<PriceLookup>,
    poll_timeout_secs: u64,
    shutdown: S,
) -> Result<(), TelegramError>
where
    S: Future<Output = ()>,
{
    telegram.delete_webhook(true).await?;
    let me = telegram.get_me().await?;
    tracing::info!(
        bot_id = me.id,
        username = me.username.as_deref().unwrap_or_default(),
        fallback = lookup.has_fallback(),
        "bot started, polling for updates"
    );
    let bot_username: Option<Arc<str>> = me.username.map(Arc::from);

    tokio::pin!(shutdown);
    let mut offset: Option<i64> = None;
    let mut in_flight = JoinSet::new();

    loop {
        let polled = tokio::select! {
            () = &mut shutdown => break,
            polled = telegram.get_updates(offset, poll_timeout_secs) => polled,
        };

        match polled {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    let Some(message) = update.message else {
                        continue;
                    };
                    let telegram = Arc::clone(&telegram);
                    let lookup = Arc::clone(&lookup);
                    let bot_username = bot_username.clone();
                    in_flight.spawn(async move {
                        handle_message(&telegram, &lookup, bot_username.as_deref(), &message)
                            .await;
                    });
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed; retrying shortly");
                tokio::select! {
                    () = &mut shutdown => break,
                    () = tokio::time::sleep(POLL_ERROR_PAUSE) => {}
                }
            }
        }

        while let Some(finished) = in_flight.try_join_next() {
            if let Err(e) = finished {
                tracing::error!(error = %e, "message handler panicked");
            }
        }
    }

    tracing::info!(in_flight = in_flight.len(), "waiting for in-flight messages");
    while in_flight.join_next().await.is_some() {}
    Ok(())
}

/// Dispatches one incoming message. Never fails: errors from the pipeline
/// become reply text and send failures are logged.
pub(crate) async fn handle_message(
    telegram: &TelegramClient,
    lookup: &PriceLookup,
    bot_username: Option<&str>,
    message: &Message,
) {
    let Some(text) = message.text.as_deref() else {
        return;
    };
    let Some(command) = Command::parse(text, bot_username) else {
        return;
    };
    let chat_id = message.chat.id;

    match command {
        Command::Start => send_reply(telegram, chat_id, &Reply::plain(START_TEXT)).await,
        Command::AntiBot => send_reply(telegram, chat_id, &Reply::plain(ANTI_BOT_TEXT)).await,
        Command::Price { args } => {
            let source = if args.is_empty() { text } else { args };
            let Some(url) = extract_product_url(source) else {
                send_reply(telegram, chat_id, &Reply::plain(NO_URL_TEXT)).await;
                return;
            };

            send_reply(telegram, chat_id, &Reply::plain(CHECKING_TEXT)).await;
            let reply = reply_for(lookup, chat_id, url).await;
            send_reply(telegram, chat_id, &reply).await;
        }
    }
}

/// Runs the lookup for `url` and renders the outcome as a reply.
pub(crate) async fn reply_for(lookup: &PriceLookup, chat_id: i64, url: &str) -> Reply {
    match lookup.lookup(url).await {
        Ok(product) => {
            tracing::info!(chat_id, url, price = %product.price, "price lookup succeeded");
            format_product(&product)
        }
        Err(e) => {
            tracing::warn!(chat_id, url, error = %e, "price lookup failed");
            format_error(&e)
        }
    }
}

/// Sends `reply`, resending the plain rendering if Telegram rejects the HTML.
async fn send_reply(telegram: &TelegramClient, chat_id: i64, reply: &Reply) {
    match telegram.send_message(chat_id, reply).await {
        Ok(sent) => tracing::debug!(chat_id, message_id = sent.message_id, "reply sent"),
        Err(TelegramError::Api { code: 400, ref description }) if reply.html.is_some() => {
            tracing::warn!(
                chat_id,
                description = %description,
                "html rejected; resending as plain text"
            );
            let plain = Reply::plain(reply.text.clone());
            if let Err(e) = telegram.send_message(chat_id, &plain).await {
                tracing::warn!(chat_id, error = %e, "failed to send reply");
            }
        }
        Err(e) => tracing::warn!(chat_id, error = %e, "failed to send reply"),
    }
}

#[cfg(test)]
#[path = "bot_test.rs"]
mod tests;
