//! Chat command parsing and reply texts.

use pricebot_scraper::{ProductInfo, ScraperError};

use crate::telegram::Reply;

pub const START_TEXT: &str = "Hello 👋\n\
Welcome to the Amazon price check bot.\n\n\
Usage:\n\
/price <amazon_product_link>\n\
/anti_bot";

pub const ANTI_BOT_TEXT: &str = "Tips for dealing with anti-bot pages:\n\
1) Most reliable: use the Amazon Product Advertising API.\n\
2) Proxy scraping fallback: set SCRAPINGBEE_API_KEY.\n\
3) Send requests sparingly and cache results (don't re-fetch the same link within a short time).\n\
4) Don't try to force your way past CAPTCHA pages; stay within the terms of service.";

pub const NO_URL_TEXT: &str = "No valid Amazon link found.\n\
Example: /price https://www.amazon.com/dp/B0...";

pub const CHECKING_TEXT: &str = "Checking the price, please wait...";

/// A recognised bot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Start,
    AntiBot,
    /// `/price` with everything after the command word, trimmed.
    Price { args: &'a str },
}

impl<'a> Command<'a> {
    /// Parses `/name[@bot] args...`. Command names are case-insensitive.
    ///
    /// Returns `None` for plain text, unknown commands and commands
    /// addressed to a bot other than `bot_username`. When `bot_username` is
    /// unknown every `@bot` suffix is accepted.
    #[must_use]
    pub fn parse(text: &'a str, bot_username: Option<&str>) -> Option<Self> {
        let rest = text.trim_start().strip_prefix('/')?;
        let (head, args) = rest
            .split_once(char::is_whitespace)
            .unwrap_or((rest, ""));
        let name = match head.split_once('@') {
            Some((name, target)) => {
                if bot_username.is_some_and(|me| !me.eq_ignore_ascii_case(target)) {
                    return None;
                }
                name
            }
            None => head,
        };

        if name.eq_ignore_ascii_case("start") {
            Some(Self::Start)
        } else if name.eq_ignore_ascii_case("anti_bot") {
            Some(Self::AntiBot)
        } else if name.eq_ignore_ascii_case("price") {
            Some(Self::Price { args: args.trim() })
        } else {
            None
        }
    }
}

/// Success reply: bold title, price, link. The HTML rendering escapes every
/// field; the plain rendering is what gets resent if Telegram rejects it.
#[must_use]
pub fn format_product(product: &ProductInfo) -> Reply {
    Reply::html(
        format!(
            "🛍️ <b>{}</b>\n💰 <b>Price:</b> {}\n🔗 {}",
            escape_html(&product.title),
            escape_html(&product.price),
            escape_html(&product.url)
        ),
        format!(
            "🛍️ {}\n💰 Price: {}\n🔗 {}",
            product.title, product.price, product.url
        ),
    )
}

#[must_use]
pub fn format_error(err: &ScraperError) -> Reply {
    Reply::plain(format!("❌ {err}"))
}

/// Escapes the three characters Telegram's HTML parse mode reserves.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
