//! Detection of anti-automation challenge pages.

/// Phrases that only appear on Amazon's robot-check interstitials.
const BOT_WALL_MARKERS: &[&str] = &[
    "captcha",
    "enter the characters you see below",
    "sorry, we just need to make sure you're not a robot",
    "automated access",
];

/// Returns `true` if `html` looks like a bot-wall page rather than real content.
///
/// Case-insensitive substring match; markers need not be whole words.
#[must_use]
pub fn is_bot_wall(html: &str) -> bool {
    let lower = html.to_lowercase();
    BOT_WALL_MARKERS.iter().any(|marker| lower.contains(marker))
}
