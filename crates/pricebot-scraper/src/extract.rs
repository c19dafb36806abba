//! Product URL detection in free-form chat text.

use std::sync::LazyLock;

use regex::Regex;

/// Any Amazon storefront (`amazon.com`, `amazon.com.tr`, `amazon.de`, ...)
/// followed by everything up to the next whitespace.
static PRODUCT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?amazon\.\S+").expect("valid product URL regex")
});

/// Returns the first Amazon URL found in `text`, scanning left to right.
///
/// Matching is case-insensitive and the URL is returned exactly as written.
#[must_use]
pub fn extract_product_url(text: &str) -> Option<&str> {
    PRODUCT_URL.find(text).map(|m| m.as_str())
}
