//! HTML extraction of product title and price.
//!
//! Amazon renders the current price in several places depending on the page
//! template (deal banners, classic price blocks, the newer `corePrice` widget).
//! [`PRICE_SELECTORS`] lists them most specific first; the first one that
//! yields text wins. Update the list when a new template shows up.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;
use pricebot_core::ProductInfo;

/// Shown in place of the title when the page has none.
pub const TITLE_PLACEHOLDER: &str = "Title not found";

const TITLE_SELECTOR: &str = "#productTitle";

/// Price selectors in priority order.
pub const PRICE_SELECTORS: &[&str] = &[
    "#priceblock_dealprice",
    "#priceblock_ourprice",
    "#priceblock_saleprice",
    "#corePrice_feature_div .a-offscreen",
    ".a-price .a-offscreen",
];

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(TITLE_SELECTOR).expect("valid title selector"));

static PRICES: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    PRICE_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("valid price selector"))
        .collect()
});

/// Extracts a [`ProductInfo`] from a product page.
///
/// A missing title is replaced by [`TITLE_PLACEHOLDER`]; a missing price is
/// an error.
///
/// # Errors
///
/// Returns [`ScraperError::PriceNotFound`] if none of [`PRICE_SELECTORS`]
/// matches an element with non-empty text.
pub fn parse_product(html: &str, url: &str) -> Result<ProductInfo, ScraperError> {
    let doc = Html::parse_document(html);

    let title = first_text(&doc, &TITLE).unwrap_or_else(|| TITLE_PLACEHOLDER.to_owned());

    let price = PRICES
        .iter()
        .find_map(|selector| first_text(&doc, selector))
        .ok_or_else(|| ScraperError::PriceNotFound {
            url: url.to_owned(),
        })?;

    Ok(ProductInfo {
        title,
        price,
        url: url.to_owned(),
    })
}

/// Text of the first element matching `selector`, whitespace-collapsed.
///
/// Only the first match is considered; if it is empty the selector counts as
/// a miss even when later matches carry text.
fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
