use serde::{Deserialize, Serialize};

/// Title and price scraped from a single product page.
///
/// `price` is kept exactly as displayed on the page (currency symbol,
/// thousands separators and all); nothing downstream interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub title: String,
    pub price: String,
    /// The URL the caller asked about, not the one the page redirected to.
    pub url: String,
}

impl ProductInfo {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        price: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
            url: url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_flat_field_names() {
        let product = ProductInfo::new("Widget", "€12,50", "https://www.amazon.de/dp/B000");
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["title"], "Widget");
        assert_eq!(value["price"], "€12,50");
        assert_eq!(value["url"], "https://www.amazon.de/dp/B000");
    }
}
