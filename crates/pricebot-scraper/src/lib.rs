pub mod bot_wall;
pub mod client;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod parse;
pub mod pipeline;
mod retry;

pub use bot_wall::is_bot_wall;
pub use client::ProductClient;
pub use error::ScraperError;
pub use extract::extract_product_url;
pub use fallback::ProxyFallback;
pub use parse::parse_product;
pub use pipeline::PriceLookup;
pub use pricebot_core::ProductInfo;
