use super::*;

const URL: &str = "https://www.amazon.com/dp/B0TEST";

fn page(body: &str) -> String {
    format!("<!doctype html><html><head><title>Amazon</title></head><body>{body}</body></html>")
}

#[test]
fn deal_price_wins_over_generic_price() {
    let html = page(
        r#"<span id="productTitle">Widget</span>
           <span id="priceblock_dealprice"> $19.99 </span>
           <span class="a-price"><span class="a-offscreen">$24.99</span></span>"#,
    );
    let product = parse_product(&html, URL).unwrap();
    assert_eq!(product.price, "$19.99");
}

#[test]
fn our_price_with_title() {
    let html = page(
        r#"<h1><span id="productTitle">
              Widget
           </span></h1>
           <span id="priceblock_ourprice">€12,50</span>"#,
    );
    let product = parse_product(&html, URL).unwrap();
    assert_eq!(
        product,
        ProductInfo {
            title: "Widget".to_owned(),
            price: "€12,50".to_owned(),
            url: URL.to_owned(),
        }
    );
}

#[test]
fn core_price_widget_is_preferred_over_other_a_price_blocks() {
    let html = page(
        r#"<div class="a-price"><span class="a-offscreen">$5.00</span></div>
           <div id="corePrice_feature_div">
             <span class="a-price"><span class="a-offscreen">$7.49</span></span>
           </div>"#,
    );
    let product = parse_product(&html, URL).unwrap();
    assert_eq!(product.price, "$7.49");
}

#[test]
fn empty_candidate_falls_through_to_next_selector() {
    let html = page(
        r#"<span id="priceblock_dealprice">   </span>
           <span id="priceblock_saleprice">$3.10</span>"#,
    );
    let product = parse_product(&html, URL).unwrap();
    assert_eq!(product.price, "$3.10");
}

#[test]
fn nested_markup_text_is_joined() {
    let html = page(
        r#"<span id="productTitle">Super <b>Widget</b>
             2000</span>
           <span class="a-price"><span class="a-offscreen">$1.00</span></span>"#,
    );
    let product = parse_product(&html, URL).unwrap();
    assert_eq!(product.title, "Super Widget 2000");
}

#[test]
fn missing_title_uses_placeholder() {
    let html = page(r#"<span class="a-price"><span class="a-offscreen">$1.00</span></span>"#);
    let product = parse_product(&html, URL).unwrap();
    assert_eq!(product.title, TITLE_PLACEHOLDER);
    assert_eq!(product.price, "$1.00");
}

#[test]
fn missing_price_is_price_not_found() {
    let html = page(r#"<span id="productTitle">Widget</span><p>Currently unavailable.</p>"#);
    let err = parse_product(&html, URL).unwrap_err();
    assert!(
        matches!(err, ScraperError::PriceNotFound { ref url } if url == URL),
        "expected PriceNotFound, got: {err:?}"
    );
    assert!(err.to_string().contains("out of stock"));
}

#[test]
fn every_price_selector_is_valid_css() {
    assert_eq!(PRICES.len(), PRICE_SELECTORS.len());
}
