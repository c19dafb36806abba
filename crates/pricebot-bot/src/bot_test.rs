use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pricebot_scraper::ProductClient;

use super::*;
use crate::telegram::Chat;

const TOKEN: &str = "42:bot-test";
const BOT_USERNAME: &str = "AmazonPriceBot";

fn test_telegram(server: &MockServer) -> TelegramClient {
    TelegramClient::with_base_url(TOKEN, 1, &server.uri())
        .expect("client construction should not fail")
}

fn test_lookup() -> PriceLookup {
    PriceLookup::new(ProductClient::new(1, 1, 0).expect("client"), None)
}

fn message(text: &str) -> Message {
    Message {
        message_id: 1,
        chat: Chat { id: 777 },
        text: Some(text.to_owned()),
    }
}

fn sent_message_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": { "message_id": 2, "chat": { "id": 777 } }
    }))
}

async fn expect_reply(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_partial_json(json!({ "chat_id": 777, "text": text })))
        .respond_with(sent_message_ok())
        .expect(1)
        .mount(server)
        .await;
}

async fn sent_texts(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .expect("recording enabled")
        .iter()
        .filter(|request| request.url.path().ends_with("/sendMessage"))
        .map(|request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            body["text"].as_str().unwrap_or_default().to_owned()
        })
        .collect()
}

#[tokio::test]
async fn start_replies_with_usage() {
    let server = MockServer::start().await;
    expect_reply(&server, START_TEXT).await;

    handle_message(
        &test_telegram(&server),
        &test_lookup(),
        Some(BOT_USERNAME),
        &message("/start"),
    )
    .await;
}

#[tokio::test]
async fn anti_bot_replies_with_tips() {
    let server = MockServer::start().await;
    expect_reply(&server, ANTI_BOT_TEXT).await;

    handle_message(
        &test_telegram(&server),
        &test_lookup(),
        Some(BOT_USERNAME),
        &message("/anti_bot@AmazonPriceBot"),
    )
    .await;
}

#[tokio::test]
async fn command_for_another_bot_gets_no_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(sent_message_ok())
        .expect(0)
        .mount(&server)
        .await;

    handle_message(
        &test_telegram(&server),
        &test_lookup(),
        Some(BOT_USERNAME),
        &message("/price@SomeOtherBot https://www.amazon.com/dp/B0"),
    )
    .await;
}

#[tokio::test]
async fn price_without_link_explains_usage() {
    let server = MockServer::start().await;
    expect_reply(&server, NO_URL_TEXT).await;

    handle_message(
        &test_telegram(&server),
        &test_lookup(),
        Some(BOT_USERNAME),
        &message("/price https://www.ebay.com/itm/1"),
    )
    .await;
}

#[tokio::test]
async fn failed_price_lookup_acknowledges_then_reports_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_partial_json(json!({ "chat_id": 777 })))
        .respond_with(sent_message_ok())
        .expect(2)
        .mount(&server)
        .await;

    handle_message(
        &test_telegram(&server),
        &test_lookup(),
        Some(BOT_USERNAME),
        &message("/price http://amazon.invalid/dp/B0"),
    )
    .await;

    let texts = sent_texts(&server).await;
    assert_eq!(texts.len(), 2, "{texts:?}");
    assert_eq!(texts[0], CHECKING_TEXT);
    assert!(
        texts[1].starts_with("❌ Could not fetch the Amazon page"),
        "unexpected error reply: {}",
        texts[1]
    );
}

#[tokio::test]
async fn successful_lookup_renders_product_reply() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dp/B0TEST/ref=sr_1_3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
              <span id="productTitle">USB_C Hub &amp; Dock</span>
              <span class="a-price"><span class="a-offscreen">$9.99</span></span>
            </body></html>"#,
        ))
        .mount(&site)
        .await;

    let url = format!("{}/dp/B0TEST/ref=sr_1_3", site.uri());
    let reply = reply_for(&test_lookup(), 777, &url).await;

    let expected_html = format!("🛍️ <b>USB_C Hub &amp; Dock</b>\n💰 <b>Price:</b> $9.99\n🔗 {url}");
    assert_eq!(reply.html.as_deref(), Some(expected_html.as_str()));
    assert_eq!(reply.text, format!("🛍️ USB_C Hub & Dock\n💰 Price: $9.99\n🔗 {url}"));
}

#[tokio::test]
async fn failed_lookup_renders_error_reply() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&site)
        .await;

    let reply = reply_for(&test_lookup(), 777, &format!("{}/dp/B0TEST", site.uri())).await;

    assert!(reply.html.is_none());
    assert!(reply.text.starts_with("❌ Price not found."), "{}", reply.text);
}

#[tokio::test]
async fn plain_text_gets_no_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(sent_message_ok())
        .expect(0)
        .mount(&server)
        .await;

    handle_message(
        &test_telegram(&server),
        &test_lookup(),
        Some(BOT_USERNAME),
        &message("hi bot"),
    )
    .await;
    handle_message(
        &test_telegram(&server),
        &test_lookup(),
        Some(BOT_USERNAME),
        &Message {
            message_id: 3,
            chat: Chat { id: 777 },
            text: None,
        },
    )
    .await;
}

#[tokio::test]
async fn rejected_html_is_resent_as_plain_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_partial_json(json!({ "parse_mode": "HTML" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: can't parse entities"
        })))
        .expect(1)
        .mount(&server)
        .await;
    expect_reply(&server, "Widget & co").await;

    send_reply(
        &test_telegram(&server),
        777,
        &Reply::html("<b>Widget &amp; co", "Widget & co"),
    )
    .await;

    let requests = server.received_requests().await.expect("recording enabled");
    let last: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert!(last.get("parse_mode").is_none(), "resend must be plain: {last}");
    assert_eq!(last["text"], "Widget & co");
}

#[tokio::test]
async fn run_fails_fast_on_bad_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/deleteWebhook")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let result = run(
        Arc::new(test_telegram(&server)),
        Arc::new(test_lookup()),
        1,
        std::future::pending(),
    )
    .await;

    assert!(
        matches!(result, Err(TelegramError::Api { code: 401, .. })),
        "expected Api(401), got: {result:?}"
    );
}

#[tokio::test]
async fn run_dispatches_updates_and_advances_offset() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/deleteWebhook")))
        .and(body_partial_json(json!({ "drop_pending_updates": true })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getMe")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "id": 42, "is_bot": true, "username": BOT_USERNAME }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [
                {
                    "update_id": 10,
                    "message": { "message_id": 1, "chat": { "id": 777 }, "text": "/start" }
                },
                {
                    "update_id": 11,
                    "message": {
                        "message_id": 2,
                        "chat": { "id": 777 },
                        "text": "/start@SomeOtherBot"
                    }
                }
            ]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .and(body_partial_json(json!({ "offset": 12 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ok": true, "result": [] }))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;

    expect_reply(&server, START_TEXT).await;

    run(
        Arc::new(test_telegram(&server)),
        Arc::new(test_lookup()),
        1,
        tokio::time::sleep(Duration::from_millis(300)),
    )
    .await
    .expect("run should stop cleanly on shutdown");
}
