use std::time::Duration;

use httpmock::prelude::*;
use quadriga_client_sdk::error::Kind;
use quadriga_client_sdk::transport::{LiveTransport, Transport as _};
use quadriga_client_sdk::types::Book;
use quadriga_client_sdk::{Client, Config, Credentials};
use rust_decimal_macros::dec;
use secrecy::SecretString;
use url::Url;

fn credentials() -> Credentials {
    Credentials::new(
        "123456".to_owned(),
        "key".to_owned(),
        SecretString::from("secret"),
    )
}

fn client_for(server: &MockServer) -> Client {
    let config = Config::from_raw(&server.url("/v2"), Some(Duration::from_secs(5)))
        .expect("mock server url");
    Client::new(&config, credentials()).expect("client")
}

#[tokio::test]
async fn ticker_is_fetched_with_book_query() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/ticker")
                .query_param("book", "eth_cad");
            then.status(200).body(
                r#"{"high":"700.00","last":"690.10","timestamp":"1521612778","volume":"10.5","vwap":"695.00","low":"680.00","ask":"691.00","bid":"690.10"}"#,
            );
        })
        .await;

    let ticker = client_for(&server).ticker(Some("eth_cad")).await?;

    mock.assert_async().await;
    assert_eq!(ticker.ask, dec!(691), "ask");
    Ok(())
}

#[tokio::test]
async fn private_calls_post_json() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v2/buy")
                .header("content-type", "application/json; charset=utf-8");
            then.status(200)
                .body(r#"{"amount":"0.00200000","book":"btc_cad","id":"kbcb"}"#);
        })
        .await;

    let result = client_for(&server)
        .place_market_buy(dec!(0.002), &Book::BTC_CAD)
        .await?;

    mock.assert_async().await;
    assert_eq!(result.id, "kbcb", "id");
    Ok(())
}

#[tokio::test]
async fn error_envelope_wins_over_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v2/balance");
            then.status(400)
                .body(r#"{"error":{"message":"Invalid nonce","code":102}}"#);
        })
        .await;

    let err = client_for(&server).balance().await.unwrap_err();

    assert_eq!(err.kind(), Kind::Remote, "kind");
    assert_eq!(err.remote_message(), Some("Invalid nonce"), "message");
}

#[tokio::test]
async fn non_json_error_page_is_decoding_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/order_book");
            then.status(502).body("<html>Bad Gateway</html>");
        })
        .await;

    let err = client_for(&server).order_book().await.unwrap_err();

    assert_eq!(err.kind(), Kind::Decoding, "delivered but unreadable");
}

#[tokio::test]
async fn empty_success_body_is_returned_as_empty() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/transactions");
            then.status(200);
        })
        .await;
    let transport = LiveTransport::new(&Config::default())?;

    let body = transport
        .get(&Url::parse(&server.url("/v2/transactions"))?)
        .await?;

    assert!(body.is_empty(), "a valid empty body is not an error");
    Ok(())
}

#[tokio::test]
async fn stalled_server_times_out_as_network_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/ticker");
            then.status(200).delay(Duration::from_secs(2)).body("{}");
        })
        .await;
    let config = Config::from_raw(&server.url("/v2/"), Some(Duration::from_millis(200)))
        .expect("mock server url");
    let client = Client::new(&config, credentials()).expect("client");

    let err = client.ticker(None).await.unwrap_err();

    assert_eq!(err.kind(), Kind::Network, "timeout");
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let config = Config::from_raw("http://127.0.0.1:9/v2/", Some(Duration::from_secs(2)))
        .expect("static url");
    let client = Client::new(&config, credentials()).expect("client");

    let err = client.balance().await.unwrap_err();

    assert_eq!(err.kind(), Kind::Network, "connection refused");
}
