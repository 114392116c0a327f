// tests/common/mod.rs
pub use httpmock::prelude::*;
pub use serde_json::json;

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::cache::{CacheStore, InMemoryCache};
use crate::client::token_manager::{cache_key, TOKEN_TTL_SECONDS};
use crate::client::AtolClient;
use crate::config::client::ClientConfig;
use crate::document::{
    Client, Company, Item, Payment, PaymentMethod, PaymentObject, PaymentType, Receipt, Sell, Sno,
    Vat, VatType,
};
use crate::transport::ReqwestTransport;

pub const LOGIN: &str = "merchant";
pub const PASSWORD: &str = "secret";
pub const GROUP: &str = "group_1";
pub const BAD_TOKEN_CODE: i64 = 11;

pub type TestClient = AtolClient<ReqwestTransport, InMemoryCache>;

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).expect("decimal literal")
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.base_url(), GROUP, LOGIN, PASSWORD)
}

/// Client talking to `server`, with its cache handed back for inspection.
pub fn client_for(server: &MockServer) -> (TestClient, Arc<InMemoryCache>) {
    let cache = Arc::new(InMemoryCache::new());
    let transport = Arc::new(ReqwestTransport::new(5_000).expect("reqwest client"));
    (AtolClient::new(config_for(server), transport, cache.clone()), cache)
}

pub async fn seed_token(cache: &InMemoryCache, token: &str) {
    cache.set(&cache_key(LOGIN), token.to_owned(), TOKEN_TTL_SECONDS).await;
}

pub fn path(tail: &str) -> String {
    format!("/possystem/v4/{}", tail)
}

/// getToken answering with `token`.
pub async fn mock_token<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
    let token = token.to_owned();
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(path("getToken"))
                .header("content-type", "application/json")
                .json_body(json!({ "login": LOGIN, "pass": PASSWORD }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "error": null, "token": token, "timestamp": "01.10.2025 12:00:00" }));
        })
        .await
}

/// Document POST made with `token` answering with `body`.
pub async fn mock_post<'a>(server: &'a MockServer, operation: &str, token: &str, status: u16, body: serde_json::Value) -> httpmock::Mock<'a> {
    let token = token.to_owned();
    let operation_path = path(&format!("{}/{}", GROUP, operation));
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(operation_path)
                .header("token", token)
                .header("accept", "application/json; charset=utf-8");
            then.status(status)
                .header("Content-Type", "application/json")
                .json_body(body);
        })
        .await
}

pub fn accepted(uuid: &str) -> serde_json::Value {
    json!({ "uuid": uuid, "status": "wait", "error": null, "timestamp": "01.10.2025 12:00:01" })
}

pub fn error_body(code: i64, error_id: &str, text: &str) -> serde_json::Value {
    json!({
        "uuid": null,
        "status": "fail",
        "error": { "error_id": error_id, "code": code, "text": text, "type": "system" },
        "timestamp": "01.10.2025 12:00:01"
    })
}

pub fn bad_token_body() -> serde_json::Value {
    error_body(BAD_TOKEN_CODE, "bad-token-id", "token expired")
}

pub fn sample_receipt() -> Receipt {
    Receipt::new()
        .with_external_id("order-17").unwrap()
        .with_timestamp(
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap().and_hms_opt(9, 5, 3).unwrap(),
        )
        .with_client(Client::new().with_email("buyer@example.com").unwrap())
        .with_company(
            Company::new()
                .with_email("shop@example.com").unwrap()
                .with_sno(Sno::UsnIncome)
                .with_inn("7700000000").unwrap()
                .with_payment_address("https://shop.example.com").unwrap(),
        )
        .add_item(
            Item::new()
                .with_name("Coffee beans").unwrap()
                .with_price(dec("150.005")).unwrap()
                .with_quantity(dec("1")).unwrap()
                .with_sum(dec("150.005")).unwrap()
                .with_payment_method(PaymentMethod::FullPayment)
                .with_payment_object(PaymentObject::Commodity)
                .with_vat(Vat::new(VatType::None)),
        )
        .add_payment(Payment::new(PaymentType::ELECTRONIC, dec("150.005")).unwrap())
        .with_total(dec("150.005")).unwrap()
}

pub fn sample_sell() -> Sell {
    Sell(sample_receipt())
}
