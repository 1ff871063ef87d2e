// Shared fixtures for gateway tests
//
// Every test drives real gateways against `RecordingTransport`, which hands
// out canned bank answers in order and records what would have been sent.
//
// Usage:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//   use helpers::*;

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal_macros::dec;
use vpos::core::{Currency, FieldMap, PosError, Result};
use vpos::gateways::crypt::HashAlgorithm;
use vpos::gateways::models::GatewayEndpoints;
use vpos::gateways::services::{HttpRequest, HttpResponse, HttpTransport};
use vpos::{Account, CardType, CreditCard, Order, PaymentModel};

pub const SUCCESS_URL: &str = "https://domain.com/success";
pub const FAIL_URL: &str = "https://domain.com/fail_url";

/// In-memory transport: canned answers out, recorded requests in
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Transport answering with `bodies`, one per request, HTTP 200
    pub fn with_bodies<'a>(bodies: impl IntoIterator<Item = &'a str>) -> Arc<Self> {
        let transport = Self::default();
        for body in bodies {
            transport.push_body(body);
        }
        Arc::new(transport)
    }

    pub fn push_body(&self, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::ok(body.as_bytes().to_vec())));
    }

    pub fn push_error(&self, error: PosError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PosError::transport("no canned response left")))
    }
}

/// Coerces a recording transport into the handle gateways take
pub fn shared(transport: &Arc<RecordingTransport>) -> Arc<dyn HttpTransport> {
    transport.clone()
}

pub fn endpoints() -> GatewayEndpoints {
    GatewayEndpoints {
        api_url: "https://bank.test/api".to_string(),
        gateway_3d_url: Some("https://bank.test/3d".to_string()),
        gateway_3d_host_url: Some("https://bank.test/3d-host".to_string()),
        query_api_url: None,
    }
}

pub fn est_account(model: PaymentModel) -> Account {
    Account::new("akbank", "700655000200", "ISBANKAPI", "ISBANK07", model).with_store_key("TRPS0200")
}

pub fn est_v3_account(model: PaymentModel) -> Account {
    Account::new("akbankv3", "190100000", "ZIRAATAPI", "ZIRAAT19", model).with_store_key("123456")
}

pub fn inter_pos_account(model: PaymentModel) -> Account {
    Account::new("denizbank", "InterTestApi", "3", "3", model).with_store_key("gDg1N")
}

pub fn pay_for_account(model: PaymentModel) -> Account {
    Account::new(
        "qnbfinansbank-payfor",
        "085300000009704",
        "QNB_API_KULLANICI_3DPAY",
        "UcBN0",
        model,
    )
    .with_store_key("12345678")
}

pub fn pay_flex_account(model: PaymentModel) -> Account {
    Account::new("vakifbank-cp", "000000000111111", "VP999999", "3XTgER89as", model)
        .with_terminal_id("VP999999")
}

pub fn card() -> CreditCard {
    CreditCard::new("4355084355084358", "30", "12", "000")
        .unwrap()
        .with_type(CardType::Visa)
        .with_holder_name("John Doe")
}

/// 100.25 TRY, single payment, with redirect URLs
pub fn order() -> Order {
    Order::new("order222", dec!(100.25), Currency::TRY)
        .with_ip("127.0.0.1")
        .with_email("mail@customer.com")
        .with_redirect_urls(SUCCESS_URL, FAIL_URL)
}

pub fn fields(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Signs a callback the way banks using `HASHPARAMS` do
pub fn sign_hash_params(mut callback: FieldMap, params: &[&str], store_key: &str) -> FieldMap {
    let joined = params.join(":");
    let value: String = params
        .iter()
        .map(|p| callback.get(*p).cloned().unwrap_or_default())
        .collect();
    let hash = HashAlgorithm::Sha1.digest_base64(&format!("{}{}", value, store_key));
    callback.insert("HASHPARAMS".to_string(), format!("{}:", joined));
    callback.insert("HASHPARAMSVAL".to_string(), value);
    callback.insert("HASH".to_string(), hash);
    callback
}
