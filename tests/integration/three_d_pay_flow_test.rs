// Integration tests for the 3D_PAY and 3D_HOST models, where the bank charges
// before posting back, and for the PayFlex common payment flow
// (registration, redirect, post-back, status query).

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use helpers::*;
use rust_decimal_macros::dec;
use vpos::core::{Currency, PosError};
use vpos::gateways::services::{EstPos, InterPos, PayFlexCpV4Pos, PosGateway};
use vpos::gateways::{FormMethod, GatewayEndpoints, PreHashHooks, TransactionContext, TransactionState};
use vpos::{PaymentModel, ResponseStatus, TransactionType};

fn prepared(gateway: &dyn PosGateway, model: PaymentModel) -> TransactionContext {
    let mut ctx = TransactionContext::new(model);
    gateway
        .prepare(&mut ctx, order(), TransactionType::PayAuth, Some(card()))
        .unwrap();
    ctx
}

#[tokio::test]
async fn test_est_3d_pay_callback_is_mapped_without_requests() {
    let transport = RecordingTransport::new();
    let gateway = EstPos::new(
        est_account(PaymentModel::ThreeDPay),
        endpoints(),
        shared(&transport),
        PreHashHooks::new(),
    );
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDPay);

    let form = gateway.get_3d_form_data(&mut ctx).await.unwrap();
    assert_eq!(form.inputs["storetype"], "3d_pay");
    assert_eq!(form.inputs["islemtipi"], "Auth");
    assert_eq!(form.inputs["pan"], "4355084355084358");
    assert_eq!(form.inputs["cardType"], "1");

    let callback = sign_hash_params(
        fields(&[
            ("clientid", "700655000200"),
            ("oid", "order222"),
            ("amount", "100.25"),
            ("currency", "949"),
            ("mdStatus", "1"),
            ("Response", "Approved"),
            ("ProcReturnCode", "00"),
            ("AuthCode", "P77974"),
            ("TransId", "22303Lm0A10429"),
            ("HostRefNum", "022915001410"),
        ]),
        &["clientid", "oid", "AuthCode", "ProcReturnCode", "Response", "mdStatus"],
        "TRPS0200",
    );

    let response = gateway.payment(&mut ctx, Some(&callback)).await.unwrap();

    assert_eq!(response.status, ResponseStatus::Approved);
    assert_eq!(response.order_id.as_deref(), Some("order222"));
    assert_eq!(response.auth_code.as_deref(), Some("P77974"));
    assert_eq!(response.amount, Some(dec!(100.25)));
    assert_eq!(response.currency, Some(Currency::TRY));
    assert_eq!(response.payment_model, Some(PaymentModel::ThreeDPay));
    assert_eq!(ctx.state(), TransactionState::ResponseMapped);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_est_3d_pay_rejects_forged_hash_params_value() {
    let transport = RecordingTransport::new();
    let gateway = EstPos::new(
        est_account(PaymentModel::ThreeDPay),
        endpoints(),
        shared(&transport),
        PreHashHooks::new(),
    );
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDPay);

    let mut callback = sign_hash_params(
        fields(&[("oid", "order222"), ("ProcReturnCode", "99"), ("mdStatus", "1")]),
        &["oid", "ProcReturnCode", "mdStatus"],
        "TRPS0200",
    );
    callback.insert("ProcReturnCode".to_string(), "00".to_string());

    let result = gateway.make_3d_pay_payment(&mut ctx, &callback).await;
    assert!(matches!(result, Err(PosError::HashMismatch(_))));
    assert!(ctx.response().is_none());
}

#[tokio::test]
async fn test_est_3d_host_form_posts_to_hosted_page_without_card() {
    let transport = RecordingTransport::new();
    let gateway = EstPos::new(
        est_account(PaymentModel::ThreeDHost),
        endpoints(),
        shared(&transport),
        PreHashHooks::new(),
    );
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDHost);

    let form = gateway.get_3d_form_data(&mut ctx).await.unwrap();

    assert_eq!(form.gateway, "https://bank.test/3d-host");
    assert_eq!(form.inputs["storetype"], "3d_host");
    for key in ["pan", "cv2", "cardType", "Ecom_Payment_Card_ExpDate_Month"] {
        assert!(!form.inputs.contains_key(key), "{} leaked into a 3D_HOST form", key);
    }
}

#[tokio::test]
async fn test_inter_pos_3d_pay_flow() {
    let transport = RecordingTransport::new();
    let gateway = InterPos::new(
        inter_pos_account(PaymentModel::ThreeDPay),
        endpoints(),
        shared(&transport),
        PreHashHooks::new(),
    );
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDPay);

    let form = gateway.get_3d_form_data(&mut ctx).await.unwrap();
    assert_eq!(form.method, FormMethod::Post);
    assert_eq!(form.inputs["ShopCode"], "InterTestApi");
    assert_eq!(form.inputs["SecureType"], "3DPay");
    assert_eq!(form.inputs["PurchAmount"], "100.25");
    assert_eq!(form.inputs["InstallmentCount"], "");
    assert_eq!(form.inputs["CardType"], "0");
    assert_eq!(form.inputs["Expiry"], "1230");
    assert!(form.inputs.contains_key("Hash"));

    let callback = sign_hash_params(
        fields(&[
            ("OrderId", "order222"),
            ("mdStatus", "1"),
            ("ProcReturnCode", "00"),
            ("AuthCode", "S90370"),
            ("TransId", "ec1e1a3d-8ef8"),
            ("PurchAmount", "100.25"),
            ("Currency", "949"),
        ]),
        &["OrderId", "ProcReturnCode", "AuthCode", "mdStatus"],
        "gDg1N",
    );

    let response = gateway.payment(&mut ctx, Some(&callback)).await.unwrap();

    assert_eq!(response.status, ResponseStatus::Approved);
    assert_eq!(response.auth_code.as_deref(), Some("S90370"));
    assert_eq!(response.md_status.as_deref(), Some("1"));
    assert_eq!(response.amount, Some(dec!(100.25)));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_inter_pos_failed_3d_pay_is_declined() {
    let transport = RecordingTransport::new();
    let gateway = InterPos::new(
        inter_pos_account(PaymentModel::ThreeDPay),
        endpoints(),
        shared(&transport),
        PreHashHooks::new(),
    );
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDPay);

    let callback = sign_hash_params(
        fields(&[
            ("OrderId", "order222"),
            ("mdStatus", "0"),
            ("ErrorCode", "3D-1004"),
            ("ErrorMessage", "Kart doğrulama başarısız"),
        ]),
        &["OrderId", "mdStatus"],
        "gDg1N",
    );

    let response = gateway.make_3d_pay_payment(&mut ctx, &callback).await.unwrap();
    assert_eq!(response.status, ResponseStatus::Declined);
    assert_eq!(response.error_code.as_deref(), Some("3D-1004"));
    assert_eq!(response.order_id.as_deref(), Some("order222"));
}

const REGISTRATION_RESPONSE: &str = "<CommonPaymentResponse>\
    <CommonPaymentUrl>https://cptest.vakifbank.com.tr/CommonPayment/SecurePayment</CommonPaymentUrl>\
    <PaymentToken>c6b7cecc2a1846088a4eafc300db246b</PaymentToken>\
    <ErrorCode/><ResponseMessage/></CommonPaymentResponse>";

const STATUS_QUERY_RESPONSE: &str = "<VposTransactionResponseContract>\
    <Rc>0000</Rc><OrderID>order222</OrderID><TransactionId>eb94c6b4bda24d5e8bd4b1c1009d7b1b</TransactionId>\
    <AuthCode>565842</AuthCode><Rrn>311719108545</Rrn><Amount>100.25</Amount><AmountCode>949</AmountCode>\
    <Message>İşlem Başarılı</Message></VposTransactionResponseContract>";

fn pay_flex_endpoints() -> GatewayEndpoints {
    GatewayEndpoints {
        query_api_url: Some("https://bank.test/query".to_string()),
        ..endpoints()
    }
}

fn pay_flex(transport: &Arc<RecordingTransport>) -> PayFlexCpV4Pos {
    PayFlexCpV4Pos::new(
        pay_flex_account(PaymentModel::ThreeDPay),
        pay_flex_endpoints(),
        shared(transport),
        PreHashHooks::new(),
    )
}

#[tokio::test]
async fn test_pay_flex_common_payment_flow() {
    let transport = RecordingTransport::with_bodies([REGISTRATION_RESPONSE, STATUS_QUERY_RESPONSE]);
    let gateway = pay_flex(&transport);
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDPay);

    // registration, then a GET redirect carrying the payment token
    let form = gateway.get_3d_form_data(&mut ctx).await.unwrap();
    assert_eq!(form.method, FormMethod::Get);
    assert_eq!(form.gateway, "https://cptest.vakifbank.com.tr/CommonPayment/SecurePayment");
    assert_eq!(form.inputs.len(), 1);
    assert_eq!(form.inputs["Ptkn"], "c6b7cecc2a1846088a4eafc300db246b");
    assert_eq!(ctx.state(), TransactionState::Awaiting3dRedirect);

    let registration = &transport.requests()[0];
    assert_eq!(registration.url, "https://bank.test/3d");
    assert_eq!(
        registration.header("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );
    assert!(registration.body.contains("HostTerminalId=VP999999"));
    assert!(registration.body.contains("Amount=100.25"));
    assert!(registration.body.contains("HashedData="));

    // bank post-back, confirmed with a status query
    let callback = fields(&[
        ("Rc", "0000"),
        ("Message", "İşlem Başarılı"),
        ("TransactionId", "eb94c6b4bda24d5e8bd4b1c1009d7b1b"),
        ("PaymentToken", "c6b7cecc2a1846088a4eafc300db246b"),
        ("OrderID", "order222"),
    ]);
    let response = gateway.payment(&mut ctx, Some(&callback)).await.unwrap();

    assert_eq!(response.status, ResponseStatus::Approved);
    assert_eq!(response.order_id.as_deref(), Some("order222"));
    assert_eq!(response.auth_code.as_deref(), Some("565842"));
    assert_eq!(response.ref_ret_num.as_deref(), Some("311719108545"));
    assert_eq!(response.amount, Some(dec!(100.25)));
    assert_eq!(response.currency, Some(Currency::TRY));
    assert_eq!(response.payment_model, Some(PaymentModel::ThreeDPay));
    assert_eq!(ctx.state(), TransactionState::ResponseMapped);

    let query = transport.last_request();
    assert_eq!(query.url, "https://bank.test/query");
    assert!(query.body.contains("TransactionId=eb94c6b4bda24d5e8bd4b1c1009d7b1b"));
    assert!(query.body.contains("PaymentToken=c6b7cecc2a1846088a4eafc300db246b"));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_pay_flex_failed_post_back_skips_status_query() {
    let transport = RecordingTransport::with_bodies([REGISTRATION_RESPONSE]);
    let gateway = pay_flex(&transport);
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDPay);
    gateway.get_3d_form_data(&mut ctx).await.unwrap();

    let callback = fields(&[
        ("Rc", "0312"),
        ("Message", "RED-GECERSIZ KART"),
        ("TransactionId", "eb94c6b4bda24d5e8bd4b1c1009d7b1b"),
        ("PaymentToken", "c6b7cecc2a1846088a4eafc300db246b"),
        ("OrderID", "order222"),
    ]);
    let response = gateway.make_3d_pay_payment(&mut ctx, &callback).await.unwrap();

    assert_eq!(response.status, ResponseStatus::Declined);
    assert_eq!(response.error_code.as_deref(), Some("0312"));
    assert_eq!(response.error_message.as_deref(), Some("RED-GECERSIZ KART"));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_pay_flex_registration_error_carries_bank_message() {
    let transport = RecordingTransport::with_bodies([
        "<CommonPaymentResponse><ErrorCode>5007</ErrorCode>\
         <ResponseMessage>Geçersiz üye işyeri</ResponseMessage></CommonPaymentResponse>",
    ]);
    let gateway = pay_flex(&transport);
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDPay);

    let err = gateway.get_3d_form_data(&mut ctx).await.unwrap_err();

    assert!(matches!(err, PosError::Gateway(_)));
    assert!(err.to_string().contains("5007"));
    assert_eq!(ctx.state(), TransactionState::Prepared);
}

#[tokio::test]
async fn test_pay_flex_has_no_3d_secure_confirmation() {
    let transport = RecordingTransport::new();
    let gateway = pay_flex(&transport);
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDSecure);

    let result = gateway.make_3d_payment(&mut ctx, &fields(&[("Rc", "0000")])).await;
    assert!(matches!(result, Err(PosError::NotImplemented(_))));
    assert_eq!(transport.request_count(), 0);
}
