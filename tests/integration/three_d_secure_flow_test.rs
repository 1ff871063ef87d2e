// Integration tests for the 3D_SECURE model: form, post-back verification,
// confirmation request and response mapping, with the bank replaced by a
// recording transport.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use rust_decimal_macros::dec;
use vpos::core::{Currency, FieldMap, PosError};
use vpos::gateways::crypt::{Crypt, EstPosCrypt, EstV3PosCrypt};
use vpos::gateways::services::{EstPos, PayForPos, PosGateway};
use vpos::gateways::{FormMethod, PreHashHooks, TransactionContext, TransactionState};
use vpos::{PaymentModel, ResponseStatus, TransactionType};

const APPROVED_CC5_RESPONSE: &str = r#"<?xml version="1.0" encoding="ISO-8859-9"?>
<CC5Response>
  <OrderId>order222</OrderId>
  <GroupId>order222</GroupId>
  <Response>Approved</Response>
  <AuthCode>P48911</AuthCode>
  <HostRefNum>230422096719</HostRefNum>
  <ProcReturnCode>00</ProcReturnCode>
  <TransId>23112M00A4B9</TransId>
  <ErrMsg></ErrMsg>
  <Extra>
    <SETTLEID>2286</SETTLEID>
    <CARDBRAND>VISA</CARDBRAND>
  </Extra>
</CC5Response>"#;

fn est_v3_gateway(transport: &std::sync::Arc<RecordingTransport>) -> EstPos {
    EstPos::v3(
        est_v3_account(PaymentModel::ThreeDSecure),
        endpoints(),
        shared(transport),
        PreHashHooks::new(),
    )
}

fn prepared(gateway: &dyn PosGateway, model: PaymentModel) -> TransactionContext {
    let mut ctx = TransactionContext::new(model);
    gateway
        .prepare(&mut ctx, order(), TransactionType::PayAuth, Some(card()))
        .unwrap();
    ctx
}

/// Est v3 post-back signed the way the bank signs it
fn est_v3_callback(md_status: &str) -> FieldMap {
    let mut callback = fields(&[
        ("clientid", "190100000"),
        ("oid", "order222"),
        ("amount", "100.25"),
        ("currency", "949"),
        ("mdStatus", md_status),
        ("md", "bkZ6r+RzJz+XaVBpKtvMQZYcvbGOdSjgLqaG6VHhwWU="),
        ("xid", "PcGkUCpo4iMLxQ6JEk8h1V8t1ok="),
        ("eci", "05"),
        ("cavv", "AAABBBBBBBBBBBBBBBIIIIII="),
        ("mdErrorMsg", "Authenticated"),
        ("okUrl", SUCCESS_URL),
        ("failUrl", FAIL_URL),
        ("rnd", "tDoKxVYRyAbqfXE9jrTT"),
        ("hashAlgorithm", "ver3"),
    ]);
    let hash = EstV3PosCrypt
        .create_3d_hash(&est_v3_account(PaymentModel::ThreeDSecure), &callback)
        .unwrap();
    callback.insert("HASH".to_string(), hash);
    callback
}

#[tokio::test]
async fn test_est_v3_form_is_signed_over_its_inputs() {
    let transport = RecordingTransport::new();
    let gateway = est_v3_gateway(&transport);
    let mut ctx = TransactionContext::new(PaymentModel::ThreeDSecure);
    gateway
        .prepare(&mut ctx, order(), TransactionType::PayAuth, None)
        .unwrap();

    let form = gateway.get_3d_form_data(&mut ctx).await.unwrap();

    assert_eq!(form.gateway, "https://bank.test/3d");
    assert_eq!(form.method, FormMethod::Post);
    assert_eq!(form.inputs["clientid"], "190100000");
    assert_eq!(form.inputs["storetype"], "3d");
    assert_eq!(form.inputs["amount"], "100.25");
    assert_eq!(form.inputs["oid"], "order222");
    assert_eq!(form.inputs["taksit"], "");
    assert_eq!(form.inputs["TranType"], "Auth");
    assert_eq!(form.inputs["hashAlgorithm"], "ver3");
    assert_eq!(form.inputs["currency"], "949");
    assert_eq!(form.inputs["lang"], "tr");
    assert_eq!(form.inputs["rnd"].len(), 20);
    assert!(!form.inputs.contains_key("pan"));

    // the bank recomputes the same hash over the posted inputs
    let account = est_v3_account(PaymentModel::ThreeDSecure);
    assert!(EstV3PosCrypt.check_3d_hash(&account, &form.inputs).unwrap());

    assert_eq!(ctx.state(), TransactionState::Awaiting3dRedirect);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_est_v1_form_hash_revalidates() {
    let transport = RecordingTransport::new();
    let account = est_account(PaymentModel::ThreeDSecure);
    let gateway = EstPos::new(account.clone(), endpoints(), shared(&transport), PreHashHooks::new());
    let mut ctx = TransactionContext::new(PaymentModel::ThreeDSecure);
    gateway
        .prepare(&mut ctx, order(), TransactionType::PayAuth, Some(card()))
        .unwrap();

    let form = gateway.get_3d_form_data(&mut ctx).await.unwrap();

    assert_eq!(form.inputs["clientid"], "700655000200");
    assert_eq!(form.inputs["amount"], "100.25");
    assert_eq!(form.inputs["oid"], "order222");
    assert_eq!(form.inputs["taksit"], "");
    assert!(EstPosCrypt.check_3d_hash(&account, &form.inputs).unwrap());

    let mut tampered = form.inputs.clone();
    tampered.insert("amount".to_string(), "1.00".to_string());
    assert!(!EstPosCrypt.check_3d_hash(&account, &tampered).unwrap());
}

#[tokio::test]
async fn test_est_v1_form_posted_back_is_not_a_callback() {
    let transport = RecordingTransport::with_bodies([APPROVED_CC5_RESPONSE]);
    let gateway = EstPos::new(
        est_account(PaymentModel::ThreeDSecure),
        endpoints(),
        shared(&transport),
        PreHashHooks::new(),
    );
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDSecure);
    let form = gateway.get_3d_form_data(&mut ctx).await.unwrap();

    let mut replayed = form.inputs.clone();
    replayed.insert("mdStatus".to_string(), "1".to_string());
    let result = gateway.make_3d_payment(&mut ctx, &replayed).await;

    assert!(matches!(result, Err(PosError::HashMismatch(_))));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_est_v3_full_flow() {
    let transport = RecordingTransport::with_bodies([APPROVED_CC5_RESPONSE]);
    let gateway = est_v3_gateway(&transport);
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDSecure);
    gateway.get_3d_form_data(&mut ctx).await.unwrap();

    let response = gateway
        .make_3d_payment(&mut ctx, &est_v3_callback("1"))
        .await
        .unwrap();

    assert_eq!(response.status, ResponseStatus::Approved);
    assert_eq!(response.order_id.as_deref(), Some("order222"));
    assert_eq!(response.auth_code.as_deref(), Some("P48911"));
    assert_eq!(response.transaction_id.as_deref(), Some("23112M00A4B9"));
    assert_eq!(response.md_status.as_deref(), Some("1"));
    assert_eq!(response.currency, Some(Currency::TRY));
    assert_eq!(response.amount, Some(dec!(100.25)));
    assert_eq!(response.payment_model, Some(PaymentModel::ThreeDSecure));
    assert_eq!(response.raw["Extra.CARDBRAND"], "VISA");

    assert_eq!(ctx.state(), TransactionState::ResponseMapped);
    assert_eq!(ctx.response(), Some(&response));

    let request = transport.last_request();
    assert_eq!(request.url, "https://bank.test/api");
    assert!(request.header("Content-Type").unwrap().starts_with("text/xml"));
    assert!(request.body.contains("<Type>Auth</Type>"));
    assert!(request.body.contains("<Number>bkZ6r+RzJz+XaVBpKtvMQZYcvbGOdSjgLqaG6VHhwWU=</Number>"));
    assert!(request.body.contains("<PayerSecurityLevel>05</PayerSecurityLevel>"));
    assert!(request.body.contains("<Total>100.25</Total>"));
}

#[tokio::test]
async fn test_tampered_callback_is_rejected_before_any_request() {
    let transport = RecordingTransport::with_bodies([APPROVED_CC5_RESPONSE]);
    let gateway = est_v3_gateway(&transport);
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDSecure);

    let mut callback = est_v3_callback("1");
    callback.insert("amount".to_string(), "1.00".to_string());

    let result = gateway.make_3d_payment(&mut ctx, &callback).await;

    assert!(matches!(result, Err(PosError::HashMismatch(_))));
    assert_eq!(transport.request_count(), 0);
    assert!(ctx.response().is_none());
    assert!(!ctx.is_status_unknown());
}

#[tokio::test]
async fn test_callback_without_hash_is_rejected() {
    let transport = RecordingTransport::new();
    let gateway = est_v3_gateway(&transport);
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDSecure);

    let mut callback = est_v3_callback("1");
    callback.shift_remove("HASH");

    let result = gateway.make_3d_payment(&mut ctx, &callback).await;
    assert!(matches!(result, Err(PosError::HashMismatch(_))));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_failed_authentication_is_declined_without_confirmation() {
    let transport = RecordingTransport::new();
    let gateway = est_v3_gateway(&transport);
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDSecure);

    let response = gateway
        .make_3d_payment(&mut ctx, &est_v3_callback("0"))
        .await
        .unwrap();

    assert_eq!(response.status, ResponseStatus::Declined);
    assert_eq!(response.md_status.as_deref(), Some("0"));
    assert_eq!(response.order_id.as_deref(), Some("order222"));
    assert_eq!(transport.request_count(), 0);
    assert_eq!(ctx.state(), TransactionState::ResponseMapped);
}

#[tokio::test]
async fn test_transport_failure_leaves_payment_status_unknown() {
    let transport = RecordingTransport::new();
    transport.push_error(PosError::transport("connection reset by peer"));
    let gateway = est_v3_gateway(&transport);
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDSecure);

    let err = gateway
        .make_3d_payment(&mut ctx, &est_v3_callback("1"))
        .await
        .unwrap_err();

    assert!(err.is_payment_status_unknown());
    assert!(ctx.is_status_unknown());
    assert_eq!(ctx.state(), TransactionState::Confirmed);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_dispatcher_requires_callback_for_3d_models() {
    let transport = RecordingTransport::new();
    let gateway = est_v3_gateway(&transport);
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDSecure);

    let result = gateway.payment(&mut ctx, None).await;
    assert!(matches!(result, Err(PosError::MissingField(_))));
}

#[tokio::test]
async fn test_payment_on_unprepared_context_is_invalid_state() {
    let transport = RecordingTransport::new();
    let gateway = est_v3_gateway(&transport);
    let mut ctx = TransactionContext::new(PaymentModel::ThreeDSecure);

    let result = gateway.make_3d_payment(&mut ctx, &est_v3_callback("1")).await;
    assert!(matches!(result, Err(PosError::InvalidState { .. })));
}

#[tokio::test]
async fn test_pay_for_declined_3d_status_is_not_confirmed() {
    let transport = RecordingTransport::new();
    let gateway = PayForPos::new(
        pay_for_account(PaymentModel::ThreeDSecure),
        endpoints(),
        shared(&transport),
        PreHashHooks::new(),
    );
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDSecure);

    let callback = fields(&[
        ("OrderId", "order222"),
        ("AuthCode", ""),
        ("ProcReturnCode", "V033"),
        ("3DStatus", "0"),
        ("ResponseRnd", "rnd-declined"),
        ("ErrMsg", "Kart doğrulanamadı"),
        ("ResponseHash", "++qRiS8QnIOY6ghpPRhXUMeM870="),
    ]);

    let response = gateway.payment(&mut ctx, Some(&callback)).await.unwrap();

    assert_eq!(response.status, ResponseStatus::Declined);
    assert_eq!(response.md_status.as_deref(), Some("0"));
    assert_eq!(response.error_code.as_deref(), Some("V033"));
    assert_eq!(response.order_id.as_deref(), Some("order222"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_pay_for_confirmation_carries_request_guid() {
    let transport = RecordingTransport::with_bodies([
        "<PayforResponse><OrderId>order222</OrderId><AuthCode>S68498</AuthCode>\r\n\
         <ProcReturnCode>00</ProcReturnCode><TransId>order222</TransId><ErrMsg>Onaylandı</ErrMsg>\r\n\
         <HostRefNum>230422096720</HostRefNum></PayforResponse>",
    ]);
    let gateway = PayForPos::new(
        pay_for_account(PaymentModel::ThreeDSecure),
        endpoints(),
        shared(&transport),
        PreHashHooks::new(),
    );
    let mut ctx = prepared(&gateway, PaymentModel::ThreeDSecure);

    let callback = fields(&[
        ("OrderId", "order222"),
        ("AuthCode", ""),
        ("ProcReturnCode", "V033"),
        ("3DStatus", "1"),
        ("ResponseRnd", "rnd-ok"),
        ("RequestGuid", "1000000094948185"),
        ("PurchAmount", "100.25"),
        ("Currency", "949"),
        ("ResponseHash", "1IOd2HhWIN6wcSC9esEOReDfnIA="),
    ]);

    let response = gateway.payment(&mut ctx, Some(&callback)).await.unwrap();

    assert_eq!(response.status, ResponseStatus::Approved);
    assert_eq!(response.auth_code.as_deref(), Some("S68498"));
    assert_eq!(response.md_status.as_deref(), Some("1"));
    assert_eq!(response.amount, Some(dec!(100.25)));

    let request = transport.last_request();
    assert!(request.body.contains("<PayforRequest>"));
    assert!(request.body.contains("<RequestGuid>1000000094948185</RequestGuid>"));
    assert!(request.body.contains("<SecureType>3DModelPayment</SecureType>"));
}
