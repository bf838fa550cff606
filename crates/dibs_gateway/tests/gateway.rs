#![allow(clippy::unwrap_used)]

use std::{collections::HashMap, str::FromStr, sync::Mutex};

use dibs_gateway::{
    errors::{CustomResult, StorageError},
    gateway::transformers,
    Dibs, DibsSettings, GatewayMode, Order, OrderStore, Payment, PaymentGateway, PaymentStatus,
    ProcessPaymentContext, Store, DIBS_GATEWAY_CODE,
};
use dibs_gateway::types::RequestParameters;
use masking::Secret;
use rust_decimal::Decimal;
use wiremock::{
    matchers::{body_string_contains, header_exists, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn settings(api_base_url: &str) -> DibsSettings {
    DibsSettings {
        merchant_id: "90001234".to_string(),
        md5_key1: Secret::new("key-one".to_string()),
        md5_key2: Secret::new("key-two".to_string()),
        api_login: Secret::new("apiuser".to_string()),
        api_password: Secret::new("apipass".to_string()),
        redirect_url: "https://payment.architrade.com/paymentweb/start.action".to_string(),
        accept_url: "https://shop.example.com/checkout/complete".to_string(),
        callback_url: "https://shop.example.com/api/dibs/callback".to_string(),
        form_decorator: String::new(),
        mode: GatewayMode::Live,
        api_base_url: api_base_url.to_string(),
        request_timeout_secs: 5,
    }
}

fn order() -> Order {
    Order {
        id: "inner-42".to_string(),
        number: "CO-1001".to_string(),
        currency: "208".to_string(),
        total: Decimal::from_str("20.00").unwrap(),
        store_id: "store-1".to_string(),
        in_payments: Vec::new(),
    }
}

fn authorized_payment() -> Payment {
    Payment {
        gateway_code: DIBS_GATEWAY_CODE.to_string(),
        status: PaymentStatus::Authorized,
        amount: Decimal::from_str("20.00").unwrap(),
        currency: "208".to_string(),
        outer_id: Some("987654".to_string()),
        ..Payment::default()
    }
}

struct InMemoryOrders(Mutex<HashMap<String, Order>>);

impl InMemoryOrders {
    fn with(order: Order) -> Self {
        let mut orders = HashMap::new();
        orders.insert(order.id.clone(), order);
        Self(Mutex::new(orders))
    }
}

#[async_trait::async_trait]
impl OrderStore for InMemoryOrders {
    async fn find_by_id(&self, order_id: &str) -> CustomResult<Option<Order>, StorageError> {
        Ok(self.0.lock().unwrap().get(order_id).cloned())
    }

    async fn save(&self, order: &Order) -> CustomResult<(), StorageError> {
        self.0
            .lock()
            .unwrap()
            .insert(order.id.clone(), order.clone());
        Ok(())
    }
}

#[tokio::test]
async fn capture_marks_the_payment_paid_on_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/capture.cgi"))
        .and(header_exists("authorization"))
        .and(body_string_contains("merchant=90001234"))
        .and(body_string_contains("transact=987654"))
        .and(body_string_contains("amount=2000"))
        .and(body_string_contains("md5key="))
        .respond_with(ResponseTemplate::new(200).set_body_string("status=ACCEPTED&result=0"))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = Dibs::new(settings(&server.uri())).unwrap();
    let order = order();
    let mut payment = authorized_payment();

    let outcome = gateway.capture(&mut payment, &order).await.unwrap();

    assert!(outcome.is_success);
    assert_eq!(outcome.new_status, Some(PaymentStatus::Paid));
    assert_eq!(payment.status, PaymentStatus::Paid);
    assert!(payment.is_approved);
    assert!(payment.captured_date.is_some());
}

#[tokio::test]
async fn capture_leaves_the_payment_untouched_when_declined() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/capture.cgi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("status=DECLINED&result=12&reason=error"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = Dibs::new(settings(&server.uri())).unwrap();
    let order = order();
    let mut payment = authorized_payment();

    let outcome = gateway.capture(&mut payment, &order).await.unwrap();

    assert!(!outcome.is_success);
    let message = outcome.error_message.unwrap();
    assert!(message.contains("Response data: status=DECLINED&result=12"));
    assert_eq!(payment.status, PaymentStatus::Authorized);
    assert!(!payment.is_approved);
    assert!(payment.captured_date.is_none());
}

#[tokio::test]
async fn capture_surfaces_transport_failures_without_mutation() {
    // Nothing listens on this address, so the call fails at the transport.
    let gateway = Dibs::new(settings("http://127.0.0.1:9")).unwrap();
    let order = order();
    let mut payment = authorized_payment();

    let outcome = gateway.capture(&mut payment, &order).await.unwrap();

    assert!(!outcome.is_success);
    assert!(outcome.error_message.is_some());
    assert_eq!(payment.status, PaymentStatus::Authorized);
    assert!(payment.captured_date.is_none());
}

#[tokio::test]
async fn capture_on_a_paid_payment_makes_no_remote_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("status=ACCEPTED&result=0"))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = Dibs::new(settings(&server.uri())).unwrap();
    let order = order();
    let mut payment = authorized_payment();
    payment.status = PaymentStatus::Paid;
    payment.is_approved = true;

    let outcome = gateway.capture(&mut payment, &order).await.unwrap();

    assert!(!outcome.is_success);
    assert!(outcome.error_message.is_none());
}

#[tokio::test]
async fn refund_reverses_a_paid_payment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cgi-adm/refund.cgi"))
        .and(header_exists("authorization"))
        .and(body_string_contains("textreply=yes"))
        .and(body_string_contains("currency=208"))
        .respond_with(ResponseTemplate::new(200).set_body_string("status=ACCEPTED&result=0"))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = Dibs::new(settings(&server.uri())).unwrap();
    let order = order();
    let mut payment = authorized_payment();
    payment.status = PaymentStatus::Paid;
    payment.is_approved = true;

    let outcome = gateway.refund(&mut payment, &order).await.unwrap();

    assert!(outcome.is_success);
    assert_eq!(payment.status, PaymentStatus::Refunded);
    assert!(!payment.is_approved);
    assert!(payment.modified_date.is_some());
}

#[tokio::test]
async fn void_cancels_an_authorized_payment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cgi-adm/cancel.cgi"))
        .and(header_exists("authorization"))
        .and(body_string_contains("transact=987654"))
        .and(body_string_contains("orderid=CO-1001"))
        .respond_with(ResponseTemplate::new(200).set_body_string("status=ACCEPTED&result=0"))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = Dibs::new(settings(&server.uri())).unwrap();
    let order = order();
    let mut payment = authorized_payment();

    let outcome = gateway.void(&mut payment, &order).await.unwrap();

    assert!(outcome.is_success);
    assert_eq!(payment.status, PaymentStatus::Cancelled);
    assert!(payment.cancelled_date.is_some());
}

#[tokio::test]
async fn void_on_an_approved_payment_makes_no_remote_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("status=ACCEPTED&result=0"))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = Dibs::new(settings(&server.uri())).unwrap();
    let order = order();
    let mut payment = authorized_payment();
    payment.status = PaymentStatus::Paid;
    payment.is_approved = true;

    let outcome = gateway.void(&mut payment, &order).await.unwrap();

    assert!(!outcome.is_success);
    assert_eq!(
        outcome.error_message.as_deref(),
        Some("Payment already approved, use refund")
    );
}

#[tokio::test]
async fn hosted_flow_authorizes_and_captures_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/capture.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("status=ACCEPTED&result=0"))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = Dibs::new(settings(&server.uri())).unwrap();
    let store = Store {
        id: "store-1".to_string(),
        url: Some("https://shop.example.com".to_string()),
        secure_url: None,
        default_language: "da-DK".to_string(),
    };

    let mut order = order();
    let mut payment = Payment {
        gateway_code: DIBS_GATEWAY_CODE.to_string(),
        amount: order.total,
        currency: order.currency.clone(),
        ..Payment::default()
    };

    let initiation = gateway
        .initiate_payment(ProcessPaymentContext {
            order: Some(&order),
            store: Some(&store),
            payment: Some(&mut payment),
        })
        .unwrap();
    assert!(initiation.is_success);
    assert!(initiation.html_form.unwrap().contains(r#"value="2000""#));
    assert_eq!(payment.status, PaymentStatus::Pending);

    order.in_payments.push(payment);
    let orders = InMemoryOrders::with(order);

    // The gateway calls back with the transaction id and the signed fields.
    let payload = transformers::callback_signing_payload("987654", "2000", "208");
    let authkey = dibs_gateway::crypto::sign_with_keys(
        &gateway.settings().md5_key1,
        &gateway.settings().md5_key2,
        &payload,
    )
    .unwrap();
    let mut params = RequestParameters::new();
    params.push("transact", "987654");
    params.push("amount", "2000");
    params.push("currency", "208");
    params.push("authkey", authkey);

    let callback = gateway
        .handle_callback(&orders, "inner-42", &params)
        .await
        .unwrap();
    assert!(callback.is_success);
    orders.save(&callback.order).await.unwrap();

    let mut saved = orders.find_by_id("inner-42").await.unwrap().unwrap();
    let mut authorized = saved.in_payments.remove(0);
    assert_eq!(authorized.status, PaymentStatus::Authorized);
    assert_eq!(authorized.outer_id.as_deref(), Some("987654"));

    let capture = gateway.capture(&mut authorized, &saved).await.unwrap();
    assert!(capture.is_success);
    assert_eq!(authorized.status, PaymentStatus::Paid);
}
