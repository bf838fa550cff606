//! Request and response shapes for the FlexWin exchanges.
//!
//! Every outbound parameter list is built in a fixed order and carries an
//! `md5key` computed over an operation-specific payload. The payload orders
//! below are the protocol contract; permuting them changes the digest and
//! the gateway rejects the request.

use error_stack::ResultExt;

use crate::{
    crypto,
    errors::{CustomResult, GatewayError},
    orders::{Order, Payment, Store},
    settings::DibsSettings,
    types::{RequestParameters, StringMinorUnit},
};

/// Form and callback field names defined by the gateway.
pub mod fields {
    pub const ACCEPT_URL: &str = "accepturl";
    pub const CALLBACK_URL: &str = "callbackurl";
    pub const CANCEL_URL: &str = "cancelurl";
    pub const MERCHANT: &str = "merchant";
    pub const ORDER_ID: &str = "orderid";
    /// Distinguished field carrying the platform's internal order id through
    /// the hosted flow and back on the callback.
    pub const ORDER_INTERNAL_ID: &str = "s_orderinternalid";
    pub const AMOUNT: &str = "amount";
    pub const CURRENCY: &str = "currency";
    pub const LANGUAGE: &str = "lang";
    pub const MD5_KEY: &str = "md5key";
    pub const DECORATOR: &str = "decorator";
    pub const TEST_MODE: &str = "test";
    pub const TRANSACT: &str = "transact";
    pub const AUTH_KEY: &str = "authkey";
    pub const TEXT_REPLY: &str = "textreply";
}

pub fn initiate_signing_payload(
    merchant: &str,
    order_number: &str,
    currency: &str,
    amount: &str,
) -> String {
    format!("merchant={merchant}&orderid={order_number}&currency={currency}&amount={amount}")
}

pub fn callback_signing_payload(transact: &str, amount: &str, currency: &str) -> String {
    format!("transact={transact}&amount={amount}&currency={currency}")
}

pub fn operation_signing_payload(
    merchant: &str,
    order_number: &str,
    transact: &str,
    amount: &str,
) -> String {
    format!("merchant={merchant}&orderid={order_number}&transact={transact}&amount={amount}")
}

/// Cancel requests sign without the amount field.
pub fn void_signing_payload(merchant: &str, order_number: &str, transact: &str) -> String {
    format!("merchant={merchant}&orderid={order_number}&transact={transact}")
}

fn sign(settings: &DibsSettings, payload: &str) -> CustomResult<String, GatewayError> {
    crypto::sign_with_keys(&settings.md5_key1, &settings.md5_key2, payload)
        .change_context(GatewayError::RequestEncodingFailed)
}

/// Hidden-field set for the self-submitting checkout form.
pub fn build_checkout_parameters(
    settings: &DibsSettings,
    order: &Order,
    store: &Store,
    amount: &StringMinorUnit,
) -> CustomResult<RequestParameters, GatewayError> {
    let payload = initiate_signing_payload(
        &settings.merchant_id,
        &order.number,
        &order.currency,
        amount.as_str(),
    );
    let signature = sign(settings, &payload)?;

    let mut params = RequestParameters::new();
    params.push(fields::ACCEPT_URL, settings.accept_url.clone());
    params.push(fields::CALLBACK_URL, settings.callback_url.clone());
    params.push(fields::CANCEL_URL, settings.accept_url.clone());
    params.push(fields::MERCHANT, settings.merchant_id.clone());
    params.push(fields::ORDER_ID, order.number.clone());
    params.push(fields::ORDER_INTERNAL_ID, order.id.clone());
    params.push(fields::AMOUNT, amount.as_str());
    params.push(fields::CURRENCY, order.currency.clone());
    params.push(fields::LANGUAGE, store.language_code());
    params.push(fields::MD5_KEY, signature);
    params.push(fields::DECORATOR, settings.form_decorator.clone());
    if settings.is_test_mode() {
        params.push(fields::TEST_MODE, "1");
    }
    Ok(params)
}

pub fn build_capture_parameters(
    settings: &DibsSettings,
    order: &Order,
    payment: &Payment,
) -> CustomResult<RequestParameters, GatewayError> {
    let transact = payment
        .outer_id
        .as_deref()
        .ok_or(GatewayError::MissingRequiredField {
            field_name: "outer_id",
        })?;
    let amount = StringMinorUnit::from_major(payment.amount)?;

    let mut params = RequestParameters::new();
    params.push(fields::MERCHANT, settings.merchant_id.clone());
    params.push(fields::AMOUNT, amount.as_str());
    params.push(fields::TRANSACT, transact);
    params.push(fields::ORDER_ID, order.number.clone());

    let payload = operation_signing_payload(
        params.get(fields::MERCHANT).unwrap_or_default(),
        params.get(fields::ORDER_ID).unwrap_or_default(),
        params.get(fields::TRANSACT).unwrap_or_default(),
        params.get(fields::AMOUNT).unwrap_or_default(),
    );
    let signature = sign(settings, &payload)?;
    params.push(fields::MD5_KEY, signature);
    Ok(params)
}

pub fn build_refund_parameters(
    settings: &DibsSettings,
    order: &Order,
    payment: &Payment,
) -> CustomResult<RequestParameters, GatewayError> {
    let transact = payment
        .outer_id
        .as_deref()
        .ok_or(GatewayError::MissingRequiredField {
            field_name: "outer_id",
        })?;
    let amount = StringMinorUnit::from_major(payment.amount)?;

    let mut params = RequestParameters::new();
    params.push(fields::MERCHANT, settings.merchant_id.clone());
    params.push(fields::TRANSACT, transact);
    params.push(fields::AMOUNT, amount.as_str());
    params.push(fields::CURRENCY, payment.currency.clone());
    params.push(fields::ORDER_ID, order.number.clone());
    params.push(fields::TEXT_REPLY, "yes");

    // The merchant id is read straight from configuration here, unlike the
    // other operations which read it back from the parameter list. The
    // gateway's expected format is only verified against this shape.
    let payload = operation_signing_payload(
        &settings.merchant_id,
        params.get(fields::ORDER_ID).unwrap_or_default(),
        params.get(fields::TRANSACT).unwrap_or_default(),
        params.get(fields::AMOUNT).unwrap_or_default(),
    );
    let signature = sign(settings, &payload)?;
    params.push(fields::MD5_KEY, signature);
    Ok(params)
}

pub fn build_cancel_parameters(
    settings: &DibsSettings,
    order: &Order,
    payment: &Payment,
) -> CustomResult<RequestParameters, GatewayError> {
    let transact = payment
        .outer_id
        .as_deref()
        .ok_or(GatewayError::MissingRequiredField {
            field_name: "outer_id",
        })?;

    let mut params = RequestParameters::new();
    params.push(fields::MERCHANT, settings.merchant_id.clone());
    params.push(fields::TRANSACT, transact);
    params.push(fields::ORDER_ID, order.number.clone());

    let payload = void_signing_payload(
        params.get(fields::MERCHANT).unwrap_or_default(),
        params.get(fields::ORDER_ID).unwrap_or_default(),
        params.get(fields::TRANSACT).unwrap_or_default(),
    );
    let signature = sign(settings, &payload)?;
    params.push(fields::MD5_KEY, signature);
    Ok(params)
}

/// Outcome field of an administrative response body.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum DibsStatus {
    Accepted,
    Declined,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Query-string-encoded body returned by the capture, refund, and cancel
/// endpoints.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct DibsOperationResponse {
    #[serde(default)]
    pub status: DibsStatus,
    #[serde(default)]
    pub result: String,
    pub reason: Option<String>,
}

impl DibsOperationResponse {
    /// Parses a response body, treating anything unreadable as a declined
    /// answer rather than an error.
    pub fn from_body(body: &str) -> Self {
        serde_urlencoded::from_str(body).unwrap_or_default()
    }

    pub fn is_accepted(&self) -> bool {
        self.status == DibsStatus::Accepted && self.result == "0"
    }
}

/// Self-submitting form that forwards the shopper to the hosted payment
/// page, with a manual fallback button.
pub fn render_checkout_form(redirect_url: &str, params: &RequestParameters) -> maud::Markup {
    maud::html! {
        form name="dibs" action=(redirect_url) method="POST" charset="UTF-8" {
            p { "You'll be redirected to DIBS payment in a moment. If not, click the 'Proceed' button..." }
            @for (name, value) in params.pairs() {
                input type="hidden" name=(name) value=(value);
            }
            button type="submit" { "Proceed" }
        }
        script { (maud::PreEscaped("document.dibs.submit();")) }
    }
}
