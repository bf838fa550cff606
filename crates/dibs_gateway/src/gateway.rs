//! The DIBS gateway adapter.
//!
//! One concrete adapter behind an explicit trait. Operations are stateless
//! aside from the mutation they apply to the payment handed in; credentials
//! are fixed at construction and safe to share across concurrent calls.
//! Serializing concurrent operations against the same order is the caller's
//! responsibility.

pub mod transformers;

use std::time::Duration;

use error_stack::ResultExt;
use masking::PeekInterface;
use time::OffsetDateTime;

use crate::{
    currency::Currency,
    errors::{CustomResult, GatewayError},
    orders::{Order, OrderStore, Payment, PaymentStatus, Store, DIBS_GATEWAY_CODE},
    settings::DibsSettings,
    types::{RequestParameters, StringMinorUnit},
};

use transformers::{fields, DibsOperationResponse};

/// Inputs for initiating a payment. Fields are optional because checkout
/// initiation reports an unsuccessful result, rather than failing, when any
/// participant is absent.
#[derive(Default)]
pub struct ProcessPaymentContext<'a> {
    pub order: Option<&'a Order>,
    pub store: Option<&'a Store>,
    pub payment: Option<&'a mut Payment>,
}

/// Result of checkout initiation.
#[derive(Debug, Default)]
pub struct ProcessPaymentOutcome {
    pub is_success: bool,
    pub new_status: Option<PaymentStatus>,
    /// Self-submitting form markup to return to the shopper's browser.
    pub html_form: Option<String>,
}

/// Result of a capture, refund, or void.
///
/// Remote failures land in `error_message`; the payment is left untouched in
/// that case so a failed call never strands partial state.
#[derive(Debug, Default)]
pub struct PaymentOperationOutcome {
    pub is_success: bool,
    pub new_status: Option<PaymentStatus>,
    pub error_message: Option<String>,
}

/// Outcome of recomputing a callback's keyed hash.
#[derive(Debug)]
pub struct CallbackVerification {
    /// The gateway transaction id carried by the callback.
    pub outer_id: Option<String>,
    pub is_valid: bool,
}

/// Outcome of processing a gateway callback. Carries the mutated order back
/// for the caller to persist.
#[derive(Debug)]
pub struct CallbackOutcome {
    pub order: Order,
    pub outer_id: Option<String>,
    pub is_success: bool,
}

/// The operations the surrounding platform drives against the gateway.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn initiate_payment(
        &self,
        context: ProcessPaymentContext<'_>,
    ) -> CustomResult<ProcessPaymentOutcome, GatewayError>;

    fn verify_callback(
        &self,
        parameters: &RequestParameters,
    ) -> CustomResult<CallbackVerification, GatewayError>;

    async fn handle_callback(
        &self,
        store: &dyn OrderStore,
        order_id: &str,
        parameters: &RequestParameters,
    ) -> CustomResult<CallbackOutcome, GatewayError>;

    async fn capture(
        &self,
        payment: &mut Payment,
        order: &Order,
    ) -> CustomResult<PaymentOperationOutcome, GatewayError>;

    async fn refund(
        &self,
        payment: &mut Payment,
        order: &Order,
    ) -> CustomResult<PaymentOperationOutcome, GatewayError>;

    async fn void(
        &self,
        payment: &mut Payment,
        order: &Order,
    ) -> CustomResult<PaymentOperationOutcome, GatewayError>;
}

/// Adapter for the DIBS FlexWin gateway.
pub struct Dibs {
    settings: DibsSettings,
    client: reqwest::Client,
}

impl Dibs {
    pub fn new(settings: DibsSettings) -> CustomResult<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .change_context(GatewayError::InvalidConfig {
                config: "http client",
            })?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &DibsSettings {
        &self.settings
    }

    /// POSTs an administrative request and returns the raw response body.
    /// Transport failures, including timeout expiry, surface here.
    async fn submit_operation(
        &self,
        url: &str,
        parameters: &RequestParameters,
    ) -> CustomResult<String, GatewayError> {
        let body = parameters.to_urlencoded()?;
        let response = self
            .client
            .post(url)
            .basic_auth(
                self.settings.api_login.peek(),
                Some(self.settings.api_password.peek()),
            )
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await
            .change_context(GatewayError::RemoteCallFailed)?;
        let body = response
            .text()
            .await
            .change_context(GatewayError::RemoteCallFailed)?;
        tracing::info!(gateway_response = %body, %url, "administrative operation response");
        Ok(body)
    }

    async fn capture_attempt(
        &self,
        payment: &Payment,
        order: &Order,
    ) -> CustomResult<String, GatewayError> {
        let params = transformers::build_capture_parameters(&self.settings, order, payment)?;
        self.submit_operation(&self.settings.capture_url(), &params)
            .await
    }

    async fn refund_attempt(
        &self,
        payment: &Payment,
        order: &Order,
    ) -> CustomResult<String, GatewayError> {
        let params = transformers::build_refund_parameters(&self.settings, order, payment)?;
        self.submit_operation(&self.settings.refund_url(), &params)
            .await
    }

    async fn cancel_attempt(
        &self,
        payment: &Payment,
        order: &Order,
    ) -> CustomResult<String, GatewayError> {
        let params = transformers::build_cancel_parameters(&self.settings, order, payment)?;
        self.submit_operation(&self.settings.cancel_url(), &params)
            .await
    }
}

#[async_trait::async_trait]
impl PaymentGateway for Dibs {
    fn initiate_payment(
        &self,
        context: ProcessPaymentContext<'_>,
    ) -> CustomResult<ProcessPaymentOutcome, GatewayError> {
        let mut outcome = ProcessPaymentOutcome::default();
        let (Some(order), Some(store), Some(payment)) =
            (context.order, context.store, context.payment)
        else {
            return Ok(outcome);
        };

        if !store.has_base_url() {
            Err(GatewayError::InvalidConfig {
                config: "store url or secure_url",
            })?;
        }

        let amount = StringMinorUnit::from_major(order.total)?;
        let params = transformers::build_checkout_parameters(&self.settings, order, store, &amount)?;
        let form = transformers::render_checkout_form(&self.settings.redirect_url, &params);

        payment.status = PaymentStatus::Pending;
        outcome.new_status = Some(PaymentStatus::Pending);
        outcome.html_form = Some(form.into_string());
        outcome.is_success = true;
        tracing::info!(order_number = %order.number, "payment initiation form built");
        Ok(outcome)
    }

    fn verify_callback(
        &self,
        parameters: &RequestParameters,
    ) -> CustomResult<CallbackVerification, GatewayError> {
        let transact = parameters.get(fields::TRANSACT).unwrap_or_default();
        let amount = parameters.get(fields::AMOUNT).unwrap_or_default();
        let raw_currency = parameters.get(fields::CURRENCY).unwrap_or_default();
        let currency = Currency::from_alpha_or_numeric(raw_currency)
            .map(Currency::iso_4217)
            .unwrap_or(raw_currency);

        let payload = transformers::callback_signing_payload(transact, amount, currency);
        let expected = crate::crypto::sign_with_keys(
            &self.settings.md5_key1,
            &self.settings.md5_key2,
            &payload,
        )
        .change_context(GatewayError::RequestEncodingFailed)?;

        let is_valid = parameters
            .get(fields::AUTH_KEY)
            .is_some_and(|authkey| authkey == expected);
        Ok(CallbackVerification {
            outer_id: (!transact.is_empty()).then(|| transact.to_string()),
            is_valid,
        })
    }

    async fn handle_callback(
        &self,
        store: &dyn OrderStore,
        order_id: &str,
        parameters: &RequestParameters,
    ) -> CustomResult<CallbackOutcome, GatewayError> {
        let mut order = store
            .find_by_id(order_id)
            .await
            .change_context(GatewayError::NotFound { entity: "order" })?
            .ok_or(GatewayError::NotFound { entity: "order" })?;

        // Pair the callback to the one in-payment whose amount matches; an
        // order can carry several attempts against this gateway.
        let callback_amount = parameters.get(fields::AMOUNT).unwrap_or_default();
        let payment_index = order
            .in_payments
            .iter()
            .position(|payment| {
                payment.gateway_code == DIBS_GATEWAY_CODE
                    && StringMinorUnit::from_major(payment.amount)
                        .is_ok_and(|amount| amount.as_str() == callback_amount)
            })
            .ok_or(GatewayError::NotFound { entity: "payment" })?;

        let verification = self.verify_callback(parameters)?;
        if !verification.is_valid {
            tracing::warn!(%order_id, "callback authkey did not match the recomputed hash");
        }

        let payment = order
            .in_payments
            .get_mut(payment_index)
            .ok_or(GatewayError::NotFound { entity: "payment" })?;

        let outer_id = match payment.status {
            PaymentStatus::Pending => {
                payment.authorized_date = Some(OffsetDateTime::now_utc());
                payment.status = PaymentStatus::Authorized;
                payment.outer_id = verification.outer_id.clone();
                verification.outer_id
            }
            // Gateways re-deliver callbacks; a second delivery while
            // authorized re-verifies and changes nothing.
            PaymentStatus::Authorized => payment.outer_id.clone(),
            status => Err(GatewayError::InvalidPaymentState { status })?,
        };

        Ok(CallbackOutcome {
            order,
            outer_id,
            is_success: verification.is_valid,
        })
    }

    async fn capture(
        &self,
        payment: &mut Payment,
        order: &Order,
    ) -> CustomResult<PaymentOperationOutcome, GatewayError> {
        let mut outcome = PaymentOperationOutcome::default();
        let capturable = !payment.is_approved
            && matches!(
                payment.status,
                PaymentStatus::Authorized | PaymentStatus::Cancelled
            );
        if !capturable {
            return Ok(outcome);
        }

        match self.capture_attempt(payment, order).await {
            Ok(body) => {
                let response = DibsOperationResponse::from_body(&body);
                if response.is_accepted() {
                    payment.status = PaymentStatus::Paid;
                    payment.captured_date = Some(OffsetDateTime::now_utc());
                    payment.is_approved = true;
                    outcome.new_status = Some(PaymentStatus::Paid);
                    outcome.is_success = true;
                } else {
                    outcome.error_message = Some(format!(
                        "Dibs capture payment request failed. Response data: {body}"
                    ));
                }
            }
            Err(error) => {
                tracing::error!(?error, "capture request failed");
                outcome.error_message = Some(error.to_string());
            }
        }
        Ok(outcome)
    }

    async fn refund(
        &self,
        payment: &mut Payment,
        order: &Order,
    ) -> CustomResult<PaymentOperationOutcome, GatewayError> {
        let mut outcome = PaymentOperationOutcome::default();
        if !(payment.is_approved && payment.status == PaymentStatus::Paid) {
            return Ok(outcome);
        }

        match self.refund_attempt(payment, order).await {
            Ok(body) => {
                let response = DibsOperationResponse::from_body(&body);
                if response.is_accepted() {
                    payment.status = PaymentStatus::Refunded;
                    payment.modified_date = Some(OffsetDateTime::now_utc());
                    payment.is_approved = false;
                    outcome.new_status = Some(PaymentStatus::Refunded);
                    outcome.is_success = true;
                } else {
                    outcome.error_message = Some(format!(
                        "Dibs refund payment request failed. Response data: {body}"
                    ));
                }
            }
            Err(error) => {
                tracing::error!(?error, "refund request failed");
                outcome.error_message = Some(error.to_string());
            }
        }
        Ok(outcome)
    }

    async fn void(
        &self,
        payment: &mut Payment,
        order: &Order,
    ) -> CustomResult<PaymentOperationOutcome, GatewayError> {
        let mut outcome = PaymentOperationOutcome::default();
        if !payment.is_approved && payment.status == PaymentStatus::Authorized {
            match self.cancel_attempt(payment, order).await {
                Ok(body) => {
                    let response = DibsOperationResponse::from_body(&body);
                    if response.is_accepted() {
                        payment.status = PaymentStatus::Cancelled;
                        payment.cancelled_date = Some(OffsetDateTime::now_utc());
                        outcome.new_status = Some(PaymentStatus::Cancelled);
                        outcome.is_success = true;
                    } else {
                        outcome.error_message =
                            Some(format!("Dibs cancel request failed. Response data: {body}"));
                    }
                }
                Err(error) => {
                    tracing::error!(?error, "cancel request failed");
                    outcome.error_message = Some(error.to_string());
                }
            }
        } else if payment.is_approved {
            outcome.error_message = Some("Payment already approved, use refund".to_string());
            outcome.new_status = Some(PaymentStatus::Paid);
        } else if payment.is_cancelled {
            outcome.error_message = Some("Payment already canceled".to_string());
            outcome.new_status = Some(PaymentStatus::Voided);
        }
        Ok(outcome)
    }
}
