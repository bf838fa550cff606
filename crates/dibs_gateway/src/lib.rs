//! Integration with the DIBS (FlexWin) hosted-form payment gateway.
//!
//! The crate builds the signed redirect form that sends a shopper to the
//! hosted payment page, verifies the keyed-hash callbacks the gateway posts
//! back, and issues the signed administrative requests (capture, refund,
//! cancel) against the gateway's HTTP endpoints. Order persistence and the
//! HTTP routing layer that exposes the callback endpoint are collaborators
//! behind narrow interfaces, not part of this crate.

pub mod crypto;
pub mod currency;
pub mod errors;
pub mod gateway;
pub mod orders;
pub mod settings;
pub mod types;

pub use currency::Currency;
pub use gateway::{
    CallbackOutcome, CallbackVerification, Dibs, PaymentGateway, PaymentOperationOutcome,
    ProcessPaymentContext, ProcessPaymentOutcome,
};
pub use orders::{Order, OrderStore, Payment, PaymentStatus, Store, DIBS_GATEWAY_CODE};
pub use settings::{DibsSettings, GatewayMode};
