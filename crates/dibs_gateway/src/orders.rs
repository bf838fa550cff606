//! Order and payment entities owned by the surrounding commerce platform.
//!
//! The adapter never persists these. It mutates the in-flight payment on a
//! fetched copy of the order as gateway responses confirm transitions and
//! hands the copy back to the caller for durable saving.

use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::errors::{CustomResult, StorageError};

/// Gateway code marking which in-payments on an order belong to this
/// integration.
pub const DIBS_GATEWAY_CODE: &str = "DIBS";

/// Lifecycle of a single payment attempt.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
pub enum PaymentStatus {
    #[default]
    New,
    Pending,
    Authorized,
    Paid,
    Cancelled,
    Refunded,
    Voided,
}

/// One payment attempt on an order.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct Payment {
    /// Code of the gateway this attempt was routed to.
    pub gateway_code: String,
    pub status: PaymentStatus,
    /// Major-unit amount of this attempt.
    pub amount: Decimal,
    pub currency: String,
    /// The gateway's transaction identifier, set once a callback is
    /// processed.
    pub outer_id: Option<String>,
    pub is_approved: bool,
    pub is_cancelled: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub authorized_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub captured_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub cancelled_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub modified_date: Option<OffsetDateTime>,
}

/// Customer order as the surrounding platform models it. Referenced by the
/// adapter, never duplicated.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct Order {
    /// Internal identifier, carried through the hosted form as a
    /// distinguished field so the callback can find its way back.
    pub id: String,
    /// Human-facing order number, used in signing payloads.
    pub number: String,
    /// Raw currency code as the platform stores it, alphabetic or numeric.
    pub currency: String,
    /// Major-unit order total.
    pub total: Decimal,
    pub store_id: String,
    pub in_payments: Vec<Payment>,
}

/// Storefront configuration the checkout form needs.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct Store {
    pub id: String,
    pub url: Option<String>,
    pub secure_url: Option<String>,
    pub default_language: String,
}

impl Store {
    /// Two-letter language code sent to the hosted form.
    pub fn language_code(&self) -> &str {
        self.default_language
            .get(..2)
            .unwrap_or(&self.default_language)
    }

    /// Whether at least one of the two base URLs is configured.
    pub fn has_base_url(&self) -> bool {
        self.secure_url.as_deref().is_some_and(|url| !url.is_empty())
            || self.url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Narrow persistence interface the adapter consumes.
///
/// Callback handling reads through this; durable saves after a successful
/// callback stay with the caller.
#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_by_id(&self, order_id: &str) -> CustomResult<Option<Order>, StorageError>;
    async fn save(&self, order: &Order) -> CustomResult<(), StorageError>;
}
