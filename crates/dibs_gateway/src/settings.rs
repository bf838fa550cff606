//! Gateway configuration, constructed once per adapter and shared read-only
//! across concurrent invocations.

use std::path::Path;

use error_stack::ResultExt;
use masking::Secret;

use crate::errors::{CustomResult, GatewayError};

fn default_api_base_url() -> String {
    "https://payment.architrade.com".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Whether requests are flagged for the gateway's test environment.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GatewayMode {
    #[default]
    Live,
    Test,
}

/// Merchant-level gateway credentials and endpoints.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct DibsSettings {
    pub merchant_id: String,
    pub md5_key1: Secret<String>,
    pub md5_key2: Secret<String>,
    /// Credentials for the administrative API (capture, refund, cancel).
    pub api_login: Secret<String>,
    pub api_password: Secret<String>,
    /// FlexWin URL the checkout form posts to.
    pub redirect_url: String,
    /// Where the shopper lands after the hosted flow. Also used as the
    /// cancel URL.
    pub accept_url: String,
    /// Server-to-server callback URL the gateway posts to.
    pub callback_url: String,
    #[serde(default)]
    pub form_decorator: String,
    #[serde(default)]
    pub mode: GatewayMode,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Bound applied to every remote call; expiry surfaces as a transport
    /// failure.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl DibsSettings {
    /// Layered load: an optional file source overridden by `DIBS`-prefixed
    /// environment variables (`DIBS__MERCHANT_ID`, ...).
    pub fn load(file: Option<&Path>) -> CustomResult<Self, GatewayError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings: Self = builder
            .add_source(config::Environment::with_prefix("DIBS").separator("__"))
            .build()
            .and_then(|config| config.try_deserialize())
            .change_context(GatewayError::InvalidConfig {
                config: "gateway settings",
            })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> CustomResult<(), GatewayError> {
        if self.merchant_id.is_empty() {
            Err(GatewayError::InvalidConfig {
                config: "merchant_id",
            })?;
        }
        if self.redirect_url.is_empty() {
            Err(GatewayError::InvalidConfig {
                config: "redirect_url",
            })?;
        }
        Ok(())
    }

    pub fn is_test_mode(&self) -> bool {
        self.mode == GatewayMode::Test
    }

    pub fn capture_url(&self) -> String {
        format!("{}/cgi-bin/capture.cgi", self.api_base_url)
    }

    pub fn refund_url(&self) -> String {
        format!("{}/cgi-adm/refund.cgi", self.api_base_url)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/cgi-adm/cancel.cgi", self.api_base_url)
    }
}
