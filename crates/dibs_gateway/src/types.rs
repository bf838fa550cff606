//! Value types shared by the request builders.

use std::fmt::Display;

use error_stack::ResultExt;
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

use crate::errors::{CustomResult, GatewayError};

/// Monetary amount as an integer count of the currency's smallest unit,
/// rendered as a plain decimal string with no separators ("2000" for 20.00).
///
/// The same encoding is used for outbound signing payloads and for matching
/// an incoming callback to a payment, so the two sides can never disagree on
/// rounding.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct StringMinorUnit(String);

impl StringMinorUnit {
    /// Converts a major-unit amount, rounding midpoints away from zero.
    pub fn from_major(amount: Decimal) -> CustomResult<Self, GatewayError> {
        let minor = (amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or(GatewayError::RequestEncodingFailed)?;
        Ok(Self(minor.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StringMinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered name/value pairs for a gateway exchange.
///
/// Field order is part of the signing contract, so this is a list rather
/// than a map. The same shape carries merged query-string and form fields on
/// the inbound side, where lookups take the first match.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct RequestParameters(Vec<(String, String)>);

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` body.
    pub fn from_urlencoded(body: &[u8]) -> CustomResult<Self, GatewayError> {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
            .map(Self)
            .change_context(GatewayError::ResponseDeserializationFailed)
    }

    /// Encodes the pairs in order as an `application/x-www-form-urlencoded`
    /// body.
    pub fn to_urlencoded(&self) -> CustomResult<String, GatewayError> {
        serde_urlencoded::to_string(&self.0).change_context(GatewayError::RequestEncodingFailed)
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value recorded under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn append(&mut self, mut other: Self) {
        self.0.append(&mut other.0);
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl FromIterator<(String, String)> for RequestParameters {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::str::FromStr;

    use super::*;

    #[test]
    fn rounds_midpoints_away_from_zero() {
        let cases = [("19.995", "2000"), ("19.994", "1999"), ("0", "0"), ("20.00", "2000")];
        for (major, minor) in cases {
            let amount = Decimal::from_str(major).unwrap();
            assert_eq!(StringMinorUnit::from_major(amount).unwrap().as_str(), minor);
        }
    }

    #[test]
    fn parameter_lookup_takes_first_match() {
        let mut params = RequestParameters::new();
        params.push("transact", "111");
        params.push("transact", "222");

        assert_eq!(params.get("transact"), Some("111"));
        assert_eq!(params.get("authkey"), None);
    }

    #[test]
    fn urlencoded_round_trip_preserves_order() {
        let mut params = RequestParameters::new();
        params.push("merchant", "123");
        params.push("amount", "2000");
        params.push("transact", "987");

        let body = params.to_urlencoded().unwrap();
        assert_eq!(body, "merchant=123&amount=2000&transact=987");

        let parsed = RequestParameters::from_urlencoded(body.as_bytes()).unwrap();
        assert_eq!(parsed.pairs(), params.pairs());
    }
}
