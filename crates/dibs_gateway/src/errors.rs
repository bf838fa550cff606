//! Errors raised while talking to or on behalf of the gateway.

use crate::orders::PaymentStatus;

/// Custom Result
///
/// Effectively, equivalent to `Result<T, error_stack::Report<E>>`
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Failures surfaced by gateway operations.
///
/// A hash mismatch on a callback is deliberately not part of this taxonomy:
/// verification failures are reported as unsuccessful outcomes so the HTTP
/// boundary can answer with a plain not-found instead of leaking detail.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A required piece of gateway or store configuration is absent.
    #[error("Invalid gateway configuration: {config}")]
    InvalidConfig { config: &'static str },

    /// The order or the matching in-payment could not be resolved.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A callback arrived while the payment status forbids the transition.
    #[error("Callback received while payment status is {status}")]
    InvalidPaymentState { status: PaymentStatus },

    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },

    #[error("Failed to encode request to the gateway")]
    RequestEncodingFailed,

    #[error("Failed to deserialize gateway response")]
    ResponseDeserializationFailed,

    /// Transport failure or a non-accepted gateway response.
    #[error("Request to the gateway did not succeed")]
    RemoteCallFailed,
}

/// Cryptographic algorithm errors
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The algorithm was unable to encode the message
    #[error("Failed to encode given message")]
    EncodingFailed,
    /// The algorithm was unable to verify the given signature
    #[error("Failed to verify signature")]
    SignatureVerificationFailed,
}

/// Failures surfaced by the order persistence collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Value not found in the store")]
    ValueNotFound,
    #[error("Failed to write value to the store")]
    WriteFailed,
    #[error("Storage backend unavailable")]
    Unavailable,
}
