//! Digest primitives for the gateway's keyed-hash scheme.

use masking::{PeekInterface, Secret};

use crate::errors::{CryptoError, CustomResult};

/// Trait for generating a message digest
pub trait GenerateDigest {
    /// Digests the given message, returning raw bytes
    fn generate_digest(&self, message: &[u8]) -> CustomResult<Vec<u8>, CryptoError>;
}

/// MD5 hash function
///
/// Mandated by the legacy gateway contract. The remote verifier computes the
/// same digest, so it cannot be swapped for a stronger algorithm.
#[derive(Debug)]
pub struct Md5;

impl GenerateDigest for Md5 {
    fn generate_digest(&self, message: &[u8]) -> CustomResult<Vec<u8>, CryptoError> {
        let digest = md5::compute(message);
        Ok(digest.as_ref().to_vec())
    }
}

fn hex_digest(message: &[u8]) -> CustomResult<String, CryptoError> {
    Ok(hex::encode(Md5.generate_digest(message)?))
}

/// Two-key nested digest authenticating every exchange with the gateway:
/// `hex(md5(key2 + hex(md5(key1 + payload))))`, lowercase hex throughout.
pub fn sign_with_keys(
    key1: &Secret<String>,
    key2: &Secret<String>,
    payload: &str,
) -> CustomResult<String, CryptoError> {
    let inner = hex_digest(format!("{}{payload}", key1.peek()).as_bytes())?;
    hex_digest(format!("{}{inner}", key2.peek()).as_bytes())
}
