#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Wrapper types and traits for secret management which help ensure secrets
//! aren't accidentally copied, logged, or otherwise exposed (as much as
//! possible). Secret-keeping library inspired by `secrecy`.
//!
//! Gateway credentials (MD5 keys, API passwords) live inside [`Secret`] so
//! that debug-formatting a configuration struct never prints them; access to
//! the inner value goes through [`PeekInterface::peek`] or
//! [`ExposeInterface::expose`] at the call sites that genuinely need it.

mod strategy;

pub use strategy::{Strategy, WithType, WithoutType};

mod abs;
pub use abs::{ExposeInterface, ExposeOptionInterface, PeekInterface};

mod secret;
pub use secret::Secret;

#[cfg(feature = "serde")]
mod serde;
#[cfg(feature = "serde")]
pub use crate::serde::{Deserialize, SerializableSecret, Serialize};

/// This module should be included with asterisk.
///
/// `use masking::prelude::*;`
pub mod prelude {
    pub use super::{ExposeInterface, ExposeOptionInterface, PeekInterface};
}
