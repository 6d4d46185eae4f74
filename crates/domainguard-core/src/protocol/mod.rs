//! Wire types for every hop (JSON).
//!
//! - `check`: Policy Engine request/response.
//! - `token`: login, issuance, and validation payloads.
//!
//! Decoding never panics; malformed input surfaces as
//! `DomainGuardError::BadRequest`.

pub mod check;
pub mod token;

use serde::de::DeserializeOwned;

use crate::error::{DomainGuardError, Result};

/// Decode a JSON body, mapping any failure to a client-input error.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| DomainGuardError::BadRequest(format!("invalid JSON: {e}")))
}
