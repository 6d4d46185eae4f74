use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use jsonwebtoken::{
    decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use domainguard_core::error::{DomainGuardError, Result};
use domainguard_core::protocol::token::ValidateResponse;

use super::ReferenceMonitor;

pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: u64,
    exp: u64,
}

/// HS256 token minting with a shared secret.
pub struct JwtReferenceMonitor {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtReferenceMonitor {
    pub fn new(secret: &[u8]) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(DomainGuardError::InvalidConfig(format!(
                "reference monitor secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Read the secret from the environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self> {
        let secret = std::env::var(var).map_err(|_| {
            DomainGuardError::InvalidConfig(format!("environment variable {var} is not set"))
        })?;
        Self::new(secret.as_bytes())
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| DomainGuardError::Internal(format!("token signing failed: {e}")))
    }
}

#[async_trait]
impl ReferenceMonitor for JwtReferenceMonitor {
    async fn issue(&self, subject: &str, ttl: Duration) -> Result<Bytes> {
        let iat = get_current_timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp: iat.saturating_add(ttl.as_secs()),
        };
        Ok(Bytes::from(self.sign(&claims)?))
    }

    async fn validate(&self, token: &[u8]) -> Result<ValidateResponse> {
        let Ok(token) = std::str::from_utf8(token) else {
            return Ok(ValidateResponse::invalid("invalid token encoding"));
        };
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(_) => Ok(ValidateResponse::valid()),
            Err(e) => Ok(ValidateResponse::invalid(e.to_string())),
        }
    }
}
