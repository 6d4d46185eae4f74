//! Login, issuance, and validation payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `POST /login` body. All three fields are required.
#[derive(Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub mfa: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("mfa", &"<redacted>")
            .finish()
    }
}

/// `POST /login` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `POST /issue` body (Token Enforcer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRequest {
    pub subject: String,
}

/// `/validate` verdict, as reported by the Reference Monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidateResponse {
    pub fn valid() -> Self {
        Self { valid: true, error: None }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self { valid: false, error: Some(error.into()) }
    }
}

/// Reference Monitor `Issue(subject, ttl_seconds)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintRequest {
    pub subject: String,
    pub ttl_seconds: u64,
}

/// Reference Monitor `Issue` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintResponse {
    pub token: String,
}

/// Reference Monitor `Validate(token)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}
