//! Reference Monitor capability (`Issue` / `Validate`).
//!
//! The Token Enforcer only ever talks to this trait. Tokens are opaque bytes
//! to everything but the implementation that minted them.

pub mod client;
pub mod jwt;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use domainguard_core::error::Result;
use domainguard_core::protocol::token::ValidateResponse;

pub use client::HttpReferenceMonitor;
pub use jwt::JwtReferenceMonitor;

pub const ISSUE_PATH: &str = "/v1/issue";
pub const VALIDATE_PATH: &str = "/v1/validate";

#[async_trait]
pub trait ReferenceMonitor: Send + Sync {
    async fn issue(&self, subject: &str, ttl: Duration) -> Result<Bytes>;

    /// The verdict is the monitor's; `Err` only when no verdict could be had.
    async fn validate(&self, token: &[u8]) -> Result<ValidateResponse>;
}
