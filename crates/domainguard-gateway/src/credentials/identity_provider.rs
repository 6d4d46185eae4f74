use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use domainguard_core::error::Result;
use domainguard_core::protocol::token::LoginRequest;

use super::CredentialVerifier;
use crate::transport::peer::PeerClient;

/// External identity provider reached over HTTP.
///
/// `POST {url}` with `{username, password, mfa}`: 2xx is a match, 401/403 a
/// mismatch, anything else (or no answer) an error.
pub struct IdentityProviderVerifier {
    peer: PeerClient,
}

impl IdentityProviderVerifier {
    pub fn new(url: &str, deadline: Duration) -> Result<Self> {
        Ok(Self { peer: PeerClient::new("identity provider", url, deadline)? })
    }
}

#[async_trait]
impl CredentialVerifier for IdentityProviderVerifier {
    async fn verify(&self, creds: &LoginRequest) -> Result<bool> {
        let resp = self.peer.post_json("", creds).await?;
        match resp.status() {
            s if s.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(false),
            other => Err(self.peer.bad_status(other)),
        }
    }
}
