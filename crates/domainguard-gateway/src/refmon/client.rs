use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use domainguard_core::error::Result;
use domainguard_core::protocol::token::{MintRequest, MintResponse, ValidateResponse, VerifyRequest};

use super::{ReferenceMonitor, ISSUE_PATH, VALIDATE_PATH};
use crate::transport::peer::PeerClient;

/// Reference Monitor reached over HTTP.
pub struct HttpReferenceMonitor {
    peer: PeerClient,
}

impl HttpReferenceMonitor {
    pub fn new(base_url: &str, deadline: Duration) -> Result<Self> {
        Ok(Self { peer: PeerClient::new("reference monitor", base_url, deadline)? })
    }
}

#[async_trait]
impl ReferenceMonitor for HttpReferenceMonitor {
    async fn issue(&self, subject: &str, ttl: Duration) -> Result<Bytes> {
        let req = MintRequest { subject: subject.to_string(), ttl_seconds: ttl.as_secs() };
        let resp = self.peer.post_json(ISSUE_PATH, &req).await?;
        let body: MintResponse = self.peer.expect_json(resp).await?;
        Ok(Bytes::from(body.token))
    }

    async fn validate(&self, token: &[u8]) -> Result<ValidateResponse> {
        let req = VerifyRequest { token: String::from_utf8_lossy(token).into_owned() };
        let resp = self.peer.post_json(VALIDATE_PATH, &req).await?;
        self.peer.expect_json(resp).await
    }
}
