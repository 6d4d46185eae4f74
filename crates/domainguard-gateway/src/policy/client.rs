//! `CheckInteraction` consumers: in-process engine or remote Policy Service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use domainguard_core::error::Result;
use domainguard_core::policy::{AuthorizationDecision, PolicyEngine};
use domainguard_core::protocol::check::{CheckRequest, CheckResponse};

use crate::config::{self, PolicySource};
use crate::transport::peer::PeerClient;

/// Path served by the Policy Service.
pub const CHECK_PATH: &str = "/v1/check";

#[async_trait]
pub trait PolicyClient: Send + Sync {
    /// `Err` means the engine could not be consulted; callers must fail closed.
    async fn check_interaction(&self, req: &CheckRequest) -> Result<AuthorizationDecision>;
}

/// Engine embedded in the calling process.
pub struct LocalPolicyClient {
    engine: Arc<PolicyEngine>,
}

impl LocalPolicyClient {
    pub fn new(engine: Arc<PolicyEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl PolicyClient for LocalPolicyClient {
    async fn check_interaction(&self, req: &CheckRequest) -> Result<AuthorizationDecision> {
        Ok(self
            .engine
            .check_interaction(&req.source_domain, &req.target_domain, &req.action))
    }
}

/// Remote Policy Service over HTTP.
pub struct HttpPolicyClient {
    peer: PeerClient,
}

impl HttpPolicyClient {
    pub fn new(base_url: &str, deadline: Duration) -> Result<Self> {
        Ok(Self { peer: PeerClient::new("policy service", base_url, deadline)? })
    }
}

#[async_trait]
impl PolicyClient for HttpPolicyClient {
    async fn check_interaction(&self, req: &CheckRequest) -> Result<AuthorizationDecision> {
        let resp = self.peer.post_json(CHECK_PATH, req).await?;
        let body: CheckResponse = self.peer.expect_json(resp).await?;
        Ok(body.into())
    }
}

/// Build the client selected by `policy_source`. A local policy file that is
/// missing or malformed fails here, before the role starts serving.
pub fn from_source(source: &PolicySource, deadline: Duration) -> Result<Arc<dyn PolicyClient>> {
    match source {
        PolicySource::Remote { url } => Ok(Arc::new(HttpPolicyClient::new(url, deadline)?)),
        PolicySource::Local { file } => {
            let policy = config::load_policy_from_file(file)?;
            let domains = policy.security_domains.len();
            tracing::info!(file = %file, domains, "local policy loaded");
            Ok(Arc::new(LocalPolicyClient::new(Arc::new(PolicyEngine::new(policy)))))
        }
    }
}
