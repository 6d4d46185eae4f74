//! Shared fakes and server helpers for gateway integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;

use domainguard_core::error::{DomainGuardError, Result};
use domainguard_core::policy::{AuthorizationDecision, PolicyEngine};
use domainguard_core::protocol::check::CheckRequest;
use domainguard_gateway::config;
use domainguard_gateway::policy::{LocalPolicyClient, PolicyClient};
use domainguard_gateway::services::auth::TokenIssuer;

pub const REFMON_SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

/// Everything the login and enforcer hops need.
pub const PERMISSIVE_POLICY: &str = r#"
security_domains:
  domain2_authentication:
    allowed_interactions:
      - to: domain3_token_policy
        actions: [issue_token]
        port: 8080
        protocol: http
  domain3_token_enforcer:
    allowed_interactions:
      - to: domain3_reference_monitor
        actions: [issue_token, validate_token]
        port: 50051
        protocol: grpc
"#;

/// Gateway may request issuance, but the Enforcer may only validate.
pub const ENFORCER_CANNOT_ISSUE_POLICY: &str = r#"
security_domains:
  domain2_authentication:
    allowed_interactions:
      - to: domain3_token_policy
        actions: [issue_token]
  domain3_token_enforcer:
    allowed_interactions:
      - to: domain3_reference_monitor
        actions: [validate_token]
"#;

/// Neither hop may issue.
pub const LOCKED_POLICY: &str = r#"
security_domains:
  domain2_authentication:
    allowed_interactions: []
  domain3_token_enforcer:
    allowed_interactions:
      - to: domain3_reference_monitor
        actions: [validate_token]
"#;

pub fn engine(yaml: &str) -> Arc<PolicyEngine> {
    Arc::new(PolicyEngine::new(config::load_policy_from_str(yaml).unwrap()))
}

/// In-process policy that counts consultations and keeps the last request.
pub struct CountingPolicy {
    inner: LocalPolicyClient,
    calls: AtomicUsize,
    last: Mutex<Option<CheckRequest>>,
}

impl CountingPolicy {
    pub fn new(yaml: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: LocalPolicyClient::new(engine(yaml)),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CheckRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl PolicyClient for CountingPolicy {
    async fn check_interaction(&self, req: &CheckRequest) -> Result<AuthorizationDecision> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(req.clone());
        self.inner.check_interaction(req).await
    }
}

/// Policy engine that cannot be reached.
pub struct UnreachablePolicy;

#[async_trait]
impl PolicyClient for UnreachablePolicy {
    async fn check_interaction(&self, _req: &CheckRequest) -> Result<AuthorizationDecision> {
        Err(DomainGuardError::Downstream("connection refused".into()))
    }
}

/// Policy engine that never answers within the deadline.
pub struct StalledPolicy;

#[async_trait]
impl PolicyClient for StalledPolicy {
    async fn check_interaction(&self, _req: &CheckRequest) -> Result<AuthorizationDecision> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(AuthorizationDecision::allow())
    }
}

/// Token issuer double recording every forwarded subject.
pub struct RecordingIssuer {
    pub subjects: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingIssuer {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            subjects: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            subjects: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn calls(&self) -> usize {
        self.subjects.lock().unwrap().len()
    }
}

#[async_trait]
impl TokenIssuer for RecordingIssuer {
    async fn issue(&self, subject: &str) -> Result<String> {
        self.subjects.lock().unwrap().push(subject.to_string());
        if self.fail {
            return Err(DomainGuardError::Downstream("token enforcer returned status 500".into()));
        }
        Ok(format!("token-for-{subject}"))
    }
}

/// Serve `router` on an ephemeral local port with connect info.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });
    addr
}

pub fn http() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}
