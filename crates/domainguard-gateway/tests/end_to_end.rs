//! All four roles wired together over loopback HTTP.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use domainguard_core::protocol::check::{CheckRequest, CheckResponse};
use domainguard_core::protocol::token::{TokenResponse, ValidateResponse};
use domainguard_gateway::app_state::{
    AuthParts, AuthState, EnforcerParts, EnforcerState, PolicyServiceState, RefmonState,
};
use domainguard_gateway::config::StaticUser;
use domainguard_gateway::credentials::StaticCredentialVerifier;
use domainguard_gateway::obs::PipelineMetrics;
use domainguard_gateway::policy::{FixedWindowLimiter, HttpPolicyClient};
use domainguard_gateway::refmon::{HttpReferenceMonitor, JwtReferenceMonitor};
use domainguard_gateway::router::{
    build_auth_router, build_enforcer_router, build_policy_router, build_refmon_router,
};
use domainguard_gateway::services::auth::HttpTokenIssuer;

use common::{http, spawn, url};

const DEADLINE: Duration = Duration::from_secs(5);

struct Deployment {
    policy: SocketAddr,
    enforcer: SocketAddr,
    auth: SocketAddr,
}

async fn deploy(policy_yaml: &str) -> Deployment {
    let metrics = Arc::new(PipelineMetrics::default());

    let policy = spawn(build_policy_router(PolicyServiceState::new(
        common::engine(policy_yaml),
        Arc::clone(&metrics),
    )))
    .await;

    let refmon = spawn(build_refmon_router(RefmonState::new(
        Arc::new(JwtReferenceMonitor::new(common::REFMON_SECRET).unwrap()),
        Arc::clone(&metrics),
    )))
    .await;

    let policy_url = url(policy, "");
    let enforcer = spawn(build_enforcer_router(EnforcerState::new(EnforcerParts {
        policy: Arc::new(HttpPolicyClient::new(&policy_url, DEADLINE).unwrap()),
        refmon: Arc::new(HttpReferenceMonitor::new(&url(refmon, ""), DEADLINE).unwrap()),
        token_ttl: Duration::from_secs(60),
        deadline: DEADLINE,
        metrics: Arc::clone(&metrics),
    })))
    .await;

    let auth = spawn(build_auth_router(AuthState::new(AuthParts {
        limiter: Arc::new(FixedWindowLimiter::new(10, Duration::from_secs(60), 1000)),
        verifier: Arc::new(StaticCredentialVerifier::new(vec![StaticUser {
            username: "admin".into(),
            password: "secret123".into(),
            mfa: "123456".into(),
        }])),
        policy: Arc::new(HttpPolicyClient::new(&policy_url, DEADLINE).unwrap()),
        issuer: Arc::new(HttpTokenIssuer::new(&url(enforcer, "/"), DEADLINE).unwrap()),
        deadline: DEADLINE,
        metrics,
    })))
    .await;

    Deployment { policy, enforcer, auth }
}

fn admin() -> serde_json::Value {
    json!({ "username": "admin", "password": "secret123", "mfa": "123456" })
}

#[tokio::test]
async fn login_token_validates_at_enforcer() {
    let d = deploy(common::PERMISSIVE_POLICY).await;
    let client = http();

    let resp = client.post(url(d.auth, "/login")).json(&admin()).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let TokenResponse { token } = resp.json().await.unwrap();
    assert!(!token.is_empty());

    let resp = client.get(url(d.enforcer, "/validate")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let verdict: ValidateResponse = resp.json().await.unwrap();
    assert!(verdict.valid, "{verdict:?}");
}

#[tokio::test]
async fn enforcer_policy_denial_fails_login() {
    let d = deploy(common::ENFORCER_CANNOT_ISSUE_POLICY).await;

    let resp = http().post(url(d.auth, "/login")).json(&admin()).send().await.unwrap();
    assert_eq!(resp.status(), 500);
    assert_eq!(resp.text().await.unwrap(), "Downstream service unavailable");
}

#[tokio::test]
async fn gateway_policy_denial_is_forbidden() {
    let d = deploy(common::LOCKED_POLICY).await;

    let resp = http().post(url(d.auth, "/login")).json(&admin()).send().await.unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn policy_service_answers_check() {
    let d = deploy(common::PERMISSIVE_POLICY).await;
    let client = http();

    let req = CheckRequest {
        source_domain: "domain3_token_enforcer".into(),
        target_domain: "domain3_reference_monitor".into(),
        action: "validate_token".into(),
        context: Default::default(),
    };
    let resp: CheckResponse = client
        .post(url(d.policy, "/v1/check"))
        .json(&req)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(resp.allowed);

    let resp: CheckResponse = client
        .post(url(d.policy, "/v1/check"))
        .json(&json!({
            "source_domain": "domain1_untrusted",
            "target_domain": "domain3_reference_monitor",
            "action": "issue_token"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!resp.allowed);
    assert_eq!(resp.reason, "source domain not found");
}

#[tokio::test]
async fn policy_service_rejects_malformed_check() {
    let d = deploy(common::PERMISSIVE_POLICY).await;
    let resp = http()
        .post(url(d.policy, "/v1/check"))
        .json(&json!({ "source_domain": "a", "target_domain": "b" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn unreachable_policy_service_fails_closed() {
    let d = deploy(common::PERMISSIVE_POLICY).await;

    // Port of a listener that has already been dropped.
    let dead = {
        let l = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap()
    };
    let auth = spawn(build_auth_router(AuthState::new(AuthParts {
        limiter: Arc::new(FixedWindowLimiter::new(10, Duration::from_secs(60), 1000)),
        verifier: Arc::new(StaticCredentialVerifier::new(vec![StaticUser {
            username: "admin".into(),
            password: "secret123".into(),
            mfa: "123456".into(),
        }])),
        policy: Arc::new(HttpPolicyClient::new(&url(dead, ""), DEADLINE).unwrap()),
        issuer: Arc::new(HttpTokenIssuer::new(&url(d.enforcer, ""), DEADLINE).unwrap()),
        deadline: DEADLINE,
        metrics: Arc::new(PipelineMetrics::default()),
    })))
    .await;

    let resp = http().post(url(auth, "/login")).json(&admin()).send().await.unwrap();
    assert_eq!(resp.status(), 500);
}
