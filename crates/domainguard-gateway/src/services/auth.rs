//! Auth Gateway: `POST /login`.
//!
//! Terminal at first failure:
//! 1. derive client identity
//! 2. rate limit (429)
//! 3. parse `{username, password, mfa}` (400)
//! 4. verify credentials (401)
//! 5. policy gate `authentication -> token_policy : issue_token` (403 / 500)
//! 6. forward issuance to the Token Enforcer (500 on any peer failure)

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use bytes::Bytes;

use domainguard_core::domain;
use domainguard_core::error::{DomainGuardError, Result};
use domainguard_core::protocol::check::AuditContext;
use domainguard_core::protocol::decode_json;
use domainguard_core::protocol::token::{IssueRequest, LoginRequest, TokenResponse};

use crate::app_state::AuthState;
use crate::ops::HasMetrics;
use crate::transport::client_ip::client_identity;
use crate::transport::http::ApiError;
use crate::transport::peer::{with_deadline, PeerClient};

/// Token Enforcer issuance endpoint, as consumed by the gateway.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self, subject: &str) -> Result<String>;
}

/// `POST {enforcer}/issue` with `{subject}`; the 200 body is the token.
pub struct HttpTokenIssuer {
    peer: PeerClient,
}

impl HttpTokenIssuer {
    pub fn new(enforcer_url: &str, deadline: Duration) -> Result<Self> {
        Ok(Self { peer: PeerClient::new("token enforcer", enforcer_url, deadline)? })
    }
}

#[async_trait]
impl TokenIssuer for HttpTokenIssuer {
    async fn issue(&self, subject: &str) -> Result<String> {
        let req = IssueRequest { subject: subject.to_string() };
        let resp = self.peer.post_json("/issue", &req).await?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(self.peer.bad_status(status));
        }
        let body = resp.text().await.map_err(|e| self.peer.unreachable(e))?;
        let token = body.trim();
        if token.is_empty() {
            return Err(DomainGuardError::Downstream(
                "token enforcer returned an empty token".into(),
            ));
        }
        Ok(token.to_string())
    }
}

pub async fn login(
    State(state): State<AuthState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Json<TokenResponse>, ApiError> {
    let client = client_identity(&headers, peer.map(|ConnectInfo(addr)| addr));
    let res = run_login(&state, &client, &body).await;
    state.metrics().requests.inc(&["auth", super::outcome(&res)]);

    if let Err(e) = &res {
        if e.is_downstream() {
            tracing::error!(client = %client, error = %e, "login failed on downstream hop");
        }
    }
    res.map(Json).map_err(ApiError::from)
}

/// The login pipeline without the HTTP envelope.
pub async fn run_login(state: &AuthState, client: &str, body: &[u8]) -> Result<TokenResponse> {
    if !state.limiter().allow(client) {
        tracing::warn!(client, "rate limit exceeded");
        return Err(DomainGuardError::RateLimited);
    }

    let req: LoginRequest = decode_json(body)?;

    let verified = with_deadline(
        state.deadline(),
        "credential verification",
        state.verifier().verify(&req),
    )
    .await?;
    if !verified {
        tracing::warn!(client, user = %req.username, "failed login attempt");
        return Err(DomainGuardError::AuthFailed);
    }
    tracing::info!(client, user = %req.username, "authenticated");

    let mut context = AuditContext::new();
    context.insert("user".into(), req.username.clone());
    context.insert("ip".into(), client.to_string());

    let issuer = state.issuer();
    let subject = req.username.as_str();
    let token = state
        .authorizer()
        .authorize_then(&domain::LOGIN_ISSUE, context, move || async move {
            issuer.issue(subject).await
        })
        .await?;

    tracing::info!(client, user = %req.username, "token issued");
    Ok(TokenResponse { token })
}
