//! Token Enforcer: `POST /issue`, `GET|POST /validate`.
//!
//! Both operations run their own policy gate against the Reference Monitor
//! domain. Reaching this service says nothing about prior authorization.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use domainguard_core::domain;
use domainguard_core::error::{DomainGuardError, Result};
use domainguard_core::protocol::check::AuditContext;
use domainguard_core::protocol::decode_json;
use domainguard_core::protocol::token::{IssueRequest, ValidateResponse};

use crate::app_state::EnforcerState;
use crate::ops::HasMetrics;
use crate::transport::bearer::bearer_token;
use crate::transport::client_ip::client_identity;
use crate::transport::http::ApiError;

fn caller_context(headers: &HeaderMap, peer: Option<ConnectInfo<SocketAddr>>) -> AuditContext {
    let mut ctx = AuditContext::new();
    ctx.insert("ip".into(), client_identity(headers, peer.map(|ConnectInfo(addr)| addr)));
    ctx
}

fn finish<T>(state: &EnforcerState, op: &str, res: &Result<T>) {
    state.metrics().requests.inc(&["enforcer", super::outcome(res)]);
    if let Err(e) = res {
        if e.is_downstream() {
            tracing::error!(op, error = %e, "reference monitor hop failed");
        }
    }
}

pub async fn issue(
    State(state): State<EnforcerState>,
    method: Method,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Response, ApiError> {
    let res = if method == Method::POST {
        run_issue(&state, caller_context(&headers, peer), &body).await
    } else {
        Err(DomainGuardError::MethodNotAllowed)
    };
    finish(&state, "issue", &res);

    let token = res?;
    Ok(([(CONTENT_TYPE, "text/plain; charset=utf-8")], token).into_response())
}

/// Policy gate, then `{subject}` parsing, then `Issue(subject, ttl)`.
pub async fn run_issue(state: &EnforcerState, context: AuditContext, body: &[u8]) -> Result<Bytes> {
    let refmon = state.refmon();
    let ttl = state.token_ttl();

    state
        .authorizer()
        .authorize_then(&domain::ENFORCER_ISSUE, context, move || async move {
            let req: IssueRequest = decode_json(body)?;
            if req.subject.trim().is_empty() {
                return Err(DomainGuardError::BadRequest("missing subject".into()));
            }
            // The subject reaches the Reference Monitor exactly as requested.
            let token = refmon.issue(&req.subject, ttl).await?;
            tracing::info!(
                subject = %req.subject,
                ttl_secs = ttl.as_secs(),
                "token issued by reference monitor"
            );
            Ok(token)
        })
        .await
}

pub async fn validate(
    State(state): State<EnforcerState>,
    method: Method,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> std::result::Result<Json<ValidateResponse>, ApiError> {
    let res = if method == Method::GET || method == Method::POST {
        run_validate(&state, caller_context(&headers, peer), &headers).await
    } else {
        Err(DomainGuardError::MethodNotAllowed)
    };
    finish(&state, "validate", &res);
    res.map(Json).map_err(ApiError::from)
}

/// Bearer extraction comes first: a request without credentials never
/// consults the policy engine or the Reference Monitor.
pub async fn run_validate(
    state: &EnforcerState,
    context: AuditContext,
    headers: &HeaderMap,
) -> Result<ValidateResponse> {
    let token = bearer_token(headers)?.to_owned();
    let refmon = state.refmon();

    let verdict = state
        .authorizer()
        .authorize_then(&domain::ENFORCER_VALIDATE, context, move || async move {
            refmon.validate(token.as_bytes()).await
        })
        .await?;

    if !verdict.valid {
        tracing::info!(
            error = verdict.error.as_deref().unwrap_or(""),
            "token rejected by reference monitor"
        );
    }
    Ok(verdict)
}
