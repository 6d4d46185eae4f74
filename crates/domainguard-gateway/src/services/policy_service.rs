//! Policy Service: `POST /v1/check`.

use axum::{extract::State, Json};
use bytes::Bytes;

use domainguard_core::error::Result;
use domainguard_core::protocol::check::{CheckRequest, CheckResponse};
use domainguard_core::protocol::decode_json;

use crate::app_state::PolicyServiceState;
use crate::ops::HasMetrics;
use crate::transport::http::ApiError;

pub async fn check(
    State(state): State<PolicyServiceState>,
    body: Bytes,
) -> std::result::Result<Json<CheckResponse>, ApiError> {
    let res = evaluate(&state, &body);
    state.metrics().requests.inc(&["policy", super::outcome(&res)]);
    res.map(Json).map_err(ApiError::from)
}

fn evaluate(state: &PolicyServiceState, body: &[u8]) -> Result<CheckResponse> {
    let req: CheckRequest = decode_json(body)?;
    let decision = state
        .engine()
        .check_interaction(&req.source_domain, &req.target_domain, &req.action);

    let verdict = if decision.allowed { "allow" } else { "deny" };
    state.metrics().policy_checks.inc(&[verdict]);
    if decision.allowed {
        tracing::info!(
            source_domain = %req.source_domain,
            target_domain = %req.target_domain,
            action = %req.action,
            context = ?req.context,
            "interaction allowed"
        );
    } else {
        tracing::warn!(
            source_domain = %req.source_domain,
            target_domain = %req.target_domain,
            action = %req.action,
            reason = %decision.reason,
            context = ?req.context,
            "interaction denied"
        );
    }
    Ok(decision.into())
}
