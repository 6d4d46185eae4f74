//! Reference Monitor over HTTP: `POST /v1/issue`, `POST /v1/validate`.

use std::time::Duration;

use axum::{extract::State, Json};
use bytes::Bytes;

use domainguard_core::error::{DomainGuardError, Result};
use domainguard_core::protocol::decode_json;
use domainguard_core::protocol::token::{MintRequest, MintResponse, ValidateResponse, VerifyRequest};

use crate::app_state::RefmonState;
use crate::ops::HasMetrics;
use crate::transport::http::ApiError;

pub async fn mint(
    State(state): State<RefmonState>,
    body: Bytes,
) -> std::result::Result<Json<MintResponse>, ApiError> {
    let res = run_mint(&state, &body).await;
    state.metrics().requests.inc(&["reference_monitor", super::outcome(&res)]);
    res.map(Json).map_err(ApiError::from)
}

async fn run_mint(state: &RefmonState, body: &[u8]) -> Result<MintResponse> {
    let req: MintRequest = decode_json(body)?;
    let token = state
        .monitor()
        .issue(&req.subject, Duration::from_secs(req.ttl_seconds))
        .await?;
    let token = String::from_utf8(token.to_vec())
        .map_err(|_| DomainGuardError::Internal("minted token is not UTF-8".into()))?;
    Ok(MintResponse { token })
}

pub async fn verify(
    State(state): State<RefmonState>,
    body: Bytes,
) -> std::result::Result<Json<ValidateResponse>, ApiError> {
    let res = run_verify(&state, &body).await;
    state.metrics().requests.inc(&["reference_monitor", super::outcome(&res)]);
    res.map(Json).map_err(ApiError::from)
}

async fn run_verify(state: &RefmonState, body: &[u8]) -> Result<ValidateResponse> {
    let req: VerifyRequest = decode_json(body)?;
    state.monitor().validate(req.token.as_bytes()).await
}
