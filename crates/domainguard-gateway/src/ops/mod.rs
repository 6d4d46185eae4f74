//! Operational HTTP endpoints shared by every role.
//!
//! - `/health`  : liveness, plain `OK`
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};

use crate::obs::PipelineMetrics;

/// Role state that can expose the shared metrics registry.
pub trait HasMetrics {
    fn metrics(&self) -> &PipelineMetrics;
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn metrics<S: HasMetrics>(State(state): State<S>) -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.metrics().render(),
    )
        .into_response()
}
