//! Axum router wiring, one router per role.
//!
//! Every role also exposes `/health` and `/metrics`.

use axum::{
    routing::{any, get, post},
    Router,
};

use crate::app_state::{AuthState, EnforcerState, PolicyServiceState, RefmonState};
use crate::policy::client::CHECK_PATH;
use crate::refmon::{ISSUE_PATH, VALIDATE_PATH};
use crate::{ops, services};

pub fn build_auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/login", post(services::auth::login))
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics::<AuthState>))
        .with_state(state)
}

/// Method filtering happens in the handlers so that a wrong method is a
/// `MethodNotAllowed` from the error taxonomy.
pub fn build_enforcer_router(state: EnforcerState) -> Router {
    Router::new()
        .route("/issue", any(services::enforcer::issue))
        .route("/validate", any(services::enforcer::validate))
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics::<EnforcerState>))
        .with_state(state)
}

pub fn build_policy_router(state: PolicyServiceState) -> Router {
    Router::new()
        .route(CHECK_PATH, post(services::policy_service::check))
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics::<PolicyServiceState>))
        .with_state(state)
}

pub fn build_refmon_router(state: RefmonState) -> Router {
    Router::new()
        .route(ISSUE_PATH, post(services::reference_monitor::mint))
        .route(VALIDATE_PATH, post(services::reference_monitor::verify))
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics::<RefmonState>))
        .with_state(state)
}
