//! HTTP roles.
//!
//! - `auth`: login pipeline (rate limit, credentials, first policy gate, forward)
//! - `enforcer`: second policy gate in front of the Reference Monitor
//! - `policy_service`: the Policy Engine over HTTP
//! - `reference_monitor`: token minting/validation over HTTP

pub mod auth;
pub mod enforcer;
pub mod policy_service;
pub mod reference_monitor;

use domainguard_core::error::Result;

/// Metrics label for a request outcome.
pub(crate) fn outcome<T>(res: &Result<T>) -> &'static str {
    match res {
        Ok(_) => "OK",
        Err(e) => e.client_code().as_str(),
    }
}
