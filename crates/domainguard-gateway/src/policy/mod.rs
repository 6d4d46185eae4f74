//! Policy layer (authorization gate, policy clients, rate limiting).
//!
//! Wraps the core Policy Engine behind a client capability so that every role
//! can consult it in-process or over the network, and hosts the per-client
//! throttle applied before credentials are examined.

pub mod authorize;
pub mod client;
pub mod rate_limit;

pub use authorize::Authorizer;
pub use client::{HttpPolicyClient, LocalPolicyClient, PolicyClient};
pub use rate_limit::FixedWindowLimiter;
