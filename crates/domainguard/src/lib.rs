//! domainguard: policy-mediated authentication across security domains.
//!
//! Single dependency for embedders. `core` holds the engine, error taxonomy
//! and wire types; `gateway` holds the servable roles. The `prelude` covers
//! what a caller needs to stand up a role router in-process.

pub mod core {
    pub use domainguard_core::*;
}

pub mod gateway {
    pub use domainguard_gateway::*;
}

pub mod prelude {
    pub use domainguard_core::domain;
    pub use domainguard_core::error::{ClientCode, DomainGuardError, Result};
    pub use domainguard_core::policy::{AuthorizationDecision, Hop, Policy, PolicyEngine};
    pub use domainguard_gateway::config::{load_from_str, load_policy_from_str, GatewayConfig};
    pub use domainguard_gateway::policy::{Authorizer, FixedWindowLimiter, PolicyClient};
    pub use domainguard_gateway::router::{
        build_auth_router, build_enforcer_router, build_policy_router, build_refmon_router,
    };
}
