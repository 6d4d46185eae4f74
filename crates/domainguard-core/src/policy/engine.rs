use std::borrow::Cow;

use super::model::Policy;

pub const REASON_ALLOWED: &str = "allowed by policy";
pub const REASON_UNKNOWN_SOURCE: &str = "source domain not found";
pub const REASON_NOT_ALLOWED: &str = "action not allowed by policy";

/// `(source, target, action)` triple describing one privileged hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub source: &'static str,
    pub target: &'static str,
    pub action: &'static str,
}

impl Hop {
    pub const fn new(source: &'static str, target: &'static str, action: &'static str) -> Self {
        Self { source, target, action }
    }
}

/// Result of one policy check. Produced per call, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    pub allowed: bool,
    pub reason: Cow<'static, str>,
}

impl AuthorizationDecision {
    pub fn allow() -> Self {
        Self { allowed: true, reason: Cow::Borrowed(REASON_ALLOWED) }
    }

    pub fn deny(reason: impl Into<Cow<'static, str>>) -> Self {
        Self { allowed: false, reason: reason.into() }
    }
}

/// Read-only policy evaluator.
/// Construct once at startup, then share via Arc.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    policy: Policy,
}

impl PolicyEngine {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Exact, case-sensitive match. Interactions are scanned in declared
    /// order; every interaction targeting `target` is consulted before
    /// denying.
    pub fn check_interaction(
        &self,
        source: &str,
        target: &str,
        action: &str,
    ) -> AuthorizationDecision {
        let Some(domain) = self.policy.domain(source) else {
            return AuthorizationDecision::deny(REASON_UNKNOWN_SOURCE);
        };

        let permitted = domain
            .allowed_interactions
            .iter()
            .filter(|it| it.to == target)
            .any(|it| it.permits(action));

        if permitted {
            AuthorizationDecision::allow()
        } else {
            AuthorizationDecision::deny(REASON_NOT_ALLOWED)
        }
    }

    pub fn check_hop(&self, hop: &Hop) -> AuthorizationDecision {
        self.check_interaction(hop.source, hop.target, hop.action)
    }
}
