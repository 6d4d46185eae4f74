//! `CheckInteraction` contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::policy::{AuthorizationDecision, Hop};

/// Audit context attached to a policy check (`user`, `ip`, ...).
pub type AuditContext = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckRequest {
    pub source_domain: String,
    pub target_domain: String,
    pub action: String,
    #[serde(default)]
    pub context: AuditContext,
}

impl CheckRequest {
    pub fn for_hop(hop: &Hop, context: AuditContext) -> Self {
        Self {
            source_domain: hop.source.to_string(),
            target_domain: hop.target.to_string(),
            action: hop.action.to_string(),
            context,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub allowed: bool,
    pub reason: String,
}

impl From<AuthorizationDecision> for CheckResponse {
    fn from(d: AuthorizationDecision) -> Self {
        Self { allowed: d.allowed, reason: d.reason.into_owned() }
    }
}

impl From<CheckResponse> for AuthorizationDecision {
    fn from(r: CheckResponse) -> Self {
        Self { allowed: r.allowed, reason: r.reason.into() }
    }
}
