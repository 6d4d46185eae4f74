//! Inter-domain policy data model.
//!
//! A [`Policy`] maps each source domain to its ordered list of permitted
//! outbound [`Interaction`]s. It is built once from configuration and never
//! mutated afterwards.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{DomainGuardError, Result};

/// Whole policy document (`security_domains:` root key).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    pub security_domains: HashMap<String, DomainPolicy>,
}

/// Outbound permissions declared by one source domain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainPolicy {
    #[serde(default)]
    pub allowed_interactions: Vec<Interaction>,
}

/// One permission edge: `to` may receive any of `actions`.
///
/// `port` and `protocol` are informational; the engine never evaluates them.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Interaction {
    pub to: String,
    pub actions: Vec<String>,
    #[serde(default)]
    pub port: Option<i64>,
    #[serde(default)]
    pub protocol: Option<String>,
}

impl Interaction {
    pub fn permits(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }
}

impl Policy {
    pub fn domain(&self, name: &str) -> Option<&DomainPolicy> {
        self.security_domains.get(name)
    }

    /// Structural checks applied after parsing. A policy that fails here must
    /// never be served.
    pub fn validate(&self) -> Result<()> {
        for (name, domain) in &self.security_domains {
            if name.trim().is_empty() {
                return Err(DomainGuardError::InvalidConfig(
                    "security_domains must not contain an empty domain name".into(),
                ));
            }
            for (idx, it) in domain.allowed_interactions.iter().enumerate() {
                if it.to.trim().is_empty() {
                    return Err(DomainGuardError::InvalidConfig(format!(
                        "{name}.allowed_interactions[{idx}].to must not be empty"
                    )));
                }
                if it.actions.is_empty() {
                    return Err(DomainGuardError::InvalidConfig(format!(
                        "{name}.allowed_interactions[{idx}].actions must not be empty"
                    )));
                }
                if it.actions.iter().any(|a| a.trim().is_empty()) {
                    return Err(DomainGuardError::InvalidConfig(format!(
                        "{name}.allowed_interactions[{idx}] contains an empty action"
                    )));
                }
            }
        }
        Ok(())
    }
}
