//! Config and policy loaders (strict parsing).

pub mod schema;

use std::fs;

use domainguard_core::error::{DomainGuardError, Result};
use domainguard_core::policy::Policy;

pub use schema::{
    AuthSection, CredentialsSection, EnforcerSection, GatewayConfig, PolicyServiceSection,
    PolicySource, RateLimitSection, ReferenceMonitorSection, StaticUser,
};

/// Environment variable overriding the config path.
pub const CONFIG_ENV: &str = "DOMAINGUARD_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "domainguard.yaml";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| DomainGuardError::InvalidConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| DomainGuardError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load the inter-domain policy. Any failure here must stop startup.
pub fn load_policy_from_file(path: &str) -> Result<Policy> {
    let s = fs::read_to_string(path)
        .map_err(|e| DomainGuardError::InvalidConfig(format!("read policy {path} failed: {e}")))?;
    load_policy_from_str(&s)
}

pub fn load_policy_from_str(s: &str) -> Result<Policy> {
    let policy: Policy = serde_yaml::from_str(s)
        .map_err(|e| DomainGuardError::InvalidConfig(format!("invalid policy yaml: {e}")))?;
    policy.validate()?;
    Ok(policy)
}
