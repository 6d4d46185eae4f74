use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use domainguard_core::error::{DomainGuardError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub auth: Option<AuthSection>,

    #[serde(default)]
    pub enforcer: Option<EnforcerSection>,

    #[serde(default)]
    pub policy_service: Option<PolicyServiceSection>,

    #[serde(default)]
    pub reference_monitor: Option<ReferenceMonitorSection>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(DomainGuardError::UnsupportedVersion);
        }
        if self.auth.is_none()
            && self.enforcer.is_none()
            && self.policy_service.is_none()
            && self.reference_monitor.is_none()
        {
            return Err(invalid(
                "at least one of auth, enforcer, policy_service, reference_monitor \
                 must be configured",
            ));
        }

        if let Some(a) = &self.auth {
            a.validate()?;
        }
        if let Some(e) = &self.enforcer {
            e.validate()?;
        }
        if let Some(p) = &self.policy_service {
            validate_listen("policy_service", &p.listen)?;
            if p.policy_file.trim().is_empty() {
                return Err(invalid("policy_service.policy_file must not be empty"));
            }
        }
        if let Some(r) = &self.reference_monitor {
            validate_listen("reference_monitor", &r.listen)?;
            if r.secret_env.trim().is_empty() {
                return Err(invalid("reference_monitor.secret_env must not be empty"));
            }
        }
        Ok(())
    }
}

/// Auth Gateway role.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    #[serde(default = "default_auth_listen")]
    pub listen: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    pub enforcer_url: String,

    #[serde(with = "serde_yaml::with::singleton_map")]
    pub policy_source: PolicySource,

    #[serde(with = "serde_yaml::with::singleton_map")]
    pub credentials: CredentialsSection,

    #[serde(default)]
    pub rate_limit: RateLimitSection,
}

impl AuthSection {
    pub fn validate(&self) -> Result<()> {
        validate_listen("auth", &self.listen)?;
        validate_timeout("auth", self.timeout_ms)?;
        validate_url("auth.enforcer_url", &self.enforcer_url)?;
        self.policy_source.validate("auth")?;
        self.credentials.validate()?;
        self.rate_limit.validate()
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_listen("auth", &self.listen)
    }
}

/// Token Enforcer role.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnforcerSection {
    #[serde(default = "default_enforcer_listen")]
    pub listen: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    pub reference_monitor_url: String,

    #[serde(with = "serde_yaml::with::singleton_map")]
    pub policy_source: PolicySource,
}

impl EnforcerSection {
    pub fn validate(&self) -> Result<()> {
        validate_listen("enforcer", &self.listen)?;
        validate_timeout("enforcer", self.timeout_ms)?;
        validate_url("enforcer.reference_monitor_url", &self.reference_monitor_url)?;
        if !(1..=86_400).contains(&self.token_ttl_secs) {
            return Err(invalid("enforcer.token_ttl_secs must be between 1 and 86400"));
        }
        self.policy_source.validate("enforcer")
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_listen("enforcer", &self.listen)
    }
}

/// Policy Engine served over HTTP.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyServiceSection {
    #[serde(default = "default_policy_listen")]
    pub listen: String,

    #[serde(default = "default_policy_file")]
    pub policy_file: String,
}

impl PolicyServiceSection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_listen("policy_service", &self.listen)
    }
}

/// Reference Monitor role.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceMonitorSection {
    #[serde(default = "default_refmon_listen")]
    pub listen: String,

    /// Name of the environment variable holding the signing secret.
    #[serde(default = "default_secret_env")]
    pub secret_env: String,
}

impl ReferenceMonitorSection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_listen("reference_monitor", &self.listen)
    }
}

/// Where a role gets its policy decisions from.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum PolicySource {
    /// Remote Policy Service (`POST {url}/v1/check`).
    Remote { url: String },
    /// In-process engine loaded from a policy file at startup.
    Local { file: String },
}

impl PolicySource {
    fn validate(&self, role: &str) -> Result<()> {
        match self {
            PolicySource::Remote { url } => {
                validate_url(&format!("{role}.policy_source.remote.url"), url)
            }
            PolicySource::Local { file } if file.trim().is_empty() => Err(invalid(format!(
                "{role}.policy_source.local.file must not be empty"
            ))),
            PolicySource::Local { .. } => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum CredentialsSection {
    Static { users: Vec<StaticUser> },
    IdentityProvider { url: String },
}

impl CredentialsSection {
    fn validate(&self) -> Result<()> {
        match self {
            CredentialsSection::Static { users } => {
                if users.is_empty() {
                    return Err(invalid("auth.credentials.static.users must not be empty"));
                }
                let incomplete = users
                    .iter()
                    .any(|u| u.username.is_empty() || u.password.is_empty() || u.mfa.is_empty());
                if incomplete {
                    return Err(invalid(
                        "auth.credentials.static.users entries need username, password and mfa",
                    ));
                }
                Ok(())
            }
            CredentialsSection::IdentityProvider { url } => {
                validate_url("auth.credentials.identity_provider.url", url)
            }
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticUser {
    pub username: String,
    pub password: String,
    pub mfa: String,
}

impl std::fmt::Debug for StaticUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticUser").field("username", &self.username).finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitSection {
    #[serde(default = "default_capacity")]
    pub capacity: u32,

    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            window_secs: default_window_secs(),
            max_entries: default_max_entries(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl RateLimitSection {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(invalid("auth.rate_limit.capacity must be greater than 0"));
        }
        if self.window_secs == 0 {
            return Err(invalid("auth.rate_limit.window_secs must be greater than 0"));
        }
        if self.max_entries == 0 {
            return Err(invalid("auth.rate_limit.max_entries must be greater than 0"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(invalid("auth.rate_limit.sweep_interval_secs must be greater than 0"));
        }
        Ok(())
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn invalid(msg: impl Into<String>) -> DomainGuardError {
    DomainGuardError::InvalidConfig(msg.into())
}

fn parse_listen(role: &str, listen: &str) -> Result<SocketAddr> {
    listen
        .parse()
        .map_err(|_| invalid(format!("{role}.listen must be a valid socket address: {listen}")))
}

fn validate_listen(role: &str, listen: &str) -> Result<()> {
    parse_listen(role, listen).map(|_| ())
}

fn validate_timeout(role: &str, timeout_ms: u64) -> Result<()> {
    if !(100..=60_000).contains(&timeout_ms) {
        return Err(invalid(format!("{role}.timeout_ms must be between 100 and 60000")));
    }
    Ok(())
}

fn validate_url(field: &str, url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be an http(s) URL")))
    }
}

fn default_auth_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_enforcer_listen() -> String {
    "0.0.0.0:8081".into()
}
fn default_policy_listen() -> String {
    "0.0.0.0:50052".into()
}
fn default_refmon_listen() -> String {
    "0.0.0.0:50051".into()
}
fn default_policy_file() -> String {
    "/policies/inter_domain_interactions.yaml".into()
}
fn default_secret_env() -> String {
    "DOMAINGUARD_REFMON_SECRET".into()
}
fn default_timeout_ms() -> u64 {
    5000
}
fn default_token_ttl_secs() -> u64 {
    60
}
fn default_capacity() -> u32 {
    10
}
fn default_window_secs() -> u64 {
    60
}
fn default_max_entries() -> usize {
    100_000
}
fn default_sweep_interval_secs() -> u64 {
    60
}
