//! Shared state for each HTTP role.
//!
//! Every dependency is constructed explicitly and injected; there are no
//! process globals. `from_config` constructors return `Result` so startup
//! failures (bad policy file, missing secret) surface before serving.

use std::sync::Arc;
use std::time::Duration;

use domainguard_core::error::Result;
use domainguard_core::policy::PolicyEngine;

use crate::config::{
    self, AuthSection, EnforcerSection, PolicyServiceSection, ReferenceMonitorSection,
};
use crate::credentials::{self, CredentialVerifier};
use crate::obs::PipelineMetrics;
use crate::ops::HasMetrics;
use crate::policy::{self, Authorizer, FixedWindowLimiter, PolicyClient};
use crate::refmon::{HttpReferenceMonitor, JwtReferenceMonitor, ReferenceMonitor};
use crate::services::auth::{HttpTokenIssuer, TokenIssuer};

// --------------------
// Auth Gateway
// --------------------

/// Dependencies of the login pipeline.
pub struct AuthParts {
    pub limiter: Arc<FixedWindowLimiter>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub policy: Arc<dyn PolicyClient>,
    pub issuer: Arc<dyn TokenIssuer>,
    pub deadline: Duration,
    pub metrics: Arc<PipelineMetrics>,
}

#[derive(Clone)]
pub struct AuthState {
    inner: Arc<AuthInner>,
}

struct AuthInner {
    limiter: Arc<FixedWindowLimiter>,
    verifier: Arc<dyn CredentialVerifier>,
    authorizer: Authorizer,
    issuer: Arc<dyn TokenIssuer>,
    deadline: Duration,
    metrics: Arc<PipelineMetrics>,
}

impl AuthState {
    pub fn new(parts: AuthParts) -> Self {
        let authorizer = Authorizer::new(parts.policy, parts.deadline, Arc::clone(&parts.metrics));
        Self {
            inner: Arc::new(AuthInner {
                limiter: parts.limiter,
                verifier: parts.verifier,
                authorizer,
                issuer: parts.issuer,
                deadline: parts.deadline,
                metrics: parts.metrics,
            }),
        }
    }

    pub fn from_config(cfg: &AuthSection, metrics: Arc<PipelineMetrics>) -> Result<Self> {
        let deadline = cfg.deadline();
        Ok(Self::new(AuthParts {
            limiter: Arc::new(FixedWindowLimiter::from_config(&cfg.rate_limit)),
            verifier: credentials::from_config(&cfg.credentials, deadline)?,
            policy: policy::client::from_source(&cfg.policy_source, deadline)?,
            issuer: Arc::new(HttpTokenIssuer::new(&cfg.enforcer_url, deadline)?),
            deadline,
            metrics,
        }))
    }

    pub fn limiter(&self) -> &Arc<FixedWindowLimiter> {
        &self.inner.limiter
    }

    pub fn verifier(&self) -> &dyn CredentialVerifier {
        self.inner.verifier.as_ref()
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.inner.authorizer
    }

    pub fn issuer(&self) -> Arc<dyn TokenIssuer> {
        Arc::clone(&self.inner.issuer)
    }

    pub fn deadline(&self) -> Duration {
        self.inner.deadline
    }
}

impl HasMetrics for AuthState {
    fn metrics(&self) -> &PipelineMetrics {
        &self.inner.metrics
    }
}

// --------------------
// Token Enforcer
// --------------------

pub struct EnforcerParts {
    pub policy: Arc<dyn PolicyClient>,
    pub refmon: Arc<dyn ReferenceMonitor>,
    pub token_ttl: Duration,
    pub deadline: Duration,
    pub metrics: Arc<PipelineMetrics>,
}

#[derive(Clone)]
pub struct EnforcerState {
    inner: Arc<EnforcerInner>,
}

struct EnforcerInner {
    authorizer: Authorizer,
    refmon: Arc<dyn ReferenceMonitor>,
    token_ttl: Duration,
    metrics: Arc<PipelineMetrics>,
}

impl EnforcerState {
    pub fn new(parts: EnforcerParts) -> Self {
        let authorizer = Authorizer::new(parts.policy, parts.deadline, Arc::clone(&parts.metrics));
        Self {
            inner: Arc::new(EnforcerInner {
                authorizer,
                refmon: parts.refmon,
                token_ttl: parts.token_ttl,
                metrics: parts.metrics,
            }),
        }
    }

    pub fn from_config(cfg: &EnforcerSection, metrics: Arc<PipelineMetrics>) -> Result<Self> {
        let deadline = cfg.deadline();
        Ok(Self::new(EnforcerParts {
            policy: policy::client::from_source(&cfg.policy_source, deadline)?,
            refmon: Arc::new(HttpReferenceMonitor::new(&cfg.reference_monitor_url, deadline)?),
            token_ttl: cfg.token_ttl(),
            deadline,
            metrics,
        }))
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.inner.authorizer
    }

    pub fn refmon(&self) -> Arc<dyn ReferenceMonitor> {
        Arc::clone(&self.inner.refmon)
    }

    pub fn token_ttl(&self) -> Duration {
        self.inner.token_ttl
    }
}

impl HasMetrics for EnforcerState {
    fn metrics(&self) -> &PipelineMetrics {
        &self.inner.metrics
    }
}

// --------------------
// Policy Service
// --------------------

#[derive(Clone)]
pub struct PolicyServiceState {
    engine: Arc<PolicyEngine>,
    metrics: Arc<PipelineMetrics>,
}

impl PolicyServiceState {
    pub fn new(engine: Arc<PolicyEngine>, metrics: Arc<PipelineMetrics>) -> Self {
        Self { engine, metrics }
    }

    /// Loads the policy file; a missing or malformed file is fatal.
    pub fn from_config(cfg: &PolicyServiceSection, metrics: Arc<PipelineMetrics>) -> Result<Self> {
        let policy = config::load_policy_from_file(&cfg.policy_file)?;
        let domains = policy.security_domains.len();
        tracing::info!(file = %cfg.policy_file, domains, "policy loaded");
        Ok(Self::new(Arc::new(PolicyEngine::new(policy)), metrics))
    }

    pub fn engine(&self) -> &PolicyEngine {
        &self.engine
    }
}

impl HasMetrics for PolicyServiceState {
    fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }
}

// --------------------
// Reference Monitor
// --------------------

#[derive(Clone)]
pub struct RefmonState {
    monitor: Arc<dyn ReferenceMonitor>,
    metrics: Arc<PipelineMetrics>,
}

impl RefmonState {
    pub fn new(monitor: Arc<dyn ReferenceMonitor>, metrics: Arc<PipelineMetrics>) -> Self {
        Self { monitor, metrics }
    }

    pub fn from_config(
        cfg: &ReferenceMonitorSection,
        metrics: Arc<PipelineMetrics>,
    ) -> Result<Self> {
        let monitor = JwtReferenceMonitor::from_env(&cfg.secret_env)?;
        Ok(Self::new(Arc::new(monitor), metrics))
    }

    pub fn monitor(&self) -> &dyn ReferenceMonitor {
        self.monitor.as_ref()
    }
}

impl HasMetrics for RefmonState {
    fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }
}
