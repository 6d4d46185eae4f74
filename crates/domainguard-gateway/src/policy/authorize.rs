//! Authorize-then-call: the single gate every privileged hop passes through.
//!
//! A delegated call runs only after a fresh allow decision for that exact
//! `(source, target, action)` triple. Decisions are never cached. Engine
//! errors and deadline expiry deny.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use domainguard_core::error::{DomainGuardError, Result};
use domainguard_core::policy::Hop;
use domainguard_core::protocol::check::{AuditContext, CheckRequest};

use super::client::PolicyClient;
use crate::obs::PipelineMetrics;
use crate::transport::peer::with_deadline;

#[derive(Clone)]
pub struct Authorizer {
    policy: Arc<dyn PolicyClient>,
    deadline: Duration,
    metrics: Arc<PipelineMetrics>,
}

impl Authorizer {
    pub fn new(
        policy: Arc<dyn PolicyClient>,
        deadline: Duration,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self { policy, deadline, metrics }
    }

    pub async fn authorize(&self, hop: &Hop, context: AuditContext) -> Result<()> {
        let req = CheckRequest::for_hop(hop, context);

        let check = self.policy.check_interaction(&req);
        let decision = match with_deadline(self.deadline, "policy check", check).await {
            Ok(d) => d,
            Err(e) => {
                self.metrics.policy_decisions.inc(&[hop.action, "error"]);
                tracing::error!(
                    source_domain = hop.source, target_domain = hop.target, action = hop.action,
                    context = ?req.context, error = %e,
                    "policy engine unavailable; failing closed"
                );
                return Err(match e {
                    DomainGuardError::Downstream(_) => e,
                    other => DomainGuardError::Downstream(other.to_string()),
                });
            }
        };

        if !decision.allowed {
            self.metrics.policy_decisions.inc(&[hop.action, "deny"]);
            tracing::warn!(
                source_domain = hop.source, target_domain = hop.target, action = hop.action,
                reason = %decision.reason, context = ?req.context,
                "policy violation"
            );
            return Err(DomainGuardError::PolicyDenied(decision.reason.into_owned()));
        }

        self.metrics.policy_decisions.inc(&[hop.action, "allow"]);
        tracing::debug!(
            source_domain = hop.source,
            target_domain = hop.target,
            action = hop.action,
            "policy allowed"
        );
        Ok(())
    }

    /// Check `hop`, then run `call` under the same deadline.
    pub async fn authorize_then<T, F, Fut>(
        &self,
        hop: &Hop,
        context: AuditContext,
        call: F,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.authorize(hop, context).await?;

        let started = Instant::now();
        let out = with_deadline(self.deadline, hop.action, call()).await;
        self.metrics.downstream_latency.observe(&[hop.action], started.elapsed());
        out
    }
}
