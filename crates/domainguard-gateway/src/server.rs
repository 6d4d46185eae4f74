//! Process bootstrap: build every configured role, bind, serve, drain.
//!
//! Any construction error (config, policy file, secret, bind) aborts startup
//! before a single listener accepts traffic.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use axum::Router;
use futures_util::future::try_join_all;
use tokio::net::TcpListener;
use tokio::sync::watch;

use domainguard_core::error::{DomainGuardError, Result};

use crate::app_state::{AuthState, EnforcerState, PolicyServiceState, RefmonState};
use crate::config::GatewayConfig;
use crate::obs::PipelineMetrics;
use crate::router;

type ServeFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// One role ready to be bound.
pub struct Role {
    pub name: &'static str,
    pub listen: SocketAddr,
    pub router: Router,
}

/// Build the routers for every configured role. Spawns the rate-limiter
/// sweeper when the Auth Gateway role is present.
pub fn build_roles(cfg: &GatewayConfig, metrics: Arc<PipelineMetrics>) -> Result<Vec<Role>> {
    let mut roles = Vec::new();

    if let Some(p) = &cfg.policy_service {
        let state = PolicyServiceState::from_config(p, Arc::clone(&metrics))?;
        roles.push(Role {
            name: "policy_service",
            listen: p.listen_addr()?,
            router: router::build_policy_router(state),
        });
    }

    if let Some(r) = &cfg.reference_monitor {
        let state = RefmonState::from_config(r, Arc::clone(&metrics))?;
        roles.push(Role {
            name: "reference_monitor",
            listen: r.listen_addr()?,
            router: router::build_refmon_router(state),
        });
    }

    if let Some(e) = &cfg.enforcer {
        let state = EnforcerState::from_config(e, Arc::clone(&metrics))?;
        roles.push(Role {
            name: "enforcer",
            listen: e.listen_addr()?,
            router: router::build_enforcer_router(state),
        });
    }

    if let Some(a) = &cfg.auth {
        let state = AuthState::from_config(a, Arc::clone(&metrics))?;
        Arc::clone(state.limiter())
            .spawn_sweeper(a.rate_limit.sweep_interval(), Arc::clone(&metrics));
        roles.push(Role {
            name: "auth",
            listen: a.listen_addr()?,
            router: router::build_auth_router(state),
        });
    }

    Ok(roles)
}

/// Serve `router` on `listener` with peer-address connect info until
/// `shutdown` flips.
pub async fn serve(
    name: &'static str,
    listener: TcpListener,
    router: Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await
        .map_err(|e| DomainGuardError::Internal(format!("{name} server failed: {e}")))?;
    tracing::info!(role = name, "stopped");
    Ok(())
}

pub async fn run(cfg: GatewayConfig) -> Result<()> {
    let metrics = Arc::new(PipelineMetrics::default());
    let roles = build_roles(&cfg, metrics)?;

    // Bind everything first so a port clash fails before anything serves.
    let mut bound = Vec::with_capacity(roles.len());
    for role in roles {
        let listener = TcpListener::bind(role.listen)
            .await
            .map_err(|e| {
                let msg = format!("{} bind {} failed: {e}", role.name, role.listen);
                DomainGuardError::Internal(msg)
            })?;
        tracing::info!(role = role.name, listen = %role.listen, "listening");
        bound.push((role, listener));
    }

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("shutdown requested"),
            Err(e) => {
                tracing::error!(error = %e, "ctrl-c handler unavailable; running until killed");
                std::future::pending::<()>().await;
            }
        }
        let _ = stop_tx.send(true);
    });

    let servers: Vec<ServeFuture> = bound
        .into_iter()
        .map(|(role, listener)| {
            Box::pin(serve(role.name, listener, role.router, stop_rx.clone())) as ServeFuture
        })
        .collect();

    try_join_all(servers).await?;
    Ok(())
}
