//! domainguard gateway binary.
//!
//! Runs whichever roles the config enables (auth, enforcer, policy_service,
//! reference_monitor) in one process; each role gets its own listener.
//! Config path: `$DOMAINGUARD_CONFIG`, else `domainguard.yaml`.

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use domainguard_gateway::{config, server};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let path = std::env::var(config::CONFIG_ENV)
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(path = %path, error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(path = %path, "domainguard starting");
    match server::run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "domainguard stopped with error");
            ExitCode::FAILURE
        }
    }
}
