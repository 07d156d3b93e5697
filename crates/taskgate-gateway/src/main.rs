//! taskgate gateway
//!
//! - Config from `$TASKGATE_CONFIG` (default `taskgate.yaml`), strict parsing
//! - Static bearer-ticket subjects, seeded in-memory task/comment store
//! - Every task/comment action gated by the policy engine
//! - Ctrl-C marks the gateway draining, then shuts down gracefully

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use taskgate_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "taskgate-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> taskgate_core::Result<()> {
    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(&cfg);
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "taskgate-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| taskgate_core::TaskGateError::Internal(format!("bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "ctrl-c handler unavailable");
                std::future::pending::<()>().await;
            }
            state.metrics().set_draining();
            tracing::info!("draining");
        })
        .await
        .map_err(|e| taskgate_core::TaskGateError::Internal(format!("server failed: {e}")))
}
