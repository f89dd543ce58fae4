//! Process lifecycle: build state, bind, serve, shut down.
//!
//! Order matters: instruments are registered before the listener binds, so a
//! broken registration never leaves a half-started process accepting traffic.

use std::future::Future;
use std::process::ExitCode;

use tokio::net::TcpListener;

use organism_core::error::{OrganismError, Result};

use crate::app_state::AppState;
use crate::config::{self, LogSection, OrganismConfig};
use crate::logging;
use crate::organs::OrganKind;
use crate::router;

pub async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr).await.map_err(|source| OrganismError::Bind {
        addr: addr.to_string(),
        source,
    })
}

/// Serve until Ctrl-C / SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    serve_with_shutdown(listener, state, shutdown_signal()).await
}

/// Serve until `signal` resolves; in-flight requests are allowed to finish.
pub async fn serve_with_shutdown<F>(listener: TcpListener, state: AppState, signal: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router::build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .await
        .map_err(|e| OrganismError::Internal(format!("server failed: {e}")))
}

/// Register, bind and serve one organ.
pub async fn run(kind: OrganKind, cfg: OrganismConfig) -> Result<()> {
    let state = AppState::for_organ(kind, &cfg)?;
    let listener = bind(&cfg.listen).await?;
    let local = listener
        .local_addr()
        .map_err(|e| OrganismError::Internal(format!("local_addr failed: {e}")))?;

    let organ = state.organ();
    tracing::info!(
        organ = kind.as_str(),
        service = %organ.service_name(),
        addr = %local,
        path = organ.path(),
        "{}",
        kind.greeting()
    );

    serve(listener, state).await?;
    tracing::info!(organ = kind.as_str(), "shut down");
    Ok(())
}

/// Binary entry: config from the environment, logging, then [`run`].
/// Any startup error is logged and turns into a non-zero exit.
pub async fn launch(kind: OrganKind) -> ExitCode {
    let cfg = match config::load_from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            logging::init_tracing(&LogSection::default());
            tracing::error!(error = %e, code = e.code().as_str(), "config load failed");
            return ExitCode::FAILURE;
        }
    };
    logging::init_tracing(&cfg.log);

    match run(kind, cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(
                organ = kind.as_str(),
                error = %e,
                code = e.code().as_str(),
                "failed to start"
            );
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
