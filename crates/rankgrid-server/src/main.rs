mod api;
mod middleware;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_geocode_rate_limit, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = rankgrid_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let state = AppState::from_config(&config)?;
    if !state.search.is_configured() {
        tracing::warn!("SERPER_API_KEY not set; search routes will answer with a configuration error");
    }
    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        batch_size = state.settings.batch_size,
        max_pages = state.settings.tracker.max_pages,
        "starting rankgrid-server"
    );

    let app = build_app(state, default_geocode_rate_limit());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
