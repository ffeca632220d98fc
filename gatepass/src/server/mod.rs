//! HTTP server: state, routing, and lifecycle.

mod health;
mod routes;
mod state;

pub use routes::router;
pub use state::AppState;

use tracing::info;

use crate::config::Config;

/// Bind and serve the API until shutdown is requested.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::in_memory(&config);
    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    // Shutdown on ctrl-c; a failed signal hookup should not keep the
    // server from running.
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to install shutdown handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
