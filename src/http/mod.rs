//! HTTP surface: heartbeat endpoint behind logging and panic recovery.

mod heartbeat;

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router.
pub fn router() -> Router {
    let api_v1 = Router::new().merge(heartbeat::routes());

    Router::new()
        .nest("/api/v1", api_v1)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Serve the router on `0.0.0.0:port` until the process is interrupted.
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let address = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(address).await?;

    info!("📡 HTTP listening on: {}", address);

    axum::serve(listener, router())
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
