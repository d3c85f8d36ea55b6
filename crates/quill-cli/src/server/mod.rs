mod error;
mod pages;
mod routes;
mod state;
mod views;

use std::future::Future;

use color_eyre::eyre::Result;
use tokio::net::TcpListener;
use tracing::info;

pub use routes::create_router;
pub use state::AppState;

/// Serve `app` on `listener` until `shutdown` resolves
///
/// In-flight requests are allowed to finish before this returns.
pub async fn run_server(
    listener: TcpListener,
    app: axum::Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("server stopped");
    Ok(())
}
