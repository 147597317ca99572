//! HTTP server for icsfeed.
//!
//! Wires the credential registry, upstream client and aggregator behind an
//! axum router, and runs it until a shutdown signal arrives.

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod signals;

use std::future::Future;
use std::sync::Arc;

use icsfeed_providers::{Aggregator, CredentialRegistry, FeedClient};
use tokio::net::TcpListener;
use tracing::info;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use routes::{AppState, router};
pub use signals::SignalHandler;

/// Builds handler state from a configuration and a credential registry.
pub fn build_state(config: &ServerConfig, registry: CredentialRegistry) -> ServerResult<AppState> {
    let client = FeedClient::new(config.upstream_config()?)?;
    let aggregator = Aggregator::new(Arc::new(registry), Arc::new(client));
    Ok(AppState::new(aggregator))
}

/// Serves the router on `listener` until `shutdown` completes.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> ServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "listening");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("server stopped");
    Ok(())
}
