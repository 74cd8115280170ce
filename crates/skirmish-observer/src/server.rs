//! Observer HTTP server lifecycle management.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Configuration for the Observer server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8000,
        }
    }
}

/// Errors that can occur when starting or running the Observer server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

/// Bind the listener and spawn the serving task.
///
/// Returns the join handle of the serving task; the server runs until
/// the process exits.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address is invalid or the TCP
/// listener cannot bind.
pub async fn spawn_server(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<Result<(), ServerError>>, ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    let router = build_router(state);
    info!(%addr, "Observer server listening");

    Ok(tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Serve(format!("serve error: {e}")))
    }))
}
