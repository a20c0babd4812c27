//! Habitat HTTP server lifecycle management.
//!
//! [`start_server`] binds and serves on the current task; [`spawn_server`]
//! binds first (so bind errors surface immediately) and then serves on a
//! background task, which is what the engine binary and the integration
//! tests use.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Configuration for the habitat server.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,
    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Errors that can occur when starting or running the habitat server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

/// Start the habitat HTTP server on the current task.
///
/// Binds to the configured address, builds the router, and serves
/// requests until the process is terminated.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the TCP listener cannot bind and
/// [`ServerError::Serve`] on a fatal I/O error.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), ServerError> {
    let listener = bind(config).await?;
    serve(listener, state).await
}

/// Bind the listener, then serve on a background task.
///
/// Returns the bound address and the join handle of the serving task.
/// Separating bind from serve means a port conflict is reported here
/// instead of inside the spawned task.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the TCP listener cannot bind.
pub async fn spawn_server(
    config: &ServerConfig,
    state: AppState,
) -> Result<(SocketAddr, JoinHandle<Result<(), ServerError>>), ServerError> {
    let listener = bind(config).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("local_addr failed: {e}")))?;

    let handle = tokio::spawn(serve(listener, state));
    Ok((addr, handle))
}

async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "habitat server listening");
    Ok(listener)
}

async fn serve(listener: TcpListener, state: AppState) -> Result<(), ServerError> {
    let router = build_router(state);
    axum::serve(listener, router)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))
}
