//! `DuelgridServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → coordinator.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use duelgrid_protocol::JsonCodec;
use duelgrid_room::{CoordinatorConfig, CoordinatorHandle, spawn_coordinator};
use duelgrid_transport::{Transport, WebSocketTransport};

use crate::DuelgridError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) coordinator: CoordinatorHandle,
    pub(crate) codec: JsonCodec,
    /// Close a connection that has sent nothing for this long.
    pub(crate) idle_timeout: Option<Duration>,
}

/// Builder for configuring and starting a duelgrid server.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use duelgrid::prelude::*;
///
/// # async fn start() -> Result<(), DuelgridError> {
/// let server = DuelgridServer::builder()
///     .bind("127.0.0.1:9000")
///     .coordinator_config(CoordinatorConfig::seeded(42))
///     .idle_timeout(Duration::from_secs(600))
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct DuelgridServerBuilder {
    bind_addr: String,
    coordinator_config: CoordinatorConfig,
    idle_timeout: Option<Duration>,
}

impl DuelgridServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            coordinator_config: CoordinatorConfig::default(),
            idle_timeout: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the coordinator configuration (RNG seed, queue size).
    pub fn coordinator_config(mut self, config: CoordinatorConfig) -> Self {
        self.coordinator_config = config;
        self
    }

    /// Drops connections that stay silent for `timeout`.
    ///
    /// Off by default: a player waiting for an opponent sends nothing,
    /// and rooms are meant to stay open indefinitely.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Binds the listener and starts the coordinator task.
    pub async fn build(self) -> Result<DuelgridServer, DuelgridError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            coordinator: spawn_coordinator(self.coordinator_config),
            codec: JsonCodec,
            idle_timeout: self.idle_timeout,
        });

        Ok(DuelgridServer { transport, state })
    }
}

impl Default for DuelgridServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound duelgrid server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DuelgridServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl DuelgridServer {
    /// Creates a new builder.
    pub fn builder() -> DuelgridServerBuilder {
        DuelgridServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// A handle to the coordinator, for inspecting rooms from outside.
    pub fn coordinator(&self) -> CoordinatorHandle {
        self.state.coordinator.clone()
    }

    /// Runs the accept loop until the process is terminated.
    ///
    /// Each accepted connection gets its own handler task. A failed
    /// upgrade only affects that one peer.
    pub async fn run(mut self) -> Result<(), DuelgridError> {
        tracing::info!("duelgrid server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
    }
}
