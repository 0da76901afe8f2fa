//! Per-connection handler.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register an outbound queue with the coordinator
//!   2. Spawn a writer task draining that queue onto the socket
//!   3. Loop: receive frames → decode → forward to the coordinator
//!   4. On exit, for whatever reason, report the disconnect

use std::sync::Arc;

use duelgrid_protocol::{ClientEvent, Codec, ServerEvent};
use duelgrid_room::CoordinatorHandle;
use duelgrid_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::DuelgridError;
use crate::server::ServerState;

/// Drop guard that reports the disconnect when the handler exits.
///
/// Runs even if the handler panics. `Drop` is synchronous, so the async
/// send goes out on a fire-and-forget task.
struct ConnectionGuard {
    conn_id: ConnectionId,
    coordinator: CoordinatorHandle,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let coordinator = self.coordinator.clone();
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        runtime.spawn(async move {
            if let Err(e) = coordinator.disconnect(conn_id).await {
                tracing::debug!(
                    %conn_id,
                    error = %e,
                    "disconnect not delivered"
                );
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), DuelgridError> {
    let conn_id = conn.id();
    let conn = Arc::new(conn);
    tracing::info!(%conn_id, "client connected");

    let (tx, rx) = mpsc::unbounded_channel();
    state.coordinator.connect(conn_id, tx).await?;
    let _guard = ConnectionGuard {
        conn_id,
        coordinator: state.coordinator.clone(),
    };

    let writer = tokio::spawn(write_events(
        Arc::clone(&conn),
        Arc::clone(&state),
        rx,
    ));

    let result = read_events(&conn, &state).await;

    writer.abort();
    if let Err(e) = conn.close().await {
        tracing::debug!(%conn_id, error = %e, "close failed");
    }
    tracing::info!(%conn_id, "client disconnected");

    // _guard drops here → coordinator tears down this connection's rooms.
    result
}

/// Decodes inbound frames and forwards them until the peer goes away.
async fn read_events(
    conn: &WebSocketConnection,
    state: &ServerState,
) -> Result<(), DuelgridError> {
    let conn_id = conn.id();

    loop {
        let received = match state.idle_timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, conn.recv()).await {
                    Ok(received) => received,
                    Err(_) => {
                        tracing::info!(%conn_id, "connection idle, closing");
                        return Ok(());
                    }
                }
            }
            None => conn.recv().await,
        };

        let data = match received {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                return Ok(());
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode event");
                continue;
            }
        };

        state.coordinator.dispatch(conn_id, event).await?;
    }
}

/// Encodes queued events onto the socket, in queue order.
///
/// Ends when the coordinator drops the queue or the socket refuses a write.
async fn write_events(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState>,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
) {
    let conn_id = conn.id();

    while let Some(event) = rx.recv().await {
        let bytes = match state.codec.encode(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    %conn_id,
                    event = event.name(),
                    error = %e,
                    "failed to encode event"
                );
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(
                %conn_id,
                error = %e,
                "send failed, stopping writer"
            );
            break;
        }
    }
}
