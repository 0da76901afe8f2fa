//! Coordinator actor: the single Tokio task that owns every room.
//!
//! Connection tasks never touch rooms directly. They send a
//! [`CoordinatorCommand`] through a [`CoordinatorHandle`] and the actor
//! applies commands one at a time, in arrival order.

use duelgrid_protocol::{ClientEvent, RoomId};
use duelgrid_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::{
    ChannelGateway, CoordinatorConfig, EventSender, Room, RoomError,
    SessionCoordinator,
};

/// Commands sent to the coordinator actor through its channel.
pub(crate) enum CoordinatorCommand {
    /// Start delivering events for a new connection.
    Connect {
        conn: ConnectionId,
        sender: EventSender,
    },

    /// An inbound client event.
    Event {
        conn: ConnectionId,
        event: ClientEvent,
    },

    /// The connection is gone: tear down its rooms and forget it.
    Disconnect { conn: ConnectionId },

    /// Snapshot of one room.
    RoomSnapshot {
        id: RoomId,
        reply: oneshot::Sender<Option<Room>>,
    },

    /// Number of live rooms.
    RoomCount { reply: oneshot::Sender<usize> },

    /// Stop the actor.
    Shutdown,
}

/// Handle to the running coordinator. Cheap to clone.
#[derive(Clone)]
pub struct CoordinatorHandle {
    sender: mpsc::Sender<CoordinatorCommand>,
}

impl CoordinatorHandle {
    /// Registers `conn` so events addressed to it land in `sender`.
    pub async fn connect(
        &self,
        conn: ConnectionId,
        sender: EventSender,
    ) -> Result<(), RoomError> {
        self.send(CoordinatorCommand::Connect { conn, sender }).await
    }

    /// Hands an inbound event to the coordinator (fire-and-forget).
    pub async fn dispatch(
        &self,
        conn: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), RoomError> {
        self.send(CoordinatorCommand::Event { conn, event }).await
    }

    /// Reports that `conn` has closed.
    pub async fn disconnect(
        &self,
        conn: ConnectionId,
    ) -> Result<(), RoomError> {
        self.send(CoordinatorCommand::Disconnect { conn }).await
    }

    /// Returns a copy of the room, or `None` if it does not exist.
    ///
    /// The answer reflects every command sent before this one.
    pub async fn room(&self, id: RoomId) -> Result<Option<Room>, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(CoordinatorCommand::RoomSnapshot { id, reply }).await?;
        rx.await.map_err(|_| RoomError::CoordinatorUnavailable)
    }

    /// Number of live rooms.
    pub async fn room_count(&self) -> Result<usize, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(CoordinatorCommand::RoomCount { reply }).await?;
        rx.await.map_err(|_| RoomError::CoordinatorUnavailable)
    }

    /// Tells the actor to stop. Commands queued behind this are dropped.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(CoordinatorCommand::Shutdown).await
    }

    async fn send(&self, cmd: CoordinatorCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::CoordinatorUnavailable)
    }
}

struct CoordinatorActor {
    coordinator: SessionCoordinator<ChannelGateway>,
    receiver: mpsc::Receiver<CoordinatorCommand>,
}

impl CoordinatorActor {
    async fn run(mut self) {
        tracing::info!("coordinator started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                CoordinatorCommand::Connect { conn, sender } => {
                    self.coordinator.gateway_mut().register(conn, sender);
                    tracing::debug!(%conn, "connection registered");
                }
                CoordinatorCommand::Event { conn, event } => {
                    self.coordinator.handle(conn, event);
                }
                CoordinatorCommand::Disconnect { conn } => {
                    self.coordinator.disconnect(conn);
                    self.coordinator.gateway_mut().unregister(conn);
                }
                CoordinatorCommand::RoomSnapshot { id, reply } => {
                    let _ = reply.send(self.coordinator.registry().get(id));
                }
                CoordinatorCommand::RoomCount { reply } => {
                    let _ = reply.send(self.coordinator.registry().len());
                }
                CoordinatorCommand::Shutdown => {
                    tracing::info!(
                        rooms = self.coordinator.registry().len(),
                        "coordinator shutting down"
                    );
                    break;
                }
            }
        }

        tracing::info!("coordinator stopped");
    }
}

/// Spawns the coordinator task and returns a handle to it.
///
/// The task ends on [`CoordinatorHandle::shutdown`] or once every handle
/// has been dropped.
pub fn spawn_coordinator(config: CoordinatorConfig) -> CoordinatorHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    let actor = CoordinatorActor {
        coordinator: SessionCoordinator::new(ChannelGateway::new(), &config),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    CoordinatorHandle { sender: tx }
}
