//! Broadcast gateway: per-connection delivery and room-scoped groups.

use std::collections::{BTreeSet, HashMap};

use duelgrid_protocol::{RoomId, ServerEvent};
use duelgrid_transport::ConnectionId;
use tokio::sync::mpsc;

/// Channel sender for delivering outbound events to one connection.
///
/// The receiving end belongs to that connection's writer task.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// What the coordinator needs from the transport side: named groups keyed
/// by room id, and two ways to send.
///
/// Group membership is independent of room seats. A seated player who
/// sent `leave` stops receiving the room's events and can no longer move.
pub trait Broadcast {
    /// Subscribes `conn` to `room`'s broadcasts.
    fn join_group(&mut self, conn: ConnectionId, room: RoomId);

    /// Unsubscribes `conn` from `room`'s broadcasts.
    fn leave_group(&mut self, conn: ConnectionId, room: RoomId);

    /// Unsubscribes everyone from `room`. Used when the room is deleted.
    fn drop_group(&mut self, room: RoomId);

    /// Returns `true` if `conn` is subscribed to `room`.
    fn in_group(&self, conn: ConnectionId, room: RoomId) -> bool;

    /// Sends `event` to one connection.
    fn send_to(&self, conn: ConnectionId, event: ServerEvent);

    /// Sends `event` to every subscriber of `room`.
    fn send_to_group(&self, room: RoomId, event: ServerEvent);
}

/// [`Broadcast`] over unbounded mpsc queues.
///
/// Sends never block the coordinator. A queue whose receiver is gone
/// (the connection already closed) silently drops the event.
#[derive(Debug, Default)]
pub struct ChannelGateway {
    senders: HashMap<ConnectionId, EventSender>,
    groups: HashMap<RoomId, BTreeSet<ConnectionId>>,
}

impl ChannelGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts delivering events for `conn` into `sender`.
    pub fn register(&mut self, conn: ConnectionId, sender: EventSender) {
        self.senders.insert(conn, sender);
    }

    /// Forgets `conn` and drops it from every group.
    pub fn unregister(&mut self, conn: ConnectionId) {
        self.senders.remove(&conn);
        self.groups.retain(|_, members| {
            members.remove(&conn);
            !members.is_empty()
        });
    }

    /// Subscribers of `room`, ascending by connection id.
    pub fn group_members(&self, room: RoomId) -> Vec<ConnectionId> {
        self.groups
            .get(&room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.senders.len()
    }
}

impl Broadcast for ChannelGateway {
    fn join_group(&mut self, conn: ConnectionId, room: RoomId) {
        self.groups.entry(room).or_default().insert(conn);
    }

    fn leave_group(&mut self, conn: ConnectionId, room: RoomId) {
        if let Some(members) = self.groups.get_mut(&room) {
            members.remove(&conn);
            if members.is_empty() {
                self.groups.remove(&room);
            }
        }
    }

    fn drop_group(&mut self, room: RoomId) {
        self.groups.remove(&room);
    }

    fn in_group(&self, conn: ConnectionId, room: RoomId) -> bool {
        self.groups
            .get(&room)
            .is_some_and(|members| members.contains(&conn))
    }

    fn send_to(&self, conn: ConnectionId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&conn) {
            tracing::trace!(%conn, event = event.name(), "send");
            let _ = sender.send(event);
        }
    }

    fn send_to_group(&self, room: RoomId, event: ServerEvent) {
        let Some(members) = self.groups.get(&room) else {
            return;
        };
        tracing::trace!(
            %room,
            event = event.name(),
            members = members.len(),
            "broadcast"
        );
        for conn in members {
            if let Some(sender) = self.senders.get(conn) {
                let _ = sender.send(event.clone());
            }
        }
    }
}
