//! Error types for the room layer.

use duelgrid_protocol::RoomId;

/// Errors that can occur during room operations.
///
/// Invalid moves are deliberately not in here: they are expected from
/// stale clients and are reported as
/// [`MoveOutcome::Ignored`](crate::MoveOutcome::Ignored) instead.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Both seats are taken.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The coordinator task has stopped or its command queue is closed.
    #[error("coordinator is unavailable")]
    CoordinatorUnavailable,
}
