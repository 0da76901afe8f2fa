//! Room lifecycle management for duelgrid.
//!
//! Everything that touches shared game state lives here. A single
//! [`SessionCoordinator`] owns the [`RoomRegistry`] and a [`Broadcast`]
//! gateway; in a running server it is driven by one dedicated Tokio task
//! (see [`spawn_coordinator`]) so every read-modify-write of a room runs
//! to completion before the next event is looked at.
//!
//! # Key types
//!
//! - [`Room`]: one game: two seats, a board, a turn
//! - [`RoomRegistry`]: id allocation and storage
//! - [`SessionCoordinator`]: turns client events into room changes and
//!   broadcasts
//! - [`ChannelGateway`]: per-connection queues and broadcast groups
//! - [`CoordinatorHandle`]: talk to the coordinator task

mod actor;
mod config;
mod coordinator;
mod error;
mod gateway;
mod registry;
mod room;

pub use actor::{CoordinatorHandle, spawn_coordinator};
pub use config::{CoordinatorConfig, RoomState};
pub use coordinator::{IgnoreReason, MoveOutcome, SessionCoordinator};
pub use error::RoomError;
pub use gateway::{Broadcast, ChannelGateway, EventSender};
pub use registry::RoomRegistry;
pub use room::{Admission, Participants, Placement, Room};
