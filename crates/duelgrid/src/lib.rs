//! # Duelgrid
//!
//! Server-authoritative two-player tic-tac-toe. Clients open a WebSocket,
//! create or join numbered rooms, and play; the server owns every board
//! and decides every outcome.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use duelgrid::prelude::*;
//!
//! # async fn start() -> Result<(), DuelgridError> {
//! let server = DuelgridServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::DuelgridError;
pub use server::{DuelgridServer, DuelgridServerBuilder};

/// Re-exports everything needed to run a server or write a client.
pub mod prelude {
    pub use crate::{DuelgridError, DuelgridServer, DuelgridServerBuilder};
    pub use duelgrid_board::{Board, Cell, Mark, Position};
    pub use duelgrid_protocol::{
        ClientEvent, Codec, JsonCodec, RoomId, RoomValidated, ServerEvent,
    };
    pub use duelgrid_room::{
        CoordinatorConfig, CoordinatorHandle, Room, RoomState,
    };
    pub use duelgrid_transport::ConnectionId;
}
