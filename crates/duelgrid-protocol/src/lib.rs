//! Wire protocol for duelgrid.
//!
//! This crate defines what travels over a connection:
//!
//! - **Events** ([`ClientEvent`], [`ServerEvent`]): one enum per
//!   direction, one variant per named event.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events become
//!   frames and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! ```text
//! Transport (frames) → Protocol (events) → Room (coordinator)
//! ```
//!
//! Every frame is a JSON object of the form
//! `{"event": "<name>", "data": { ... }}`. Events without a payload omit
//! `data`.

mod codec;
mod error;
mod events;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ClientEvent, RoomId, RoomValidated, ServerEvent};
