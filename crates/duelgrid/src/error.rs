//! Unified error type for the duelgrid server.

use duelgrid_protocol::ProtocolError;
use duelgrid_room::RoomError;
use duelgrid_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DuelgridError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error, in practice a stopped coordinator.
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use duelgrid_protocol::{ClientEvent, Codec, JsonCodec};

    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "peer gone",
        ));
        let duelgrid_err: DuelgridError = err.into();
        assert!(matches!(
            duelgrid_err,
            DuelgridError::Transport(TransportError::SendFailed(_))
        ));
        assert!(duelgrid_err.to_string().contains("peer gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = JsonCodec
            .decode::<ClientEvent>(b"not json")
            .unwrap_err();
        let duelgrid_err: DuelgridError = err.into();
        assert!(matches!(
            duelgrid_err,
            DuelgridError::Protocol(ProtocolError::Decode(_))
        ));
        assert!(duelgrid_err.to_string().starts_with("decode failed"));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::CoordinatorUnavailable;
        let duelgrid_err: DuelgridError = err.into();
        assert!(matches!(duelgrid_err, DuelgridError::Room(_)));
        assert_eq!(duelgrid_err.to_string(), "coordinator is unavailable");
    }
}
