//! Event types exchanged between clients and the server.
//!
//! Both enums are adjacently tagged: the variant name becomes the
//! `"event"` field (in `snake_case`) and its fields live under `"data"`.

use std::fmt;

use duelgrid_board::{Board, Mark};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// RoomId
// ---------------------------------------------------------------------------

/// Identifier of a live room.
///
/// Serializes as a plain number. Deserializes from a number or a numeric
/// string, since browser clients tend to echo ids back as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl<'de> Deserialize<'de> for RoomId {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        lenient::number(deserializer).map(RoomId)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Client → Server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// "Open a new room with me in the first seat."
    CreateRoom,

    /// "Does room `id` exist? Seat me if there's space."
    ValidateRoom { id: RoomId },

    /// "Put my mark at (`row`, `col`) in `room`."
    ///
    /// Coordinates are not range-checked here; the room ignores moves
    /// that land off the board.
    Play {
        room: RoomId,
        #[serde(deserialize_with = "lenient::index")]
        row: usize,
        #[serde(deserialize_with = "lenient::index")]
        col: usize,
    },

    /// "Stop sending me `room`'s broadcasts." Does not change the room.
    Leave { room: RoomId },
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Payload of [`ServerEvent::RoomValidated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomValidated {
    /// The room is live.
    pub exists: bool,
    /// The request was turned away because both seats are taken.
    pub full: bool,
    /// The room has two players and a game is running.
    pub started: bool,
}

/// Server → Client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Private reply to `create_room`.
    RoomCreated { id: RoomId },

    /// To the room: how many seats are filled.
    CountUpdated { count: usize },

    /// Private reply to `validate_room`.
    RoomValidated(RoomValidated),

    /// To the room: the second player arrived, the game is on.
    Ready,

    /// Private: which mark this connection plays.
    ColorAssign { color: Mark },

    /// To the room: the board and whose turn it is.
    BoardUpdate { board: Board, turn: Mark },

    /// To the room: `winner` completed a line.
    GameWon { winner: Mark },

    /// To the room: the board filled up without a line.
    GameTie,

    /// To the room: a player left, everyone should unsubscribe from `room`.
    LeaveOrder { room: RoomId },
}

impl ServerEvent {
    /// The wire name of this event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoomCreated { .. } => "room_created",
            Self::CountUpdated { .. } => "count_updated",
            Self::RoomValidated(_) => "room_validated",
            Self::Ready => "ready",
            Self::ColorAssign { .. } => "color_assign",
            Self::BoardUpdate { .. } => "board_update",
            Self::GameWon { .. } => "game_won",
            Self::GameTie => "game_tie",
            Self::LeaveOrder { .. } => "leave_order",
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient numbers
// ---------------------------------------------------------------------------

mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    pub(super) fn number<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<u64, D::Error> {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s
                .trim()
                .parse()
                .map_err(|_| {
                    D::Error::custom(format!("expected a number, got {s:?}"))
                }),
        }
    }

    pub(super) fn index<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<usize, D::Error> {
        let n = number(deserializer)?;
        usize::try_from(n).map_err(|_| {
            D::Error::custom(format!("{n} does not fit in usize"))
        })
    }
}
