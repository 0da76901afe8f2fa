//! Coordinator configuration and the room state machine.

use duelgrid_board::Mark;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ---------------------------------------------------------------------------
// CoordinatorConfig
// ---------------------------------------------------------------------------

/// Configuration for the coordinator task.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Seed for turn assignment. `None` seeds from the OS; a fixed seed
    /// makes every coin flip reproducible, which tests rely on.
    pub rng_seed: Option<u64>,

    /// Capacity of the coordinator's command queue. Connection tasks wait
    /// when it is full.
    pub channel_size: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            channel_size: 256,
        }
    }
}

impl CoordinatorConfig {
    /// Default config with a fixed RNG seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
            ..Self::default()
        }
    }

    pub(crate) fn build_rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a live room.
///
/// ```text
/// Waiting ──(second player joins)──→ Active { turn }
///                                       │  ↑
///                                       └──┘ win / tie: board reset, new turn
/// ```
///
/// There is no terminal variant: when a player leaves, the room is removed
/// from the registry outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    /// One seat filled, waiting for an opponent.
    Waiting,
    /// Both seats filled; `turn` may move next.
    Active { turn: Mark },
}

impl RoomState {
    /// Returns `true` once the second player has joined.
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Whose move it is, if a game is running.
    pub fn turn(&self) -> Option<Mark> {
        match self {
            Self::Waiting => None,
            Self::Active { turn } => Some(*turn),
        }
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::Active { turn } => write!(f, "Active({turn} to move)"),
        }
    }
}
