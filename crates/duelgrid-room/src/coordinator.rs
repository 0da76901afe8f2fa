//! Session coordinator: the per-event handlers behind every room change.
//!
//! Each handler follows the same shape: load the addressed room from the
//! registry, check it against the rules, mutate the copy, write it back,
//! then tell the participants through the gateway. Handlers never await,
//! so as long as one task owns the coordinator, each one is atomic with
//! respect to the others.

use duelgrid_board::{Mark, Outcome, Position};
use duelgrid_protocol::{ClientEvent, RoomId, RoomValidated, ServerEvent};
use duelgrid_transport::ConnectionId;
use rand::Rng;
use rand::rngs::StdRng;

use crate::{
    Admission, Broadcast, ChannelGateway, CoordinatorConfig, Room, RoomError,
    RoomRegistry,
};

/// Why a `play` request was dropped.
///
/// None of these are reported to the client. A stale or confused client
/// sending them is normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No room with that id.
    RoomMissing,
    /// The room is still waiting for its second player.
    NotStarted,
    /// The sender is not subscribed to the room's broadcasts.
    NotSubscribed,
    /// The sender holds no seat in the room.
    NotSeated,
    /// It is the other mark's turn.
    NotYourTurn,
    /// The target cell is already marked.
    CellOccupied,
    /// Row or column outside `0..=2`.
    OffBoard,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::RoomMissing => "room does not exist",
            Self::NotStarted => "game has not started",
            Self::NotSubscribed => "sender is not subscribed to the room",
            Self::NotSeated => "sender has no seat",
            Self::NotYourTurn => "not the sender's turn",
            Self::CellOccupied => "cell is occupied",
            Self::OffBoard => "position is off the board",
        };
        f.write_str(reason)
    }
}

/// What [`SessionCoordinator::attempt_move`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Dropped without any state change or broadcast.
    Ignored(IgnoreReason),
    /// Mark placed, game continues.
    Placed { mark: Mark },
    /// Mark placed and it completed a line. The board has been reset.
    Won { winner: Mark },
    /// Mark placed and the board filled up. The board has been reset.
    Tied,
}

/// Owns the room registry and drives every room through its lifecycle.
pub struct SessionCoordinator<B: Broadcast = ChannelGateway> {
    registry: RoomRegistry,
    gateway: B,
    rng: StdRng,
}

impl<B: Broadcast> SessionCoordinator<B> {
    /// Creates a coordinator with an empty registry.
    pub fn new(gateway: B, config: &CoordinatorConfig) -> Self {
        Self {
            registry: RoomRegistry::new(),
            gateway,
            rng: config.build_rng(),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub fn gateway(&self) -> &B {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut B {
        &mut self.gateway
    }

    /// Routes one inbound event to its handler.
    pub fn handle(&mut self, conn: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::CreateRoom => {
                self.create_room(conn);
            }
            ClientEvent::ValidateRoom { id } => {
                self.validate_and_join(conn, id);
            }
            ClientEvent::Play { room, row, col } => {
                self.attempt_move(conn, room, row, col);
            }
            ClientEvent::Leave { room } => self.leave(conn, room),
        }
    }

    /// Opens a new room with `conn` in the first seat.
    ///
    /// Always succeeds. If `conn` was seated elsewhere, that room is torn
    /// down first so a connection never holds two seats.
    pub fn create_room(&mut self, conn: ConnectionId) -> RoomId {
        self.vacate(conn);

        let room = self.registry.create(conn);
        let room_id = room.id();

        self.gateway.send_to(conn, ServerEvent::RoomCreated { id: room_id });
        self.gateway.join_group(conn, room_id);
        self.gateway.send_to_group(
            room_id,
            ServerEvent::CountUpdated {
                count: room.participants().len(),
            },
        );

        tracing::info!(%room_id, %conn, "room created");
        room_id
    }

    /// Answers "does this room exist?" and seats `conn` if there is space.
    ///
    /// The reply is always sent to `conn` last, after any join broadcasts,
    /// and is also returned.
    pub fn validate_and_join(
        &mut self,
        conn: ConnectionId,
        room_id: RoomId,
    ) -> RoomValidated {
        let reply = match self.join(conn, room_id) {
            Ok(room) => RoomValidated {
                exists: true,
                full: false,
                started: room.is_started(),
            },
            Err(RoomError::RoomFull(_)) => RoomValidated {
                exists: true,
                full: true,
                started: self
                    .registry
                    .get(room_id)
                    .is_some_and(|r| r.is_started()),
            },
            Err(e) => {
                tracing::debug!(
                    %room_id,
                    %conn,
                    error = %e,
                    "validation found no room"
                );
                RoomValidated::default()
            }
        };

        self.gateway.send_to(conn, ServerEvent::RoomValidated(reply));
        reply
    }

    fn join(
        &mut self,
        conn: ConnectionId,
        room_id: RoomId,
    ) -> Result<Room, RoomError> {
        let mut room = self.load(room_id)?;
        if room.participants().contains(conn) {
            return Ok(room);
        }
        if room.participants().is_full() {
            return Err(RoomError::RoomFull(room_id));
        }

        // Joining here means leaving wherever `conn` sat before. `room`
        // does not seat `conn`, so the copy we hold is unaffected.
        self.vacate(conn);

        let Admission::Seated { count } = room.admit(conn)? else {
            return Ok(room);
        };
        self.registry.put(room);
        self.gateway.join_group(conn, room_id);
        self.gateway
            .send_to_group(room_id, ServerEvent::CountUpdated { count });
        tracing::info!(%room_id, %conn, players = count, "player joined");

        if room.participants().is_full() {
            let turn = self.coin_flip();
            room.start(turn);
            self.registry.put(room);
            tracing::info!(%room_id, %turn, "game started");

            self.gateway.send_to_group(room_id, ServerEvent::Ready);
            for (mark, holder) in room.participants().iter() {
                self.gateway
                    .send_to(holder, ServerEvent::ColorAssign { color: mark });
            }
            self.gateway.send_to_group(
                room_id,
                ServerEvent::BoardUpdate {
                    board: *room.board(),
                    turn,
                },
            );
        }

        Ok(room)
    }

    /// Applies a move if it is legal; otherwise does nothing at all.
    ///
    /// A move that ends the game is followed by `game_won` or `game_tie`
    /// and then a fresh board, so the same two players can go again.
    pub fn attempt_move(
        &mut self,
        conn: ConnectionId,
        room_id: RoomId,
        row: usize,
        col: usize,
    ) -> MoveOutcome {
        match self.try_move(conn, room_id, row, col) {
            Ok(outcome) => outcome,
            Err(reason) => {
                tracing::debug!(
                    %room_id,
                    %conn,
                    row,
                    col,
                    %reason,
                    "move ignored"
                );
                MoveOutcome::Ignored(reason)
            }
        }
    }

    fn try_move(
        &mut self,
        conn: ConnectionId,
        room_id: RoomId,
        row: usize,
        col: usize,
    ) -> Result<MoveOutcome, IgnoreReason> {
        let mut room = self
            .load(room_id)
            .map_err(|_| IgnoreReason::RoomMissing)?;
        if !room.is_started() {
            return Err(IgnoreReason::NotStarted);
        }
        if !self.gateway.in_group(conn, room_id) {
            return Err(IgnoreReason::NotSubscribed);
        }
        let pos = Position::new(row, col).map_err(|_| IgnoreReason::OffBoard)?;
        let placement = room.play(conn, pos)?;

        self.registry.put(room);
        self.gateway.send_to_group(
            room_id,
            ServerEvent::BoardUpdate {
                board: *room.board(),
                turn: placement.next_turn,
            },
        );

        let Some(outcome) = placement.outcome else {
            return Ok(MoveOutcome::Placed {
                mark: placement.mark,
            });
        };

        let result = match outcome {
            Outcome::Won(winner) => {
                tracing::info!(%room_id, %winner, "game won");
                self.gateway
                    .send_to_group(room_id, ServerEvent::GameWon { winner });
                MoveOutcome::Won { winner }
            }
            Outcome::Tie => {
                tracing::info!(%room_id, "game tied");
                self.gateway.send_to_group(room_id, ServerEvent::GameTie);
                MoveOutcome::Tied
            }
        };

        let turn = self.coin_flip();
        room.reset(turn);
        self.registry.put(room);
        self.gateway.send_to_group(
            room_id,
            ServerEvent::BoardUpdate {
                board: *room.board(),
                turn,
            },
        );

        Ok(result)
    }

    /// Unsubscribes `conn` from `room_id`'s broadcasts. Seats are untouched.
    ///
    /// After a `leave_order` the group is already gone, so the client's
    /// follow-up `leave` is a no-op.
    pub fn leave(&mut self, conn: ConnectionId, room_id: RoomId) {
        self.gateway.leave_group(conn, room_id);
        tracing::debug!(%room_id, %conn, "left broadcast group");
    }

    /// Tears down every room that seats `conn`. Returns their ids.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Vec<RoomId> {
        let removed = self.vacate(conn);
        tracing::info!(%conn, rooms = removed.len(), "connection gone");
        removed
    }

    fn vacate(&mut self, conn: ConnectionId) -> Vec<RoomId> {
        let rooms = self.registry.rooms_containing(conn);
        for &room_id in &rooms {
            self.gateway.leave_group(conn, room_id);
            self.gateway.send_to_group(
                room_id,
                ServerEvent::LeaveOrder { room: room_id },
            );
            self.gateway.drop_group(room_id);
            self.registry.remove(room_id);
            tracing::info!(%room_id, %conn, "room deleted");
        }
        rooms
    }

    fn load(&self, room_id: RoomId) -> Result<Room, RoomError> {
        self.registry
            .get(room_id)
            .ok_or(RoomError::NotFound(room_id))
    }

    fn coin_flip(&mut self) -> Mark {
        random_mark(&mut self.rng)
    }
}

/// Picks either mark with equal probability.
pub(crate) fn random_mark(rng: &mut impl Rng) -> Mark {
    if rng.random_bool(0.5) {
        Mark::Red
    } else {
        Mark::Green
    }
}
