//! The room data model: seats, board, turn.

use duelgrid_board::{Board, Mark, Outcome, Position, evaluate_outcome};
use duelgrid_protocol::RoomId;
use duelgrid_transport::ConnectionId;

use crate::{IgnoreReason, RoomError, RoomState};

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

/// The two seats of a room, in join order.
///
/// The first seat always plays [`Mark::Red`] and the second
/// [`Mark::Green`]. Seats are never vacated individually: a departure
/// destroys the whole room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participants {
    first: ConnectionId,
    second: Option<ConnectionId>,
}

impl Participants {
    fn new(first: ConnectionId) -> Self {
        Self {
            first,
            second: None,
        }
    }

    /// Number of filled seats (1 or 2).
    pub fn len(&self) -> usize {
        if self.second.is_some() { 2 } else { 1 }
    }

    /// Always `false`: a room is created with its first seat filled.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` when both seats are taken.
    pub fn is_full(&self) -> bool {
        self.second.is_some()
    }

    /// Returns `true` if `conn` holds either seat.
    pub fn contains(&self, conn: ConnectionId) -> bool {
        self.mark_of(conn).is_some()
    }

    /// The mark played by `conn`, if seated.
    pub fn mark_of(&self, conn: ConnectionId) -> Option<Mark> {
        if self.first == conn {
            Some(Mark::Red)
        } else if self.second == Some(conn) {
            Some(Mark::Green)
        } else {
            None
        }
    }

    /// The connection playing `mark`, if that seat is filled.
    pub fn holder(&self, mark: Mark) -> Option<ConnectionId> {
        match mark {
            Mark::Red => Some(self.first),
            Mark::Green => self.second,
        }
    }

    /// Filled seats with their marks, in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (Mark, ConnectionId)> + '_ {
        Mark::ALL
            .into_iter()
            .filter_map(|mark| self.holder(mark).map(|conn| (mark, conn)))
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// Result of offering a seat to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The connection already holds a seat here; nothing changed.
    AlreadySeated,
    /// The connection took a seat; `count` seats are now filled.
    Seated { count: usize },
}

/// An accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// The mark that was placed.
    pub mark: Mark,
    /// Whose move it is now.
    pub next_turn: Mark,
    /// Set when the move ended the game.
    pub outcome: Option<Outcome>,
}

/// One game's isolated state.
///
/// `Room` is a plain value: the coordinator reads a copy out of the
/// registry, changes it, and writes it back. Mutators check everything
/// before touching a field, so a rejected call leaves the room as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    participants: Participants,
    state: RoomState,
    board: Board,
}

impl Room {
    /// A new room with `creator` in the first seat and an empty board.
    pub fn new(id: RoomId, creator: ConnectionId) -> Self {
        Self {
            id,
            participants: Participants::new(creator),
            state: RoomState::Waiting,
            board: Board::new(),
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn participants(&self) -> &Participants {
        &self.participants
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns `true` once both players are seated.
    pub fn is_started(&self) -> bool {
        self.state.is_started()
    }

    /// Whose move it is, once started.
    pub fn turn(&self) -> Option<Mark> {
        self.state.turn()
    }

    /// Offers the second seat to `conn`.
    ///
    /// # Errors
    /// [`RoomError::RoomFull`] if both seats belong to other connections.
    pub(crate) fn admit(
        &mut self,
        conn: ConnectionId,
    ) -> Result<Admission, RoomError> {
        if self.participants.contains(conn) {
            return Ok(Admission::AlreadySeated);
        }
        if self.participants.is_full() {
            return Err(RoomError::RoomFull(self.id));
        }
        self.participants.second = Some(conn);
        Ok(Admission::Seated {
            count: self.participants.len(),
        })
    }

    /// Starts the game with `turn` to move. Only valid with both seats filled.
    pub(crate) fn start(&mut self, turn: Mark) {
        debug_assert!(self.participants.is_full(), "start with an empty seat");
        self.state = RoomState::Active { turn };
    }

    /// Places `conn`'s mark at `pos` and hands the turn over.
    ///
    /// # Errors
    /// The [`IgnoreReason`] for a move that must be dropped. The room is
    /// unchanged in that case.
    pub(crate) fn play(
        &mut self,
        conn: ConnectionId,
        pos: Position,
    ) -> Result<Placement, IgnoreReason> {
        let RoomState::Active { turn } = self.state else {
            return Err(IgnoreReason::NotStarted);
        };
        let mark = self
            .participants
            .mark_of(conn)
            .ok_or(IgnoreReason::NotSeated)?;
        if mark != turn {
            return Err(IgnoreReason::NotYourTurn);
        }
        if !self.board.is_vacant(pos) {
            return Err(IgnoreReason::CellOccupied);
        }

        self.board = self.board.apply_move(pos, mark);
        let outcome = evaluate_outcome(&self.board, mark);
        let next_turn = mark.other();
        self.state = RoomState::Active { turn: next_turn };

        Ok(Placement {
            mark,
            next_turn,
            outcome,
        })
    }

    /// Clears the board for a rematch. Seats and id are kept.
    pub(crate) fn reset(&mut self, turn: Mark) {
        self.board = Board::new();
        self.state = RoomState::Active { turn };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(n: u64) -> ConnectionId {
        ConnectionId::new(n)
    }

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn started_room(turn: Mark) -> Room {
        let mut room = Room::new(RoomId(0), conn(1));
        room.admit(conn(2)).unwrap();
        room.start(turn);
        room
    }

    #[test]
    fn test_new_room_has_creator_as_red() {
        let room = Room::new(RoomId(5), conn(1));
        assert_eq!(room.participants().len(), 1);
        assert_eq!(room.participants().mark_of(conn(1)), Some(Mark::Red));
        assert!(!room.is_started());
        assert!(room.board().is_empty());
    }

    #[test]
    fn test_admit_second_seat_is_green() {
        let mut room = Room::new(RoomId(0), conn(1));
        assert_eq!(
            room.admit(conn(2)).unwrap(),
            Admission::Seated { count: 2 }
        );
        assert_eq!(room.participants().mark_of(conn(2)), Some(Mark::Green));
        assert_eq!(room.participants().holder(Mark::Green), Some(conn(2)));
        assert!(!room.is_started(), "admit alone does not start the game");
    }

    #[test]
    fn test_admit_is_idempotent_for_seated() {
        let mut room = Room::new(RoomId(0), conn(1));
        assert_eq!(room.admit(conn(1)).unwrap(), Admission::AlreadySeated);
        assert_eq!(room.participants().len(), 1);
    }

    #[test]
    fn test_admit_third_is_full() {
        let mut room = Room::new(RoomId(0), conn(1));
        room.admit(conn(2)).unwrap();
        let before = room;
        assert!(matches!(
            room.admit(conn(3)),
            Err(RoomError::RoomFull(RoomId(0)))
        ));
        assert_eq!(room, before);
    }

    #[test]
    fn test_participants_iter_in_seat_order() {
        let mut room = Room::new(RoomId(0), conn(8));
        room.admit(conn(3)).unwrap();
        let seats: Vec<_> = room.participants().iter().collect();
        assert_eq!(seats, vec![(Mark::Red, conn(8)), (Mark::Green, conn(3))]);
    }

    #[test]
    fn test_play_flips_turn() {
        let mut room = started_room(Mark::Green);
        let placement = room.play(conn(2), pos(1, 1)).unwrap();
        assert_eq!(placement.mark, Mark::Green);
        assert_eq!(placement.next_turn, Mark::Red);
        assert_eq!(placement.outcome, None);
        assert_eq!(room.turn(), Some(Mark::Red));
        assert_eq!(room.board().get(pos(1, 1)), Some(Mark::Green));
    }

    #[test]
    fn test_rejected_moves_leave_room_untouched() {
        let mut room = started_room(Mark::Red);
        room.play(conn(1), pos(0, 0)).unwrap();
        let snapshot = room;

        // Red again: not red's turn.
        assert_eq!(
            room.play(conn(1), pos(2, 2)),
            Err(IgnoreReason::NotYourTurn)
        );
        // Green onto red's cell.
        assert_eq!(
            room.play(conn(2), pos(0, 0)),
            Err(IgnoreReason::CellOccupied)
        );
        // A stranger.
        assert_eq!(room.play(conn(9), pos(2, 2)), Err(IgnoreReason::NotSeated));

        assert_eq!(room, snapshot);
    }

    #[test]
    fn test_play_before_start_is_ignored() {
        let mut room = Room::new(RoomId(0), conn(1));
        assert_eq!(
            room.play(conn(1), pos(0, 0)),
            Err(IgnoreReason::NotStarted)
        );
    }

    #[test]
    fn test_winning_move_reports_outcome_and_still_flips() {
        let mut room = started_room(Mark::Red);
        room.play(conn(1), pos(0, 0)).unwrap();
        room.play(conn(2), pos(1, 0)).unwrap();
        room.play(conn(1), pos(0, 1)).unwrap();
        room.play(conn(2), pos(1, 1)).unwrap();
        let placement = room.play(conn(1), pos(0, 2)).unwrap();
        assert_eq!(placement.outcome, Some(Outcome::Won(Mark::Red)));
        assert_eq!(room.turn(), Some(Mark::Green));
    }

    #[test]
    fn test_reset_keeps_seats_and_id() {
        let mut room = started_room(Mark::Red);
        room.play(conn(1), pos(0, 0)).unwrap();
        room.reset(Mark::Green);

        assert!(room.board().is_empty());
        assert_eq!(room.id(), RoomId(0));
        assert_eq!(room.turn(), Some(Mark::Green));
        assert_eq!(room.participants().holder(Mark::Red), Some(conn(1)));
        assert_eq!(room.participants().holder(Mark::Green), Some(conn(2)));
    }
}
