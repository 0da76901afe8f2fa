//! Room registry: id allocation and storage.

use std::collections::BTreeMap;

use duelgrid_protocol::RoomId;
use duelgrid_transport::ConnectionId;

use crate::Room;

/// In-memory map from room id to [`Room`].
///
/// The registry has no locking of its own. It is owned by exactly one
/// [`SessionCoordinator`](crate::SessionCoordinator), which in turn runs
/// on a single task, so `get` → mutate → `put` is never interleaved with
/// another handler.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: BTreeMap<RoomId, Room>,
    /// Next id to hand out. Only ever incremented.
    next_id: u64,
}

impl RoomRegistry {
    /// Creates an empty registry whose first room will be `R-0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next id and stores a fresh room with `creator` seated.
    pub fn create(&mut self, creator: ConnectionId) -> Room {
        let id = RoomId(self.next_id);
        self.next_id += 1;
        let room = Room::new(id, creator);
        self.rooms.insert(id, room);
        room
    }

    /// Returns a copy of the room, if it exists.
    pub fn get(&self, id: RoomId) -> Option<Room> {
        self.rooms.get(&id).copied()
    }

    /// Stores `room` under its own id, replacing the previous value.
    pub fn put(&mut self, room: Room) {
        self.rooms.insert(room.id(), room);
    }

    /// Deletes a room, returning it if it existed.
    pub fn remove(&mut self, id: RoomId) -> Option<Room> {
        self.rooms.remove(&id)
    }

    /// Ids of every room that seats `conn`.
    ///
    /// Scans the whole map rather than stopping at the first hit, so a
    /// connection found in several rooms is cleaned out of all of them.
    pub fn rooms_containing(&self, conn: ConnectionId) -> Vec<RoomId> {
        self.rooms
            .values()
            .filter(|room| room.participants().contains(conn))
            .map(Room::id)
            .collect()
    }

    /// Returns `true` if the room is live.
    pub fn contains(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Live room ids, ascending.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(n: u64) -> ConnectionId {
        ConnectionId::new(n)
    }

    #[test]
    fn test_ids_start_at_zero_and_increase() {
        let mut registry = RoomRegistry::new();
        assert_eq!(registry.create(conn(1)).id(), RoomId(0));
        assert_eq!(registry.create(conn(2)).id(), RoomId(1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_ids_are_not_reused_after_remove() {
        let mut registry = RoomRegistry::new();
        let first = registry.create(conn(1)).id();
        registry.remove(first);
        assert_eq!(registry.create(conn(1)).id(), RoomId(1));
        assert!(!registry.contains(first));
    }

    #[test]
    fn test_get_returns_copy_until_put() {
        let mut registry = RoomRegistry::new();
        let id = registry.create(conn(1)).id();

        let mut room = registry.get(id).unwrap();
        room.admit(conn(2)).unwrap();
        assert_eq!(registry.get(id).unwrap().participants().len(), 1);

        registry.put(room);
        assert_eq!(registry.get(id).unwrap().participants().len(), 2);
    }

    #[test]
    fn test_get_missing_is_none() {
        let registry = RoomRegistry::new();
        assert!(registry.get(RoomId(3)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_rooms_containing_scans_everything() {
        let mut registry = RoomRegistry::new();
        let a = registry.create(conn(1)).id();
        let _b = registry.create(conn(2)).id();
        // Force the same connection into a second room to check the scan
        // does not stop at the first match.
        let mut c = registry.create(conn(3));
        c.admit(conn(1)).unwrap();
        registry.put(c);

        assert_eq!(registry.rooms_containing(conn(1)), vec![a, c.id()]);
        assert_eq!(registry.rooms_containing(conn(9)), Vec::<RoomId>::new());
    }

    #[test]
    fn test_room_ids_sorted() {
        let mut registry = RoomRegistry::new();
        for n in 0..4 {
            registry.create(conn(n));
        }
        registry.remove(RoomId(1));
        assert_eq!(registry.room_ids(), vec![RoomId(0), RoomId(2), RoomId(3)]);
    }
}
