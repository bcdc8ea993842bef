//! Rooms and room flood fill
//!
//! A room is the set of tiles reachable from a start tile without crossing an
//! edge that partitions rooms (walls, doors, hidden doors and room separators).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::map::{Map, MapError, Position};
use super::style::Direction;
use crate::save::RoomRecord;

/// A set of map coordinates. Equality ignores discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "RoomRecord", from = "RoomRecord")]
pub struct Room {
    coords: BTreeSet<Position>,
}

impl Room {
    pub fn new<I>(coords: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Position>,
    {
        Self {
            coords: coords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn coords(&self) -> &BTreeSet<Position> {
        &self.coords
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.coords.iter()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.coords.contains(&pos)
    }

    /// Smallest coordinate; where the editor anchors the room label
    pub fn first(&self) -> Option<Position> {
        self.coords.first().copied()
    }

    pub fn to_record(&self) -> RoomRecord {
        RoomRecord {
            coords: self.coords.iter().copied().collect(),
        }
    }

    pub fn from_record(record: &RoomRecord) -> Self {
        Self::new(record.coords.iter().copied())
    }
}

impl From<Room> for RoomRecord {
    fn from(room: Room) -> Self {
        room.to_record()
    }
}

impl From<RoomRecord> for Room {
    fn from(record: RoomRecord) -> Self {
        Room::from_record(&record)
    }
}

impl Map {
    /// The room containing `start`.
    pub fn get_room(&self, start: Position) -> Result<Room, MapError> {
        self.tile(start.x, start.y)?;
        let mut visited = vec![false; self.tile_count()];
        Ok(self.flood_room(start, &mut visited))
    }

    /// Partition the whole map into disjoint rooms.
    ///
    /// Every tile is visited once; tiles claimed by an earlier room are never
    /// entered again.
    pub fn get_rooms_all(&self) -> Vec<Room> {
        let mut visited = vec![false; self.tile_count()];
        let mut rooms = Vec::new();

        for x in 0..self.width {
            for y in 0..self.height {
                if visited[self.xy_to_idx(x, y)] {
                    continue;
                }
                rooms.push(self.flood_room(Position::new(x, y), &mut visited));
            }
        }

        log::debug!("Found {} rooms on {}x{} map", rooms.len(), self.width, self.height);
        rooms
    }

    /// Depth-first fill from `start` over an explicit stack.
    fn flood_room(&self, start: Position, visited: &mut [bool]) -> Room {
        let mut coords = BTreeSet::new();
        let mut stack = vec![start];
        visited[self.xy_to_idx(start.x, start.y)] = true;

        while let Some(pos) = stack.pop() {
            coords.insert(pos);
            let tile = &self[pos];

            for dir in Direction::ALL {
                if tile.edge(dir).is_solid_for_room() {
                    continue;
                }
                if let Some(next) = self.neighbor(pos, dir) {
                    let nidx = self.xy_to_idx(next.x, next.y);
                    if !visited[nidx] {
                        visited[nidx] = true;
                        stack.push(next);
                    }
                }
            }
        }

        Room { coords }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::style::{EdgeStyle, FloorStyle};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cleared(width: i32, height: i32) -> Map {
        let mut map = Map::new(width, height);
        map.clear();
        map
    }

    /// Wall off both sides of column `wall_x` for the full height
    fn with_wall_column(width: i32, height: i32, wall_x: i32) -> Map {
        let mut map = cleared(width, height);
        for y in 0..height {
            let tile = map.tile_mut(wall_x, y).unwrap();
            tile.set_edge(Direction::West, EdgeStyle::Wall);
            tile.set_edge(Direction::East, EdgeStyle::Wall);
            map.adjust_surrounding(wall_x, y).unwrap();
        }
        map
    }

    #[test]
    fn test_room_equality_is_set_based() {
        assert_eq!(Room::new([(1, 1), (2, 1)]), Room::new([(2, 1), (1, 1)]));
        assert_ne!(Room::new([(1, 1)]), Room::new([(1, 2)]));
        assert_eq!(Room::new([(0, 0), (0, 0)]).len(), 1);
    }

    #[test]
    fn test_room_first_and_contains() {
        let room = Room::new([(3, 1), (1, 4), (1, 2)]);
        assert_eq!(room.first(), Some(Position::new(1, 2)));
        assert!(room.contains(Position::new(3, 1)));
        assert!(!room.contains(Position::new(0, 0)));
        assert!(Room::default().is_empty());
        assert_eq!(Room::default().first(), None);
    }

    #[test]
    fn test_cleared_map_is_one_room() {
        let map = cleared(5, 5);
        let room = map.get_room(Position::new(2, 2)).unwrap();
        assert_eq!(room.len(), 25);
        assert_eq!(map.get_room(Position::new(0, 4)).unwrap(), room);
    }

    #[test]
    fn test_wall_column_partitions() {
        let map = with_wall_column(5, 4, 2);

        let left = map.get_room(Position::new(0, 0)).unwrap();
        assert_eq!(left.len(), 8);
        assert!(left.iter().all(|p| p.x < 2));

        let right = map.get_room(Position::new(4, 3)).unwrap();
        assert_eq!(right.len(), 8);
        assert!(right.iter().all(|p| p.x > 2));

        // The column itself is still connected north-south
        let column = map.get_room(Position::new(2, 1)).unwrap();
        assert_eq!(column.len(), 4);
    }

    #[test]
    fn test_doors_and_separators_partition() {
        for style in [EdgeStyle::Door, EdgeStyle::HiddenDoor, EdgeStyle::RoomSeparator] {
            let mut map = cleared(2, 1);
            map.tile_mut(0, 0).unwrap().set_edge(Direction::East, style);
            map.adjust_surrounding(0, 0).unwrap();
            assert_eq!(map.get_room(Position::new(0, 0)).unwrap().len(), 1, "{:?}", style);
        }
    }

    #[test]
    fn test_solid_tile_is_its_own_room() {
        let mut map = cleared(3, 3);
        map.tile_mut(1, 1).unwrap().set_floor(FloorStyle::Solid);
        let room = map.get_room(Position::new(1, 1)).unwrap();
        assert_eq!(room, Room::new([(1, 1)]));
    }

    #[test]
    fn test_get_room_out_of_bounds() {
        let map = cleared(2, 2);
        assert!(matches!(
            map.get_room(Position::new(2, 0)),
            Err(MapError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_get_rooms_all_partitions() {
        let map = with_wall_column(5, 4, 2);
        let rooms = map.get_rooms_all();
        assert_eq!(rooms.len(), 3);
        assert_eq!(rooms.iter().map(Room::len).sum::<usize>(), 20);
        assert_eq!(rooms[0], map.get_room(Position::new(0, 0)).unwrap());
    }

    #[test]
    fn test_large_map_does_not_overflow() {
        let map = cleared(300, 300);
        assert_eq!(map.get_room(Position::new(150, 150)).unwrap().len(), 90_000);
        assert_eq!(map.get_rooms_all().len(), 1);
    }

    #[test]
    fn test_room_record_shape() {
        let room = Room::new([(2, 0), (1, 0)]);
        let json = serde_json::to_string(&room).unwrap();
        assert_eq!(json, r#"{"coords":[{"x":1,"y":0},{"x":2,"y":0}]}"#);
        let back: Room = serde_json::from_str(&json).unwrap();
        assert_eq!(back, room);
    }

    proptest! {
        #[test]
        fn rooms_all_is_disjoint_cover(seed in any::<u64>(), w in 1_i32..10, h in 1_i32..10) {
            let mut map = Map::new(w, h);
            map.randomize(&mut StdRng::seed_from_u64(seed));
            let rooms = map.get_rooms_all();

            let mut seen = BTreeSet::new();
            for room in &rooms {
                prop_assert!(!room.is_empty());
                for pos in room.iter() {
                    prop_assert!(seen.insert(*pos), "{:?} in two rooms", pos);
                }
            }
            prop_assert_eq!(seen.len(), (w * h) as usize);
        }
    }
}
