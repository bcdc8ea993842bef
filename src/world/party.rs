//! Party position and facing
//!
//! What the movement tester drives around a map: a position, a facing, and
//! step/turn commands checked against tile passability.

use serde::{Deserialize, Serialize};

use super::map::{Map, Position};
use super::style::{Direction, FloorStyle};

/// Result of trying to step forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Moved onto a hazardous or notable floor
    MovedWithWarning(FloorStyle),
    Blocked,
}

/// The player's party on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Party {
    #[serde(rename = "party_x")]
    pub x: i32,
    #[serde(rename = "party_y")]
    pub y: i32,
    #[serde(with = "facing_serde")]
    pub facing: Direction,
}

impl Party {
    pub fn new(x: i32, y: i32, facing: Direction) -> Self {
        Self { x, y, facing }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// The tile directly in front of the party
    pub fn forward_coords(&self) -> Position {
        self.position().step(self.facing)
    }

    pub fn turn_left(&mut self) -> Direction {
        self.facing = self.facing.turn_left();
        self.facing
    }

    pub fn turn_right(&mut self) -> Direction {
        self.facing = self.facing.turn_right();
        self.facing
    }

    pub fn turn_around(&mut self) -> Direction {
        self.facing = self.facing.turn_around();
        self.facing
    }

    /// Step one tile forward if the map allows it.
    pub fn step_forward(&mut self, map: &Map) -> MoveOutcome {
        if !map.can_move(self.position(), self.facing) {
            log::debug!("Party blocked at ({}, {}) facing {}", self.x, self.y, self.facing.as_str());
            return MoveOutcome::Blocked;
        }

        let next = self.forward_coords();
        self.x = next.x;
        self.y = next.y;

        let floor = map[next].floor();
        if floor.is_passable_with_warning() {
            MoveOutcome::MovedWithWarning(floor)
        } else {
            MoveOutcome::Moved
        }
    }
}

/// Facing is stored as its lowercase name; unknown names face north
mod facing_serde {
    use super::Direction;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(facing: &Direction, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(facing.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Direction, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Direction::from_str_lossy(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::style::EdgeStyle;

    fn corridor() -> Map {
        let mut map = Map::new(4, 1);
        map.clear();
        map
    }

    #[test]
    fn test_turning() {
        let mut party = Party::default();
        assert_eq!(party.facing, Direction::North);
        assert_eq!(party.turn_right(), Direction::East);
        assert_eq!(party.turn_around(), Direction::West);
        assert_eq!(party.turn_left(), Direction::South);
    }

    #[test]
    fn test_forward_coords() {
        let party = Party::new(2, 2, Direction::West);
        assert_eq!(party.forward_coords(), Position::new(1, 2));
        let party = Party::new(2, 2, Direction::North);
        assert_eq!(party.forward_coords(), Position::new(2, 1));
    }

    #[test]
    fn test_step_forward() {
        let mut map = corridor();
        map.tile_mut(2, 0).unwrap().set_floor(FloorStyle::Pit);
        map.tile_mut(2, 0).unwrap().set_edge(Direction::East, EdgeStyle::Wall);
        map.adjust_surrounding(2, 0).unwrap();

        let mut party = Party::new(0, 0, Direction::East);
        assert_eq!(party.step_forward(&map), MoveOutcome::Moved);
        assert_eq!(party.step_forward(&map), MoveOutcome::MovedWithWarning(FloorStyle::Pit));
        assert_eq!(party.position(), Position::new(2, 0));
        assert_eq!(party.step_forward(&map), MoveOutcome::Blocked);
        assert_eq!(party.position(), Position::new(2, 0));
    }

    #[test]
    fn test_blocked_at_map_edge() {
        let map = corridor();
        let mut party = Party::new(0, 0, Direction::North);
        assert_eq!(party.step_forward(&map), MoveOutcome::Blocked);
    }

    #[test]
    fn test_party_record() {
        let party = Party::new(3, 4, Direction::South);
        let json = serde_json::to_string(&party).unwrap();
        assert_eq!(json, r#"{"party_x":3,"party_y":4,"facing":"south"}"#);
        let odd: Party = serde_json::from_str(r#"{"party_x":1,"party_y":1,"facing":"up"}"#).unwrap();
        assert_eq!(odd.facing, Direction::North);
    }
}
