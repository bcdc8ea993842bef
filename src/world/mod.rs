//! World module
//!
//! Tile styles, tiles, the map grid, rooms and the party.

pub mod style;
pub mod tile;
pub mod map;
pub mod room;
pub mod party;

pub use style::{cycle_next, random_choice, Direction, EdgeStyle, FloorStyle};
pub use tile::{Passability, Tile};
pub use map::{Map, MapError, Position, MAX_MAP_DIMENSION};
pub use room::Room;
pub use party::{MoveOutcome, Party};
