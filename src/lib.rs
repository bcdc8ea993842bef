//! odemap - dungeon map model and tooling
//!
//! Tile edges and floors, the map grid, room flood fill, map files and the
//! editor session built on top of them.

pub mod world;
pub mod save;
pub mod config;
pub mod editor;

// Re-export commonly used types
pub use world::{Direction, EdgeStyle, FloorStyle, Map, MapError, Position, Room, Tile};
pub use save::{LoadError, SaveError};
pub use config::EditorConfig;
pub use editor::EditorSession;
