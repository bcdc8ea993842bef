//! Editor session
//!
//! The state behind the map editor window: the map being edited, the cursor,
//! the tile clipboard and the hotkey operations. Widgets and drawing live
//! elsewhere; they call into this and redraw from the map afterwards.

use std::path::Path;

use rand::Rng;

use crate::config::EditorConfig;
use crate::save::{self, LoadError, SaveError};
use crate::world::{cycle_next, Direction, EdgeStyle, FloorStyle, Map, MapError, Position, Room, Tile};

/// One editing session on one map
#[derive(Debug, Clone)]
pub struct EditorSession {
    map: Map,
    cursor: Position,
    clipboard: Tile,
    config: EditorConfig,
}

impl EditorSession {
    /// Start on a cleared map of the configured size
    pub fn new(config: EditorConfig) -> Self {
        let config = config.sanitized();
        let mut map = Map::new(config.map_width, config.map_height);
        map.clear();
        Self::with_map(map, config)
    }

    pub fn with_map(map: Map, config: EditorConfig) -> Self {
        Self {
            map,
            cursor: Position::default(),
            clipboard: Tile::new(),
            config,
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn clipboard(&self) -> &Tile {
        &self.clipboard
    }

    /// The tile under the cursor
    pub fn current_tile(&self) -> &Tile {
        &self.map[self.cursor]
    }

    pub fn move_cursor(&mut self, pos: Position) -> Result<(), MapError> {
        self.map.tile(pos.x, pos.y)?;
        self.cursor = pos;
        Ok(())
    }

    /// Re-establish edge consistency after an edit
    pub fn refresh(&mut self, adjust: bool) {
        if self.config.fix_edges {
            self.map.fix_edges();
        }
        if adjust && self.config.auto_adjust {
            self.adjust_neighbours();
        }
    }

    fn edit_current<F: FnOnce(&mut Tile)>(&mut self, edit: F) {
        let cursor = self.cursor;
        edit(&mut self.map[cursor]);
        self.refresh(true);
    }

    /// Cycle one edge of the current tile through the simple edge styles
    pub fn cycle_edge(&mut self, dir: Direction) -> EdgeStyle {
        self.edit_current(|tile| {
            let next = cycle_next(tile.edge(dir), &EdgeStyle::SIMPLE);
            tile.set_edge(dir, next);
        });
        self.current_tile().edge(dir)
    }

    /// Put an invisible room separator on one edge of the current tile
    pub fn set_separator(&mut self, dir: Direction) {
        self.edit_current(|tile| tile.set_edge(dir, EdgeStyle::RoomSeparator));
    }

    /// Cycle the current tile's floor through the simple floor styles
    pub fn cycle_floor(&mut self) -> FloorStyle {
        self.edit_current(|tile| {
            let next = cycle_next(tile.floor(), &FloorStyle::SIMPLE);
            tile.set_floor(next);
        });
        self.current_tile().floor()
    }

    pub fn copy_tile(&mut self) {
        self.clipboard = *self.current_tile();
    }

    pub fn paste_tile(&mut self) {
        let tile = self.clipboard;
        self.edit_current(|current| *current = tile);
    }

    /// Replace the current tile with the empty tile
    pub fn clear_tile(&mut self) {
        self.edit_current(|current| *current = Tile::new());
    }

    /// Replace the current tile with a random one
    pub fn randomize_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let tile = Tile::random(rng, &EdgeStyle::SIMPLE, None);
        self.edit_current(|current| *current = tile);
    }

    /// Push the current tile's edges onto its neighbours
    pub fn adjust_cursor(&mut self) {
        self.adjust_neighbours();
        self.refresh(false);
    }

    fn adjust_neighbours(&mut self) {
        if let Err(e) = self.map.adjust_surrounding(self.cursor.x, self.cursor.y) {
            log::warn!("Failed to adjust tiles around the cursor: {}", e);
        }
    }

    pub fn clear_map(&mut self) {
        self.map.clear();
        self.refresh(false);
    }

    pub fn randomize_map<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.map.randomize(rng);
        self.refresh(false);
    }

    /// The room under the cursor
    pub fn hover_room(&self) -> Room {
        match self.map.get_room(self.cursor) {
            Ok(room) => room,
            Err(e) => {
                log::warn!("No room under the cursor: {}", e);
                Room::default()
            }
        }
    }

    /// Add the room under the cursor to the map's room list
    pub fn mark_hover_room(&mut self) -> bool {
        let room = self.hover_room();
        !room.is_empty() && self.map.mark_room(room)
    }

    pub fn marked_rooms(&self) -> &[Room] {
        self.map.room_list()
    }

    /// Load a map file of either format. On failure the current map stays.
    pub fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        let map = save::load_map_any(path)?;
        self.cursor = Position::new(
            self.cursor.x.min(map.width - 1),
            self.cursor.y.min(map.height - 1),
        );
        self.map = map;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        save::save_map(&self.map, path)
    }

    pub fn save_json(&self, path: &Path) -> Result<(), SaveError> {
        save::save_map_json(&self.map, path)
    }
}
