//! Map data structure
//!
//! The 2D grid of tiles representing one dungeon level, plus the edge
//! consistency operations the editor relies on.

use std::ops::{Index, IndexMut};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::room::Room;
use super::style::{Direction, EdgeStyle};
use super::tile::Tile;
use crate::save::{MapRecord, RoomRecord};

/// Grid coordinate, ordered by x then y
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent position one step in `dir`
    pub fn step(&self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Map access errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("position ({x}, {y}) is outside the {width}x{height} map")]
    OutOfBounds { x: i32, y: i32, width: i32, height: i32 },
    #[error("invalid map dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("invalid map data: {0}")]
    InvalidData(String),
}

/// A dungeon level map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "MapRecord", try_from = "MapRecord")]
pub struct Map {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    /// Rooms the designer has marked for labeling
    room_list: Vec<Room>,
}

/// Largest width or height a map may have
pub const MAX_MAP_DIMENSION: i32 = 1024;

impl Map {
    /// Create a map filled with empty tiles.
    ///
    /// # Panics
    /// If the dimensions are rejected by [`Map::try_new`].
    pub fn new(width: i32, height: i32) -> Self {
        match Self::try_new(width, height) {
            Ok(map) => map,
            Err(e) => panic!("{}", e),
        }
    }

    /// Create a map filled with empty tiles, rejecting dimensions that are
    /// not positive or exceed [`MAX_MAP_DIMENSION`].
    pub fn try_new(width: i32, height: i32) -> Result<Self, MapError> {
        let invalid = MapError::InvalidDimensions { width, height };
        if !(1..=MAX_MAP_DIMENSION).contains(&width) || !(1..=MAX_MAP_DIMENSION).contains(&height) {
            return Err(invalid);
        }
        let count = width.checked_mul(height).ok_or(invalid)?;
        Ok(Self {
            width,
            height,
            tiles: vec![Tile::new(); count as usize],
            room_list: Vec::new(),
        })
    }

    /// Build a map from tiles given column by column (`columns[x][y]`).
    pub fn with_tiles(columns: Vec<Vec<Tile>>) -> Result<Self, MapError> {
        let width = i32::try_from(columns.len()).unwrap_or(i32::MAX);
        let height = i32::try_from(columns.first().map_or(0, |col| col.len())).unwrap_or(i32::MAX);
        let mut map = Self::try_new(width, height)?;
        if let Some((x, col)) = columns.iter().enumerate().find(|(_, col)| col.len() != height as usize) {
            return Err(MapError::InvalidData(format!(
                "column {} has {} tiles, expected {}",
                x,
                col.len(),
                height
            )));
        }

        for (x, col) in columns.into_iter().enumerate() {
            for (y, tile) in col.into_iter().enumerate() {
                let idx = map.xy_to_idx(x as i32, y as i32);
                map.tiles[idx] = tile;
            }
        }
        Ok(map)
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    pub fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Convert 1D index to 2D coordinates
    #[inline]
    pub fn idx_to_xy(&self, idx: usize) -> (i32, i32) {
        let idx = idx as i32;
        (idx % self.width, idx / self.width)
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    fn check_bounds(&self, x: i32, y: i32) -> Result<usize, MapError> {
        if self.in_bounds(x, y) {
            Ok(self.xy_to_idx(x, y))
        } else {
            Err(MapError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Get tile at position
    pub fn get_tile(&self, x: i32, y: i32) -> Option<&Tile> {
        if self.in_bounds(x, y) {
            Some(&self.tiles[self.xy_to_idx(x, y)])
        } else {
            None
        }
    }

    /// Get mutable tile at position
    pub fn get_tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        if self.in_bounds(x, y) {
            let idx = self.xy_to_idx(x, y);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    /// Tile at position, or a bounds error
    pub fn tile(&self, x: i32, y: i32) -> Result<&Tile, MapError> {
        let idx = self.check_bounds(x, y)?;
        Ok(&self.tiles[idx])
    }

    pub fn tile_mut(&mut self, x: i32, y: i32) -> Result<&mut Tile, MapError> {
        let idx = self.check_bounds(x, y)?;
        Ok(&mut self.tiles[idx])
    }

    /// Replace the tile at position wholesale
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) -> Result<(), MapError> {
        let idx = self.check_bounds(x, y)?;
        self.tiles[idx] = tile;
        Ok(())
    }

    /// Iterate over all tiles with their positions, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        self.tiles.iter().enumerate().map(move |(idx, tile)| {
            let (x, y) = self.idx_to_xy(idx);
            (Position::new(x, y), tile)
        })
    }

    /// The in-bounds neighbour of `pos` in `dir`
    pub fn neighbor(&self, pos: Position, dir: Direction) -> Option<Position> {
        let next = pos.step(dir);
        self.in_bounds(next.x, next.y).then_some(next)
    }

    /// Put walls on every outward-facing boundary edge.
    pub fn fix_edges(&mut self) {
        let (last_x, last_y) = (self.width - 1, self.height - 1);
        for y in 0..self.height {
            let west = self.xy_to_idx(0, y);
            self.tiles[west].set_edge(Direction::West, EdgeStyle::Wall);
            let east = self.xy_to_idx(last_x, y);
            self.tiles[east].set_edge(Direction::East, EdgeStyle::Wall);
        }
        for x in 0..self.width {
            let north = self.xy_to_idx(x, 0);
            self.tiles[north].set_edge(Direction::North, EdgeStyle::Wall);
            let south = self.xy_to_idx(x, last_y);
            self.tiles[south].set_edge(Direction::South, EdgeStyle::Wall);
        }
    }

    /// Copy the edges of the tile at (x, y) onto the facing edges of its
    /// neighbours. Only the neighbours' facing sides change.
    pub fn adjust_surrounding(&mut self, x: i32, y: i32) -> Result<(), MapError> {
        let idx = self.check_bounds(x, y)?;
        let source = self.tiles[idx];
        let pos = Position::new(x, y);

        for dir in Direction::ALL {
            if let Some(next) = self.neighbor(pos, dir) {
                let nidx = self.xy_to_idx(next.x, next.y);
                self.tiles[nidx].set_edge(dir.opposite(), source.edge(dir));
            }
        }
        Ok(())
    }

    /// Replace every tile with a random simple tile, then wall the boundary.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for tile in &mut self.tiles {
            *tile = Tile::random(rng, &EdgeStyle::SIMPLE, None);
        }
        self.fix_edges();
        log::debug!("Randomized {}x{} map", self.width, self.height);
    }

    /// Replace every tile with the empty tile, then wall the boundary.
    pub fn clear(&mut self) {
        self.tiles.fill(Tile::new());
        self.fix_edges();
        log::debug!("Cleared {}x{} map", self.width, self.height);
    }

    /// Can a party standing on `pos` step one tile in `dir`?
    pub fn can_move(&self, pos: Position, dir: Direction) -> bool {
        let Some(here) = self.get_tile(pos.x, pos.y) else {
            return false;
        };
        let Some(next) = self.neighbor(pos, dir) else {
            return false;
        };
        let there = &self[next];
        here.passable(dir) && there.passable(dir.opposite())
    }

    /// Rooms marked for labeling
    pub fn room_list(&self) -> &[Room] {
        &self.room_list
    }

    /// Add a room to the room list. Returns false if it was already there.
    pub fn mark_room(&mut self, room: Room) -> bool {
        if self.room_list.contains(&room) {
            return false;
        }
        self.room_list.push(room);
        true
    }

    pub fn unmark_room(&mut self, room: &Room) -> bool {
        let before = self.room_list.len();
        self.room_list.retain(|r| r != room);
        self.room_list.len() != before
    }

    /// The first marked room that contains `pos`
    pub fn room_containing(&self, pos: Position) -> Option<&Room> {
        self.room_list.iter().find(|room| room.contains(pos))
    }

    pub fn clear_room_list(&mut self) {
        self.room_list.clear();
    }

    /// Interchange view of the map
    pub fn dump(&self) -> MapRecord {
        let tiles = (0..self.width)
            .map(|x| {
                (0..self.height)
                    .map(|y| self[Position::new(x, y)].to_record())
                    .collect::<Vec<_>>()
            })
            .collect();
        MapRecord {
            width: self.width,
            height: self.height,
            tiles,
            room_list: self.room_list.iter().map(Room::to_record).collect(),
        }
    }

    /// Rebuild a map from its interchange view
    pub fn from_record(record: &MapRecord) -> Result<Self, MapError> {
        let valid = 1..=MAX_MAP_DIMENSION;
        if !valid.contains(&record.width) || !valid.contains(&record.height) {
            return Err(MapError::InvalidDimensions {
                width: record.width,
                height: record.height,
            });
        }
        if record.tiles.len() as i32 != record.width {
            return Err(MapError::InvalidData(format!(
                "expected {} columns, found {}",
                record.width,
                record.tiles.len()
            )));
        }

        let columns = record
            .tiles
            .iter()
            .map(|col| col.iter().map(Tile::from_record).collect::<Vec<_>>())
            .collect();
        let mut map = Self::with_tiles(columns)?;
        if map.height != record.height {
            return Err(MapError::InvalidData(format!(
                "expected {} rows, found {}",
                record.height, map.height
            )));
        }

        for room in &record.room_list {
            map.room_list.push(map.room_from_record(room)?);
        }
        Ok(map)
    }

    fn room_from_record(&self, record: &RoomRecord) -> Result<Room, MapError> {
        if let Some(pos) = record.coords.iter().find(|p| !self.in_bounds(p.x, p.y)) {
            return Err(MapError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(Room::from_record(record))
    }
}

impl Index<Position> for Map {
    type Output = Tile;

    /// # Panics
    /// If `pos` is outside the map.
    fn index(&self, pos: Position) -> &Tile {
        match self.check_bounds(pos.x, pos.y) {
            Ok(idx) => &self.tiles[idx],
            Err(e) => panic!("{}", e),
        }
    }
}

impl IndexMut<Position> for Map {
    fn index_mut(&mut self, pos: Position) -> &mut Tile {
        match self.check_bounds(pos.x, pos.y) {
            Ok(idx) => &mut self.tiles[idx],
            Err(e) => panic!("{}", e),
        }
    }
}

impl From<Map> for MapRecord {
    fn from(map: Map) -> Self {
        map.dump()
    }
}

impl TryFrom<MapRecord> for Map {
    type Error = MapError;

    fn try_from(record: MapRecord) -> Result<Self, Self::Error> {
        Map::from_record(&record)
    }
}
