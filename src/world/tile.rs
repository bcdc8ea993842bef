//! Tile definitions
//!
//! A grid cell: four edge styles and a floor style.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::style::{random_choice, Direction, EdgeStyle, FloorStyle};
use crate::save::TileRecord;

/// A single tile in the map
///
/// A tile with a solid floor always has walls on all four sides; the setters
/// keep that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "TileRecord", from = "TileRecord")]
pub struct Tile {
    north: EdgeStyle,
    east: EdgeStyle,
    south: EdgeStyle,
    west: EdgeStyle,
    floor: FloorStyle,
    /// Fog-of-war: the party has seen this tile
    pub seen: bool,
    /// Fog-of-war: the party has stood on this tile
    pub visited: bool,
}

/// Which sides of a tile can be left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Passability {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl Passability {
    pub fn get(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    pub fn any(&self) -> bool {
        self.north || self.east || self.south || self.west
    }
}

impl Tile {
    /// The empty tile: plain floor, no edges
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_styles(
        north: EdgeStyle,
        east: EdgeStyle,
        south: EdgeStyle,
        west: EdgeStyle,
        floor: FloorStyle,
    ) -> Self {
        let mut tile = Self {
            north,
            east,
            south,
            west,
            ..Self::default()
        };
        tile.set_floor(floor);
        tile
    }

    /// A tile whose edges are drawn from `edges`. The floor is drawn from
    /// `floors` when given, otherwise it stays plain floor.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        edges: &[EdgeStyle],
        floors: Option<&[FloorStyle]>,
    ) -> Self {
        let mut tile = Self::new();
        for dir in Direction::ALL {
            let style = random_choice(rng, edges).unwrap_or_default();
            tile.set_edge(dir, style);
        }
        if let Some(floors) = floors {
            tile.set_floor(random_choice(rng, floors).unwrap_or_default());
        }
        tile
    }

    pub fn edge(&self, dir: Direction) -> EdgeStyle {
        match dir {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Set one edge. Solid tiles keep their walls.
    pub fn set_edge(&mut self, dir: Direction, style: EdgeStyle) {
        let style = if self.floor.is_solid() { EdgeStyle::Wall } else { style };
        match dir {
            Direction::North => self.north = style,
            Direction::East => self.east = style,
            Direction::South => self.south = style,
            Direction::West => self.west = style,
        }
    }

    pub fn north(&self) -> EdgeStyle {
        self.north
    }

    pub fn east(&self) -> EdgeStyle {
        self.east
    }

    pub fn south(&self) -> EdgeStyle {
        self.south
    }

    pub fn west(&self) -> EdgeStyle {
        self.west
    }

    pub fn floor(&self) -> FloorStyle {
        self.floor
    }

    /// Set the floor. A solid floor walls in all four sides.
    pub fn set_floor(&mut self, style: FloorStyle) {
        self.floor = style;
        if style.is_solid() {
            self.north = EdgeStyle::Wall;
            self.east = EdgeStyle::Wall;
            self.south = EdgeStyle::Wall;
            self.west = EdgeStyle::Wall;
        }
    }

    pub fn is_solid(&self) -> bool {
        self.floor.is_solid()
    }

    /// Can the tile be left in `dir`?
    pub fn passable(&self, dir: Direction) -> bool {
        self.edge(dir).is_passable() && self.floor.is_passable()
    }

    pub fn passability(&self) -> Passability {
        Passability {
            north: self.passable(Direction::North),
            east: self.passable(Direction::East),
            south: self.passable(Direction::South),
            west: self.passable(Direction::West),
        }
    }

    pub fn to_record(&self) -> TileRecord {
        TileRecord {
            n: self.north,
            e: self.east,
            s: self.south,
            w: self.west,
            f: self.floor,
            seen: self.seen,
            visited: self.visited,
        }
    }

    pub fn from_record(record: &TileRecord) -> Self {
        let mut tile = Self::with_styles(record.n, record.e, record.s, record.w, record.f);
        tile.seen = record.seen;
        tile.visited = record.visited;
        tile
    }
}

impl From<Tile> for TileRecord {
    fn from(tile: Tile) -> Self {
        tile.to_record()
    }
}

impl From<TileRecord> for Tile {
    fn from(record: TileRecord) -> Self {
        Tile::from_record(&record)
    }
}
