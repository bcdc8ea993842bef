//! Edge and floor styles
//!
//! The enumerated looks of a tile side and a tile floor, plus the compass
//! directions used to address tile sides.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Style of one side of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeStyle {
    #[default]
    None,
    Wall,
    Door,
    HiddenDoor,
    /// Invisible wall that only partitions rooms
    RoomSeparator,
}

impl EdgeStyle {
    pub const ALL: [EdgeStyle; 5] = [
        EdgeStyle::None,
        EdgeStyle::Wall,
        EdgeStyle::Door,
        EdgeStyle::HiddenDoor,
        EdgeStyle::RoomSeparator,
    ];

    /// Styles used for random tiles and the editor's cycle hotkeys
    pub const SIMPLE: [EdgeStyle; 4] = [
        EdgeStyle::None,
        EdgeStyle::Wall,
        EdgeStyle::Door,
        EdgeStyle::HiddenDoor,
    ];

    /// Canonical interchange string
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeStyle::None => "none",
            EdgeStyle::Wall => "wall",
            EdgeStyle::Door => "door",
            EdgeStyle::HiddenDoor => "door_hidden",
            EdgeStyle::RoomSeparator => "sepa_inv",
        }
    }

    /// Parse a style string, falling back to `None` for anything unknown.
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "wall" => EdgeStyle::Wall,
            "door" => EdgeStyle::Door,
            "door_hidden" => EdgeStyle::HiddenDoor,
            "sepa_inv" => EdgeStyle::RoomSeparator,
            _ => EdgeStyle::None,
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, EdgeStyle::Wall | EdgeStyle::Door | EdgeStyle::HiddenDoor)
    }

    /// Does this edge split two rooms?
    pub fn is_solid_for_room(&self) -> bool {
        self.is_solid() || *self == EdgeStyle::RoomSeparator
    }

    pub fn is_passable(&self) -> bool {
        !matches!(self, EdgeStyle::Wall)
    }

    /// Room separators are only drawn in dev mode
    pub fn is_visible(&self, dev_mode: bool) -> bool {
        dev_mode || *self != EdgeStyle::RoomSeparator
    }

    /// Sprite file name the renderer looks up for this edge
    pub fn sprite_file(&self) -> String {
        format!("{}.png", self.as_str())
    }
}

/// Style of a tile's floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FloorStyle {
    #[default]
    Floor,
    Pit,
    StairsUp,
    StairsDown,
    Teleporter,
    Solid,
    None,
}

impl FloorStyle {
    pub const ALL: [FloorStyle; 7] = [
        FloorStyle::Floor,
        FloorStyle::Pit,
        FloorStyle::StairsUp,
        FloorStyle::StairsDown,
        FloorStyle::Teleporter,
        FloorStyle::Solid,
        FloorStyle::None,
    ];

    /// Floors offered by the editor's floor cycle hotkey
    pub const SIMPLE: [FloorStyle; 3] = [FloorStyle::Floor, FloorStyle::Solid, FloorStyle::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            FloorStyle::Floor => "floor",
            FloorStyle::Pit => "pit",
            FloorStyle::StairsUp => "stairs_up",
            FloorStyle::StairsDown => "stairs_down",
            FloorStyle::Teleporter => "teleporter",
            FloorStyle::Solid => "solid",
            FloorStyle::None => "none",
        }
    }

    /// Parse a style string. Unknown input becomes `Floor`, not `None`.
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "pit" => FloorStyle::Pit,
            "stairs_up" => FloorStyle::StairsUp,
            "stairs_down" => FloorStyle::StairsDown,
            "teleporter" => FloorStyle::Teleporter,
            "solid" => FloorStyle::Solid,
            "none" => FloorStyle::None,
            _ => FloorStyle::Floor,
        }
    }

    pub fn is_solid(&self) -> bool {
        *self == FloorStyle::Solid
    }

    pub fn is_passable(&self) -> bool {
        !self.is_solid()
    }

    /// Traversable, but the player should be told about it
    pub fn is_passable_with_warning(&self) -> bool {
        matches!(self, FloorStyle::Pit | FloorStyle::Teleporter | FloorStyle::None)
    }

    pub fn is_visible(&self, _dev_mode: bool) -> bool {
        true
    }

    pub fn sprite_file(&self) -> String {
        format!("{}.png", self.as_str())
    }
}

impl fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FloorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Styles travel as their canonical strings. Unknown strings coerce instead of
// failing so hand-edited files still load. Older JSON files nest the name as
// `{"style": "wall"}`; anything else becomes the default style.

#[derive(Deserialize)]
#[serde(untagged)]
enum StyleRepr {
    Name(String),
    Nested { style: String },
    Other(serde::de::IgnoredAny),
}

/// Style name from either representation. Binary formats can't drive an
/// untagged enum, so they always read a plain string.
fn style_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    if !deserializer.is_human_readable() {
        return String::deserialize(deserializer);
    }
    Ok(match StyleRepr::deserialize(deserializer)? {
        StyleRepr::Name(name) | StyleRepr::Nested { style: name } => name,
        StyleRepr::Other(_) => String::new(),
    })
}

impl Serialize for EdgeStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EdgeStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(EdgeStyle::from_str_lossy(&style_name(deserializer)?))
    }
}

impl Serialize for FloorStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FloorStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(FloorStyle::from_str_lossy(&style_name(deserializer)?))
    }
}

/// Compass direction, in clockwise order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Grid offset of one step (y grows southward)
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Quarter turns clockwise from north; renderers rotate sprites by this
    pub fn index(&self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    pub fn opposite(&self) -> Self {
        Direction::ALL[(self.index() + 2) % 4]
    }

    pub fn turn_right(&self) -> Self {
        cycle_next(*self, &Direction::ALL)
    }

    pub fn turn_left(&self) -> Self {
        Direction::ALL[(self.index() + 3) % 4]
    }

    pub fn turn_around(&self) -> Self {
        self.opposite()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }

    /// Parse a facing, defaulting to north
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "east" => Direction::East,
            "south" => Direction::South,
            "west" => Direction::West,
            _ => Direction::North,
        }
    }
}

/// The element after `current` in `allowed`, wrapping around.
///
/// A `current` that is not in `allowed` maps to the first element; an empty
/// `allowed` leaves `current` unchanged.
pub fn cycle_next<T: Copy + PartialEq>(current: T, allowed: &[T]) -> T {
    match allowed.iter().position(|item| *item == current) {
        Some(idx) => allowed[(idx + 1) % allowed.len()],
        None => allowed.first().copied().unwrap_or(current),
    }
}

/// Uniform random pick from `allowed`
pub fn random_choice<T: Copy, R: Rng + ?Sized>(rng: &mut R, allowed: &[T]) -> Option<T> {
    allowed.choose(rng).copied()
}
