//! Interchange records
//!
//! The portable shape of tiles, rooms and maps. JSON files and the binary
//! snapshot are both encodings of these records.

use serde::{Deserialize, Serialize};

use crate::world::{EdgeStyle, FloorStyle, Position};

/// Tile record: `{n, e, s, w, f}` style strings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileRecord {
    #[serde(default)]
    pub n: EdgeStyle,
    #[serde(default)]
    pub e: EdgeStyle,
    #[serde(default)]
    pub s: EdgeStyle,
    #[serde(default)]
    pub w: EdgeStyle,
    #[serde(default)]
    pub f: FloorStyle,
    #[serde(default)]
    pub seen: bool,
    #[serde(default)]
    pub visited: bool,
}

/// Room record: `{coords: [{x, y}, ...]}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomRecord {
    #[serde(default)]
    pub coords: Vec<Position>,
}

/// Map record. `tiles` is indexed `[x][y]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRecord {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Vec<TileRecord>>,
    #[serde(default, alias = "roomList")]
    pub room_list: Vec<RoomRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_record_json_shape() {
        let record = TileRecord {
            n: EdgeStyle::Wall,
            e: EdgeStyle::RoomSeparator,
            f: FloorStyle::Teleporter,
            ..TileRecord::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["n"], "wall");
        assert_eq!(value["e"], "sepa_inv");
        assert_eq!(value["s"], "none");
        assert_eq!(value["f"], "teleporter");
    }

    #[test]
    fn test_map_record_accepts_legacy_keys() {
        let json = r#"{
            "width": 1,
            "height": 1,
            "tiles": [[{"n": "wall", "e": "wall", "s": "wall", "w": "wall", "f": "floor"}]],
            "roomList": [{"coords": [{"x": 0, "y": 0}]}]
        }"#;
        let record: MapRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.room_list.len(), 1);
        assert_eq!(record.room_list[0].coords[0], Position::new(0, 0));
    }

    #[test]
    fn test_map_record_without_rooms() {
        let json = r#"{"width": 1, "height": 1, "tiles": [[{}]]}"#;
        let record: MapRecord = serde_json::from_str(json).unwrap();
        assert!(record.room_list.is_empty());
        assert_eq!(record.tiles[0][0].f, FloorStyle::Floor);
    }
}
