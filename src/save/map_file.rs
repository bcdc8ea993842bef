//! Map save/load
//!
//! Two on-disk formats:
//! - `.map`: the primary format. `ODEM` magic, a little-endian `u32` format
//!   version, then a zlib-compressed bincode snapshot of the map record.
//! - `.json`: the deprecated plain JSON map record. Still loadable.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use thiserror::Error;

use super::records::MapRecord;
use crate::world::{Map, MapError};

/// Leading bytes of a binary map file
pub const MAP_MAGIC: &[u8; 4] = b"ODEM";

/// Binary map format version for compatibility checking
pub const MAP_FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = MAP_MAGIC.len() + 4;

/// Upper bound on a decompressed map record. A full 1024x1024 map with long
/// style names stays well below it.
const MAX_PAYLOAD_BYTES: u64 = 256 * 1024 * 1024;

/// Map load errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("not a map file (missing header)")]
    BadHeader,
    #[error("map version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("corrupt map data: {0}")]
    Corrupt(String),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid map: {0}")]
    Invalid(#[from] MapError),
}

/// Map save errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a map in the binary format
pub fn to_bytes(map: &Map) -> Result<Vec<u8>, SaveError> {
    let payload = bincode::serialize(&map.dump()).map_err(|e| SaveError::Encode(e.to_string()))?;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len() / 4);
    out.extend_from_slice(MAP_MAGIC);
    out.extend_from_slice(&MAP_FORMAT_VERSION.to_le_bytes());

    let mut encoder = ZlibEncoder::new(out, Compression::default());
    encoder.write_all(&payload)?;
    Ok(encoder.finish()?)
}

/// Decode a map from the binary format
pub fn from_bytes(bytes: &[u8]) -> Result<Map, LoadError> {
    if !has_map_header(bytes) {
        return Err(LoadError::BadHeader);
    }

    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[MAP_MAGIC.len()..HEADER_LEN]);
    let found = u32::from_le_bytes(version);
    if found != MAP_FORMAT_VERSION {
        return Err(LoadError::VersionMismatch {
            expected: MAP_FORMAT_VERSION,
            found,
        });
    }

    let payload = inflate(&bytes[HEADER_LEN..], MAX_PAYLOAD_BYTES)?;
    let record: MapRecord =
        bincode::deserialize(&payload).map_err(|e| LoadError::Corrupt(e.to_string()))?;

    Ok(Map::from_record(&record)?)
}

fn inflate(compressed: &[u8], limit: u64) -> Result<Vec<u8>, LoadError> {
    let mut payload = Vec::new();
    ZlibDecoder::new(compressed)
        .take(limit + 1)
        .read_to_end(&mut payload)
        .map_err(|e| LoadError::Corrupt(e.to_string()))?;
    if payload.len() as u64 > limit {
        return Err(LoadError::Corrupt(format!(
            "decompressed map exceeds {} bytes",
            limit
        )));
    }
    Ok(payload)
}

fn has_map_header(bytes: &[u8]) -> bool {
    bytes.len() >= HEADER_LEN && bytes.starts_with(MAP_MAGIC)
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

/// Save a map in the binary format
pub fn save_map(map: &Map, path: &Path) -> Result<(), SaveError> {
    let bytes = to_bytes(map)?;
    ensure_parent(path)?;
    fs::write(path, bytes)?;

    log::info!("Map saved to {}", path.display());
    Ok(())
}

/// Load a binary map file
pub fn load_map(path: &Path) -> Result<Map, LoadError> {
    let bytes = fs::read(path)?;
    let map = from_bytes(&bytes)?;

    log::info!("Map loaded from {} ({}x{})", path.display(), map.width, map.height);
    Ok(map)
}

/// Save a map as a JSON map record (deprecated format)
pub fn save_map_json(map: &Map, path: &Path) -> Result<(), SaveError> {
    let json = serde_json::to_string_pretty(&map.dump())?;
    ensure_parent(path)?;
    fs::write(path, json)?;

    log::info!("Map saved as JSON to {}", path.display());
    Ok(())
}

/// Load a JSON map record
pub fn load_map_json(path: &Path) -> Result<Map, LoadError> {
    let data = fs::read_to_string(path)?;
    let record: MapRecord = serde_json::from_str(&data)?;
    let map = Map::from_record(&record)?;

    log::info!("Map loaded from JSON {}", path.display());
    Ok(map)
}

/// Load either format, picking by the file header
pub fn load_map_any(path: &Path) -> Result<Map, LoadError> {
    let bytes = fs::read(path)?;
    if has_map_header(&bytes) {
        let map = from_bytes(&bytes)?;
        log::info!("Map loaded from {}", path.display());
        return Ok(map);
    }

    log::debug!("{} has no map header, trying JSON", path.display());
    let record: MapRecord = serde_json::from_slice(&bytes)?;
    Ok(Map::from_record(&record)?)
}

/// Get the map directory path
pub fn maps_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "ode", "OdeMap") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("maps");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./maps")
    }
}

/// Path of a named map inside `dir`
pub fn map_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.map", name))
}

/// Map files (`.map` and `.json`) in `dir`, sorted by path
pub fn list_maps(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut maps: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == "map" || ext == "json")
        })
        .collect();
    maps.sort();
    maps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Direction, EdgeStyle, FloorStyle, Position, Room};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn sample_map() -> Map {
        let mut map = Map::new(6, 4);
        map.randomize(&mut StdRng::seed_from_u64(11));
        let tile = map.tile_mut(2, 2).unwrap();
        tile.set_edge(Direction::South, EdgeStyle::RoomSeparator);
        tile.set_floor(FloorStyle::Teleporter);
        tile.visited = true;
        map.mark_room(Room::new([(0, 0), (1, 0)]));
        map
    }

    #[test]
    fn test_binary_roundtrip() {
        let map = sample_map();
        let bytes = to_bytes(&map).unwrap();
        assert!(bytes.starts_with(MAP_MAGIC));
        assert_eq!(from_bytes(&bytes).unwrap(), map);
    }

    #[test]
    fn test_binary_rejects_bad_input() {
        assert!(matches!(from_bytes(b"nope"), Err(LoadError::BadHeader)));

        let mut bytes = to_bytes(&sample_map()).unwrap();
        bytes[4] = 9;
        assert!(matches!(
            from_bytes(&bytes),
            Err(LoadError::VersionMismatch { expected: 1, found: 9 })
        ));

        let bytes = to_bytes(&sample_map()).unwrap();
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(from_bytes(truncated), Err(LoadError::Corrupt(_))));

        let mut garbage = MAP_MAGIC.to_vec();
        garbage.extend_from_slice(&MAP_FORMAT_VERSION.to_le_bytes());
        garbage.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(from_bytes(&garbage), Err(LoadError::Corrupt(_))));
    }

    #[test]
    fn test_save_and_load_files() {
        let dir = tempdir().unwrap();
        let map = sample_map();

        let path = map_path(&dir.path().join("nested"), "level1");
        save_map(&map, &path).unwrap();
        assert_eq!(load_map(&path).unwrap(), map);
        assert_eq!(load_map_any(&path).unwrap(), map);

        let json_path = dir.path().join("nested").join("level1.json");
        save_map_json(&map, &json_path).unwrap();
        assert_eq!(load_map_json(&json_path).unwrap(), map);
        assert_eq!(load_map_any(&json_path).unwrap(), map);

        assert_eq!(list_maps(&dir.path().join("nested")), vec![json_path, path]);
        assert!(list_maps(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();

        let missing = dir.path().join("missing.map");
        assert!(matches!(load_map(&missing), Err(LoadError::Io(_))));

        let truncated = dir.path().join("truncated.json");
        fs::write(&truncated, r#"{"width": 2, "height": 2, "tiles": [["#).unwrap();
        assert!(matches!(load_map_json(&truncated), Err(LoadError::Json(_))));
        assert!(matches!(load_map_any(&truncated), Err(LoadError::Json(_))));

        let ragged = dir.path().join("ragged.json");
        fs::write(&ragged, r#"{"width": 2, "height": 1, "tiles": [[{}]]}"#).unwrap();
        assert!(matches!(load_map_json(&ragged), Err(LoadError::Invalid(_))));
    }

    #[test]
    fn test_json_coerces_unknown_styles() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        fs::write(
            &path,
            r#"{"width": 1, "height": 1, "tiles": [[{"n": "portal", "e": "wall", "s": "wall", "w": "wall", "f": "ice"}]]}"#,
        )
        .unwrap();

        let map = load_map_json(&path).unwrap();
        let tile = map[Position::new(0, 0)];
        assert_eq!(tile.north(), EdgeStyle::None);
        assert_eq!(tile.floor(), FloorStyle::Floor);
    }

    #[test]
    fn test_json_nested_styles() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested.json");
        fs::write(
            &path,
            r#"{"width": 1, "height": 1, "tiles": [[{"n": {"style": "wall"}, "e": {"style": "door"}, "s": {"style": "sepa_inv"}, "w": {"style": "door_hidden"}, "f": {"style": "stairs_up"}, "seen": true}]]}"#,
        )
        .unwrap();

        for map in [load_map_json(&path).unwrap(), load_map_any(&path).unwrap()] {
            let tile = map[Position::new(0, 0)];
            assert_eq!(tile.north(), EdgeStyle::Wall);
            assert_eq!(tile.east(), EdgeStyle::Door);
            assert_eq!(tile.south(), EdgeStyle::RoomSeparator);
            assert_eq!(tile.west(), EdgeStyle::HiddenDoor);
            assert_eq!(tile.floor(), FloorStyle::StairsUp);
            assert!(tile.seen);
        }

        // Mixed shapes in one record; odd values coerce to defaults
        fs::write(
            &path,
            r#"{"width": 1, "height": 1, "tiles": [[{"n": "wall", "e": {"style": 7}, "s": null, "w": [], "f": {"style": "pit"}}]]}"#,
        )
        .unwrap();
        let tile = load_map_json(&path).unwrap()[Position::new(0, 0)];
        assert_eq!(tile.north(), EdgeStyle::Wall);
        assert_eq!(tile.east(), EdgeStyle::None);
        assert_eq!(tile.south(), EdgeStyle::None);
        assert_eq!(tile.west(), EdgeStyle::None);
        assert_eq!(tile.floor(), FloorStyle::Pit);
    }

    #[test]
    fn test_decompression_is_capped() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0u8; 4096]).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(inflate(&compressed, 4096).unwrap().len(), 4096);
        assert!(matches!(inflate(&compressed, 4095), Err(LoadError::Corrupt(_))));
        assert!(matches!(inflate(&compressed, 16), Err(LoadError::Corrupt(_))));
    }
}
