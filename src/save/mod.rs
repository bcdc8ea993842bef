//! Save/load system
//!
//! Interchange records and map files.

pub mod records;
pub mod map_file;

pub use records::{MapRecord, RoomRecord, TileRecord};

pub use map_file::{
    LoadError, SaveError, MAP_FORMAT_VERSION, MAP_MAGIC,
    from_bytes, to_bytes,
    save_map, load_map, save_map_json, load_map_json, load_map_any,
    maps_directory, map_path, list_maps,
};
