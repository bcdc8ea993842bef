//! Editor configuration
//!
//! Loaded from a RON file, with fallback to defaults when the file is missing
//! or unreadable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::save::maps_directory;
use crate::world::MAX_MAP_DIMENSION;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "odemap.ron";

/// Editor settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Width of new maps
    pub map_width: i32,
    /// Height of new maps
    pub map_height: i32,
    /// Push edits onto neighbouring tiles' facing edges
    pub auto_adjust: bool,
    /// Re-wall the map boundary after every edit
    pub fix_edges: bool,
    /// Show room separators
    pub dev_mode: bool,
    /// Override for the map directory
    pub maps_dir: Option<PathBuf>,
    /// Seed for map randomization; random when unset
    pub seed: Option<u64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            map_width: 20,
            map_height: 20,
            auto_adjust: true,
            fix_edges: true,
            dev_mode: true,
            maps_dir: None,
            seed: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize config: {0}")]
    Ron(#[from] ron::Error),
}

impl EditorConfig {
    /// Load from `path`, or use defaults
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match ron::from_str::<EditorConfig>(&content) {
                    Ok(config) => {
                        log::info!("Config loaded from {:?}", path);
                        return config.sanitized();
                    }
                    Err(e) => log::warn!("Failed to parse {:?}: {}. Using defaults.", path, e),
                },
                Err(e) => log::warn!("Failed to read {:?}: {}. Using defaults.", path, e),
            }
        }
        Self::default()
    }

    /// Load `odemap.ron` from the working directory, or use defaults
    pub fn load_or_default() -> Self {
        Self::load(Path::new(CONFIG_FILE))
    }

    /// Write the config as pretty RON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, content)?;
        log::info!("Config saved to {:?}", path);
        Ok(())
    }

    /// Directory new maps are saved to
    pub fn maps_dir(&self) -> PathBuf {
        self.maps_dir.clone().unwrap_or_else(maps_directory)
    }

    /// Replace map dimensions outside `1..=MAX_MAP_DIMENSION` with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let valid = 1..=MAX_MAP_DIMENSION;
        if !valid.contains(&self.map_width) {
            log::warn!("map_width {} is out of range, using {}", self.map_width, defaults.map_width);
            self.map_width = defaults.map_width;
        }
        if !valid.contains(&self.map_height) {
            log::warn!("map_height {} is out of range, using {}", self.map_height, defaults.map_height);
            self.map_height = defaults.map_height;
        }
        self
    }
}
