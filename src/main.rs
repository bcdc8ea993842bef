//! odemap - Entry Point
//!
//! Command line front end for creating, inspecting and converting maps.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use odemap::config::{EditorConfig, CONFIG_FILE};
use odemap::save;
use odemap::world::{Map, Position, Room, MAX_MAP_DIMENSION};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Editor config file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new map file
    New {
        out: PathBuf,
        #[arg(long)]
        width: Option<i32>,
        #[arg(long)]
        height: Option<i32>,
        /// Fill the map with random tiles
        #[arg(long)]
        random: bool,
        #[arg(long)]
        seed: Option<u64>,
        /// Write the JSON format instead of the binary one
        #[arg(long)]
        json: bool,
    },
    /// Print size and room summary of a map
    Info { file: PathBuf },
    /// Print the room containing a tile
    Room { file: PathBuf, x: i32, y: i32 },
    /// Partition a map into rooms
    Rooms { file: PathBuf },
    /// Convert between binary and JSON map files
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// Write JSON instead of binary
        #[arg(long)]
        json: bool,
    },
    /// Print the effective config
    Config {
        /// Also write it to this path
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .init();

    let args = Args::parse();
    let config = EditorConfig::load(&args.config);
    log::debug!("Using config {:?}", config);

    match args.command {
        Commands::New { out, width, height, random, seed, json } => {
            let width = width.unwrap_or(config.map_width);
            let height = height.unwrap_or(config.map_height);
            let mut map = Map::try_new(width, height).with_context(|| {
                format!("Map dimensions must be between 1 and {}", MAX_MAP_DIMENSION)
            })?;
            if random {
                let seed = seed.or(config.seed).unwrap_or_else(rand::random);
                log::info!("Randomizing with seed {}", seed);
                map.randomize(&mut StdRng::seed_from_u64(seed));
            } else {
                map.clear();
            }
            write_map(&map, &out, json)?;
            println!("Created {}x{} map at {}", width, height, out.display());
        }
        Commands::Info { file } => {
            let map = read_map(&file)?;
            let rooms = map.get_rooms_all();
            println!("{}: {}x{} ({} tiles)", file.display(), map.width, map.height, map.tile_count());
            println!("Rooms: {}", rooms.len());
            println!("Marked rooms: {}", map.room_list().len());
            if let Some(largest) = rooms.iter().max_by_key(|r| r.len()) {
                println!("Largest room: {} tiles at {}", largest.len(), anchor(largest));
            }
        }
        Commands::Room { file, x, y } => {
            let map = read_map(&file)?;
            let room = map
                .get_room(Position::new(x, y))
                .with_context(|| format!("Cannot flood fill from ({}, {})", x, y))?;
            println!("Room of {} tiles:", room.len());
            for pos in room.iter() {
                println!("  ({}, {})", pos.x, pos.y);
            }
        }
        Commands::Rooms { file } => {
            let map = read_map(&file)?;
            for (idx, room) in map.get_rooms_all().iter().enumerate() {
                println!("#{:<3} {:>4} tiles at {}", idx, room.len(), anchor(room));
            }
        }
        Commands::Convert { input, output, json } => {
            let map = read_map(&input)?;
            write_map(&map, &output, json)?;
            println!("Converted {} -> {}", input.display(), output.display());
        }
        Commands::Config { write } => {
            let content = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default())
                .context("Failed to serialize config")?;
            println!("{}", content);
            println!("Maps directory: {}", config.maps_dir().display());
            if let Some(path) = write {
                config
                    .save(&path)
                    .with_context(|| format!("Failed to write config to {}", path.display()))?;
            }
        }
    }

    Ok(())
}

fn read_map(path: &Path) -> Result<Map> {
    save::load_map_any(path).with_context(|| format!("Failed to load map {}", path.display()))
}

fn write_map(map: &Map, path: &Path, json: bool) -> Result<()> {
    let result = if json {
        save::save_map_json(map, path)
    } else {
        save::save_map(map, path)
    };
    result.with_context(|| format!("Failed to save map {}", path.display()))
}

fn anchor(room: &Room) -> String {
    room.first()
        .map(|p| format!("({}, {})", p.x, p.y))
        .unwrap_or_else(|| "-".to_string())
}
