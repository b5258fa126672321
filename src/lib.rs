#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Scanner
//!
//! Finds blocks of interest in a chunked voxel world, nearest first.
//!
//! Given an entity position and a predicate over block states, the scanner
//! returns world positions matching the predicate, preferring positions
//! whose chunk is close to the entity's chunk and whose height is close to
//! the entity's height.
//!
//! ## Key Modules
//!
//! * `voxels` - Block states, filters, chunk storage and the world view traits
//! * `scanner` - Ring search over chunks and palette-aware chunk scanning
//! * `config` - JSON configuration for scan runs
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_scanner::scanner::WorldScanner;
//! use voxel_scanner::voxels::block::{block_type::BlockType, BlockState};
//! use voxel_scanner::voxels::filter::BlockStateSet;
//! use voxel_scanner::voxels::view::PlayerContext;
//! use voxel_scanner::voxels::world::ChunkStore;
//!
//! let mut world = ChunkStore::unbounded(16);
//! world.set_block(Point3::new(40, 12, -9), BlockState::of(BlockType::IRON_ORE)).unwrap();
//!
//! let ctx = PlayerContext::new(Point3::new(0, 64, 0), &world);
//! let filter = BlockStateSet::parse("iron_ore").unwrap();
//! let hits = WorldScanner.scan_chunk_radius(&ctx, &filter, 1, 8, 4).unwrap();
//! assert!(hits.is_empty()); // chunk (0, 0) is not loaded, so the search stops at once
//! ```
//!
//! ## Performance Considerations
//!
//! * Sections whose palette cannot match are skipped without reading voxels
//! * Rings are enumerated by squared distance, visiting only lattice points
//! * Unloaded chunks are never requested to load; the search stops when a
//!   whole ring is unloaded

use std::error::Error;
use std::num::NonZeroUsize;

use cgmath::Point3;
use log::info;
use web_time::Instant;

use config::ScanConfig;
use scanner::WorldScanner;
use voxels::chunk::{chunk_creation::TerrainGenerator, ChunkPos};
use voxels::filter::BlockStateSet;
use voxels::view::PlayerContext;
use voxels::world::ChunkStore;

pub mod config;
pub mod error;
pub mod scanner;
pub mod voxels;

pub use error::{ConfigError, FilterParseError, ScanError};

/// Runs one scan described by the config file named on the command line.
///
/// Without an argument the default config is used. Hits are printed to
/// stdout as a JSON array of `[x, y, z]` triples.
pub fn run() -> Result<(), Box<dyn Error>> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading config from {}", path);
            ScanConfig::from_file(path)?
        }
        None => ScanConfig::default(),
    };
    let hits = run_with_config(&config)?;
    println!("{}", serde_json::to_string(&hits)?);
    Ok(())
}

/// Generates the configured world and scans it.
///
/// # Errors
/// An invalid config, an unparsable filter, or a [`ScanError`].
///
/// # Returns
/// Hit positions as `[x, y, z]` triples in scan order.
pub fn run_with_config(config: &ScanConfig) -> Result<Vec<[i32; 3]>, Box<dyn Error>> {
    config.validate()?;
    let filter = BlockStateSet::parse(&config.blocks)?;
    let feet = Point3::new(config.player[0], config.player[1], config.player[2]);

    let world_config = &config.world;
    let mut world = match NonZeroUsize::new(world_config.capacity) {
        Some(capacity) => ChunkStore::new(world_config.height_in_sections, capacity),
        None => ChunkStore::unbounded(world_config.height_in_sections),
    };
    let generator = TerrainGenerator::new(world_config.seed, world_config.height_in_sections);

    let generation_start = Instant::now();
    let generated = world.generate_around(&generator, ChunkPos::from_block(feet), world_config.view_distance);
    info!("Generated {} chunks in {:?}", generated, generation_start.elapsed());

    let ctx = PlayerContext::new(feet, &world);
    let scanner = WorldScanner;
    info!(
        "{} non-empty chunks within {} of the player",
        scanner.repack_range(&ctx, config.repack_range),
        config.repack_range
    );

    let scan_start = Instant::now();
    let hits = scanner.scan_chunk_radius(
        &ctx,
        &filter,
        config.max,
        config.y_level_threshold,
        config.max_search_radius,
    )?;
    info!("Found {} blocks in {:?}", hits.len(), scan_start.elapsed());

    Ok(hits.into_iter().map(|pos| [pos.x, pos.y, pos.z]).collect())
}
