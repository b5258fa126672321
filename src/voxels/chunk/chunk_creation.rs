//! # Chunk Creation Module
//!
//! Deterministic terrain generation used to populate an in-memory world.
//!
//! Terrain is a Perlin height map: bedrock at y = 0, stone up to a few
//! blocks below the surface, then dirt and a grass (or sand, under water)
//! top. Below sea level the column is filled with water. Ore veins are
//! scattered with a per-chunk seeded RNG, each ore restricted to a depth band.

use log::warn;
use noise::{NoiseFn, Perlin};

use super::section::{PalettedSection, SECTION_VOLUME};
use super::{Chunk, ChunkPos, ChunkStatus};
use crate::voxels::block::{block_type::BlockType, BlockState};
use crate::voxels::view::{SECTION_SHIFT, SECTION_SIZE};

/// Sea level in blocks.
pub const SEA_LEVEL: i32 = 62;
/// Scaling factor applied to block coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.015;
/// Maximum deviation of the surface from sea level.
pub const SURFACE_AMPLITUDE: f64 = 20.0;
/// Ore veins attempted per chunk.
pub const VEINS_PER_CHUNK: usize = 12;
/// Maximum blocks in one vein.
pub const MAX_VEIN_SIZE: usize = 6;

/// Generates chunks for a world of fixed height.
pub struct TerrainGenerator {
    seed: u32,
    height_in_sections: usize,
    perlin: Perlin,
}

impl TerrainGenerator {
    /// Creates a generator.
    ///
    /// # Arguments
    /// * `seed` - Seed for both the height map and ore placement
    /// * `height_in_sections` - Number of sections in every generated chunk
    pub fn new(seed: u32, height_in_sections: usize) -> Self {
        TerrainGenerator {
            seed,
            height_in_sections,
            perlin: Perlin::new(seed),
        }
    }

    /// World height in blocks.
    pub fn world_height(&self) -> i32 {
        (self.height_in_sections << SECTION_SHIFT) as i32
    }

    /// Height of the topmost solid block of the column at block `(x, z)`.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let sample = self
            .perlin
            .get([x as f64 * PERLIN_SCALE_FACTOR, z as f64 * PERLIN_SCALE_FACTOR]);
        let height = SEA_LEVEL + (sample * SURFACE_AMPLITUDE).round() as i32;
        height.clamp(1, (self.world_height() - 2).max(1))
    }

    /// Generates the full chunk at `position`.
    ///
    /// The same seed and position always produce the same chunk.
    pub fn generate(&self, position: ChunkPos) -> Chunk {
        let mut surfaces = [[0; SECTION_SIZE]; SECTION_SIZE];
        for (z, row) in surfaces.iter_mut().enumerate() {
            for (x, surface) in row.iter_mut().enumerate() {
                *surface = self.surface_height(position.min_block_x() + x as i32, position.min_block_z() + z as i32);
            }
        }

        let sections = (0..self.height_in_sections)
            .map(|section_y| {
                let base_y = (section_y << SECTION_SHIFT) as i32;
                let mut ids = [0u16; SECTION_VOLUME];
                for (index, id) in ids.iter_mut().enumerate() {
                    let (x, y, z) = (index & 15, (index >> 8) as i32, (index >> 4) & 15);
                    if let Some(block) = column_block(base_y + y, surfaces[z][x]) {
                        *id = BlockState::of(block).0;
                    }
                }
                ids.iter().any(|&id| id != 0).then(|| PalettedSection::from_raw_ids(&ids))
            })
            .collect();

        let mut chunk = Chunk::from_sections(position, ChunkStatus::Proto, sections);
        self.scatter_ores(&mut chunk);
        chunk.status = ChunkStatus::Full;
        chunk
    }

    /// Replaces stone with ore veins.
    fn scatter_ores(&self, chunk: &mut Chunk) {
        let mut rng = fastrand::Rng::with_seed(self.chunk_seed(chunk.position));

        for _ in 0..VEINS_PER_CHUNK {
            let ore = BlockType::random_ore(&mut rng);
            let max_y = ore_ceiling(ore).min(self.world_height() - 1);
            let mut x = rng.usize(0..SECTION_SIZE);
            let mut y = rng.i32(1..=max_y.max(1));
            let mut z = rng.usize(0..SECTION_SIZE);

            for _ in 0..rng.usize(1..=MAX_VEIN_SIZE) {
                if chunk.block(x, y, z) == BlockState::of(BlockType::STONE) {
                    let meta = rng.u8(0..4);
                    place(chunk, x, y, z, BlockState::new(ore, meta));
                }
                match rng.u8(0..3) {
                    0 => x = (x + 1).min(SECTION_SIZE - 1),
                    1 => y = (y + 1).min(max_y),
                    _ => z = (z + 1).min(SECTION_SIZE - 1),
                }
            }
        }
    }

    fn chunk_seed(&self, position: ChunkPos) -> u64 {
        let x = position.x as u32 as u64;
        let z = position.z as u32 as u64;
        (u64::from(self.seed) << 32) ^ x.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ z.wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
    }
}

/// The block at height `y` of a column whose top solid block is at `surface`.
///
/// `None` is air.
fn column_block(y: i32, surface: i32) -> Option<BlockType> {
    let block = if y == 0 {
        BlockType::BEDROCK
    } else if y < surface - 3 {
        BlockType::STONE
    } else if y < surface {
        if surface <= SEA_LEVEL { BlockType::GRAVEL } else { BlockType::DIRT }
    } else if y == surface {
        if surface <= SEA_LEVEL { BlockType::SAND } else { BlockType::GRASS }
    } else if y <= SEA_LEVEL {
        BlockType::WATER
    } else {
        return None;
    };
    Some(block)
}

/// Highest y an ore may generate at.
fn ore_ceiling(ore: BlockType) -> i32 {
    match ore {
        BlockType::DIAMOND_ORE => 16,
        BlockType::GOLD_ORE => 32,
        BlockType::IRON_ORE => 64,
        _ => 128,
    }
}

fn place(chunk: &mut Chunk, x: usize, y: i32, z: usize, state: BlockState) {
    if let Err(err) = chunk.set_block(x, y, z, state) {
        warn!("Skipping block {:?} in chunk {:?}: {}", state, chunk.position, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::view::ChunkView;

    #[test]
    fn generation_is_deterministic() {
        let generator = TerrainGenerator::new(42, 16);
        let a = generator.generate(ChunkPos::new(3, -7));
        let b = generator.generate(ChunkPos::new(3, -7));
        assert_eq!(a.sections(), b.sections());
        assert_eq!(a.status, ChunkStatus::Full);
    }

    #[test]
    fn column_layers() {
        let generator = TerrainGenerator::new(1, 16);
        let chunk = generator.generate(ChunkPos::new(0, 0));
        let surface = generator.surface_height(5, 5);

        assert_eq!(chunk.block(5, 0, 5), BlockState::of(BlockType::BEDROCK));
        let top = chunk.block(5, surface, 5).block_type().unwrap();
        assert!(matches!(top, BlockType::GRASS | BlockType::SAND));
        assert!(chunk.block(5, surface.max(SEA_LEVEL) + 1, 5).is_air());
    }

    #[test]
    fn ores_respect_depth_bands() {
        let generator = TerrainGenerator::new(9, 16);
        for cx in -2..2 {
            let chunk = generator.generate(ChunkPos::new(cx, 1));
            for y in 17..256 {
                for z in 0..16 {
                    for x in 0..16 {
                        assert_ne!(chunk.block(x, y, z).block_type(), Some(BlockType::DIAMOND_ORE));
                    }
                }
            }
        }
    }

    #[test]
    fn zero_height_generator_does_not_panic() {
        let generator = TerrainGenerator::new(5, 0);
        assert_eq!(generator.surface_height(3, 4), 1);
        assert_eq!(generator.generate(ChunkPos::new(0, 0)).height_in_sections(), 0);
    }

    #[test]
    fn short_worlds_clamp_the_surface() {
        let generator = TerrainGenerator::new(5, 2);
        for x in -40..40 {
            let height = generator.surface_height(x, x * 3);
            assert!((1..=30).contains(&height));
        }
        let chunk = generator.generate(ChunkPos::new(0, 0));
        assert_eq!(chunk.height_in_sections(), 2);
    }
}
