//! # World Module
//!
//! This module provides the `ChunkStore` struct, an in-memory [`WorldView`]
//! holding the loaded chunks of one world.
//!
//! ## Architecture
//!
//! Loaded chunks live in an LRU map keyed by [`ChunkPos`]. When the store is
//! bounded and full, inserting a chunk unloads the least recently inserted or
//! edited one, the way a host unloads chunks far from the player. Reads made
//! through [`WorldView`] never touch recency, so scanning does not keep chunks
//! alive.

use std::num::NonZeroUsize;

use log::{debug, trace, warn};
use lru::LruCache;

use crate::error::ScanError;
use crate::voxels::block::BlockState;
use crate::voxels::chunk::{chunk_creation::TerrainGenerator, Chunk, ChunkPos, ChunkStatus};
use crate::voxels::view::{BlockPos, WorldView, SECTION_SIZE};

/// In-memory chunk storage implementing [`WorldView`].
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_scanner::voxels::block::{block_type::BlockType, BlockState};
/// use voxel_scanner::voxels::world::ChunkStore;
///
/// let mut world = ChunkStore::unbounded(16);
/// world.set_block(Point3::new(-3, 70, 12), BlockState::of(BlockType::GOLD_ORE)).unwrap();
/// assert_eq!(world.block(Point3::new(-3, 70, 12)), BlockState::of(BlockType::GOLD_ORE));
/// assert_eq!(world.len(), 1);
/// ```
pub struct ChunkStore {
    height_in_sections: usize,
    chunks: LruCache<ChunkPos, Chunk>,
}

impl ChunkStore {
    /// Creates a store that keeps at most `capacity` chunks loaded.
    pub fn new(height_in_sections: usize, capacity: NonZeroUsize) -> Self {
        ChunkStore {
            height_in_sections,
            chunks: LruCache::new(capacity),
        }
    }

    /// Creates a store that never unloads chunks.
    pub fn unbounded(height_in_sections: usize) -> Self {
        ChunkStore {
            height_in_sections,
            chunks: LruCache::unbounded(),
        }
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk is loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether the chunk at `pos` is loaded.
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains(&pos)
    }

    /// Loads a chunk, replacing any chunk already at its position.
    ///
    /// # Returns
    /// The chunk that was replaced or unloaded to make room, if any.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        let position = chunk.position;
        if chunk.height_in_sections() != self.height_in_sections {
            warn!(
                "Chunk {:?} has {} sections, world expects {}",
                position,
                chunk.height_in_sections(),
                self.height_in_sections
            );
        }

        let displaced = self.chunks.push(position, chunk);
        match &displaced {
            Some((old_position, _)) if *old_position == position => {
                debug!("Replaced chunk {:?}", position);
            }
            Some((evicted, _)) => {
                trace!("Unloaded chunk {:?} to make room for {:?}", evicted, position);
            }
            None => debug!("Loaded chunk {:?}", position),
        }
        displaced.map(|(_, chunk)| chunk)
    }

    /// Unloads the chunk at `pos`.
    pub fn remove(&mut self, pos: ChunkPos) -> Option<Chunk> {
        let removed = self.chunks.pop(&pos);
        if removed.is_some() {
            debug!("Unloaded chunk {:?}", pos);
        }
        removed
    }

    /// Reads the block at a world position. Unloaded chunks read as air.
    pub fn block(&self, pos: BlockPos) -> BlockState {
        match self.chunks.peek(&ChunkPos::from_block(pos)) {
            Some(chunk) => chunk.block(local(pos.x), pos.y, local(pos.z)),
            None => BlockState::AIR,
        }
    }

    /// Writes the block at a world position, loading an empty full chunk if needed.
    ///
    /// # Errors
    /// [`ScanError::LocalOutOfBounds`] if `pos.y` is outside the world height.
    pub fn set_block(&mut self, pos: BlockPos, state: BlockState) -> Result<BlockState, ScanError> {
        let chunk_pos = ChunkPos::from_block(pos);
        if !self.chunks.contains(&chunk_pos) {
            self.insert(Chunk::new(chunk_pos, self.height_in_sections, ChunkStatus::Full));
        }
        match self.chunks.get_mut(&chunk_pos) {
            Some(chunk) => chunk.set_block(local(pos.x), pos.y, local(pos.z), state),
            None => Err(ScanError::LocalOutOfBounds {
                x: local(pos.x),
                y: pos.y.max(0) as usize,
                z: local(pos.z),
            }),
        }
    }

    /// Generates and loads every missing chunk within a Chebyshev `radius` of `center`.
    ///
    /// # Returns
    /// The number of chunks generated.
    pub fn generate_around(&mut self, generator: &TerrainGenerator, center: ChunkPos, radius: i32) -> usize {
        let mut generated = 0;
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let pos = center.offset(dx, dz);
                if self.chunks.contains(&pos) {
                    continue;
                }
                self.insert(generator.generate(pos));
                generated += 1;
            }
        }
        debug!("Generated {} chunks around {:?}", generated, center);
        generated
    }
}

impl WorldView for ChunkStore {
    type Chunk = Chunk;

    fn height_in_sections(&self) -> usize {
        self.height_in_sections
    }

    fn chunk_now(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.peek(&pos)
    }

    fn chunk_full(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks
            .peek(&pos)
            .filter(|chunk| chunk.status == ChunkStatus::Full)
    }
}

fn local(coordinate: i32) -> usize {
    (coordinate & (SECTION_SIZE as i32 - 1)) as usize
}
