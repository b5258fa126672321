//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a full-height column of
//! palette-compressed sections addressed by a horizontal [`ChunkPos`].
//!
//! ## Coordinates
//!
//! A chunk covers 16×16 blocks horizontally and the whole world height
//! vertically. Block `(x, y, z)` lives in chunk `(x >> 4, z >> 4)` and in
//! section `y >> 4` of that chunk. All shifts are arithmetic, so negative
//! coordinates round towards negative infinity.
//!
//! ## Lifecycle
//!
//! Chunks start as [`ChunkStatus::Proto`] while they are being populated and
//! become [`ChunkStatus::Full`] once complete. Only full chunks are handed out
//! by [`WorldView::chunk_full`](crate::voxels::view::WorldView::chunk_full).

use crate::error::ScanError;
use crate::voxels::block::BlockState;
use crate::voxels::view::{BlockPos, ChunkView, SECTION_SHIFT, SECTION_SIZE};

pub use section::PalettedSection;

pub mod chunk_creation;
pub mod section;

/// Horizontal chunk coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkPos {
    /// Chunk x (block x >> 4).
    pub x: i32,
    /// Chunk z (block z >> 4).
    pub z: i32,
}

impl ChunkPos {
    /// Lowest chunk coordinate holding an `i32` block position.
    pub const MIN_COORD: i32 = i32::MIN >> SECTION_SHIFT;
    /// Highest chunk coordinate holding an `i32` block position.
    pub const MAX_COORD: i32 = i32::MAX >> SECTION_SHIFT;

    /// Creates a chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkPos { x, z }
    }

    /// The chunk containing a block position.
    ///
    /// # Example
    /// ```
    /// use cgmath::Point3;
    /// use voxel_scanner::voxels::chunk::ChunkPos;
    ///
    /// assert_eq!(ChunkPos::from_block(Point3::new(17, 64, -1)), ChunkPos::new(1, -1));
    /// ```
    pub fn from_block(pos: BlockPos) -> Self {
        ChunkPos {
            x: pos.x >> SECTION_SHIFT,
            z: pos.z >> SECTION_SHIFT,
        }
    }

    /// Block x of the chunk's minimum corner.
    pub fn min_block_x(&self) -> i32 {
        self.x << SECTION_SHIFT
    }

    /// Block z of the chunk's minimum corner.
    pub fn min_block_z(&self) -> i32 {
        self.z << SECTION_SHIFT
    }

    /// Offsets this coordinate by whole chunks.
    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        ChunkPos::new(self.x + dx, self.z + dz)
    }

    /// Chebyshev (chessboard) distance in chunks.
    pub fn chebyshev_distance(&self, other: ChunkPos) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// Squared Euclidean distance in chunks.
    pub fn distance_squared(&self, other: ChunkPos) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dz = i64::from(self.z - other.z);
        dx * dx + dz * dz
    }
}

/// Population state of a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkStatus {
    /// Still being generated; some population steps are missing.
    Proto,
    /// Every population step has completed.
    Full,
}

/// A column of sections spanning the whole world height.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates.
    pub position: ChunkPos,

    /// Population state.
    pub status: ChunkStatus,

    /// Sections bottom first. `None` means the section was never written.
    sections: Vec<Option<PalettedSection>>,
}

impl Chunk {
    /// Creates a chunk with `height_in_sections` absent sections.
    pub fn new(position: ChunkPos, height_in_sections: usize, status: ChunkStatus) -> Self {
        Chunk {
            position,
            status,
            sections: vec![None; height_in_sections],
        }
    }

    /// Creates a chunk from an explicit section array.
    ///
    /// The array length is not checked against any world; scanning a chunk
    /// whose length differs from the world height is reported by the scanner.
    pub fn from_sections(position: ChunkPos, status: ChunkStatus, sections: Vec<Option<PalettedSection>>) -> Self {
        Chunk {
            position,
            status,
            sections,
        }
    }

    /// Number of sections in this chunk.
    pub fn height_in_sections(&self) -> usize {
        self.sections.len()
    }

    /// Mutable access to a section, creating it as air if absent.
    ///
    /// # Returns
    /// `None` if `section_y` is outside the chunk.
    pub fn section_mut(&mut self, section_y: usize) -> Option<&mut PalettedSection> {
        self.sections
            .get_mut(section_y)
            .map(|slot| slot.get_or_insert_with(PalettedSection::air))
    }

    /// Reads a block at chunk-local x/z and absolute y.
    ///
    /// Positions outside the column (or in absent sections) read as air.
    pub fn block(&self, x: usize, y: i32, z: usize) -> BlockState {
        if y < 0 || x >= SECTION_SIZE || z >= SECTION_SIZE {
            return BlockState::AIR;
        }
        match self.sections.get((y >> SECTION_SHIFT) as usize) {
            Some(Some(section)) => section.get(x, (y & 15) as usize, z),
            _ => BlockState::AIR,
        }
    }

    /// Writes a block at chunk-local x/z and absolute y.
    ///
    /// # Errors
    /// [`ScanError::LocalOutOfBounds`] if x/z are not in `0..16` or y is
    /// outside the column.
    pub fn set_block(&mut self, x: usize, y: i32, z: usize, state: BlockState) -> Result<BlockState, ScanError> {
        let out_of_bounds = ScanError::LocalOutOfBounds {
            x,
            y: y.max(0) as usize,
            z,
        };
        if y < 0 {
            return Err(out_of_bounds);
        }
        let section = self
            .section_mut((y >> SECTION_SHIFT) as usize)
            .ok_or(out_of_bounds)?;
        section.set(x, (y & 15) as usize, z, state)
    }
}

impl ChunkView for Chunk {
    type Section = PalettedSection;

    fn sections(&self) -> &[Option<PalettedSection>] {
        &self.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::block_type::BlockType;
    use cgmath::Point3;

    #[test]
    fn chunk_pos_from_negative_blocks() {
        assert_eq!(ChunkPos::from_block(Point3::new(0, 0, 0)), ChunkPos::new(0, 0));
        assert_eq!(ChunkPos::from_block(Point3::new(15, 0, 16)), ChunkPos::new(0, 1));
        assert_eq!(ChunkPos::from_block(Point3::new(-1, 0, -16)), ChunkPos::new(-1, -1));
        assert_eq!(ChunkPos::from_block(Point3::new(-17, 0, 0)), ChunkPos::new(-2, 0));
        assert_eq!(ChunkPos::new(-2, 3).min_block_x(), -32);
        assert_eq!(ChunkPos::new(-2, 3).min_block_z(), 48);
    }

    #[test]
    fn distances() {
        let origin = ChunkPos::new(0, 0);
        assert_eq!(origin.chebyshev_distance(ChunkPos::new(-3, 2)), 3);
        assert_eq!(origin.distance_squared(ChunkPos::new(-3, 2)), 13);
    }

    #[test]
    fn new_chunk_is_empty() {
        let chunk = Chunk::new(ChunkPos::new(0, 0), 16, ChunkStatus::Full);
        assert!(chunk.is_empty());
        assert_eq!(chunk.sections().len(), 16);
    }

    #[test]
    fn set_block_creates_section() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), 16, ChunkStatus::Full);
        let ore = BlockState::of(BlockType::IRON_ORE);
        chunk.set_block(3, 70, 9, ore).unwrap();

        assert!(!chunk.is_empty());
        assert!(chunk.sections()[4].is_some());
        assert!(chunk.sections()[3].is_none());
        assert_eq!(chunk.block(3, 70, 9), ore);
        assert_eq!(chunk.block(3, 71, 9), BlockState::AIR);
    }

    #[test]
    fn air_only_sections_keep_chunk_empty() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), 4, ChunkStatus::Full);
        chunk.set_block(0, 0, 0, BlockState::AIR).unwrap();
        assert!(chunk.sections()[0].is_some());
        assert!(chunk.is_empty());
    }

    #[test]
    fn set_block_outside_column_fails() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), 4, ChunkStatus::Full);
        assert!(chunk.set_block(0, 64, 0, BlockState::AIR).is_err());
        assert!(chunk.set_block(0, -1, 0, BlockState::AIR).is_err());
        assert!(chunk.set_block(16, 0, 0, BlockState::AIR).is_err());
        assert_eq!(chunk.block(0, 64, 0), BlockState::AIR);
    }
}
