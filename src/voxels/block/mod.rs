//! # Block Module
//!
//! This module provides the block state representation shared by the world
//! store, the filters and the scanner.
//!
//! A block state packs a block id and a 4-bit meta value into 16 bits:
//! `(block_id << 4) | meta`. The scanner never interprets states itself; it
//! only hands them to a [`BlockStateFilter`](crate::voxels::filter::BlockStateFilter).

use std::fmt;

use block_type::BlockType;

pub mod block_type;

/// The underlying integer type used to represent block ids and states in memory.
pub type BlockIdSize = u16;

/// Number of bits reserved for the meta value in a packed state.
pub const META_BITS: u32 = 4;
/// Number of distinct meta values per block.
pub const META_COUNT: u16 = 1 << META_BITS;
/// Number of distinct block states representable.
pub const STATE_COUNT: usize = 1 << 16;

/// A single packed block state.
///
/// # Memory Layout
/// `#[repr(transparent)]` over a `u16`, so buffers of raw state ids can be
/// reinterpreted as states with `bytemuck::cast_slice` without copying.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockState(pub BlockIdSize);

impl BlockState {
    /// The air state (block id 0, meta 0).
    pub const AIR: BlockState = BlockState(0);

    /// Creates the state of `block` with the given meta value.
    ///
    /// Only the low [`META_BITS`] of `meta` are kept.
    pub const fn new(block: BlockType, meta: u8) -> Self {
        BlockState(((block as BlockIdSize) << META_BITS) | (meta as BlockIdSize & (META_COUNT - 1)))
    }

    /// Creates the default (meta 0) state of `block`.
    pub const fn of(block: BlockType) -> Self {
        Self::new(block, 0)
    }

    /// The raw block id stored in this state.
    pub const fn block_id(self) -> BlockIdSize {
        self.0 >> META_BITS
    }

    /// The meta value stored in this state.
    pub const fn meta(self) -> u8 {
        (self.0 & (META_COUNT - 1)) as u8
    }

    /// Decodes the block type, if the id is a known one.
    pub fn block_type(self) -> Option<BlockType> {
        BlockType::from_id(self.block_id())
    }

    /// Whether this state is any form of air.
    pub fn is_air(self) -> bool {
        self.block_id() == BlockType::AIR as BlockIdSize
    }
}

impl fmt::Debug for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.block_type() {
            Some(block) => write!(f, "{:?}:{}", block, self.meta()),
            None => write!(f, "#{}:{}", self.block_id(), self.meta()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_block_and_meta() {
        let state = BlockState::new(BlockType::STONE, 3);
        assert_eq!(state.0, (1 << 4) | 3);
        assert_eq!(state.block_type(), Some(BlockType::STONE));
        assert_eq!(state.meta(), 3);
    }

    #[test]
    fn meta_is_truncated() {
        let state = BlockState::new(BlockType::DIRT, 0xff);
        assert_eq!(state.meta(), 0x0f);
        assert_eq!(state.block_type(), Some(BlockType::DIRT));
    }

    #[test]
    fn air_with_meta_is_still_air() {
        assert!(BlockState::AIR.is_air());
        assert!(BlockState::new(BlockType::AIR, 5).is_air());
        assert!(!BlockState::of(BlockType::WATER).is_air());
    }

    #[test]
    fn raw_ids_cast_to_states() {
        let raw: [u16; 3] = [0, 16, 32];
        let states: &[BlockState] = bytemuck::cast_slice(&raw);
        assert_eq!(states, &[BlockState::AIR, BlockState::of(BlockType::STONE), BlockState::of(BlockType::DIRT)]);
    }

    #[test]
    fn debug_names_known_blocks() {
        assert_eq!(format!("{:?}", BlockState::new(BlockType::GOLD_ORE, 1)), "GOLD_ORE:1");
        assert_eq!(format!("{:?}", BlockState(0xfff0)), "#4095:0");
    }
}
