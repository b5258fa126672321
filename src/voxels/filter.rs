//! # Filter Module
//!
//! Predicates over block states. The scanner treats a filter as an opaque
//! membership test plus a cheap "could this section contain a match" check.

use bitvec::prelude::*;

use crate::error::FilterParseError;
use crate::voxels::block::{block_type::BlockType, BlockState, META_COUNT, STATE_COUNT};
use crate::voxels::view::PaletteSummary;

/// A predicate over block states.
pub trait BlockStateFilter {
    /// Whether no state at all is accepted.
    fn is_empty(&self) -> bool;

    /// Whether `state` is accepted.
    fn accepts(&self, state: BlockState) -> bool;

    /// Whether a section with this palette may contain an accepted state.
    ///
    /// May answer `true` spuriously, but must never answer `false` when an
    /// accepted state is present.
    fn any_in_palette(&self, palette: PaletteSummary<'_>) -> bool {
        palette.any_state(|state| self.accepts(state))
    }
}

/// A set of accepted block states, stored as a bitset over every state id.
///
/// # Examples
/// ```
/// use voxel_scanner::voxels::block::{block_type::BlockType, BlockState};
/// use voxel_scanner::voxels::filter::{BlockStateFilter, BlockStateSet};
///
/// let filter = BlockStateSet::parse("diamond_ore, stone:1").unwrap();
/// assert!(filter.accepts(BlockState::new(BlockType::DIAMOND_ORE, 7)));
/// assert!(filter.accepts(BlockState::new(BlockType::STONE, 1)));
/// assert!(!filter.accepts(BlockState::new(BlockType::STONE, 0)));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BlockStateSet {
    states: BitVec<u64, Lsb0>,
}

impl BlockStateSet {
    /// Creates a filter that accepts nothing.
    pub fn new() -> Self {
        BlockStateSet {
            states: bitvec![u64, Lsb0; 0; STATE_COUNT],
        }
    }

    /// Accepts a single state.
    pub fn insert(&mut self, state: BlockState) {
        self.states.set(state.0 as usize, true);
    }

    /// Accepts every meta value of `block`.
    pub fn insert_block(&mut self, block: BlockType) {
        let first = BlockState::of(block).0 as usize;
        self.states[first..first + META_COUNT as usize].fill(true);
    }

    /// Builds a filter accepting every meta value of each block.
    pub fn from_blocks(blocks: &[BlockType]) -> Self {
        let mut set = Self::new();
        for &block in blocks {
            set.insert_block(block);
        }
        set
    }

    /// Parses a list of `name[:meta]` entries separated by commas or whitespace.
    ///
    /// A bare name accepts every meta of the block, a name with a meta
    /// accepts exactly that state. Names may carry a `minecraft:` prefix.
    ///
    /// # Errors
    /// [`FilterParseError::UnknownBlock`] for names missing from the registry,
    /// [`FilterParseError::InvalidMeta`] for a meta that is not in `0..16`.
    pub fn parse(text: &str) -> Result<Self, FilterParseError> {
        let mut set = Self::new();
        for entry in text.split(|c: char| c == ',' || c.is_whitespace()) {
            if entry.is_empty() {
                continue;
            }
            let (name, meta) = split_meta(entry)?;
            let block = BlockType::from_name(name)
                .ok_or_else(|| FilterParseError::UnknownBlock(name.to_string()))?;
            match meta {
                Some(meta) => set.insert(BlockState::new(block, meta)),
                None => set.insert_block(block),
            }
        }
        Ok(set)
    }

    /// Number of accepted states.
    pub fn len(&self) -> usize {
        self.states.count_ones()
    }
}

/// Splits `entry` into a name and an optional trailing numeric meta.
///
/// Only an all-digit suffix is a meta: `minecraft:stone` and `foo:bar` are
/// plain (namespaced) names, `minecraft:stone:2` and `stone:2` carry one.
fn split_meta(entry: &str) -> Result<(&str, Option<u8>), FilterParseError> {
    let Some((head, tail)) = entry.rsplit_once(':') else {
        return Ok((entry, None));
    };
    if tail.is_empty() || !tail.chars().all(|c| c.is_ascii_digit()) {
        return Ok((entry, None));
    }
    match tail.parse::<u8>() {
        Ok(meta) if u16::from(meta) < META_COUNT => Ok((head, Some(meta))),
        _ => Err(FilterParseError::InvalidMeta(entry.to_string())),
    }
}

impl Default for BlockStateSet {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BlockStateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(self.states.iter_ones().map(|id| BlockState(id as u16)))
            .finish()
    }
}

impl BlockStateFilter for BlockStateSet {
    fn is_empty(&self) -> bool {
        self.states.not_any()
    }

    fn accepts(&self, state: BlockState) -> bool {
        self.states[state.0 as usize]
    }
}

impl<F: BlockStateFilter + ?Sized> BlockStateFilter for &F {
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn accepts(&self, state: BlockState) -> bool {
        (**self).accepts(state)
    }

    fn any_in_palette(&self, palette: PaletteSummary<'_>) -> bool {
        (**self).any_in_palette(palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_set_is_empty() {
        let set = BlockStateSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.accepts(BlockState::AIR));
    }

    #[test]
    fn insert_block_covers_all_metas() {
        let set = BlockStateSet::from_blocks(&[BlockType::LOG]);
        assert_eq!(set.len(), 16);
        for meta in 0..16 {
            assert!(set.accepts(BlockState::new(BlockType::LOG, meta)));
        }
        assert!(!set.accepts(BlockState::of(BlockType::LEAVES)));
    }

    #[test]
    fn parse_mixed_entries() {
        let set = BlockStateSet::parse("minecraft:iron_ore,  gold_ore:3\ncoal_ore").unwrap();
        assert_eq!(set.len(), 16 + 1 + 16);
        assert!(set.accepts(BlockState::new(BlockType::IRON_ORE, 9)));
        assert!(set.accepts(BlockState::new(BlockType::GOLD_ORE, 3)));
        assert!(!set.accepts(BlockState::new(BlockType::GOLD_ORE, 4)));
    }

    #[test]
    fn parse_namespaced_meta() {
        let set = BlockStateSet::parse("minecraft:stone:2").unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.accepts(BlockState::new(BlockType::STONE, 2)));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            BlockStateSet::parse("stone, obsidian"),
            Err(FilterParseError::UnknownBlock("obsidian".to_string()))
        );
        assert_eq!(
            BlockStateSet::parse("stone:16"),
            Err(FilterParseError::InvalidMeta("stone:16".to_string()))
        );
        assert_eq!(
            BlockStateSet::parse("stone:999"),
            Err(FilterParseError::InvalidMeta("stone:999".to_string()))
        );
    }

    #[test]
    fn foreign_namespaces_are_unknown_blocks() {
        assert_eq!(
            BlockStateSet::parse("foo:bar"),
            Err(FilterParseError::UnknownBlock("foo:bar".to_string()))
        );
        assert_eq!(
            BlockStateSet::parse("stone:x"),
            Err(FilterParseError::UnknownBlock("stone:x".to_string()))
        );
        assert_eq!(
            BlockStateSet::parse("minecraft:"),
            Err(FilterParseError::UnknownBlock("minecraft:".to_string()))
        );
    }

    #[test]
    fn parse_empty_text_gives_empty_filter() {
        assert!(BlockStateSet::parse("  , ").unwrap().is_empty());
    }

    #[test]
    fn palette_check_never_misses() {
        let set = BlockStateSet::from_blocks(&[BlockType::DIAMOND_ORE]);
        let diamond = BlockState::of(BlockType::DIAMOND_ORE);
        let stone = BlockState::of(BlockType::STONE);

        assert!(set.any_in_palette(PaletteSummary::Single(diamond)));
        assert!(!set.any_in_palette(PaletteSummary::Single(stone)));
        assert!(set.any_in_palette(PaletteSummary::Indirect(&[stone, diamond])));
        assert!(!set.any_in_palette(PaletteSummary::Indirect(&[stone, BlockState::AIR])));
        assert!(set.any_in_palette(PaletteSummary::Global));
    }
}
