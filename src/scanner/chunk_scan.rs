//! Scanning a single chunk into a result buffer.

use cgmath::Point3;

use super::section_order::SectionOrder;
use crate::error::ScanError;
use crate::voxels::chunk::ChunkPos;
use crate::voxels::filter::BlockStateFilter;
use crate::voxels::view::{BlockPos, ChunkView, SectionView, SECTION_SHIFT, SECTION_SIZE};

/// Limits applied while filling a result buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScanLimits {
    pub max: usize,
    pub y_level_threshold: i32,
    pub player_y: i32,
}

impl ScanLimits {
    fn within_y(&self, y: i32) -> bool {
        (i64::from(y) - i64::from(self.player_y)).abs() < i64::from(self.y_level_threshold)
    }
}

/// Appends every accepted block of `chunk` to `result`, sections in `order`.
///
/// Appending continues past `limits.max`; the cap only switches on the
/// vertical-locality rule. Once the cap is reached, a hit within the Y
/// threshold marks the chunk, and a later hit outside the threshold in a
/// marked chunk abandons the rest of the chunk.
///
/// # Returns
/// Whether a within-threshold hit was found after the cap was reached.
///
/// # Errors
/// [`ScanError::SectionCountMismatch`] if the chunk's section array does not
/// match `order`, and any error from the section accessor.
pub(crate) fn scan_chunk_into<C, F>(
    pos: ChunkPos,
    chunk: &C,
    filter: &F,
    result: &mut Vec<BlockPos>,
    limits: ScanLimits,
    order: &SectionOrder,
) -> Result<bool, ScanError>
where
    C: ChunkView + ?Sized,
    F: BlockStateFilter + ?Sized,
{
    let sections = chunk.sections();
    if sections.len() != order.len() {
        return Err(ScanError::SectionCountMismatch {
            expected: order.len(),
            actual: sections.len(),
        });
    }

    let chunk_x = pos.min_block_x();
    let chunk_z = pos.min_block_z();
    let mut found_within_y = false;

    for &section_y in order.as_slice() {
        let Some(section) = &sections[section_y] else {
            continue;
        };
        if section.is_empty() || !filter.any_in_palette(section.palette()) {
            continue;
        }

        let y_base = (section_y as i32) << SECTION_SHIFT;
        for yy in 0..SECTION_SIZE {
            for z in 0..SECTION_SIZE {
                for x in 0..SECTION_SIZE {
                    if !filter.accepts(section.state(x, yy, z)?) {
                        continue;
                    }
                    let y = y_base | yy as i32;
                    if result.len() >= limits.max {
                        if limits.within_y(y) {
                            found_within_y = true;
                        } else if found_within_y {
                            return Ok(true);
                        }
                    }
                    result.push(Point3::new(chunk_x | x as i32, y, chunk_z | z as i32));
                }
            }
        }
    }
    Ok(found_within_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::{block_type::BlockType, BlockState};
    use crate::voxels::chunk::{Chunk, ChunkStatus, PalettedSection};
    use crate::voxels::filter::BlockStateSet;

    fn gold() -> BlockState {
        BlockState::of(BlockType::GOLD_ORE)
    }

    fn chunk_with(pos: ChunkPos, blocks: &[(usize, i32, usize)]) -> Chunk {
        let mut chunk = Chunk::new(pos, 16, ChunkStatus::Full);
        for &(x, y, z) in blocks {
            chunk.set_block(x, y, z, gold()).unwrap();
        }
        chunk
    }

    fn limits(max: usize) -> ScanLimits {
        ScanLimits {
            max,
            y_level_threshold: 8,
            player_y: 64,
        }
    }

    #[test]
    fn collects_in_section_then_yzx_order() {
        let chunk = chunk_with(ChunkPos::new(0, 0), &[(5, 64, 0), (0, 65, 0), (0, 64, 3), (1, 10, 1)]);
        let filter = BlockStateSet::from_blocks(&[BlockType::GOLD_ORE]);
        let mut result = Vec::new();

        let found = scan_chunk_into(
            ChunkPos::new(0, 0),
            &chunk,
            &filter,
            &mut result,
            limits(100),
            &SectionOrder::nearest_to(64, 16),
        )
        .unwrap();

        assert!(!found);
        assert_eq!(
            result,
            vec![
                Point3::new(5, 64, 0),
                Point3::new(0, 64, 3),
                Point3::new(0, 65, 0),
                Point3::new(1, 10, 1),
            ]
        );
    }

    #[test]
    fn negative_chunks_map_to_world_coordinates() {
        let pos = ChunkPos::new(-1, -2);
        let chunk = chunk_with(pos, &[(15, 3, 0)]);
        let filter = BlockStateSet::from_blocks(&[BlockType::GOLD_ORE]);
        let mut result = Vec::new();

        scan_chunk_into(pos, &chunk, &filter, &mut result, limits(10), &SectionOrder::natural(16)).unwrap();
        assert_eq!(result, vec![Point3::new(-1, 3, -32)]);
    }

    #[test]
    fn over_collects_past_the_cap() {
        let chunk = chunk_with(ChunkPos::new(0, 0), &[(0, 100, 0), (1, 100, 0), (2, 100, 0)]);
        let filter = BlockStateSet::from_blocks(&[BlockType::GOLD_ORE]);
        let mut result = Vec::new();

        let found = scan_chunk_into(
            ChunkPos::new(0, 0),
            &chunk,
            &filter,
            &mut result,
            limits(1),
            &SectionOrder::natural(16),
        )
        .unwrap();

        assert!(!found);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn abandons_chunk_after_y_local_hit() {
        // Section 4 holds the y-local hits, section 12 the far one.
        let chunk = chunk_with(ChunkPos::new(0, 0), &[(0, 64, 0), (1, 64, 0), (0, 200, 0)]);
        let filter = BlockStateSet::from_blocks(&[BlockType::GOLD_ORE]);
        let mut result = vec![Point3::new(99, 99, 99)];

        let found = scan_chunk_into(
            ChunkPos::new(0, 0),
            &chunk,
            &filter,
            &mut result,
            limits(1),
            &SectionOrder::nearest_to(64, 16),
        )
        .unwrap();

        assert!(found);
        assert_eq!(
            result,
            vec![Point3::new(99, 99, 99), Point3::new(0, 64, 0), Point3::new(1, 64, 0)]
        );
    }

    #[test]
    fn far_hits_before_any_local_hit_are_kept() {
        // Natural order visits the far section 0 first.
        let chunk = chunk_with(ChunkPos::new(0, 0), &[(0, 2, 0), (0, 64, 0), (0, 200, 0)]);
        let filter = BlockStateSet::from_blocks(&[BlockType::GOLD_ORE]);
        let mut result = vec![Point3::new(99, 99, 99)];

        let found = scan_chunk_into(
            ChunkPos::new(0, 0),
            &chunk,
            &filter,
            &mut result,
            limits(1),
            &SectionOrder::natural(16),
        )
        .unwrap();

        assert!(found);
        assert_eq!(
            &result[1..],
            &[Point3::new(0, 2, 0), Point3::new(0, 64, 0)]
        );
    }

    #[test]
    fn skips_sections_without_palette_match() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), 16, ChunkStatus::Full);
        chunk.set_block(0, 0, 0, BlockState::of(BlockType::STONE)).unwrap();
        let filter = BlockStateSet::from_blocks(&[BlockType::GOLD_ORE]);
        let mut result = Vec::new();

        let found = scan_chunk_into(
            ChunkPos::new(0, 0),
            &chunk,
            &filter,
            &mut result,
            limits(1),
            &SectionOrder::natural(16),
        )
        .unwrap();
        assert!(!found);
        assert!(result.is_empty());
    }

    #[test]
    fn section_count_mismatch_is_fatal() {
        let chunk = Chunk::from_sections(
            ChunkPos::new(0, 0),
            ChunkStatus::Full,
            vec![Some(PalettedSection::filled(gold())); 8],
        );
        let filter = BlockStateSet::from_blocks(&[BlockType::GOLD_ORE]);
        let mut result = Vec::new();

        let err = scan_chunk_into(
            ChunkPos::new(0, 0),
            &chunk,
            &filter,
            &mut result,
            limits(1),
            &SectionOrder::natural(16),
        )
        .unwrap_err();
        assert_eq!(err, ScanError::SectionCountMismatch { expected: 16, actual: 8 });
        assert!(result.is_empty());
    }
}
