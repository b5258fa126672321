//! # Scanner Module
//!
//! Finds blocks matching a [`BlockStateFilter`] around an entity, preferring
//! blocks that are horizontally close (by chunk) and vertically close (by
//! block).
//!
//! ## Search Order
//!
//! Chunks are visited ring by ring, where ring `R` holds every chunk offset
//! `(dx, dz)` with `dx² + dz² == R`. Inside a chunk, sections are visited
//! nearest to the entity's section first, and voxels in `(y, z, x)` order.
//! Sections whose palette cannot contain a match are skipped whole.
//!
//! ## Termination
//!
//! The ring search stops when either
//! - a ring had candidate chunk positions but none of them was loaded, or
//! - at least `max` blocks were collected and either the ring index exceeds
//!   `max_search_radius²`, or the ring index exceeds 1 and some chunk found
//!   a within-threshold block after the cap was reached.
//!
//! The result may hold more than `max` positions; callers trim as needed.

use log::trace;

use crate::error::ScanError;
use crate::voxels::chunk::ChunkPos;
use crate::voxels::filter::BlockStateFilter;
use crate::voxels::view::{BlockPos, ChunkView, EntityContext, WorldView};

use chunk_scan::{scan_chunk_into, ScanLimits};

mod chunk_scan;
pub mod ring;
pub mod section_order;

pub use ring::RingIterator;
pub use section_order::SectionOrder;

/// Chebyshev chunk range used by [`WorldScanner::repack`].
pub const DEFAULT_REPACK_RANGE: i32 = 40;

/// Stateless block scanner.
///
/// Holds no data between calls; construct one wherever it is needed.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_scanner::scanner::WorldScanner;
/// use voxel_scanner::voxels::block::{block_type::BlockType, BlockState};
/// use voxel_scanner::voxels::filter::BlockStateSet;
/// use voxel_scanner::voxels::view::PlayerContext;
/// use voxel_scanner::voxels::world::ChunkStore;
///
/// let mut world = ChunkStore::unbounded(16);
/// world.set_block(Point3::new(2, 64, 5), BlockState::of(BlockType::DIAMOND_ORE)).unwrap();
///
/// let ctx = PlayerContext::new(Point3::new(8, 64, 8), &world);
/// let filter = BlockStateSet::from_blocks(&[BlockType::DIAMOND_ORE]);
/// let found = WorldScanner.scan_chunk_radius(&ctx, &filter, 10, 8, 4).unwrap();
/// assert_eq!(found, vec![Point3::new(2, 64, 5)]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldScanner;

impl WorldScanner {
    /// Searches outward from the entity's chunk for blocks accepted by `filter`.
    ///
    /// # Arguments
    /// * `ctx` - The entity to centre the search on
    /// * `filter` - Accepted block states
    /// * `max` - Number of results after which termination rules apply
    /// * `y_level_threshold` - Vertical distance below which a hit counts as local
    /// * `max_search_radius` - Euclidean chunk radius past which a full result stops the search
    ///
    /// # Errors
    /// [`ScanError`] if a loaded chunk does not match the world's height.
    pub fn scan_chunk_radius<C, F>(
        &self,
        ctx: &C,
        filter: &F,
        max: usize,
        y_level_threshold: i32,
        max_search_radius: i32,
    ) -> Result<Vec<BlockPos>, ScanError>
    where
        C: EntityContext,
        F: BlockStateFilter + ?Sized,
    {
        self.scan_chunk_radius_until(ctx, filter, max, y_level_threshold, max_search_radius, || false)
    }

    /// Same as [`scan_chunk_radius`](Self::scan_chunk_radius), polling
    /// `should_cancel` before every ring.
    ///
    /// When `should_cancel` returns `true` the search stops and the positions
    /// collected so far are returned as they are.
    pub fn scan_chunk_radius_until<C, F, S>(
        &self,
        ctx: &C,
        filter: &F,
        max: usize,
        y_level_threshold: i32,
        max_search_radius: i32,
        mut should_cancel: S,
    ) -> Result<Vec<BlockPos>, ScanError>
    where
        C: EntityContext,
        F: BlockStateFilter + ?Sized,
        S: FnMut() -> bool,
    {
        let mut result = Vec::new();
        if filter.is_empty() {
            return Ok(result);
        }

        let world = ctx.world();
        let feet = ctx.feet_pos();
        let player_chunk = ChunkPos::from_block(feet);
        let order = SectionOrder::nearest_to(feet.y, world.height_in_sections());
        let limits = ScanLimits {
            max,
            y_level_threshold,
            player_y: feet.y,
        };
        let max_ring = u64::from(max_search_radius.unsigned_abs()).pow(2);

        let mut ring: u64 = 0;
        let mut found_within_y = false;
        loop {
            if should_cancel() {
                trace!("Scan cancelled at ring {} with {} results", ring, result.len());
                return Ok(result);
            }

            let mut all_unloaded = true;
            let mut found_chunks = false;
            for (dx, dz) in RingIterator::new(ring) {
                found_chunks = true;
                let pos = player_chunk.offset(dx, dz);
                let Some(chunk) = world.chunk_now(pos) else {
                    continue;
                };
                all_unloaded = false;
                if scan_chunk_into(pos, chunk, filter, &mut result, limits, &order)? {
                    found_within_y = true;
                }
            }

                        if (all_unloaded && found_chunks)
                || (result.len() >= max && (ring > max_ring || (ring > 1 && found_within_y)))
            {
                trace!("Scan finished at ring {} with {} results", ring, result.len());
                return Ok(result);
            }
            ring += 1;
        }
    }

    /// Scans a single fully loaded chunk, sections bottom to top.
    ///
    /// Returns no results if the filter is empty or the chunk is not fully
    /// loaded or is empty.
    ///
    /// # Errors
    /// [`ScanError`] if the chunk does not match the world's height.
    pub fn scan_chunk<C, F>(
        &self,
        ctx: &C,
        filter: &F,
        pos: ChunkPos,
        max: usize,
        y_level_threshold: i32,
    ) -> Result<Vec<BlockPos>, ScanError>
    where
        C: EntityContext,
        F: BlockStateFilter + ?Sized,
    {
        if filter.is_empty() {
            return Ok(Vec::new());
        }

        let world = ctx.world();
        let chunk = match world.chunk_full(pos) {
            Some(chunk) if !chunk.is_empty() => chunk,
            _ => return Ok(Vec::new()),
        };

        let limits = ScanLimits {
            max,
            y_level_threshold,
            player_y: ctx.feet_pos().y,
        };
        let order = SectionOrder::natural(world.height_in_sections());
        let mut result = Vec::new();
        scan_chunk_into(pos, chunk, filter, &mut result, limits, &order)?;
        Ok(result)
    }

    /// Counts fully loaded, non-empty chunks within [`DEFAULT_REPACK_RANGE`].
    pub fn repack<C: EntityContext>(&self, ctx: &C) -> usize {
        self.repack_range(ctx, DEFAULT_REPACK_RANGE)
    }

    /// Counts fully loaded, non-empty chunks within Chebyshev distance
    /// `range` of the entity's chunk.
    ///
    /// The square is clipped to the chunk coordinates reachable from `i32`
    /// block positions. A negative `range` counts nothing.
    pub fn repack_range<C: EntityContext>(&self, ctx: &C, range: i32) -> usize {
        let world = ctx.world();
        let center = ChunkPos::from_block(ctx.feet_pos());
        let (min_x, max_x) = clipped_span(center.x, range);
        let (min_z, max_z) = clipped_span(center.z, range);

        let mut queued = 0;
        for x in min_x..=max_x {
            for z in min_z..=max_z {
                if let Some(chunk) = world.chunk_full(ChunkPos::new(x, z)) {
                    if !chunk.is_empty() {
                        queued += 1;
                    }
                }
            }
        }
        queued
    }
}

/// `center ± range`, clipped to [`ChunkPos::MIN_COORD`]..=[`ChunkPos::MAX_COORD`].
fn clipped_span(center: i32, range: i32) -> (i32, i32) {
    let center = i64::from(center);
    let range = i64::from(range);
    let min = (center - range).max(i64::from(ChunkPos::MIN_COORD));
    let max = (center + range).min(i64::from(ChunkPos::MAX_COORD));
    // Both ends lie within the i32 chunk range after clipping.
    (min as i32, max as i32)
}
