//! # View Module
//!
//! Read-only capabilities the scanner needs from a world. The scanner is
//! written against these traits only; [`ChunkStore`](crate::voxels::world::ChunkStore)
//! is the in-memory implementation shipped with the crate, but any host that
//! can answer these questions without blocking can be scanned.

use cgmath::Point3;

use crate::error::ScanError;
use crate::voxels::block::BlockState;
use crate::voxels::chunk::ChunkPos;

/// A block position in world coordinates.
pub type BlockPos = Point3<i32>;

/// Edge length of a section, and the horizontal size of a chunk.
pub const SECTION_SIZE: usize = 16;
/// Shift converting block coordinates into chunk or section coordinates.
pub const SECTION_SHIFT: i32 = 4;

/// Summary of the distinct states a section may contain.
///
/// Filters use it to skip a section without visiting its voxels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PaletteSummary<'a> {
    /// Every voxel of the section holds this state.
    Single(BlockState),
    /// The section holds only states from this list.
    Indirect(&'a [BlockState]),
    /// The section holds too many states to summarise; any state may be present.
    Global,
}

impl PaletteSummary<'_> {
    /// Whether some state that may be present in the section satisfies `pred`.
    ///
    /// `Global` answers `true` without calling `pred`.
    pub fn any_state(&self, mut pred: impl FnMut(BlockState) -> bool) -> bool {
        match self {
            PaletteSummary::Single(single) => pred(*single),
            PaletteSummary::Indirect(states) => states.iter().any(|&state| pred(state)),
            PaletteSummary::Global => true,
        }
    }
}

/// A 16×16×16 block of voxels.
pub trait SectionView {
    /// Whether the section holds only air.
    fn is_empty(&self) -> bool;

    /// Summary of the states present in the section.
    fn palette(&self) -> PaletteSummary<'_>;

    /// Reads the state at section-local coordinates.
    ///
    /// # Errors
    /// [`ScanError::LocalOutOfBounds`] if any coordinate is 16 or more.
    fn state(&self, x: usize, y: usize, z: usize) -> Result<BlockState, ScanError>;
}

/// A vertical column of sections.
pub trait ChunkView {
    /// The section type stored in this chunk.
    type Section: SectionView;

    /// The sections of this chunk, bottom first. `None` means "no data".
    fn sections(&self) -> &[Option<Self::Section>];

    /// Whether every section is absent or empty.
    fn is_empty(&self) -> bool {
        self.sections()
            .iter()
            .all(|section| section.as_ref().map_or(true, SectionView::is_empty))
    }
}

/// A read-only view of a voxel world.
///
/// Neither accessor may block or schedule chunk loading; a chunk that is not
/// already available is reported as `None`.
pub trait WorldView {
    /// The chunk type handed out by this world.
    type Chunk: ChunkView;

    /// Number of sections in every chunk (world height / 16).
    fn height_in_sections(&self) -> usize;

    /// Returns the chunk if it is loaded, in whatever state of population.
    fn chunk_now(&self, pos: ChunkPos) -> Option<&Self::Chunk>;

    /// Returns the chunk only if it is loaded and fully populated.
    fn chunk_full(&self, pos: ChunkPos) -> Option<&Self::Chunk>;
}

/// The entity a scan is centred on.
pub trait EntityContext {
    /// The world the entity lives in.
    type World: WorldView;

    /// Position of the block the entity is standing in.
    fn feet_pos(&self) -> BlockPos;

    /// The world to scan.
    fn world(&self) -> &Self::World;
}

/// A plain [`EntityContext`]: a feet position and a borrowed world.
pub struct PlayerContext<'w, W: WorldView> {
    /// Feet position in world coordinates.
    pub feet: BlockPos,
    /// The world the player stands in.
    pub world: &'w W,
}

impl<'w, W: WorldView> PlayerContext<'w, W> {
    /// Creates a context for a player standing at `feet` in `world`.
    pub fn new(feet: BlockPos, world: &'w W) -> Self {
        PlayerContext { feet, world }
    }
}

impl<W: WorldView> EntityContext for PlayerContext<'_, W> {
    type World = W;

    fn feet_pos(&self) -> BlockPos {
        self.feet
    }

    fn world(&self) -> &W {
        self.world
    }
}
