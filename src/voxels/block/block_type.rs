//! # Block Type Module
//!
//! This module defines the kinds of blocks the in-memory world knows about,
//! along with the name registry used when building filters from text.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use phf::phf_map;

use super::BlockIdSize;

/// Enumerates all block kinds of the voxel world.
///
/// The discriminant is the numeric block id stored in the upper bits of a
/// [`BlockState`](super::BlockState). `FromPrimitive` allows the reverse
/// conversion when decoding a state.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Sections made only of air count as empty.
    AIR = 0,
    /// Plain stone, the bulk of generated terrain.
    STONE = 1,
    /// Dirt layer between stone and the surface.
    DIRT = 2,
    /// Surface block on dry land.
    GRASS = 3,
    /// Unbreakable floor at the bottom of the world.
    BEDROCK = 4,
    /// Still water filling terrain below sea level.
    WATER = 5,
    /// Surface block on beaches and sea floors.
    SAND = 6,
    /// Loose stone found under water.
    GRAVEL = 7,
    /// Tree trunk.
    LOG = 8,
    /// Tree canopy.
    LEAVES = 9,
    /// Common ore, generated at every depth.
    COAL_ORE = 10,
    /// Ore generated in the lower half of the world.
    IRON_ORE = 11,
    /// Rare ore generated deep underground.
    GOLD_ORE = 12,
    /// Rarest ore, only near bedrock.
    DIAMOND_ORE = 13,
}

/// Maps lowercase block names to their type.
static BLOCK_NAMES: phf::Map<&'static str, BlockType> = phf_map! {
    "air" => BlockType::AIR,
    "stone" => BlockType::STONE,
    "dirt" => BlockType::DIRT,
    "grass" => BlockType::GRASS,
    "grass_block" => BlockType::GRASS,
    "bedrock" => BlockType::BEDROCK,
    "water" => BlockType::WATER,
    "sand" => BlockType::SAND,
    "gravel" => BlockType::GRAVEL,
    "log" => BlockType::LOG,
    "oak_log" => BlockType::LOG,
    "leaves" => BlockType::LEAVES,
    "oak_leaves" => BlockType::LEAVES,
    "coal_ore" => BlockType::COAL_ORE,
    "iron_ore" => BlockType::IRON_ORE,
    "gold_ore" => BlockType::GOLD_ORE,
    "diamond_ore" => BlockType::DIAMOND_ORE,
};

impl BlockType {
    /// Converts a raw block id back into a `BlockType`.
    ///
    /// # Returns
    /// `None` if the id does not name a known block.
    pub fn from_id(id: BlockIdSize) -> Option<Self> {
        FromPrimitive::from_u16(id)
    }

    /// Looks up a block type by name.
    ///
    /// Names are matched case-insensitively and may carry a `minecraft:`
    /// namespace prefix.
    ///
    /// # Examples
    /// ```
    /// use voxel_scanner::voxels::block::block_type::BlockType;
    ///
    /// assert_eq!(BlockType::from_name("minecraft:Diamond_Ore"), Some(BlockType::DIAMOND_ORE));
    /// assert_eq!(BlockType::from_name("unobtainium"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        let bare = lowered.strip_prefix("minecraft:").unwrap_or(&lowered);
        BLOCK_NAMES.get(bare).copied()
    }

    /// Whether this block is one of the ores.
    pub fn is_ore(self) -> bool {
        matches!(
            self,
            BlockType::COAL_ORE | BlockType::IRON_ORE | BlockType::GOLD_ORE | BlockType::DIAMOND_ORE
        )
    }

    /// Generates a random ore type, weighted towards the common ones.
    pub fn random_ore(rng: &mut fastrand::Rng) -> Self {
        match rng.u8(0..100) {
            0..=59 => BlockType::COAL_ORE,
            60..=89 => BlockType::IRON_ORE,
            90..=97 => BlockType::GOLD_ORE,
            _ => BlockType::DIAMOND_ORE,
        }
    }
}
