//! # Config Module
//!
//! Settings for a scan run, loaded from JSON. Every field has a default, so
//! a config file only needs to name what it changes:
//!
//! ```json
//! { "blocks": "diamond_ore, gold_ore", "max": 16, "world": { "seed": 7 } }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::scanner::DEFAULT_REPACK_RANGE;

/// Parameters of the generated world a scan runs in.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Terrain seed.
    pub seed: u32,
    /// World height in sections (blocks / 16).
    pub height_in_sections: usize,
    /// Chebyshev radius, in chunks, generated around the player.
    pub view_distance: i32,
    /// Maximum loaded chunks; 0 means unbounded.
    pub capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 0,
            height_in_sections: 16,
            view_distance: 8,
            capacity: 0,
        }
    }
}

/// A full scan run: what to look for, where, and how hard.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Filter text, `name[:meta]` entries separated by commas or spaces.
    pub blocks: String,
    /// Result count after which termination rules apply.
    pub max: usize,
    /// Vertical distance below which a hit counts as local.
    pub y_level_threshold: i32,
    /// Euclidean chunk radius past which a full result stops the search.
    pub max_search_radius: i32,
    /// Chebyshev chunk range counted by `repack`.
    pub repack_range: i32,
    /// Player feet position `[x, y, z]`.
    pub player: [i32; 3],
    /// Generated world settings.
    pub world: WorldConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            blocks: "diamond_ore".to_string(),
            max: 64,
            y_level_threshold: 8,
            max_search_radius: 8,
            repack_range: DEFAULT_REPACK_RANGE,
            player: [0, 64, 0],
            world: WorldConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Parses a config from JSON text.
    ///
    /// # Errors
    /// [`ConfigError::Json`] for malformed input, [`ConfigError::Invalid`]
    /// for values that parse but cannot describe a world.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the value ranges serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.height_in_sections == 0 {
            return Err(ConfigError::Invalid {
                field: "world.height_in_sections",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Reads and parses a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
