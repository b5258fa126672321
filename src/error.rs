//! Error types surfaced by the scanner, the filter parser and the config loader.

use thiserror::Error;

/// Fatal errors raised while scanning.
///
/// Both variants are invariant violations: the world handed to the scanner
/// does not have the shape it claims to have. Neither is recoverable locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A chunk's section array does not match the world's height.
    #[error("unexpected number of sections in chunk (expected {expected}, got {actual})")]
    SectionCountMismatch {
        /// Sections implied by the world height.
        expected: usize,
        /// Sections actually present in the chunk.
        actual: usize,
    },
    /// A section was read outside of its 16³ bounds.
    #[error("section-local position ({x}, {y}, {z}) is outside 0..16")]
    LocalOutOfBounds {
        /// Local x coordinate.
        x: usize,
        /// Local y coordinate.
        y: usize,
        /// Local z coordinate.
        z: usize,
    },
}

/// Errors raised while parsing a block filter from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterParseError {
    /// The block name is not in the registry.
    #[error("unknown block `{0}`")]
    UnknownBlock(String),
    /// The meta suffix is not a number in `0..16`.
    #[error("invalid meta in `{0}`")]
    InvalidMeta(String),
}

/// Errors raised while loading a [`ScanConfig`](crate::config::ScanConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid JSON for the expected shape.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    /// A field holds a value outside its allowed range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// What the value must satisfy.
        reason: &'static str,
    },
}
