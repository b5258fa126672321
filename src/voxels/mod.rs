//! # Voxels
//!
//! The world model the scanner reads from.
//!
//! ## Architecture
//!
//! * **Block**: packed block states and the block registry
//! * **Filter**: predicates over block states
//! * **View**: the read-only traits the scanner is written against
//! * **Chunk**: palette-compressed sections stacked into full-height columns
//! * **World**: an in-memory store of loaded chunks implementing the view traits
//!
//! ## Data Flow
//!
//! 1. The host loads chunks into a [`world::ChunkStore`] (or implements
//!    [`view::WorldView`] over its own storage)
//! 2. The scanner asks the view for chunks without blocking
//! 3. Section palettes are checked against the filter before any voxel is read

pub mod block;
pub mod chunk;
pub mod filter;
pub mod view;
pub mod world;
