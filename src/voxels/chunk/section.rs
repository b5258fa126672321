//! # Section Module
//!
//! Palette-compressed storage for one 16×16×16 section.
//!
//! ## Memory Layout
//!
//! A section stores:
//! - `palette`: the distinct states present, in insertion order
//! - `indices`: one palette index per voxel, bit-packed with the minimum
//!   width able to address the palette (0 bits when the palette has a single
//!   entry)
//!
//! Voxels are indexed `(y << 8) | (z << 4) | x`, so a y-plane is contiguous.
//! When the palette outgrows the current width every index is repacked into
//! a wider buffer.

use bitvec::prelude::*;

use crate::error::ScanError;
use crate::voxels::block::BlockState;
use crate::voxels::view::{PaletteSummary, SectionView, SECTION_SIZE};

/// Number of voxels in a section.
pub const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

/// Index widths above this are reported as a global palette.
pub const MAX_INDIRECT_BITS: u8 = 8;

/// Minimum bits required to address `palette_len` entries.
///
/// A single-entry palette needs no index bits at all.
pub const fn bits_required(palette_len: usize) -> u8 {
    if palette_len <= 1 {
        0
    } else {
        (usize::BITS - (palette_len - 1).leading_zeros()) as u8
    }
}

/// A palette-compressed section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PalettedSection {
    palette: Vec<BlockState>,
    bits: u8,
    indices: BitVec<u64, Lsb0>,
    non_air_count: u16,
}

impl PalettedSection {
    /// Creates a section filled with `state`.
    pub fn filled(state: BlockState) -> Self {
        PalettedSection {
            palette: vec![state],
            bits: 0,
            indices: BitVec::new(),
            non_air_count: if state.is_air() { 0 } else { SECTION_VOLUME as u16 },
        }
    }

    /// Creates a section holding only air.
    pub fn air() -> Self {
        Self::filled(BlockState::AIR)
    }

    /// Builds a section from states in `(y, z, x)` order.
    ///
    /// # Panics
    /// Panics if `states` does not hold exactly [`SECTION_VOLUME`] entries.
    pub fn from_states(states: &[BlockState]) -> Self {
        assert_eq!(states.len(), SECTION_VOLUME, "a section holds {} states", SECTION_VOLUME);
        let mut section = Self::filled(states[0]);
        for (index, &state) in states.iter().enumerate().skip(1) {
            section.set_index(index, state);
        }
        section
    }

    /// Builds a section from raw state ids in `(y, z, x)` order.
    pub fn from_raw_ids(ids: &[u16]) -> Self {
        Self::from_states(bytemuck::cast_slice(ids))
    }

    /// Current index width in bits.
    pub fn bits_per_entry(&self) -> u8 {
        self.bits
    }

    /// Number of voxels that are not air.
    pub fn non_air_count(&self) -> u16 {
        self.non_air_count
    }

    /// Reads the state at local coordinates, which must already be in bounds.
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockState {
        self.palette[self.palette_index(voxel_index(x, y, z))]
    }

    /// Writes the state at local coordinates.
    ///
    /// # Errors
    /// [`ScanError::LocalOutOfBounds`] if any coordinate is 16 or more.
    pub fn set(&mut self, x: usize, y: usize, z: usize, state: BlockState) -> Result<BlockState, ScanError> {
        check_bounds(x, y, z)?;
        Ok(self.set_index(voxel_index(x, y, z), state))
    }

    fn set_index(&mut self, index: usize, state: BlockState) -> BlockState {
        let previous = self.palette[self.palette_index(index)];
        if previous == state {
            return previous;
        }

        let palette_index = match self.palette.iter().position(|&entry| entry == state) {
            Some(existing) => existing,
            None => {
                self.palette.push(state);
                let needed = bits_required(self.palette.len());
                if needed > self.bits {
                    self.repack(needed);
                }
                self.palette.len() - 1
            }
        };
        self.write_index(index, palette_index);

        match (previous.is_air(), state.is_air()) {
            (true, false) => self.non_air_count += 1,
            (false, true) => self.non_air_count -= 1,
            _ => {}
        }
        previous
    }

    fn palette_index(&self, index: usize) -> usize {
        if self.bits == 0 {
            return 0;
        }
        let start = index * self.bits as usize;
        self.indices[start..start + self.bits as usize].load_le::<u16>() as usize
    }

    fn write_index(&mut self, index: usize, palette_index: usize) {
        let start = index * self.bits as usize;
        self.indices[start..start + self.bits as usize].store_le(palette_index as u16);
    }

    /// Widens every stored index to `new_bits`.
    fn repack(&mut self, new_bits: u8) {
        let mut widened = bitvec![u64, Lsb0; 0; SECTION_VOLUME * new_bits as usize];
        if self.bits > 0 {
            for index in 0..SECTION_VOLUME {
                let value = self.palette_index(index) as u16;
                let start = index * new_bits as usize;
                widened[start..start + new_bits as usize].store_le(value);
            }
        }
        self.indices = widened;
        self.bits = new_bits;
    }
}

impl Default for PalettedSection {
    fn default() -> Self {
        Self::air()
    }
}

impl SectionView for PalettedSection {
    fn is_empty(&self) -> bool {
        self.non_air_count == 0
    }

    fn palette(&self) -> PaletteSummary<'_> {
        match self.palette.as_slice() {
            [single] => PaletteSummary::Single(*single),
            _ if self.bits > MAX_INDIRECT_BITS => PaletteSummary::Global,
            entries => PaletteSummary::Indirect(entries),
        }
    }

    fn state(&self, x: usize, y: usize, z: usize) -> Result<BlockState, ScanError> {
        check_bounds(x, y, z)?;
        Ok(self.get(x, y, z))
    }
}

fn voxel_index(x: usize, y: usize, z: usize) -> usize {
    (y << 8) | (z << 4) | x
}

fn check_bounds(x: usize, y: usize, z: usize) -> Result<(), ScanError> {
    if x >= SECTION_SIZE || y >= SECTION_SIZE || z >= SECTION_SIZE {
        return Err(ScanError::LocalOutOfBounds { x, y, z });
    }
    Ok(())
}
