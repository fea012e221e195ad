//! Static relay-grid parameters.
//!
//! # Data layout
//!
//! Per-cell base bandwidth and phase are stored in flat row-major `Vec`s
//! indexed by `x * height + y` — the same stride order the bandwidth matrix
//! uses, so derived passes walk both in memory order.

use ra_core::Cell;

use crate::{ModelError, ModelResult};

/// The M×N grid of relay nodes with their static attributes.
///
/// Immutable after [`from_cells`](RelayGrid::from_cells); construction
/// validates that every cell appears exactly once.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelayGrid {
    /// Grid extent along x (M).
    pub width: u32,
    /// Grid extent along y (N).
    pub height: u32,
    /// Base bandwidth per cell, row-major.
    base: Vec<f64>,
    /// Duty-cycle phase per cell, row-major.
    phase: Vec<u8>,
}

impl RelayGrid {
    /// Build a grid from `(cell, base_bandwidth, phase)` records in arbitrary
    /// order.  Every cell of the M×N grid must appear exactly once.
    pub fn from_cells(
        width: u32,
        height: u32,
        cells: impl IntoIterator<Item = (Cell, f64, u8)>,
    ) -> ModelResult<Self> {
        let count = width as usize * height as usize;
        let mut base = vec![0.0; count];
        let mut phase = vec![0u8; count];
        let mut seen = vec![false; count];

        for (cell, b, phi) in cells {
            if cell.x >= width || cell.y >= height {
                return Err(ModelError::Invalid(format!(
                    "cell {cell} outside {width}×{height} grid"
                )));
            }
            let idx = cell.x as usize * height as usize + cell.y as usize;
            if seen[idx] {
                return Err(ModelError::Invalid(format!("cell {cell} appears twice")));
            }
            seen[idx] = true;
            base[idx] = b;
            phase[idx] = phi;
        }

        if let Some(missing) = seen.iter().position(|s| !s) {
            let cell = Cell::new(missing as u32 / height, missing as u32 % height);
            return Err(ModelError::Invalid(format!("cell {cell} missing from input")));
        }

        Ok(Self { width, height, base, phase })
    }

    #[inline]
    fn idx(&self, cell: Cell) -> usize {
        debug_assert!(cell.x < self.width && cell.y < self.height);
        cell.x as usize * self.height as usize + cell.y as usize
    }

    /// Base bandwidth of `cell`.
    #[inline]
    pub fn base(&self, cell: Cell) -> f64 {
        self.base[self.idx(cell)]
    }

    /// Duty-cycle phase of `cell`.
    #[inline]
    pub fn phase(&self, cell: Cell) -> u8 {
        self.phase[self.idx(cell)]
    }

    pub fn cell_count(&self) -> usize {
        self.base.len()
    }
}
