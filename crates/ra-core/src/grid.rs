//! Integer grid geometry.
//!
//! Relay nodes sit on an M×N grid addressed by `(x, y)` with `0 ≤ x < M`,
//! `0 ≤ y < N`.  All distances in the solver are Manhattan (hop) distances,
//! so coordinates stay integral end to end — no floating-point geometry.

use std::fmt;

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A grid coordinate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    #[inline]
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Manhattan (hop) distance to `other`.
    #[inline]
    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// An inclusive axis-aligned rectangle of grid cells: `[x0, x1] × [y0, y1]`.
///
/// Construction does not enforce `x0 ≤ x1` / `y0 ≤ y1`; the instance loader
/// rejects inverted bounds before a `Rect` ever reaches the solver.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Rect {
    #[inline]
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.x0 <= cell.x && cell.x <= self.x1 && self.y0 <= cell.y && cell.y <= self.y1
    }

    /// Number of cells covered.  Zero if the bounds are inverted.
    #[inline]
    pub fn area(&self) -> usize {
        if self.x1 < self.x0 || self.y1 < self.y0 {
            return 0;
        }
        (self.x1 - self.x0 + 1) as usize * (self.y1 - self.y0 + 1) as usize
    }

    /// Iterate every cell in row-major order.  No heap allocation.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.x0..=self.x1).flat_map(move |x| (self.y0..=self.y1).map(move |y| Cell::new(x, y)))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]×[{},{}]", self.x0, self.x1, self.y0, self.y1)
    }
}
