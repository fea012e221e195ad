//! Per-timestep available bandwidth: read-only matrix and per-pass pool.
//!
//! # Data layout
//!
//! Both types store one flat `Vec<f64>` over `(t, x, y)` with fixed strides:
//!
//! ```text
//! data[ t * width * height  +  x * height  +  y ]
//! ```
//!
//! The strides are validated once at construction; accessors are plain
//! multiply-adds over a contiguous buffer, which keeps the greedy
//! allocator's inner loop cache-friendly.

use ra_core::Cell;

use crate::RelayGrid;

/// Length of the periodic link-quality cycle, in timesteps.
pub const DUTY_PERIOD: u32 = 10;

/// Bandwidth available from cell `(x, y)` at timestep `t`, given the cell's
/// base bandwidth `b` and phase `phi`.
///
/// Models a duty-cycled link: full `b` for four steps of each period, half
/// on the shoulder steps, zero otherwise.
#[inline]
pub fn duty_cycle(b: f64, phi: u8, t: u32) -> f64 {
    match (phi as u32 + t) % DUTY_PERIOD {
        3..=6 => b,
        2 | 7 => b / 2.0,
        _ => 0.0,
    }
}

// ── BandwidthMatrix ───────────────────────────────────────────────────────────

/// The full `(t, x, y)` available-bandwidth matrix.
///
/// Computed once from the static grid; read-only afterward.  Each greedy
/// pass takes a fresh mutable copy via [`make_pool`](Self::make_pool).
#[derive(Clone, Debug)]
pub struct BandwidthMatrix {
    horizon: u32,
    width: u32,
    height: u32,
    data: Vec<f64>,
}

impl BandwidthMatrix {
    /// Materialize the matrix for timesteps `0..horizon`.
    pub fn build(grid: &RelayGrid, horizon: u32) -> Self {
        let (width, height) = (grid.width, grid.height);
        let mut data = Vec::with_capacity(horizon as usize * grid.cell_count());
        for t in 0..horizon {
            for x in 0..width {
                for y in 0..height {
                    let cell = Cell::new(x, y);
                    data.push(duty_cycle(grid.base(cell), grid.phase(cell), t));
                }
            }
        }
        Self { horizon, width, height, data }
    }

    #[inline]
    fn idx(&self, t: u32, cell: Cell) -> usize {
        debug_assert!(t < self.horizon && cell.x < self.width && cell.y < self.height);
        t as usize * (self.width as usize * self.height as usize)
            + cell.x as usize * self.height as usize
            + cell.y as usize
    }

    /// Bandwidth available at `(t, cell)`.
    #[inline]
    pub fn at(&self, t: u32, cell: Cell) -> f64 {
        self.data[self.idx(t, cell)]
    }

    #[inline]
    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Begin an allocation pass: a mutable copy of the full matrix.
    pub fn make_pool(&self) -> CapacityPool {
        CapacityPool {
            horizon: self.horizon,
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        }
    }
}

// ── CapacityPool ──────────────────────────────────────────────────────────────

/// Remaining capacity during one greedy allocation pass.
///
/// Consumed monotonically — capacity is never replenished.  Discarded and
/// rebuilt from the matrix at the start of every pass, so passes never
/// observe each other's consumption.
#[derive(Clone, Debug)]
pub struct CapacityPool {
    horizon: u32,
    width: u32,
    height: u32,
    data: Vec<f64>,
}

impl CapacityPool {
    #[inline]
    fn idx(&self, t: u32, cell: Cell) -> usize {
        debug_assert!(t < self.horizon && cell.x < self.width && cell.y < self.height);
        t as usize * (self.width as usize * self.height as usize)
            + cell.x as usize * self.height as usize
            + cell.y as usize
    }

    /// Remaining capacity at `(t, cell)`.
    #[inline]
    pub fn available(&self, t: u32, cell: Cell) -> f64 {
        self.data[self.idx(t, cell)]
    }

    /// Draw up to `want` units from `(t, cell)`.  Returns the amount actually
    /// drawn (`min(available, want)`) and subtracts it from the pool.
    #[inline]
    pub fn draw(&mut self, t: u32, cell: Cell, want: f64) -> f64 {
        let idx = self.idx(t, cell);
        let use_ = self.data[idx].min(want);
        self.data[idx] -= use_;
        use_
    }
}
