//! Whitespace-delimited instance loader.
//!
//! # Input format
//!
//! Tokens in order, any whitespace as separator:
//!
//! ```text
//! M N FN T
//! x y b phi      × M·N   (each cell exactly once, arbitrary order)
//! f x y tf s m1 n1 m2 n2 × FN
//! ```
//!
//! Parsing is fatal-on-first-error: a truncated stream, an unparseable
//! token, a duplicate or out-of-range cell, or an invalid flow rectangle
//! aborts before any solving starts.  Error messages carry the 1-based
//! token position to make truncation reports actionable.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use ra_core::{Cell, FlowId, Rect};

use crate::bandwidth::DUTY_PERIOD;
use crate::{Flow, ModelError, ModelResult, RelayGrid};

// ── Instance ──────────────────────────────────────────────────────────────────

/// A fully parsed problem instance.  Immutable after load.
#[derive(Clone, Debug)]
pub struct Instance {
    pub grid: RelayGrid,
    pub flows: Vec<Flow>,
    /// Planning horizon T: timesteps `0..horizon`.
    pub horizon: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an instance from a file.
pub fn load_instance(path: &Path) -> ModelResult<Instance> {
    let file = std::fs::File::open(path).map_err(ModelError::Io)?;
    load_instance_reader(file)
}

/// Like [`load_instance`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or reading from stdin.
pub fn load_instance_reader<R: Read>(mut reader: R) -> ModelResult<Instance> {
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(ModelError::Io)?;
    let mut tokens = Tokens::new(&text);

    let width: u32 = tokens.next("M")?;
    let height: u32 = tokens.next("N")?;
    let flow_count: usize = tokens.next("FN")?;
    let horizon: u32 = tokens.next("T")?;

    if width == 0 || height == 0 {
        return Err(ModelError::Invalid(format!(
            "grid dimensions must be positive, got {width}×{height}"
        )));
    }

    // ── Cell records ──────────────────────────────────────────────────────
    let mut cells = Vec::with_capacity(width as usize * height as usize);
    for _ in 0..width as usize * height as usize {
        let x: u32 = tokens.next("cell x")?;
        let y: u32 = tokens.next("cell y")?;
        let b: f64 = tokens.next("cell bandwidth")?;
        let phi: u32 = tokens.next("cell phase")?;
        // Only the phase modulo the duty period matters.
        cells.push((Cell::new(x, y), b, (phi % DUTY_PERIOD) as u8));
    }
    let grid = RelayGrid::from_cells(width, height, cells)?;

    // ── Flow records ──────────────────────────────────────────────────────
    let mut flows = Vec::with_capacity(flow_count);
    for _ in 0..flow_count {
        let id: u32 = tokens.next("flow id")?;
        let x: u32 = tokens.next("flow x")?;
        let y: u32 = tokens.next("flow y")?;
        let release: u32 = tokens.next("flow tf")?;
        let size: f64 = tokens.next("flow size")?;
        let m1: u32 = tokens.next("rect m1")?;
        let n1: u32 = tokens.next("rect n1")?;
        let m2: u32 = tokens.next("rect m2")?;
        let n2: u32 = tokens.next("rect n2")?;

        let flow = Flow {
            id: FlowId(id),
            origin: Cell::new(x, y),
            release,
            size,
            region: Rect::new(m1, n1, m2, n2),
        };
        validate_flow(&flow, width, height)?;
        flows.push(flow);
    }

    Ok(Instance { grid, flows, horizon })
}

// ── Validation ────────────────────────────────────────────────────────────────

fn validate_flow(flow: &Flow, width: u32, height: u32) -> ModelResult<()> {
    let r = &flow.region;
    if flow.origin.x >= width || flow.origin.y >= height {
        return Err(ModelError::Invalid(format!(
            "flow {}: origin {} outside {width}×{height} grid",
            flow.id.0, flow.origin
        )));
    }
    if r.x1 < r.x0 || r.y1 < r.y0 {
        return Err(ModelError::Invalid(format!(
            "flow {}: inverted candidate rectangle {r}",
            flow.id.0
        )));
    }
    if r.x1 >= width || r.y1 >= height {
        return Err(ModelError::Invalid(format!(
            "flow {}: candidate rectangle {r} outside {width}×{height} grid",
            flow.id.0
        )));
    }
    if !flow.size.is_finite() || flow.size < 0.0 {
        return Err(ModelError::Invalid(format!(
            "flow {}: required size {} is not a non-negative finite number",
            flow.id.0, flow.size
        )));
    }
    Ok(())
}

// ── Token scanner ─────────────────────────────────────────────────────────────

struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self { iter: text.split_whitespace(), position: 0 }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> ModelResult<T> {
        self.position += 1;
        let token = self.iter.next().ok_or_else(|| {
            ModelError::Parse(format!(
                "truncated input: expected {what} at token {}",
                self.position
            ))
        })?;
        token.parse::<T>().map_err(|_| {
            ModelError::Parse(format!(
                "invalid {what} at token {}: {token:?}",
                self.position
            ))
        })
    }
}
