//! `ra-model` — problem-instance model for the `relay_alloc` solver.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`flow`]      | `Flow` — one transport demand                           |
//! | [`relay`]     | `RelayGrid` — static per-cell bandwidth and phase       |
//! | [`bandwidth`] | `BandwidthMatrix` (read-only) and `CapacityPool`        |
//! | [`decay`]     | `DecayTables` — distance/delay decay lookups            |
//! | [`loader`]    | `load_instance`, `load_instance_reader`                 |
//! | [`error`]     | `ModelError`, `ModelResult<T>`                          |
//!
//! # Bandwidth model (summary)
//!
//! Each relay cell carries a base bandwidth `b` and a phase `phi`.  Link
//! quality cycles with period 10:
//!
//! ```text
//! tau = (phi + t) mod 10
//! bw  = b      if 3 ≤ tau ≤ 6
//!     = b / 2  if tau ∈ {2, 7}
//!     = 0      otherwise
//! ```
//!
//! The full `(t, x, y)` matrix is materialized once at load time; every
//! later stage reads it, and each greedy pass consumes a fresh mutable copy
//! (`CapacityPool`).

pub mod bandwidth;
pub mod decay;
pub mod error;
pub mod flow;
pub mod loader;
pub mod relay;


pub use bandwidth::{BandwidthMatrix, CapacityPool};
pub use decay::DecayTables;
pub use error::{ModelError, ModelResult};
pub use flow::Flow;
pub use loader::{Instance, load_instance, load_instance_reader};
pub use relay::RelayGrid;
