//! `ra-core` — foundational types for the `relay_alloc` solver.
//!
//! This crate is a dependency of every other `ra-*` crate.  It intentionally
//! has no `ra-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                    |
//! |-----------|---------------------------------------------|
//! | [`ids`]   | `FlowId`                                    |
//! | [`grid`]  | `Cell`, `Rect`, Manhattan distance          |
//! | [`rng`]   | `SearchRng` (seeded, injectable)            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod grid;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use grid::{Cell, Rect};
pub use ids::FlowId;
pub use rng::SearchRng;
