//! `ra-solver` — the allocation engine for `relay_alloc`.
//!
//! # Pipeline
//!
//! ```text
//! Instance
//!   │  PlanContext::build          (once)
//!   ▼
//! PlanContext                      bandwidth matrix, decay tables,
//!   │                              per-flow candidates + ordered slots,
//!   │                              greedy flow order
//!   ▼
//! optimize                         hill-climbing over Solutions; every
//!   │  └─ allocate (per trial)     trial rebuilds its own CapacityPool
//!   ▼
//! allocate (final pass)            schedules + aggregate score
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`candidate`] | `Candidate`, per-flow site selection + diversity rule   |
//! | [`slots`]     | `TimeSlot`, value-ordered allocation priority           |
//! | [`context`]   | `PlanContext` — the owned preprocessing context         |
//! | [`solution`]  | `Solution` — one candidate choice per flow              |
//! | [`greedy`]    | `allocate`, `ScheduleItem`, `Allocation`                |
//! | [`score`]     | `flow_score`, `aggregate_score`                         |
//! | [`search`]    | `optimize`, `SearchParams`, `SearchOutcome`             |
//! | [`error`]     | `SolverError`, `SolverResult<T>`                        |
//!
//! # Determinism
//!
//! `allocate` and the score functions are pure in `(flows, solution,
//! context)`.  All randomness lives in [`optimize`] and flows through the
//! injected [`ra_core::SearchRng`]; a fixed seed reproduces the search
//! trajectory exactly.

pub mod candidate;
pub mod context;
pub mod error;
pub mod greedy;
pub mod score;
pub mod search;
pub mod slots;
pub mod solution;

#[cfg(test)]
mod tests;

/// Floating tolerance shared by allocation and scoring comparisons.
pub const EPS: f64 = 1e-9;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use candidate::Candidate;
pub use context::PlanContext;
pub use error::{SolverError, SolverResult};
pub use greedy::{Allocation, ScheduleItem, allocate};
pub use score::{aggregate_score, flow_score};
pub use search::{SearchOutcome, SearchParams, optimize};
pub use slots::TimeSlot;
pub use solution::Solution;
