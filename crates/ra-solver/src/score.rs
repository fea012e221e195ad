//! Normalized per-flow and aggregate quality scores.
//!
//! Per-flow score combines four terms, each in [0, 1]:
//!
//! ```text
//! score = 100 · (0.4·u2g + 0.2·delay_sum + 0.3·dist_sum + 0.1·land)
//! ```
//!
//! where `u2g` is the satisfied fraction, `delay_sum`/`dist_sum` are
//! amount-weighted decay sums, and `land = 1/k` penalizes spreading one
//! flow across `k` distinct relay sites.

use ra_core::Cell;
use ra_model::{DecayTables, Flow};
use rustc_hash::FxHashSet;

use crate::EPS;
use crate::greedy::ScheduleItem;

/// Score one flow's schedule.  Flows with `size ≈ 0` score 0.
pub fn flow_score(flow: &Flow, schedule: &[ScheduleItem], decay: &DecayTables) -> f64 {
    if flow.size <= EPS {
        return 0.0;
    }

    let mut transmitted = 0.0;
    let mut delay_sum = 0.0;
    let mut dist_sum = 0.0;
    let mut sites: FxHashSet<Cell> = FxHashSet::default();

    for item in schedule {
        transmitted += item.amount;
        let share = item.amount / flow.size;
        delay_sum += decay.delay_factor(item.t - flow.release) * share;
        dist_sum += decay.distance_factor(item.site.manhattan(flow.origin)) * share;
        sites.insert(item.site);
    }

    let u2g = (transmitted / flow.size).min(1.0);
    let land = 1.0 / sites.len().max(1) as f64;

    100.0 * (0.4 * u2g + 0.2 * delay_sum + 0.3 * dist_sum + 0.1 * land)
}

/// Size-weighted mean of per-flow scores.  The denominator is guarded so an
/// all-zero-size instance scores 0 instead of dividing by zero.
pub fn aggregate_score(
    flows: &[Flow],
    schedules: &[Vec<ScheduleItem>],
    decay: &DecayTables,
) -> f64 {
    let total_size: f64 = flows.iter().map(|f| f.size).sum();
    let weighted: f64 = flows
        .iter()
        .zip(schedules)
        .map(|(flow, schedule)| flow_score(flow, schedule, decay) * flow.size)
        .sum();
    weighted / (total_size + 1e-12)
}
