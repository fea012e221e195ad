//! Local-search refinement: seeded hill-climbing over site assignments.
//!
//! Strict improvement only — a trial replaces the incumbent solely when its
//! aggregate score beats the best by more than tolerance.  No cooling, no
//! acceptance of worse solutions, no restarts; the best score is therefore
//! monotone non-decreasing across iterations.

use ra_core::SearchRng;
use ra_model::Flow;

use crate::greedy::{Allocation, allocate};
use crate::{EPS, PlanContext, Solution, SolverResult};

// ── Parameters ────────────────────────────────────────────────────────────────

/// Tuning knobs for [`optimize`].
#[derive(Clone, Debug)]
pub struct SearchParams {
    /// Hard iteration budget.
    pub max_iterations: usize,
    /// Stop once this many consecutive iterations fail to improve.
    pub stagnation_limit: usize,
    /// Probability of mutating a problematic flow (when any exist) instead
    /// of exploring randomly.
    pub focus_probability: f64,
    /// A flow is "problematic" while its delivered amount is below this
    /// fraction of its required size.
    pub shortfall_threshold: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_iterations: 150,
            stagnation_limit: 20,
            focus_probability: 0.7,
            shortfall_threshold: 0.8,
        }
    }
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Result of a search run.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Best solution found.  Re-run [`allocate`] with it for the schedules.
    pub solution: Solution,
    /// Aggregate score of `solution`.
    pub score: f64,
    /// Iterations actually executed (≤ `max_iterations`).
    pub iterations: usize,
}

// ── Optimizer ─────────────────────────────────────────────────────────────────

/// Refine the initial all-best-candidate solution by stochastic single-flow
/// reassignment.
///
/// Each iteration mutates a clone of the incumbent: with
/// `focus_probability` (and a non-empty problematic set) one random
/// problematic flow is reassigned to a uniformly random candidate;
/// otherwise 1–2 random flows are reassigned.  Flows with fewer than two
/// candidates are never mutated.  Every trial is evaluated by a full
/// allocation pass over its own fresh capacity pool.
pub fn optimize(
    ctx: &PlanContext,
    flows: &[Flow],
    params: &SearchParams,
    rng: &mut SearchRng,
) -> SolverResult<SearchOutcome> {
    let mut solution = Solution::initial(flows.len());
    let initial = allocate(ctx, flows, &solution)?;

    let mut best_score = initial.score;
    let mut best_solution = solution.clone();

    if flows.is_empty() {
        return Ok(SearchOutcome { solution: best_solution, score: best_score, iterations: 0 });
    }

    let mut problematic = shortfall_flows(flows, &initial, params.shortfall_threshold);
    let mut stagnation = 0usize;
    let mut iterations = 0usize;

    for _ in 0..params.max_iterations {
        iterations += 1;
        let mut trial = solution.clone();

        if !problematic.is_empty() && rng.gen_bool(params.focus_probability) {
            if let Some(&idx) = rng.choose(&problematic) {
                reassign(ctx, &mut trial, idx, rng);
            }
        } else {
            let changes = rng.gen_range(1..=2usize);
            for _ in 0..changes {
                let idx = rng.gen_range(0..flows.len());
                reassign(ctx, &mut trial, idx, rng);
            }
        }

        let alloc = allocate(ctx, flows, &trial)?;
        if alloc.score > best_score + EPS {
            best_score = alloc.score;
            best_solution = trial.clone();
            solution = trial;
            problematic = shortfall_flows(flows, &alloc, params.shortfall_threshold);
            stagnation = 0;
        } else {
            stagnation += 1;
            if stagnation > params.stagnation_limit {
                break;
            }
        }
    }

    Ok(SearchOutcome { solution: best_solution, score: best_score, iterations })
}

/// Reassign `flow` to a uniformly random candidate index (may repeat the
/// current choice).  No-op for flows with fewer than two candidates.
fn reassign(ctx: &PlanContext, solution: &mut Solution, flow: usize, rng: &mut SearchRng) {
    let count = ctx.candidates[flow].len();
    if count > 1 {
        solution.set(flow, rng.gen_range(0..count));
    }
}

/// Indices of flows delivered below `threshold` of their required size.
fn shortfall_flows(flows: &[Flow], alloc: &Allocation, threshold: f64) -> Vec<usize> {
    flows
        .iter()
        .enumerate()
        .filter(|(i, flow)| alloc.transmitted(*i) < flow.size * threshold)
        .map(|(i, _)| i)
        .collect()
}
