//! The greedy allocator: solution → schedules + score.
//!
//! Deterministic given `(context, flows, solution)` — no randomness here.
//! Every pass starts from a fresh [`CapacityPool`] and consumes it
//! monotonically; earlier flows in the processing order are never revisited.

use ra_core::Cell;
use ra_model::{CapacityPool, Flow};

use crate::score::aggregate_score;
use crate::slots::TimeSlot;
use crate::{EPS, PlanContext, Solution, SolverError, SolverResult};

/// Fallback trigger: after the primary candidate, a flow still missing more
/// than this fraction of its size retries the cyclic-next candidate once.
const FALLBACK_SHORTFALL: f64 = 0.1;

// ── Result types ──────────────────────────────────────────────────────────────

/// One delivery: `amount` units through `site` at timestep `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduleItem {
    pub t: u32,
    pub site: Cell,
    pub amount: f64,
}

/// Output of one allocation pass.
#[derive(Clone, Debug)]
pub struct Allocation {
    /// Per-flow schedule items, indexed like the flow list.  Unmerged: a
    /// `(t, site)` pair may appear once per candidate that used it.
    pub schedules: Vec<Vec<ScheduleItem>>,
    /// Size-weighted aggregate score over all flows.
    pub score: f64,
}

impl Allocation {
    /// Total amount delivered for `flow`.
    pub fn transmitted(&self, flow: usize) -> f64 {
        self.schedules[flow].iter().map(|item| item.amount).sum()
    }
}

// ── Allocation pass ───────────────────────────────────────────────────────────

/// Run one deterministic allocation pass.
///
/// Flows are processed in the context's precomputed order.  For each flow
/// the chosen candidate's slots are drained best-first; if the flow is
/// still short by more than 10 % of its size and has another candidate, the
/// cyclic-next candidate is drained once against the same depleting pool.
/// A chosen index beyond the kept list clamps to 0; flows with no kept
/// candidates are skipped and score from an empty schedule.
pub fn allocate(
    ctx: &PlanContext,
    flows: &[Flow],
    solution: &Solution,
) -> SolverResult<Allocation> {
    if solution.len() != flows.len() {
        return Err(SolverError::SolutionLengthMismatch {
            expected: flows.len(),
            got: solution.len(),
        });
    }

    let mut pool = ctx.bandwidth.make_pool();
    let mut schedules: Vec<Vec<ScheduleItem>> = vec![Vec::new(); flows.len()];

    for &idx in &ctx.order {
        let flow = &flows[idx];
        let cands = &ctx.candidates[idx];
        if cands.is_empty() {
            continue;
        }

        let chosen = match solution.choice(idx) {
            c if c < cands.len() => c,
            _ => 0,
        };

        let mut need = flow.size;
        drain_slots(&mut pool, &ctx.slots[idx][chosen], cands[chosen].site, &mut need, &mut schedules[idx]);

        if need > flow.size * FALLBACK_SHORTFALL && cands.len() > 1 {
            let alt = (chosen + 1) % cands.len();
            drain_slots(&mut pool, &ctx.slots[idx][alt], cands[alt].site, &mut need, &mut schedules[idx]);
        }
    }

    let score = aggregate_score(flows, &schedules, &ctx.decay);
    Ok(Allocation { schedules, score })
}

/// Consume capacity along `slots` (already value-ordered) until `need` is
/// met or the slots run out.
fn drain_slots(
    pool: &mut CapacityPool,
    slots: &[TimeSlot],
    site: Cell,
    need: &mut f64,
    out: &mut Vec<ScheduleItem>,
) {
    for slot in slots {
        if *need <= EPS {
            break;
        }
        if pool.available(slot.t, site) <= EPS {
            continue;
        }
        let drawn = pool.draw(slot.t, site, *need);
        *need -= drawn;
        out.push(ScheduleItem { t: slot.t, site, amount: drawn });
    }
}
