//! The `PlanContext` — everything precomputed before search starts.

use ra_model::{BandwidthMatrix, DecayTables, Instance};

use crate::candidate::{Candidate, build_candidates};
use crate::slots::{TimeSlot, build_slots};

/// Owned preprocessing context shared (read-only) by the greedy allocator,
/// score evaluator, and local-search optimizer.
///
/// Built once per instance and passed by reference — never global state, so
/// the pipeline stays testable and re-entrant.  Indexing convention: flows
/// by their position in `Instance::flows`, candidates by their position in
/// that flow's kept list.
pub struct PlanContext {
    /// Read-only `(t, x, y)` bandwidth matrix.
    pub bandwidth: BandwidthMatrix,
    /// Distance/delay decay lookups.
    pub decay: DecayTables,
    /// Kept candidates per flow, descending by potential.  May be empty for
    /// a flow whose rectangle retained nothing.
    pub candidates: Vec<Vec<Candidate>>,
    /// Value-ordered slots per `(flow, candidate)`.
    pub slots: Vec<Vec<Vec<TimeSlot>>>,
    /// Greedy processing order: ascending release time, ties broken
    /// descending size — earlier and larger flows claim capacity first.
    pub order: Vec<usize>,
}

impl PlanContext {
    /// Run all preprocessing stages for `instance`.
    pub fn build(instance: &Instance) -> Self {
        let grid = &instance.grid;
        let bandwidth = BandwidthMatrix::build(grid, instance.horizon);
        let decay = DecayTables::build(grid.width + grid.height, instance.horizon);

        let mut candidates = Vec::with_capacity(instance.flows.len());
        let mut slots = Vec::with_capacity(instance.flows.len());
        for flow in &instance.flows {
            let kept = build_candidates(flow, &bandwidth, &decay);
            let flow_slots = kept
                .iter()
                .map(|cand| build_slots(flow, cand, &bandwidth, &decay))
                .collect();
            candidates.push(kept);
            slots.push(flow_slots);
        }

        let mut order: Vec<usize> = (0..instance.flows.len()).collect();
        order.sort_by(|&a, &b| {
            let (fa, fb) = (&instance.flows[a], &instance.flows[b]);
            fa.release
                .cmp(&fb.release)
                .then_with(|| fb.size.total_cmp(&fa.size))
        });

        Self { bandwidth, decay, candidates, slots, order }
    }

    /// Number of flows this context was built for.
    pub fn flow_count(&self) -> usize {
        self.candidates.len()
    }
}
