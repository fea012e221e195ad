//! Time-slot planning: per-(flow, candidate) allocation priority.

use ra_model::{BandwidthMatrix, DecayTables, Flow};

use crate::EPS;
use crate::candidate::{CANDIDATE_WINDOW, Candidate};

/// One usable timestep at a candidate site.
#[derive(Clone, Copy, Debug)]
pub struct TimeSlot {
    pub t: u32,
    /// Bandwidth available at `(t, site)` in the untouched matrix.
    pub bandwidth: f64,
    /// Delay decay at `t − release`.
    pub delay_factor: f64,
    /// `delay_factor · bandwidth · distance_factor` — the allocation
    /// priority.  Slots are stored descending by this value.
    pub value: f64,
}

/// List every timestep in the flow's window with bandwidth above tolerance,
/// ordered best-first.  The greedy allocator walks this order verbatim.
pub(crate) fn build_slots(
    flow: &Flow,
    cand: &Candidate,
    bandwidth: &BandwidthMatrix,
    decay: &DecayTables,
) -> Vec<TimeSlot> {
    let t_end = bandwidth.horizon().min(flow.release.saturating_add(CANDIDATE_WINDOW));
    let dist_f = decay.distance_factor(cand.distance);

    let mut slots: Vec<TimeSlot> = (flow.release..t_end)
        .filter_map(|t| {
            let bw = bandwidth.at(t, cand.site);
            if bw <= EPS {
                return None;
            }
            let delay_factor = decay.delay_factor(t - flow.release);
            Some(TimeSlot { t, bandwidth: bw, delay_factor, value: delay_factor * bw * dist_f })
        })
        .collect();

    slots.sort_by(|a, b| b.value.total_cmp(&a.value));
    slots
}
