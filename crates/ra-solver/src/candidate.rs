//! Per-flow candidate-site selection.
//!
//! For each flow, every cell of its rectangle is scored over the flow's
//! delivery window and a small, diverse subset is kept.  The kept list is
//! sorted descending by potential, so index 0 is the default choice in the
//! initial solution.

use ra_core::Cell;
use ra_model::{BandwidthMatrix, DecayTables, Flow};

use crate::EPS;

/// Timesteps scanned per flow: `[release, min(T, release + CANDIDATE_WINDOW))`.
pub const CANDIDATE_WINDOW: u32 = 60;

/// A cell is retained only if its window capacity exceeds this fraction of
/// the flow's required size…
const MIN_CAPACITY_FRACTION: f64 = 0.05;
/// …unless it lies within this Manhattan distance of the flow origin, which
/// always retains it.
const PROXIMITY_OVERRIDE: u32 = 2;

/// Kept-list bounds: `max(MIN_KEPT, min(MAX_KEPT, rect_area, retained))`.
const MAX_KEPT: usize = 8;
const MIN_KEPT: usize = 2;

/// Diversity rule: a candidate within `DIVERSITY_RADIUS` of an already-kept
/// one is rejected when its potential is below `DIVERSITY_RATIO` of that
/// candidate's.
const DIVERSITY_RADIUS: u32 = 1;
const DIVERSITY_RATIO: f64 = 0.8;

// ── Candidate ─────────────────────────────────────────────────────────────────

/// One relay site considered for a flow, with its window statistics.
///
/// Cached per flow for the solver's lifetime; the greedy allocator and the
/// local search only ever index into the kept list.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// The relay cell.
    pub site: Cell,
    /// Manhattan distance from the flow origin.
    pub distance: u32,
    /// Composite ranking score (see [`build_candidates`]).
    pub potential: f64,
    /// Mean bandwidth over the window's non-zero timesteps.
    pub avg_bandwidth: f64,
    /// Total bandwidth available over the window.
    pub total_capacity: f64,
    /// Timesteps at (or within tolerance of) the window's peak bandwidth.
    pub peak_times: Vec<u32>,
}

// ── Generation ────────────────────────────────────────────────────────────────

/// Score every cell in `flow`'s rectangle and keep a small diverse subset.
///
/// Potential = `0.6·weighted_bw + 0.3·ln(1 + total_capacity) −
/// 0.1·(0.5·distance)` where `weighted_bw` decays each timestep's bandwidth
/// by both delay and distance.  Can return an empty list when the rectangle
/// is far from the origin and too starved for capacity; the allocator skips
/// such flows.
pub(crate) fn build_candidates(
    flow: &Flow,
    bandwidth: &BandwidthMatrix,
    decay: &DecayTables,
) -> Vec<Candidate> {
    let t_end = bandwidth.horizon().min(flow.release.saturating_add(CANDIDATE_WINDOW));

    let mut raw: Vec<Candidate> = Vec::new();
    for site in flow.region.cells() {
        let distance = site.manhattan(flow.origin);
        let dist_f = decay.distance_factor(distance);

        let mut total = 0.0;
        let mut weighted = 0.0;
        let mut count = 0u32;
        let mut max_bw = 0.0f64;
        let mut peak_times: Vec<u32> = Vec::new();

        for t in flow.release..t_end {
            let bw = bandwidth.at(t, site);
            if bw <= EPS {
                continue;
            }
            total += bw;
            weighted += bw * decay.delay_factor(t - flow.release) * dist_f;
            count += 1;

            if bw > max_bw {
                max_bw = bw;
                peak_times.clear();
                peak_times.push(t);
            } else if (bw - max_bw).abs() < EPS {
                peak_times.push(t);
            }
        }

        let capacity_score = if total > EPS { (1.0 + total).ln() } else { 0.0 };
        let distance_penalty = distance as f64 * 0.5;
        let potential = 0.6 * weighted + 0.3 * capacity_score - 0.1 * distance_penalty;

        if total > flow.size * MIN_CAPACITY_FRACTION || distance <= PROXIMITY_OVERRIDE {
            raw.push(Candidate {
                site,
                distance,
                potential,
                avg_bandwidth: if count > 0 { total / count as f64 } else { 0.0 },
                total_capacity: total,
                peak_times,
            });
        }
    }

    raw.sort_by(|a, b| b.potential.total_cmp(&a.potential));

    let top_k = MAX_KEPT.min(flow.region.area()).min(raw.len()).max(MIN_KEPT);
    let mut rest = raw.into_iter();
    let Some(best) = rest.next() else {
        return Vec::new();
    };

    // The best-scoring candidate is always kept; later ones must clear the
    // diversity rule against everything already kept.
    let mut kept = vec![best];
    for cand in rest {
        if kept.len() >= top_k {
            break;
        }
        let too_close = kept.iter().any(|k| {
            cand.site.manhattan(k.site) <= DIVERSITY_RADIUS
                && cand.potential < k.potential * DIVERSITY_RATIO
        });
        if !too_close {
            kept.push(cand);
        }
    }
    kept
}
