//! Unit and scenario tests for the allocation engine.

use ra_core::{Cell, FlowId, Rect, SearchRng};
use ra_model::{Flow, Instance, RelayGrid};

use crate::{PlanContext, SearchParams, Solution, allocate, optimize};

// ── Shared fixtures ───────────────────────────────────────────────────────────

/// Grid with every cell at the same base bandwidth and phase.
fn uniform_grid(width: u32, height: u32, b: f64, phi: u8) -> RelayGrid {
    let cells = (0..width)
        .flat_map(|x| (0..height).map(move |y| (Cell::new(x, y), b, phi)))
        .collect::<Vec<_>>();
    RelayGrid::from_cells(width, height, cells).unwrap()
}

fn flow(id: u32, origin: (u32, u32), release: u32, size: f64, rect: (u32, u32, u32, u32)) -> Flow {
    Flow {
        id: FlowId(id),
        origin: Cell::new(origin.0, origin.1),
        release,
        size,
        region: Rect::new(rect.0, rect.1, rect.2, rect.3),
    }
}

/// Smallest useful instance: one cell, b=100, phi=0, T=10.
fn one_cell_instance(size: f64) -> Instance {
    Instance {
        grid: uniform_grid(1, 1, 100.0, 0),
        flows: vec![flow(1, (0, 0), 0, size, (0, 0, 0, 0))],
        horizon: 10,
    }
}

/// Sum of allocated amounts per (t, x, y) across all flows must never
/// exceed the original matrix value.
fn assert_capacity_invariant(ctx: &PlanContext, alloc: &crate::Allocation) {
    use std::collections::HashMap;
    let mut used: HashMap<(u32, u32, u32), f64> = HashMap::new();
    for schedule in &alloc.schedules {
        for item in schedule {
            *used.entry((item.t, item.site.x, item.site.y)).or_default() += item.amount;
        }
    }
    for (&(t, x, y), &amount) in &used {
        let cap = ctx.bandwidth.at(t, Cell::new(x, y));
        assert!(
            amount <= cap + 1e-6,
            "slot ({t},{x},{y}): allocated {amount} > capacity {cap}"
        );
    }
}

// ── Candidate generation ──────────────────────────────────────────────────────

#[cfg(test)]
mod candidates {
    use super::*;

    #[test]
    fn sorted_descending_by_potential() {
        let inst = Instance {
            grid: uniform_grid(1, 20, 100.0, 0),
            flows: vec![flow(1, (0, 0), 0, 100.0, (0, 0, 0, 19))],
            horizon: 70,
        };
        let ctx = PlanContext::build(&inst);
        let kept = &ctx.candidates[0];
        assert!(!kept.is_empty());
        for pair in kept.windows(2) {
            assert!(pair[0].potential >= pair[1].potential);
        }
        // nearest cell wins on both decay and penalty
        assert_eq!(kept[0].site, Cell::new(0, 0));
    }

    #[test]
    fn kept_list_capped_at_eight() {
        let inst = Instance {
            grid: uniform_grid(1, 20, 100.0, 0),
            flows: vec![flow(1, (0, 0), 0, 100.0, (0, 0, 0, 19))],
            horizon: 70,
        };
        let ctx = PlanContext::build(&inst);
        assert_eq!(ctx.candidates[0].len(), 8);
    }

    #[test]
    fn proximity_override_keeps_dead_cells_near_origin() {
        // Zero bandwidth everywhere: the capacity filter drops every cell,
        // but cells within Manhattan distance 2 of the origin stay.
        let inst = Instance {
            grid: uniform_grid(3, 3, 0.0, 0),
            flows: vec![flow(1, (1, 1), 0, 100.0, (0, 0, 2, 2))],
            horizon: 10,
        };
        let ctx = PlanContext::build(&inst);
        assert!(!ctx.candidates[0].is_empty());
        for cand in &ctx.candidates[0] {
            assert!(cand.distance <= 2);
            assert_eq!(cand.total_capacity, 0.0);
        }
    }

    #[test]
    fn diversity_rejects_weak_neighbors() {
        // All-zero bandwidth 3×3: potential is pure distance penalty, so the
        // four cells adjacent to the kept center (potential 0) all fall below
        // 80 % of it and are rejected, while the four corners (distance 2
        // from the center) survive.
        let inst = Instance {
            grid: uniform_grid(3, 3, 0.0, 0),
            flows: vec![flow(1, (1, 1), 0, 100.0, (0, 0, 2, 2))],
            horizon: 10,
        };
        let ctx = PlanContext::build(&inst);
        let kept = &ctx.candidates[0];
        assert_eq!(kept.len(), 5);
        assert_eq!(kept[0].site, Cell::new(1, 1));
        for cand in &kept[1..] {
            assert_eq!(cand.site.manhattan(Cell::new(1, 1)), 2);
        }
    }

    #[test]
    fn diversity_property_holds_on_mixed_grid() {
        // Deterministic non-uniform bandwidths.
        let cells = (0..5)
            .flat_map(|x| {
                (0..5).map(move |y| {
                    (Cell::new(x, y), ((x * 7 + y * 13) % 50) as f64 + 10.0, ((x + y) % 10) as u8)
                })
            })
            .collect::<Vec<_>>();
        let inst = Instance {
            grid: RelayGrid::from_cells(5, 5, cells).unwrap(),
            flows: vec![flow(1, (2, 2), 0, 300.0, (0, 0, 4, 4))],
            horizon: 40,
        };
        let ctx = PlanContext::build(&inst);
        let kept = &ctx.candidates[0];
        for i in 0..kept.len() {
            for j in i + 1..kept.len() {
                if kept[i].site.manhattan(kept[j].site) <= 1 {
                    assert!(
                        kept[j].potential >= kept[i].potential * 0.8,
                        "{} and {} violate the diversity rule",
                        kept[i].site,
                        kept[j].site
                    );
                }
            }
        }
    }

    #[test]
    fn starved_distant_rectangle_yields_no_candidates() {
        // Window capacity 500 against size 100 000: below the 5 % floor,
        // and the rectangle sits 6 hops from the origin.
        let inst = Instance {
            grid: uniform_grid(4, 4, 100.0, 0),
            flows: vec![flow(1, (0, 0), 0, 100_000.0, (3, 3, 3, 3))],
            horizon: 10,
        };
        let ctx = PlanContext::build(&inst);
        assert!(ctx.candidates[0].is_empty());
        assert!(ctx.slots[0].is_empty());
    }

    #[test]
    fn peak_times_track_maximum_bandwidth() {
        let inst = one_cell_instance(50.0);
        let ctx = PlanContext::build(&inst);
        // full-bandwidth steps for phi=0 are t=3..=6
        let cand = &ctx.candidates[0][0];
        assert_eq!(cand.peak_times, vec![3, 4, 5, 6]);
        // 4 full steps at b=100 plus half steps at t=2 and t=7.
        assert!((cand.total_capacity - 500.0).abs() < 1e-9);
        assert!((cand.avg_bandwidth - 500.0 / 6.0).abs() < 1e-9);
    }
}

// ── Slot planning ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod slots {
    use super::*;

    #[test]
    fn ordered_descending_by_value() {
        let inst = one_cell_instance(50.0);
        let ctx = PlanContext::build(&inst);
        let slots = &ctx.slots[0][0];
        for pair in slots.windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }
        // zero-delay full-bandwidth step first, then later full steps, then
        // the half-bandwidth shoulders
        let order: Vec<u32> = slots.iter().map(|s| s.t).collect();
        assert_eq!(order, vec![3, 4, 5, 6, 2, 7]);
    }

    #[test]
    fn only_positive_bandwidth_timesteps() {
        let inst = one_cell_instance(50.0);
        let ctx = PlanContext::build(&inst);
        for slot in &ctx.slots[0][0] {
            assert!(slot.bandwidth > 0.0);
        }
        assert_eq!(ctx.slots[0][0].len(), 6);
    }

    #[test]
    fn window_clipped_to_sixty_steps_and_horizon() {
        let inst = Instance {
            grid: uniform_grid(1, 1, 100.0, 0),
            flows: vec![flow(1, (0, 0), 5, 50.0, (0, 0, 0, 0))],
            horizon: 200,
        };
        let ctx = PlanContext::build(&inst);
        for slot in &ctx.slots[0][0] {
            assert!((5..65).contains(&slot.t), "slot t={} outside window", slot.t);
        }
    }
}

// ── Greedy allocation ─────────────────────────────────────────────────────────

#[cfg(test)]
mod greedy {
    use super::*;
    use crate::SolverError;

    #[test]
    fn smoke_instance_allocates_from_full_steps() {
        let inst = one_cell_instance(50.0);
        let ctx = PlanContext::build(&inst);
        let alloc = allocate(&ctx, &inst.flows, &Solution::initial(1)).unwrap();

        assert!((alloc.transmitted(0) - 50.0).abs() < 1e-9);
        assert!(alloc.schedules[0].len() <= 4);
        for item in &alloc.schedules[0] {
            assert!((3..=6).contains(&item.t), "allocated outside full-bandwidth steps");
        }
        assert_capacity_invariant(&ctx, &alloc);
    }

    #[test]
    fn transmitted_equals_size_when_capacity_allows() {
        // window capacity is 500; demand 450 fits
        let inst = one_cell_instance(450.0);
        let ctx = PlanContext::build(&inst);
        let alloc = allocate(&ctx, &inst.flows, &Solution::initial(1)).unwrap();
        assert!((alloc.transmitted(0) - 450.0).abs() < 1e-9);
    }

    #[test]
    fn transmitted_never_exceeds_size() {
        let inst = one_cell_instance(10.0);
        let ctx = PlanContext::build(&inst);
        let alloc = allocate(&ctx, &inst.flows, &Solution::initial(1)).unwrap();
        assert!(alloc.transmitted(0) <= 10.0 + 1e-9);
    }

    #[test]
    fn contended_flows_respect_capacity() {
        // Two flows, combined demand 800 against 500 units of window
        // capacity on a single cell.
        let inst = Instance {
            grid: uniform_grid(1, 1, 100.0, 0),
            flows: vec![
                flow(1, (0, 0), 0, 400.0, (0, 0, 0, 0)),
                flow(2, (0, 0), 0, 400.0, (0, 0, 0, 0)),
            ],
            horizon: 10,
        };
        let ctx = PlanContext::build(&inst);
        let alloc = allocate(&ctx, &inst.flows, &Solution::initial(2)).unwrap();

        assert_capacity_invariant(&ctx, &alloc);
        let total = alloc.transmitted(0) + alloc.transmitted(1);
        assert!((total - 500.0).abs() < 1e-6, "total {total}");
    }

    #[test]
    fn earlier_release_claims_capacity_first() {
        let inst = Instance {
            grid: uniform_grid(1, 1, 100.0, 0),
            flows: vec![
                flow(1, (0, 0), 3, 500.0, (0, 0, 0, 0)),
                flow(2, (0, 0), 0, 500.0, (0, 0, 0, 0)),
            ],
            horizon: 10,
        };
        let ctx = PlanContext::build(&inst);
        // flow 2 (release 0) is processed first despite equal size
        assert_eq!(ctx.order, vec![1, 0]);
        let alloc = allocate(&ctx, &inst.flows, &Solution::initial(2)).unwrap();
        assert!(alloc.transmitted(1) > alloc.transmitted(0));
    }

    #[test]
    fn ties_broken_by_descending_size() {
        let inst = Instance {
            grid: uniform_grid(1, 1, 100.0, 0),
            flows: vec![
                flow(1, (0, 0), 0, 10.0, (0, 0, 0, 0)),
                flow(2, (0, 0), 0, 300.0, (0, 0, 0, 0)),
            ],
            horizon: 10,
        };
        let ctx = PlanContext::build(&inst);
        assert_eq!(ctx.order, vec![1, 0]);
    }

    #[test]
    fn fallback_drains_cyclic_next_candidate() {
        // Cell (0,0) holds 50 units over the window, cell (0,1) holds 500.
        // Forcing the starved cell as primary leaves 50 of 100 unmet
        // (> 10 %), so the allocator retries the next candidate.
        let cells = vec![(Cell::new(0, 0), 10.0, 0), (Cell::new(0, 1), 100.0, 0)];
        let inst = Instance {
            grid: RelayGrid::from_cells(1, 2, cells).unwrap(),
            flows: vec![flow(1, (0, 0), 0, 100.0, (0, 0, 0, 1))],
            horizon: 10,
        };
        let ctx = PlanContext::build(&inst);
        assert_eq!(ctx.candidates[0].len(), 2);

        let starved = ctx.candidates[0]
            .iter()
            .position(|c| c.site == Cell::new(0, 0))
            .unwrap();
        let alloc = allocate(&ctx, &inst.flows, &Solution::from_choices(vec![starved])).unwrap();

        assert!((alloc.transmitted(0) - 100.0).abs() < 1e-9);
        let sites: std::collections::BTreeSet<Cell> =
            alloc.schedules[0].iter().map(|i| i.site).collect();
        assert_eq!(sites.len(), 2, "fallback candidate was not used");
    }

    #[test]
    fn no_fallback_when_satisfied_past_ninety_percent() {
        let cells = vec![(Cell::new(0, 0), 100.0, 0), (Cell::new(0, 1), 100.0, 0)];
        let inst = Instance {
            grid: RelayGrid::from_cells(1, 2, cells).unwrap(),
            flows: vec![flow(1, (0, 0), 0, 50.0, (0, 0, 0, 1))],
            horizon: 10,
        };
        let ctx = PlanContext::build(&inst);
        let alloc = allocate(&ctx, &inst.flows, &Solution::initial(1)).unwrap();
        let sites: std::collections::BTreeSet<Cell> =
            alloc.schedules[0].iter().map(|i| i.site).collect();
        assert_eq!(sites.len(), 1);
    }

    #[test]
    fn out_of_range_choice_clamps_to_best() {
        let inst = one_cell_instance(50.0);
        let ctx = PlanContext::build(&inst);
        let clamped = allocate(&ctx, &inst.flows, &Solution::from_choices(vec![99])).unwrap();
        let best = allocate(&ctx, &inst.flows, &Solution::initial(1)).unwrap();
        assert_eq!(clamped.schedules, best.schedules);
        assert_eq!(clamped.score, best.score);
    }

    #[test]
    fn candidateless_flow_is_skipped() {
        let inst = Instance {
            grid: uniform_grid(4, 4, 100.0, 0),
            flows: vec![
                flow(1, (0, 0), 0, 100_000.0, (3, 3, 3, 3)),
                flow(2, (0, 0), 0, 100.0, (0, 0, 0, 0)),
            ],
            horizon: 10,
        };
        let ctx = PlanContext::build(&inst);
        assert_eq!(ctx.flow_count(), 2);
        assert!(ctx.candidates[0].is_empty());

        let alloc = allocate(&ctx, &inst.flows, &Solution::initial(2)).unwrap();
        assert!(alloc.schedules[0].is_empty());
        assert!(alloc.transmitted(1) > 0.0);
    }

    #[test]
    fn deterministic_across_repeated_passes() {
        let inst = Instance {
            grid: uniform_grid(2, 2, 60.0, 3),
            flows: vec![
                flow(1, (0, 0), 0, 150.0, (0, 0, 1, 1)),
                flow(2, (1, 1), 2, 90.0, (0, 0, 1, 1)),
            ],
            horizon: 20,
        };
        let ctx = PlanContext::build(&inst);
        let solution = Solution::initial(2);
        let a = allocate(&ctx, &inst.flows, &solution).unwrap();
        let b = allocate(&ctx, &inst.flows, &solution).unwrap();
        assert_eq!(a.schedules, b.schedules);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn solution_length_mismatch_is_an_error() {
        let inst = one_cell_instance(50.0);
        let ctx = PlanContext::build(&inst);
        let err = allocate(&ctx, &inst.flows, &Solution::initial(3)).unwrap_err();
        assert!(matches!(
            err,
            SolverError::SolutionLengthMismatch { expected: 1, got: 3 }
        ));
    }
}

// ── Scoring ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod score {
    use super::*;
    use crate::greedy::ScheduleItem;
    use crate::{aggregate_score, flow_score};
    use ra_model::DecayTables;

    #[test]
    fn zero_size_flow_scores_zero() {
        let decay = DecayTables::build(10, 10);
        let f = flow(1, (0, 0), 0, 0.0, (0, 0, 0, 0));
        assert_eq!(flow_score(&f, &[], &decay), 0.0);
    }

    #[test]
    fn perfect_single_item_scores_one_hundred() {
        // full delivery, zero delay, zero distance, one site
        let decay = DecayTables::build(10, 10);
        let f = flow(1, (0, 0), 5, 10.0, (0, 0, 0, 0));
        let items = [ScheduleItem { t: 5, site: Cell::new(0, 0), amount: 10.0 }];
        assert!((flow_score(&f, &items, &decay) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn decayed_partial_delivery() {
        // half the demand, 10 steps late, 10 hops away:
        // u2g=0.5, delay_sum=0.25, dist_sum=0.25, land=1
        let decay = DecayTables::build(20, 20);
        let f = flow(1, (0, 0), 0, 10.0, (0, 0, 0, 0));
        let items = [ScheduleItem { t: 10, site: Cell::new(10, 0), amount: 5.0 }];
        let expect = 100.0 * (0.4 * 0.5 + 0.2 * 0.25 + 0.3 * 0.25 + 0.1);
        assert!((flow_score(&f, &items, &decay) - expect).abs() < 1e-9);
    }

    #[test]
    fn empty_schedule_scores_bare_landing_term() {
        let decay = DecayTables::build(10, 10);
        let f = flow(1, (0, 0), 0, 10.0, (0, 0, 0, 0));
        assert!((flow_score(&f, &[], &decay) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn multiple_sites_shrink_landing_term() {
        let decay = DecayTables::build(10, 10);
        let f = flow(1, (0, 0), 0, 10.0, (0, 0, 0, 0));
        let one = [ScheduleItem { t: 0, site: Cell::new(0, 0), amount: 10.0 }];
        let two = [
            ScheduleItem { t: 0, site: Cell::new(0, 0), amount: 5.0 },
            ScheduleItem { t: 0, site: Cell::new(0, 1), amount: 5.0 },
        ];
        assert!(flow_score(&f, &one, &decay) > flow_score(&f, &two, &decay));
    }

    #[test]
    fn aggregate_is_size_weighted_and_bounded() {
        let inst = Instance {
            grid: uniform_grid(2, 2, 80.0, 0),
            flows: vec![
                flow(1, (0, 0), 0, 100.0, (0, 0, 1, 1)),
                flow(2, (1, 1), 0, 900.0, (0, 0, 1, 1)),
            ],
            horizon: 15,
        };
        let ctx = PlanContext::build(&inst);
        let alloc = allocate(&ctx, &inst.flows, &Solution::initial(2)).unwrap();
        assert!(alloc.score >= 0.0 && alloc.score <= 100.0, "score {}", alloc.score);

        let by_hand = aggregate_score(&inst.flows, &alloc.schedules, &ctx.decay);
        assert!((by_hand - alloc.score).abs() < 1e-12);
    }

    #[test]
    fn all_zero_sizes_score_zero() {
        let decay = DecayTables::build(10, 10);
        let flows = vec![flow(1, (0, 0), 0, 0.0, (0, 0, 0, 0))];
        let schedules = vec![Vec::new()];
        assert_eq!(aggregate_score(&flows, &schedules, &decay), 0.0);
    }
}

// ── Local search ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use super::*;

    /// Contended instance where moving a flow to a different site helps.
    fn contended_instance() -> Instance {
        let cells = (0..3)
            .flat_map(|x| (0..3).map(move |y| (Cell::new(x, y), 40.0 + 20.0 * x as f64, (x + 2 * y) as u8)))
            .collect::<Vec<_>>();
        Instance {
            grid: RelayGrid::from_cells(3, 3, cells).unwrap(),
            flows: vec![
                flow(1, (0, 0), 0, 400.0, (0, 0, 2, 2)),
                flow(2, (1, 1), 0, 400.0, (0, 0, 2, 2)),
                flow(3, (2, 2), 1, 300.0, (0, 0, 2, 2)),
            ],
            horizon: 30,
        }
    }

    #[test]
    fn never_worse_than_initial_solution() {
        let inst = contended_instance();
        let ctx = PlanContext::build(&inst);
        let initial = allocate(&ctx, &inst.flows, &Solution::initial(3)).unwrap();

        let mut rng = SearchRng::new(42);
        let outcome = optimize(&ctx, &inst.flows, &SearchParams::default(), &mut rng).unwrap();
        assert!(outcome.score >= initial.score - 1e-12);
    }

    #[test]
    fn reported_score_matches_final_allocation() {
        let inst = contended_instance();
        let ctx = PlanContext::build(&inst);
        let mut rng = SearchRng::new(42);
        let outcome = optimize(&ctx, &inst.flows, &SearchParams::default(), &mut rng).unwrap();

        let replay = allocate(&ctx, &inst.flows, &outcome.solution).unwrap();
        assert!((replay.score - outcome.score).abs() < 1e-12);

        // One in-range choice per flow.
        let choices = outcome.solution.choices();
        assert_eq!(choices.len(), 3);
        for (i, &c) in choices.iter().enumerate() {
            assert!(c < ctx.candidates[i].len());
        }
    }

    #[test]
    fn same_seed_reproduces_trajectory() {
        let inst = contended_instance();
        let ctx = PlanContext::build(&inst);

        let mut a = SearchRng::new(7);
        let mut b = SearchRng::new(7);
        let oa = optimize(&ctx, &inst.flows, &SearchParams::default(), &mut a).unwrap();
        let ob = optimize(&ctx, &inst.flows, &SearchParams::default(), &mut b).unwrap();

        assert_eq!(oa.solution, ob.solution);
        assert_eq!(oa.score, ob.score);
        assert_eq!(oa.iterations, ob.iterations);
    }

    #[test]
    fn stagnation_cuts_the_budget_short() {
        // Single flow with a single candidate: no mutation can change
        // anything, so the search stops right after the stagnation limit.
        let inst = one_cell_instance(50.0);
        let ctx = PlanContext::build(&inst);
        let params = SearchParams::default();

        let mut rng = SearchRng::new(1);
        let outcome = optimize(&ctx, &inst.flows, &params, &mut rng).unwrap();
        assert_eq!(outcome.iterations, params.stagnation_limit + 1);
    }

    #[test]
    fn empty_flow_list_is_a_noop() {
        let inst = Instance {
            grid: uniform_grid(1, 1, 10.0, 0),
            flows: vec![],
            horizon: 5,
        };
        let ctx = PlanContext::build(&inst);
        let mut rng = SearchRng::new(0);
        let outcome = optimize(&ctx, &inst.flows, &SearchParams::default(), &mut rng).unwrap();
        assert_eq!(outcome.iterations, 0);
        assert!(outcome.solution.is_empty());
        assert_eq!(outcome.score, 0.0);
    }

    #[test]
    fn capacity_invariant_survives_search() {
        let inst = contended_instance();
        let ctx = PlanContext::build(&inst);
        let mut rng = SearchRng::new(123);
        let outcome = optimize(&ctx, &inst.flows, &SearchParams::default(), &mut rng).unwrap();

        let alloc = allocate(&ctx, &inst.flows, &outcome.solution).unwrap();
        assert_capacity_invariant(&ctx, &alloc);
        for (i, f) in inst.flows.iter().enumerate() {
            assert!(alloc.transmitted(i) <= f.size + 1e-9);
        }
    }
}
