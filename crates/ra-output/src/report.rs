//! Report assembly: merge, order, and format per-flow schedules.

use std::collections::BTreeMap;
use std::io::Write;

use ra_model::Flow;
use ra_solver::ScheduleItem;

use crate::OutputResult;

/// Tolerance for printing an amount as a bare integer.
const INT_TOLERANCE: f64 = 1e-9;

/// Write the full delivery report.
///
/// `schedules` is indexed like `flows` (the allocator's output order);
/// blocks are emitted ascending by each flow's external id.
pub fn write_report<W: Write>(
    mut out: W,
    flows: &[Flow],
    schedules: &[Vec<ScheduleItem>],
) -> OutputResult<()> {
    let mut by_id: Vec<usize> = (0..flows.len()).collect();
    by_id.sort_by_key(|&i| flows[i].id);

    for idx in by_id {
        let merged = merge_items(&schedules[idx]);
        writeln!(out, "{} {}", flows[idx].id.0, merged.len())?;
        for ((t, x, y), amount) in merged {
            writeln!(out, "{t} {x} {y} {}", format_amount(amount))?;
        }
    }
    Ok(())
}

/// Sum duplicate `(t, x, y)` slots and drop anything non-positive.
/// `BTreeMap` keys give the required ascending (t, x, y) order for free.
fn merge_items(schedule: &[ScheduleItem]) -> BTreeMap<(u32, u32, u32), f64> {
    let mut merged: BTreeMap<(u32, u32, u32), f64> = BTreeMap::new();
    for item in schedule {
        *merged.entry((item.t, item.site.x, item.site.y)).or_default() += item.amount;
    }
    merged.retain(|_, amount| *amount > INT_TOLERANCE);
    merged
}

/// Render an amount: integer when within tolerance of its rounded value,
/// otherwise fixed-point with six fractional digits.
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round();
    if (amount - rounded).abs() < INT_TOLERANCE {
        format!("{}", rounded as i64)
    } else {
        format!("{amount:.6}")
    }
}
