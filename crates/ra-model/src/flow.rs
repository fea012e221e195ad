//! The `Flow` type — one transport demand.

use ra_core::{Cell, FlowId, Rect};

/// A demand to deliver `size` units of data from `origin`, eligible from
/// timestep `release` onward, through any relay site inside `region`.
///
/// Immutable once parsed.  `id` is the external identifier echoed in the
/// output report; internal indexing uses the flow's position in
/// [`Instance::flows`](crate::Instance).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flow {
    /// External flow id from the input file.
    pub id: FlowId,
    /// Where the data originates.
    pub origin: Cell,
    /// Earliest timestep at which delivery may start.
    pub release: u32,
    /// Required amount of data.
    pub size: f64,
    /// Candidate relay region (inclusive bounds).
    pub region: Rect,
}
