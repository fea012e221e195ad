//! The `Solution` type — one chosen candidate index per flow.

/// A site assignment: for each flow (by list position) the index of the
/// chosen candidate in that flow's kept list.
///
/// Mutated only by the local-search optimizer; the allocator treats it as
/// read-only input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution(Vec<usize>);

impl Solution {
    /// The initial solution: the best-potential candidate (index 0) for
    /// every flow.
    pub fn initial(flow_count: usize) -> Self {
        Solution(vec![0; flow_count])
    }

    /// Build from explicit choices.
    pub fn from_choices(choices: Vec<usize>) -> Self {
        Solution(choices)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Chosen candidate index for `flow`.
    #[inline]
    pub fn choice(&self, flow: usize) -> usize {
        self.0[flow]
    }

    #[inline]
    pub fn set(&mut self, flow: usize, candidate: usize) {
        self.0[flow] = candidate;
    }

    pub fn choices(&self) -> &[usize] {
        &self.0
    }
}
