//! Precomputed distance and delay decay factors.
//!
//! Both tables are monotonically decreasing and shared (read-only) by the
//! candidate generator, slot planner, and score evaluator.  Lookups clamp to
//! the last entry so a distance or delay beyond the precomputed range never
//! indexes out of bounds — it just saturates at the strongest decay.

/// Decay weights penalizing relay distance and delivery delay.
#[derive(Clone, Debug)]
pub struct DecayTables {
    /// `distance[d] = 2^(-0.1·d)` for d in `0..=max_distance`.
    distance: Vec<f64>,
    /// `delay[dt] = 10/(dt+10)` for dt in `0..=max_delay`; 1.0 at dt = 0.
    delay: Vec<f64>,
}

impl DecayTables {
    /// Precompute for distances up to `max_distance` (typically M+N) and
    /// delays up to `max_delay` (typically the horizon T).
    pub fn build(max_distance: u32, max_delay: u32) -> Self {
        let distance = (0..=max_distance)
            .map(|d| 2f64.powf(-0.1 * d as f64))
            .collect();
        let delay = (0..=max_delay)
            .map(|dt| 10.0 / (dt as f64 + 10.0))
            .collect();
        Self { distance, delay }
    }

    /// Distance decay factor, clamped at the table end.
    #[inline]
    pub fn distance_factor(&self, d: u32) -> f64 {
        self.distance[(d as usize).min(self.distance.len() - 1)]
    }

    /// Delay decay factor, clamped at the table end.
    #[inline]
    pub fn delay_factor(&self, dt: u32) -> f64 {
        self.delay[(dt as usize).min(self.delay.len() - 1)]
    }
}
