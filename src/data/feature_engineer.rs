// ============================================================
// Layer 4 — Feature Engineer
// ============================================================
// Turns a partition of Observations into FeatureRows.
//
// Steps (applied in order):
//   1. Sort by (time, row, column) so output order never
//      depends on the shuffle that produced the partition
//   2. Shift time forward by (shift mod 24) hours
//   3. hour_of_day = time' mod 24
//   4. day_of_week = (time' / 24) mod 7
//
// The shift lets a dataset whose t=0 is not midnight line up
// its hour_of_day with the wall clock. Negative shifts wrap,
// e.g. -1 behaves like 23.
//
// Pure function: no state is kept between calls.

use crate::domain::features::{day_of_week, hour_of_day, FeatureRow, HOURS_PER_DAY};
use crate::domain::observation::Observation;

#[derive(Debug, Clone, Copy)]
pub struct FeatureEngineer {
    shift: i64,
}

impl FeatureEngineer {
    pub fn new(shift: i64) -> Self {
        Self { shift }
    }

    /// The shift actually applied, always in [0, 23]
    pub fn effective_shift(&self) -> u32 {
        self.shift.rem_euclid(HOURS_PER_DAY) as u32
    }

    /// Sort, shift and derive calendar fields for a whole partition.
    pub fn transform(&self, observations: &[Observation]) -> Vec<FeatureRow> {
        let mut sorted = observations.to_vec();
        sorted.sort();
        sorted.iter().map(|o| self.engineer(o)).collect()
    }

    /// Derive the feature row for one observation.
    pub fn engineer(&self, obs: &Observation) -> FeatureRow {
        let time    = obs.time.saturating_add(self.effective_shift());
        let shifted = time as i64;

        FeatureRow {
            time,
            row:         obs.row,
            column:      obs.column,
            value:       obs.value,
            hour_of_day: hour_of_day(shifted),
            day_of_week: day_of_week(shifted),
        }
    }
}
