// ============================================================
// Layer 3 — Feature Rows and the Feature Schema
// ============================================================
// A FeatureRow is an Observation plus the calendar fields the
// model learns from. The FeatureSchema is the single source of
// truth for the order in which those fields are fed to the
// model. Training builds its matrix through it and the model
// artifact stores it; the prediction service builds its input
// vector through the same schema.
//
//   schema v1:  [hour_of_day, day_of_week, row, column]
//
// Any change to the column list must bump SCHEMA_VERSION so
// that stale model files are rejected at load time.

use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

pub const HOURS_PER_DAY: i64 = 24;
pub const DAYS_PER_WEEK: i64 = 7;

/// An observation enriched with calendar features.
/// Column order here is the on-disk CSV order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Time after the configured shift has been applied
    pub time:        u32,
    pub row:         u32,
    pub column:      u32,
    /// Label. -1 for rows from the test partition
    pub value:       i64,
    pub hour_of_day: u32,
    pub day_of_week: u32,
}

impl FeatureRow {
    pub fn input(&self) -> FeatureInput {
        FeatureInput {
            hour_of_day: self.hour_of_day,
            day_of_week: self.day_of_week,
            row:         self.row,
            column:      self.column,
        }
    }
}

/// Predicted demand for one cell of the test partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub time:   u32,
    pub row:    u32,
    pub column: u32,
    pub demand: i64,
}

/// The model-facing values of one sample, independent of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureInput {
    pub hour_of_day: u32,
    pub day_of_week: u32,
    pub row:         u32,
    pub column:      u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureColumn {
    HourOfDay,
    DayOfWeek,
    Row,
    Column,
}

impl FeatureColumn {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureColumn::HourOfDay => "hour_of_day",
            FeatureColumn::DayOfWeek => "day_of_week",
            FeatureColumn::Row       => "row",
            FeatureColumn::Column    => "column",
        }
    }

    fn value_of(&self, input: &FeatureInput) -> f64 {
        match self {
            FeatureColumn::HourOfDay => input.hour_of_day as f64,
            FeatureColumn::DayOfWeek => input.day_of_week as f64,
            FeatureColumn::Row       => input.row as f64,
            FeatureColumn::Column    => input.column as f64,
        }
    }
}

/// Versioned, ordered list of model input columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    /// The schema this build trains and serves with
    pub fn current() -> Self {
        Self {
            version: SCHEMA_VERSION,
            columns: vec![
                FeatureColumn::HourOfDay,
                FeatureColumn::DayOfWeek,
                FeatureColumn::Row,
                FeatureColumn::Column,
            ],
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.columns.iter().map(FeatureColumn::name).collect()
    }

    /// Lay out one sample in schema order
    pub fn vectorize(&self, input: &FeatureInput) -> Vec<f64> {
        self.columns.iter().map(|c| c.value_of(input)).collect()
    }

    /// Row-major flattening of many samples, for building a dense matrix
    pub fn flatten<'a, I>(&self, inputs: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a FeatureInput>,
    {
        inputs
            .into_iter()
            .flat_map(|input| self.vectorize(input))
            .collect()
    }
}

/// Hour of day for an already-shifted time. Always in [0, 23].
pub fn hour_of_day(shifted_time: i64) -> u32 {
    shifted_time.rem_euclid(HOURS_PER_DAY) as u32
}

/// Day of week for an already-shifted time. Always in [0, 6].
pub fn day_of_week(shifted_time: i64) -> u32 {
    shifted_time.div_euclid(HOURS_PER_DAY).rem_euclid(DAYS_PER_WEEK) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_order_matches_training_layout() {
        let schema = FeatureSchema::current();
        assert_eq!(schema.names(), vec!["hour_of_day", "day_of_week", "row", "column"]);

        let input = FeatureInput { hour_of_day: 10, day_of_week: 3, row: 2, column: 4 };
        assert_eq!(schema.vectorize(&input), vec![10.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn test_flatten_is_row_major() {
        let schema = FeatureSchema::current();
        let a = FeatureInput { hour_of_day: 1, day_of_week: 2, row: 3, column: 4 };
        let b = FeatureInput { hour_of_day: 5, day_of_week: 6, row: 7, column: 0 };
        assert_eq!(
            schema.flatten([&a, &b]),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 0.0]
        );
    }

    #[test]
    fn test_calendar_fields_stay_in_range() {
        for t in -500i64..500 {
            assert!(hour_of_day(t) < 24);
            assert!(day_of_week(t) < 7);
        }
        assert_eq!(hour_of_day(25), 1);
        assert_eq!(day_of_week(24 * 8), 1);
    }

    #[test]
    fn test_schema_roundtrips_through_json() {
        let schema = FeatureSchema::current();
        let json   = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("hour_of_day"));
        let back: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);
    }
}
