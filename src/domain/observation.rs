// ============================================================
// Layer 3 — Observation Domain Types
// ============================================================
// One cell of the snapshot grid: at time `time`, the cell at
// (`row`, `column`) held demand `value`.
//
// A value of -1 is the sentinel for "unknown". Those cells are
// never trained on; they form the test partition that the
// model is asked to fill in.
//
// The grid descriptor is read from the first two lines of the
// source file and bounds every other index.

use serde::{Deserialize, Serialize};

/// Marker value for a withheld cell.
pub const SENTINEL: i64 = -1;

/// A single decoded grid cell.
///
/// Field order matters: the derived `Ord` compares
/// (time, row, column, value), which is exactly the
/// deterministic order the feature engineer sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Observation {
    pub time:   u32,
    pub row:    u32,
    pub column: u32,
    pub value:  i64,
}

impl Observation {
    pub fn new(time: u32, row: u32, column: u32, value: i64) -> Self {
        Self { time, row, column, value }
    }

    /// True when this cell holds the "unknown" sentinel
    pub fn is_sentinel(&self) -> bool {
        self.value == SENTINEL
    }

    /// (time, row, column): identifies the cell regardless of value
    pub fn cell(&self) -> (u32, u32, u32) {
        (self.time, self.row, self.column)
    }
}

/// Dimensions of the source grid: `num_snapshots` slices of
/// `rows` x `columns` cells each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDescriptor {
    pub num_snapshots: u32,
    pub rows:          u32,
    pub columns:       u32,
}

impl GridDescriptor {
    /// Total number of cells the file must describe.
    /// `None` when the header describes more cells than `usize` can count.
    pub fn cell_count(&self) -> Option<usize> {
        self.data_lines()?.checked_mul(self.columns as usize)
    }

    /// Number of data lines expected after the two header lines
    pub fn data_lines(&self) -> Option<usize> {
        (self.num_snapshots as usize).checked_mul(self.rows as usize)
    }
}

/// Result of decoding a grid file, already routed into
/// known readings and sentinel cells.
#[derive(Debug, Clone)]
pub struct ParsedGrid {
    pub descriptor: GridDescriptor,
    /// Cells with a real demand reading, in scan order
    pub known:      Vec<Observation>,
    /// Cells holding the sentinel, in scan order
    pub unknown:    Vec<Observation>,
}

impl ParsedGrid {
    pub fn total(&self) -> usize {
        self.known.len() + self.unknown.len()
    }
}

/// The three disjoint partitions written by ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionKind {
    Train,
    Test,
    Validation,
}

impl PartitionKind {
    pub const ALL: [PartitionKind; 3] =
        [PartitionKind::Train, PartitionKind::Test, PartitionKind::Validation];

    /// Stem used in artifact file names, e.g. `train` → `train_data.csv`
    pub fn stem(&self) -> &'static str {
        match self {
            PartitionKind::Train      => "train",
            PartitionKind::Test       => "test",
            PartitionKind::Validation => "validation",
        }
    }
}

impl std::fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.stem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_detection() {
        assert!(Observation::new(0, 0, 1, -1).is_sentinel());
        assert!(!Observation::new(0, 0, 1, 0).is_sentinel());
    }

    #[test]
    fn test_ordering_is_time_row_column() {
        let mut obs = vec![
            Observation::new(1, 0, 0, 9),
            Observation::new(0, 1, 0, 2),
            Observation::new(0, 0, 1, 3),
            Observation::new(0, 0, 0, 7),
        ];
        obs.sort();
        let cells: Vec<_> = obs.iter().map(|o| o.cell()).collect();
        assert_eq!(cells, vec![(0, 0, 0), (0, 0, 1), (0, 1, 0), (1, 0, 0)]);
    }

    #[test]
    fn test_descriptor_counts() {
        let d = GridDescriptor { num_snapshots: 3, rows: 2, columns: 4 };
        assert_eq!(d.cell_count(), Some(24));
        assert_eq!(d.data_lines(), Some(6));

        let huge = GridDescriptor { num_snapshots: u32::MAX, rows: u32::MAX, columns: u32::MAX };
        assert_eq!(huge.cell_count(), None);
    }
}
