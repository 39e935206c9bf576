// ============================================================
// Layer 4 — Grid File Parser
// ============================================================
// Decodes the plain-text snapshot format into Observations.
//
// File layout:
//
//   line 0          T                 number of snapshots
//   line 1          R C               rows and columns per snapshot
//   line 2 + t*R+j  v0 v1 ... v(C-1)  row j of snapshot t
//
// Example (T=1, R=2, C=2):
//
//   1
//   2 2
//   5 -1
//   3 7
//
// decodes to known = {(0,0,0,5), (0,1,0,3), (0,1,1,7)}
// and unknown = {(0,0,1,-1)}.
//
// There is no recovery: the first short line, extra token,
// or non-integer token aborts with a ParseError carrying the
// 1-based line number.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::error::PipelineError;
use crate::domain::observation::{GridDescriptor, Observation, ParsedGrid};
use crate::domain::traits::ObservationSource;

/// Reads a grid from a local file.
/// Implements the ObservationSource trait from Layer 3.
pub struct GridFileSource {
    path: PathBuf,
}

impl GridFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ObservationSource for GridFileSource {
    fn load(&self) -> Result<ParsedGrid> {
        if !self.path.is_file() {
            tracing::error!("Grid file '{}' does not exist", self.path.display());
            return Err(PipelineError::not_found("grid source file", &self.path).into());
        }

        tracing::info!("Loading grid from '{}'", self.path.display());
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read '{}'", self.path.display()))?;

        let grid = parse_grid(&text)
            .with_context(|| format!("Cannot decode grid file '{}'", self.path.display()))?;

        tracing::info!(
            "Decoded {} snapshots of {}x{}: {} known cells, {} unknown",
            grid.descriptor.num_snapshots,
            grid.descriptor.rows,
            grid.descriptor.columns,
            grid.known.len(),
            grid.unknown.len(),
        );
        Ok(grid)
    }
}

/// Decode the full text of a grid file.
pub fn parse_grid(text: &str) -> Result<ParsedGrid, PipelineError> {
    let mut lines = text.lines().enumerate();

    // ── Header ───────────────────────────────────────────────────────────────
    let (_, first) = lines
        .next()
        .ok_or_else(|| PipelineError::parse(1, "missing snapshot count"))?;
    let num_snapshots = parse_dimension(first.trim(), 1, "snapshot count")?;

    let (_, second) = lines
        .next()
        .ok_or_else(|| PipelineError::parse(2, "missing 'rows columns' line"))?;
    let dims: Vec<&str> = second.split_whitespace().collect();
    if dims.len() != 2 {
        return Err(PipelineError::parse(
            2,
            format!("expected 'rows columns', found {} tokens", dims.len()),
        ));
    }
    let rows    = parse_dimension(dims[0], 2, "row count")?;
    let columns = parse_dimension(dims[1], 2, "column count")?;

    let descriptor = GridDescriptor { num_snapshots, rows, columns };
    if descriptor.cell_count().is_none() {
        return Err(PipelineError::parse(
            2,
            format!("{num_snapshots} x {rows} x {columns} cells cannot be addressed"),
        ));
    }

    // ── Data lines ───────────────────────────────────────────────────────────
    // Grown as lines arrive: the header alone is not trusted to size anything.
    let mut known   = Vec::new();
    let mut unknown = Vec::new();

    for t in 0..num_snapshots {
        for j in 0..rows {
            // 1-based: two header lines, then line index t*rows + j
            let line_no = 3 + t as usize * rows as usize + j as usize;
            let (_, line) = lines.next().ok_or_else(|| {
                PipelineError::parse(
                    line_no,
                    format!("missing data line for snapshot {t}, row {j}"),
                )
            })?;

            let mut tokens = line.split_whitespace();
            for i in 0..columns {
                let token = tokens.next().ok_or_else(|| {
                    PipelineError::parse(line_no, format!("expected {columns} values, found {i}"))
                })?;
                let value: i64 = token.parse().map_err(|_| {
                    PipelineError::parse(line_no, format!("'{token}' is not an integer"))
                })?;

                let obs = Observation::new(t, j, i, value);
                if obs.is_sentinel() {
                    unknown.push(obs);
                } else {
                    known.push(obs);
                }
            }

            if tokens.next().is_some() {
                return Err(PipelineError::parse(
                    line_no,
                    format!("more than {columns} values"),
                ));
            }
        }
    }

    // Blank lines at the end of the file are tolerated; data is not.
    if let Some((idx, _)) = lines.find(|(_, l)| !l.trim().is_empty()) {
        return Err(PipelineError::parse(idx + 1, "unexpected data after the last snapshot"));
    }

    Ok(ParsedGrid { descriptor, known, unknown })
}

fn parse_dimension(token: &str, line: usize, what: &str) -> Result<u32, PipelineError> {
    let n: u32 = token
        .parse()
        .map_err(|_| PipelineError::parse(line, format!("{what} '{token}' is not a non-negative integer")))?;
    if n == 0 {
        return Err(PipelineError::parse(line, format!("{what} must be greater than zero")));
    }
    Ok(n)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_decodes_small_grid() {
        let grid = parse_grid("1\n2 2\n5 -1\n3 7\n").unwrap();

        assert_eq!(grid.descriptor, GridDescriptor { num_snapshots: 1, rows: 2, columns: 2 });
        assert_eq!(
            grid.known,
            vec![
                Observation::new(0, 0, 0, 5),
                Observation::new(0, 1, 0, 3),
                Observation::new(0, 1, 1, 7),
            ]
        );
        assert_eq!(grid.unknown, vec![Observation::new(0, 0, 1, -1)]);
    }

    #[test]
    fn test_covers_every_cell_exactly_once() {
        // 3 snapshots of 2x3, every third cell unknown
        let mut text = String::from("3\n2 3\n");
        let mut n = 0i64;
        for _ in 0..6 {
            let line: Vec<String> = (0..3)
                .map(|_| {
                    n += 1;
                    if n % 3 == 0 { "-1".to_string() } else { n.to_string() }
                })
                .collect();
            text.push_str(&line.join(" "));
            text.push('\n');
        }

        let grid = parse_grid(&text).unwrap();
        assert_eq!(Some(grid.total()), grid.descriptor.cell_count());
        assert!(grid.unknown.iter().all(Observation::is_sentinel));
        assert!(grid.known.iter().all(|o| !o.is_sentinel()));

        let cells: HashSet<_> = grid
            .known
            .iter()
            .chain(grid.unknown.iter())
            .map(Observation::cell)
            .collect();
        assert_eq!(cells.len(), 18);
    }

    #[test]
    fn test_snapshot_index_advances_every_rows_lines() {
        let grid = parse_grid("2\n1 2\n1 2\n3 4\n").unwrap();
        assert_eq!(grid.known[2], Observation::new(1, 0, 0, 3));
        assert_eq!(grid.known[3], Observation::new(1, 0, 1, 4));
    }

    #[test]
    fn test_short_line_is_a_parse_error() {
        let err = parse_grid("1\n2 2\n5 -1\n3\n").unwrap_err();
        assert!(matches!(err, PipelineError::Parse { line: 4, .. }), "{err}");
    }

    #[test]
    fn test_extra_token_is_a_parse_error() {
        let err = parse_grid("1\n1 2\n5 6 7\n").unwrap_err();
        assert!(matches!(err, PipelineError::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn test_non_integer_is_a_parse_error() {
        let err = parse_grid("1\n1 2\n5 x\n").unwrap_err();
        assert!(matches!(err, PipelineError::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn test_missing_lines_is_a_parse_error() {
        let err = parse_grid("2\n1 1\n5\n").unwrap_err();
        assert!(matches!(err, PipelineError::Parse { line: 4, .. }), "{err}");
    }

    #[test]
    fn test_huge_header_without_data_is_a_parse_error() {
        let err = parse_grid("100000000\n100000 100000\n").unwrap_err();
        assert!(matches!(err, PipelineError::Parse { line: 3, .. }), "{err}");

        let err = parse_grid("4000000000\n4000000000 4000000000\n").unwrap_err();
        assert!(matches!(err, PipelineError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(parse_grid("").unwrap_err(), PipelineError::Parse { line: 1, .. }));
        assert!(matches!(parse_grid("0\n1 1\n").unwrap_err(), PipelineError::Parse { line: 1, .. }));
        assert!(matches!(parse_grid("1\n3\n").unwrap_err(), PipelineError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_trailing_blank_lines_are_ignored_but_data_is_not() {
        assert!(parse_grid("1\n1 1\n4\n\n  \n").is_ok());
        let err = parse_grid("1\n1 1\n4\n9\n").unwrap_err();
        assert!(matches!(err, PipelineError::Parse { line: 4, .. }), "{err}");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let source = GridFileSource::new("/definitely/not/here.txt");
        let err    = source.load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_loads_from_disk() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        std::fs::write(&path, "1\n2 2\n5 -1\n3 7\n").unwrap();

        let grid = GridFileSource::new(&path).load().unwrap();
        assert_eq!(grid.known.len(), 3);
        assert_eq!(grid.unknown.len(), 1);
    }
}
