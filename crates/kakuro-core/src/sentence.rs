use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// A maximal contiguous run of selected cells along one row or column,
/// eligible to carry a sum constraint. `start` and `end` are inclusive
/// indices along the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub start: usize,
    pub end: usize,
    pub sum: Option<u32>,
}

#[allow(clippy::len_without_is_empty)] // a run is never empty
impl Sentence {
    /// A run with no sum annotated yet
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            end,
            sum: None,
        }
    }

    /// Number of cells in the run
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Whether `index` falls inside the run
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// Smallest and largest sum the run can hold with distinct digits
    /// 1-9, or `None` for runs longer than 9 cells. A run of `n` cells
    /// is bounded below by `1+2+..+n` and above by `9+8+..+(9-n+1)`.
    pub fn sum_bounds(&self) -> Option<(u32, u32)> {
        let n = self.len() as u32;
        if n > 9 {
            return None;
        }
        let min = n * (n + 1) / 2;
        let max = n * (19 - n) / 2;
        Some((min, max))
    }
}

/// Split one line of selection flags into its sentences.
///
/// Scans left to right: skip unselected cells, then extend over the
/// selected block, emit it, and continue after it. Sentences come out
/// ordered by `start`, non-overlapping, separated by at least one
/// unselected cell, with single-cell runs included.
pub fn segment_line(line: &[bool]) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut start = 0;
    while start < line.len() {
        while start < line.len() && !line[start] {
            start += 1;
        }
        if start == line.len() {
            break;
        }

        let mut end = start;
        while end < line.len() && line[end] {
            end += 1;
        }
        sentences.push(Sentence::new(start, end - 1));
        start = end;
    }
    sentences
}

/// Segment every row of the grid independently, indexed by row
pub fn segment_rows(grid: &Grid) -> Vec<Vec<Sentence>> {
    (0..grid.rows())
        .map(|row| segment_line(&grid.row_selection(row)))
        .collect()
}

/// Segment every column of the grid independently, indexed by column
pub fn segment_cols(grid: &Grid) -> Vec<Vec<Sentence>> {
    (0..grid.cols())
        .map(|col| segment_line(&grid.col_selection(col)))
        .collect()
}
