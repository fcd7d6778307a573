use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// A single board cell: part of the puzzle or not, and optionally filled
/// with a digit once a solution snapshot is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Whether the cell belongs to the puzzle
    pub selected: bool,
    /// Digit shown in the cell, if any
    pub value: Option<u8>,
}

impl Cell {
    /// An unselected, valueless cell
    pub fn blank() -> Self {
        Self::default()
    }
}

/// Rectangular board of cells. Always at least 1x1, and every row has
/// the same length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Create a grid of blank cells
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows < 1 {
            return Err(GridError::InvalidHeight(rows));
        }
        if cols < 1 {
            return Err(GridError::InvalidWidth(cols));
        }
        Ok(Self {
            cells: vec![vec![Cell::blank(); cols]; rows],
        })
    }

    /// Build a grid directly from rows of cells.
    ///
    /// Rows must be non-empty and of equal length.
    pub fn from_cells(cells: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        if cells.is_empty() {
            return Err(GridError::InvalidHeight(0));
        }
        let cols = cells[0].len();
        if cols == 0 {
            return Err(GridError::InvalidWidth(0));
        }
        if cells.iter().any(|row| row.len() != cols) {
            return Err(GridError::RaggedRows);
        }
        Ok(Self { cells })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cells[0].len()
    }

    /// Get a cell. Coordinates must be in bounds.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[row][col]
    }

    /// Check whether a cell is part of the puzzle
    pub fn is_selected(&self, row: usize, col: usize) -> bool {
        self.cells[row][col].selected
    }

    /// Resize to `new_rows` rows, keeping the overlapping rows verbatim.
    /// New rows are blank; excess rows are dropped. The grid is left
    /// untouched when `new_rows` is zero.
    pub fn resize_height(&mut self, new_rows: usize) -> Result<(), GridError> {
        if new_rows < 1 {
            return Err(GridError::InvalidHeight(new_rows));
        }
        let cols = self.cols();
        self.cells.resize(new_rows, vec![Cell::blank(); cols]);
        Ok(())
    }

    /// Resize to `new_cols` columns, keeping the overlapping prefix of
    /// every row. Same validation as [`Grid::resize_height`].
    pub fn resize_width(&mut self, new_cols: usize) -> Result<(), GridError> {
        if new_cols < 1 {
            return Err(GridError::InvalidWidth(new_cols));
        }
        for row in &mut self.cells {
            row.resize(new_cols, Cell::blank());
        }
        Ok(())
    }

    /// Replace a cell's selection flag, leaving its value untouched.
    /// Coordinates must be in bounds.
    pub fn set_selected(&mut self, row: usize, col: usize, selected: bool) {
        self.cells[row][col].selected = selected;
    }

    /// Replace a cell's value, leaving its selection flag untouched.
    /// Coordinates must be in bounds.
    pub fn set_value(&mut self, row: usize, col: usize, value: Option<u8>) {
        self.cells[row][col].value = value;
    }

    /// Strip every value while preserving the selection
    pub fn clear_values(&mut self) {
        for row in &mut self.cells {
            for cell in row {
                cell.value = None;
            }
        }
    }

    /// The boolean selection matrix, row by row
    pub fn selection(&self) -> Vec<Vec<bool>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.selected).collect())
            .collect()
    }

    /// One row's selection flags
    pub fn row_selection(&self, row: usize) -> Vec<bool> {
        self.cells[row].iter().map(|cell| cell.selected).collect()
    }

    /// One column's selection flags, read top to bottom
    pub fn col_selection(&self, col: usize) -> Vec<bool> {
        self.cells.iter().map(|row| row[col].selected).collect()
    }
}

impl std::fmt::Display for Grid {
    /// Compact rendering: `X` for blocked cells, `.` for empty puzzle
    /// cells, the digit for filled ones.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                match (cell.selected, cell.value) {
                    (false, _) => write!(f, "X")?,
                    (true, None) => write!(f, ".")?,
                    (true, Some(v)) => write!(f, "{}", v)?,
                }
            }
        }
        Ok(())
    }
}
