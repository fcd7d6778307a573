use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SolveError};
use crate::grid::{Cell, Grid};
use crate::sentence::Sentence;

/// Everything the solver needs: the shape of the puzzle and the
/// annotated runs for every row and column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    /// `rows x cols` matrix of selection flags
    pub board: Vec<Vec<bool>>,
    /// Sentences per row, indexed by row
    pub row_constraints: Vec<Vec<Sentence>>,
    /// Sentences per column, indexed by column
    pub col_constraints: Vec<Vec<Sentence>>,
}

/// The solver's answer. On success `steps` holds the full board after
/// each stage of solving, as matrices of cell codes: `"X"` marks a
/// blocked cell, a digit token a filled one, and anything else (the
/// solver writes `"."`) a puzzle cell not filled in yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    pub success: bool,
    #[serde(default)]
    pub is_solved: Option<bool>,
    #[serde(default)]
    pub steps: Option<Vec<Vec<Vec<String>>>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The external solving collaborator. The core only depends on this
/// request/response exchange; transport and algorithm live elsewhere.
pub trait Solver {
    fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolveError>;
}

/// Decode one solution step into a grid, checking it against the
/// expected dimensions.
pub fn decode_step(step: &[Vec<String>], rows: usize, cols: usize) -> Result<Grid, SessionError> {
    if step.len() != rows || step.iter().any(|row| row.len() != cols) {
        return Err(SessionError::ResponseShape { rows, cols });
    }
    let cells = step
        .iter()
        .map(|row| row.iter().map(|code| decode_cell(code)).collect())
        .collect();
    Ok(Grid::from_cells(cells)?)
}

fn decode_cell(code: &str) -> Cell {
    if code == "X" {
        return Cell::blank();
    }
    Cell {
        selected: true,
        // Unparsable tokens are puzzle cells the solver has not filled
        value: code.parse::<u8>().ok(),
    }
}
