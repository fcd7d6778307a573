//! Structural validation of a solve request: dimensions, constraint
//! bounds, sum feasibility, and exact coverage of the selected cells.
//! A request that passes here can still be unsatisfiable; that verdict
//! belongs to the solver.

use thiserror::Error;

use crate::sentence::Sentence;
use crate::solve::SolveRequest;

/// Which direction a constraint list runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Col => write!(f, "column"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    #[error("board must have at least one row")]
    EmptyBoard,
    #[error("board must have at least one column")]
    EmptyRow,
    #[error("all rows must have the same number of columns")]
    RaggedBoard,
    #[error("expected {expected} {axis} constraint lists, got {got}")]
    WrongArity {
        axis: Axis,
        expected: usize,
        got: usize,
    },
    #[error("{axis} {line} constraint [{start}, {end}] is out of bounds")]
    OutOfBounds {
        axis: Axis,
        line: usize,
        start: usize,
        end: usize,
    },
    #[error("{axis} {line} constraint has start {start} after end {end}")]
    InvalidRange {
        axis: Axis,
        line: usize,
        start: usize,
        end: usize,
    },
    #[error("{axis} {line} constraint [{start}, {end}] has no sum")]
    MissingSum {
        axis: Axis,
        line: usize,
        start: usize,
        end: usize,
    },
    #[error("{axis} {line} constraint sum {sum} is infeasible for {len} cells")]
    InfeasibleSum {
        axis: Axis,
        line: usize,
        sum: u32,
        len: usize,
    },
    #[error("{axis} {line} constraints overlap or cover an unselected cell")]
    Overlap { axis: Axis, line: usize },
    #[error("{axis} constraints do not cover every selected cell")]
    Uncovered { axis: Axis },
}

/// Check a request against the structural rules above. The board is
/// never mutated; both axes are checked independently against their own
/// working copy of the selection.
pub fn validate_request(request: &SolveRequest) -> Result<(), ValidateError> {
    let board = &request.board;
    if board.is_empty() {
        return Err(ValidateError::EmptyBoard);
    }
    let cols = board[0].len();
    if cols == 0 {
        return Err(ValidateError::EmptyRow);
    }
    if board.iter().any(|row| row.len() != cols) {
        return Err(ValidateError::RaggedBoard);
    }

    check_axis(Axis::Row, board, &request.row_constraints)?;

    // Transpose so the column pass can reuse the row machinery
    let transposed: Vec<Vec<bool>> = (0..cols)
        .map(|col| board.iter().map(|row| row[col]).collect())
        .collect();
    check_axis(Axis::Col, &transposed, &request.col_constraints)
}

fn check_axis(
    axis: Axis,
    lines: &[Vec<bool>],
    constraints: &[Vec<Sentence>],
) -> Result<(), ValidateError> {
    if constraints.len() != lines.len() {
        return Err(ValidateError::WrongArity {
            axis,
            expected: lines.len(),
            got: constraints.len(),
        });
    }

    let mut remaining: Vec<Vec<bool>> = lines.to_vec();
    for (line, line_constraints) in constraints.iter().enumerate() {
        for sentence in line_constraints {
            check_sentence(axis, line, lines[line].len(), sentence)?;
            for covered in &mut remaining[line][sentence.start..=sentence.end] {
                if !*covered {
                    return Err(ValidateError::Overlap { axis, line });
                }
                *covered = false;
            }
        }
    }
    if remaining.iter().flatten().any(|&cell| cell) {
        return Err(ValidateError::Uncovered { axis });
    }
    Ok(())
}

fn check_sentence(
    axis: Axis,
    line: usize,
    line_len: usize,
    sentence: &Sentence,
) -> Result<(), ValidateError> {
    let (start, end) = (sentence.start, sentence.end);
    if start > end {
        return Err(ValidateError::InvalidRange {
            axis,
            line,
            start,
            end,
        });
    }
    if end >= line_len {
        return Err(ValidateError::OutOfBounds {
            axis,
            line,
            start,
            end,
        });
    }
    let sum = sentence.sum.ok_or(ValidateError::MissingSum {
        axis,
        line,
        start,
        end,
    })?;
    let feasible = sentence
        .sum_bounds()
        .is_some_and(|(min, max)| (min..=max).contains(&sum));
    if !feasible {
        return Err(ValidateError::InfeasibleSum {
            axis,
            line,
            sum,
            len: sentence.len(),
        });
    }
    Ok(())
}
