use thiserror::Error;

use crate::validate::ValidateError;

/// Grid construction and resize failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("height must be at least 1, got {0}")]
    InvalidHeight(usize),
    #[error("width must be at least 1, got {0}")]
    InvalidWidth(usize),
    #[error("all rows must have the same number of columns")]
    RaggedRows,
}

/// Failure reported by the solver collaborator before a usable response
/// was produced (transport breakdown, undecodable payload).
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("solver request failed: {0}")]
    Transport(String),
    #[error("solver response could not be decoded: {0}")]
    Decode(String),
}

/// Session state machine failures. Phase and grid are untouched whenever
/// one of these is returned.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("the grid can only be edited while selecting cells")]
    GridFrozen,
    #[error("no sentence {index} on {line}")]
    UnknownSentence { line: String, index: usize },
    #[error("sum {sum} is out of range for a run of {len} cells ({min}..={max})")]
    SumOutOfRange {
        sum: u32,
        len: usize,
        min: u32,
        max: u32,
    },
    #[error("run of {len} cells cannot hold distinct digits 1-9")]
    RunTooLong { len: usize },
    #[error("{count} sentence(s) still need a sum")]
    MissingSum { count: usize },
    #[error("solver failed: {0}")]
    SolverFailed(String),
    #[error("solver returned no solution steps")]
    EmptySolution,
    #[error("solution step has wrong shape (expected {rows}x{cols})")]
    ResponseShape { rows: usize, cols: usize },
    #[error("step {index} is out of range (0..{len})")]
    StepOutOfRange { index: usize, len: usize },
    #[error("no solution loaded")]
    NoSolution,
    #[error("invalid solve request: {0}")]
    Invalid(#[from] ValidateError),
    #[error(transparent)]
    Solve(#[from] SolveError),
}
