//! Core Kakuro authoring engine.
//!
//! A [`Session`] walks a puzzle through three phases: selecting which
//! cells belong to the board, annotating each contiguous run with its
//! target sum, and stepping through the snapshots an external solver
//! returns. The solver itself stays behind the [`Solver`] trait; this
//! crate only owns the authoring state machine and the wire contract.

mod error;
mod gesture;
mod grid;
mod sentence;
mod session;
mod solve;
mod validate;

pub use error::{GridError, SessionError, SolveError};
pub use gesture::{GestureMode, GestureTracker};
pub use grid::{Cell, Grid};
pub use sentence::{segment_cols, segment_line, segment_rows, Sentence};
pub use session::{Phase, Session};
pub use solve::{decode_step, SolveRequest, SolveResponse, Solver};
pub use validate::{validate_request, Axis, ValidateError};
