use tracing::{debug, info};

use crate::error::SessionError;
use crate::gesture::{GestureMode, GestureTracker};
use crate::grid::Grid;
use crate::sentence::{segment_cols, segment_rows, Sentence};
use crate::solve::{decode_step, SolveRequest, Solver};
use crate::validate::validate_request;

/// The three ordered authoring stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Pick which cells belong to the puzzle
    Selecting,
    /// Give every run its target sum
    Annotating,
    /// Step through the solver's snapshots
    Viewing,
}

impl Phase {
    /// 1-based position of the phase, for display
    pub fn number(&self) -> u8 {
        match self {
            Phase::Selecting => 1,
            Phase::Annotating => 2,
            Phase::Viewing => 3,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Selecting => write!(f, "Select cells"),
            Phase::Annotating => write!(f, "Annotate sums"),
            Phase::Viewing => write!(f, "View solution"),
        }
    }
}

/// Which direction a sentence runs in, for annotation addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Row,
    Col,
}

/// One authoring session: the grid, the gesture in progress, the derived
/// sentences, the phase, and (once solved) the snapshot sequence.
///
/// All state lives in this one object; create it at session start and
/// drop it when the puzzle is abandoned. Every mutation is synchronous,
/// so observers only ever see committed, fully-consistent grids, and a
/// second solve cannot start while one is in flight.
pub struct Session {
    grid: Grid,
    phase: Phase,
    tracker: GestureTracker,
    row_sentences: Vec<Vec<Sentence>>,
    col_sentences: Vec<Vec<Sentence>>,
    steps: Vec<Grid>,
    step_index: usize,
}

impl Session {
    /// Start a session over a blank grid
    pub fn new(rows: usize, cols: usize) -> Result<Self, SessionError> {
        Ok(Self {
            grid: Grid::new(rows, cols)?,
            phase: Phase::Selecting,
            tracker: GestureTracker::new(),
            row_sentences: Vec::new(),
            col_sentences: Vec::new(),
            steps: Vec::new(),
            step_index: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn row_sentences(&self) -> &[Vec<Sentence>] {
        &self.row_sentences
    }

    pub fn col_sentences(&self) -> &[Vec<Sentence>] {
        &self.col_sentences
    }

    /// Mode of the gesture in progress, if any
    pub fn gesture_mode(&self) -> GestureMode {
        self.tracker.mode()
    }

    // --- grid editing (phase 1 only) ---

    /// Change the number of rows. The grid is frozen outside the
    /// selection phase.
    pub fn set_height(&mut self, rows: usize) -> Result<(), SessionError> {
        if self.phase != Phase::Selecting {
            return Err(SessionError::GridFrozen);
        }
        self.grid.resize_height(rows)?;
        Ok(())
    }

    /// Change the number of columns. Same gating as [`Session::set_height`].
    pub fn set_width(&mut self, cols: usize) -> Result<(), SessionError> {
        if self.phase != Phase::Selecting {
            return Err(SessionError::GridFrozen);
        }
        self.grid.resize_width(cols)?;
        Ok(())
    }

    /// Pointer pressed on a cell. Returns false when gestures are
    /// suppressed (any phase but the first).
    pub fn press_cell(&mut self, row: usize, col: usize) -> bool {
        if self.phase != Phase::Selecting {
            return false;
        }
        self.tracker.press(&mut self.grid, row, col);
        true
    }

    /// Pointer entered a cell mid-drag
    pub fn enter_cell(&mut self, row: usize, col: usize) -> bool {
        if self.phase != Phase::Selecting {
            return false;
        }
        self.tracker.enter(&mut self.grid, row, col);
        true
    }

    /// Pointer released, wherever it is. Always ends the gesture, even
    /// if the phase changed underneath it.
    pub fn release(&mut self) {
        self.tracker.release();
    }

    // --- annotation (phase 2 only) ---

    /// Annotate the `index`th run of a row with its target sum
    pub fn set_row_sum(&mut self, row: usize, index: usize, sum: u32) -> Result<(), SessionError> {
        Self::set_sum(self.phase, &mut self.row_sentences, LineKind::Row, row, index, sum)
    }

    /// Annotate the `index`th run of a column with its target sum
    pub fn set_col_sum(&mut self, col: usize, index: usize, sum: u32) -> Result<(), SessionError> {
        Self::set_sum(self.phase, &mut self.col_sentences, LineKind::Col, col, index, sum)
    }

    fn set_sum(
        phase: Phase,
        sentences: &mut [Vec<Sentence>],
        kind: LineKind,
        line: usize,
        index: usize,
        sum: u32,
    ) -> Result<(), SessionError> {
        if phase != Phase::Annotating {
            return Err(SessionError::GridFrozen);
        }
        let sentence = sentences
            .get_mut(line)
            .and_then(|line| line.get_mut(index))
            .ok_or(SessionError::UnknownSentence {
                line: format!("{:?} {}", kind, line).to_lowercase(),
                index,
            })?;
        let (min, max) = sentence
            .sum_bounds()
            .ok_or(SessionError::RunTooLong { len: sentence.len() })?;
        if !(min..=max).contains(&sum) {
            return Err(SessionError::SumOutOfRange {
                sum,
                len: sentence.len(),
                min,
                max,
            });
        }
        sentence.sum = Some(sum);
        Ok(())
    }

    /// How many sentences still lack a sum
    pub fn missing_sums(&self) -> usize {
        self.row_sentences
            .iter()
            .chain(self.col_sentences.iter())
            .flatten()
            .filter(|s| s.sum.is_none())
            .count()
    }

    // --- phase transitions ---

    /// Move to the next phase.
    ///
    /// Leaving `Selecting` derives the row and column sentences from the
    /// frozen grid. Leaving `Annotating` requires every sentence to be
    /// annotated, then performs the solve exchange; any failure leaves
    /// the session exactly where it was. From `Viewing` this is a no-op.
    pub fn advance(&mut self, solver: &dyn Solver) -> Result<(), SessionError> {
        match self.phase {
            Phase::Selecting => {
                self.row_sentences = segment_rows(&self.grid);
                self.col_sentences = segment_cols(&self.grid);
                self.release();
                self.phase = Phase::Annotating;
                info!(
                    rows = self.grid.rows(),
                    cols = self.grid.cols(),
                    "grid frozen for annotation"
                );
                Ok(())
            }
            Phase::Annotating => {
                let missing = self.missing_sums();
                if missing > 0 {
                    return Err(SessionError::MissingSum { count: missing });
                }
                let request = SolveRequest {
                    board: self.grid.selection(),
                    row_constraints: self.row_sentences.clone(),
                    col_constraints: self.col_sentences.clone(),
                };
                validate_request(&request)?;

                debug!("solve requested");
                let response = solver.solve(&request)?;
                if !response.success {
                    let reason = response
                        .error
                        .unwrap_or_else(|| "solver reported failure".to_string());
                    return Err(SessionError::SolverFailed(reason));
                }
                let raw_steps = response.steps.unwrap_or_default();
                if raw_steps.is_empty() {
                    return Err(SessionError::EmptySolution);
                }
                // Decode everything before touching any state
                let steps = raw_steps
                    .iter()
                    .map(|step| decode_step(step, self.grid.rows(), self.grid.cols()))
                    .collect::<Result<Vec<_>, _>>()?;

                info!(steps = steps.len(), "solution installed");
                self.grid = steps[0].clone();
                self.steps = steps;
                self.step_index = 0;
                self.phase = Phase::Viewing;
                Ok(())
            }
            Phase::Viewing => Ok(()),
        }
    }

    /// Move back one phase, flooring at `Selecting`. Solved values are
    /// always cleared so earlier phases never show stale digits; leaving
    /// `Viewing` also discards the snapshot sequence.
    pub fn retreat(&mut self) {
        self.phase = match self.phase {
            Phase::Selecting => Phase::Selecting,
            Phase::Annotating => Phase::Selecting,
            Phase::Viewing => {
                self.steps.clear();
                self.step_index = 0;
                Phase::Annotating
            }
        };
        self.grid.clear_values();
        debug!(phase = %self.phase, "retreated");
    }

    // --- playback (phase 3 only) ---

    /// Whether a snapshot sequence is loaded
    pub fn has_solution(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Jump to the first snapshot. Returns whether the cursor moved.
    pub fn first_step(&mut self) -> bool {
        if !self.can_navigate() || self.step_index == 0 {
            return false;
        }
        self.show_step(0);
        true
    }

    /// Jump to the last snapshot
    pub fn last_step(&mut self) -> bool {
        if !self.can_navigate() || self.step_index == self.steps.len() - 1 {
            return false;
        }
        self.show_step(self.steps.len() - 1);
        true
    }

    /// Advance one snapshot; no-op at the end
    pub fn next_step(&mut self) -> bool {
        if !self.can_navigate() || self.step_index + 1 >= self.steps.len() {
            return false;
        }
        self.show_step(self.step_index + 1);
        true
    }

    /// Go back one snapshot; no-op at the start
    pub fn prev_step(&mut self) -> bool {
        if !self.can_navigate() || self.step_index == 0 {
            return false;
        }
        self.show_step(self.step_index - 1);
        true
    }

    /// Jump to an arbitrary snapshot. Out-of-range indices are rejected
    /// rather than clamped.
    pub fn jump_to_step(&mut self, index: usize) -> Result<(), SessionError> {
        if !self.can_navigate() {
            return Err(SessionError::NoSolution);
        }
        if index >= self.steps.len() {
            return Err(SessionError::StepOutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        self.show_step(index);
        Ok(())
    }

    fn can_navigate(&self) -> bool {
        self.phase == Phase::Viewing && self.has_solution()
    }

    fn show_step(&mut self, index: usize) {
        self.step_index = index;
        self.grid = self.steps[index].clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolveError;
    use crate::solve::SolveResponse;

    /// Solver double that replays a canned response
    struct StubSolver {
        response: SolveResponse,
    }

    impl StubSolver {
        fn with_steps(steps: Vec<Vec<Vec<&str>>>) -> Self {
            Self {
                response: SolveResponse {
                    success: true,
                    is_solved: Some(true),
                    steps: Some(
                        steps
                            .into_iter()
                            .map(|step| {
                                step.into_iter()
                                    .map(|row| row.into_iter().map(String::from).collect())
                                    .collect()
                            })
                            .collect(),
                    ),
                    error: None,
                },
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: SolveResponse {
                    success: false,
                    is_solved: None,
                    steps: None,
                    error: Some(message.to_string()),
                },
            }
        }
    }

    impl Solver for StubSolver {
        fn solve(&self, _request: &SolveRequest) -> Result<SolveResponse, SolveError> {
            Ok(self.response.clone())
        }
    }

    struct DownSolver;

    impl Solver for DownSolver {
        fn solve(&self, _request: &SolveRequest) -> Result<SolveResponse, SolveError> {
            Err(SolveError::Transport("connection refused".to_string()))
        }
    }

    /// Anti-diagonal 2x2 selection, sums annotated, ready to solve
    fn annotated_session() -> Session {
        let mut session = Session::new(2, 2).unwrap();
        session.press_cell(0, 1);
        session.release();
        session.press_cell(1, 0);
        session.release();
        session.advance(&DownSolver).unwrap();

        session.set_row_sum(0, 0, 1).unwrap();
        session.set_row_sum(1, 0, 2).unwrap();
        session.set_col_sum(0, 0, 2).unwrap();
        session.set_col_sum(1, 0, 1).unwrap();
        session
    }

    #[test]
    fn test_selection_phase_gestures_and_resize() {
        let mut session = Session::new(2, 2).unwrap();
        assert_eq!(session.phase(), Phase::Selecting);

        assert!(session.press_cell(0, 0));
        assert!(session.enter_cell(0, 1));
        session.release();
        assert!(session.grid().is_selected(0, 0));
        assert!(session.grid().is_selected(0, 1));

        session.set_height(3).unwrap();
        session.set_width(4).unwrap();
        assert_eq!(session.grid().rows(), 3);
        assert_eq!(session.grid().cols(), 4);
        assert!(session.set_height(0).is_err());
    }

    #[test]
    fn test_advance_computes_sentences_and_freezes() {
        let mut session = annotated_session();
        assert_eq!(session.phase(), Phase::Annotating);
        assert_eq!(session.row_sentences()[0].len(), 1);
        assert_eq!(session.row_sentences()[1].len(), 1);

        // Grid is frozen: gestures and resize are refused
        assert!(!session.press_cell(0, 0));
        assert!(!session.enter_cell(0, 0));
        assert!(matches!(
            session.set_width(5),
            Err(SessionError::GridFrozen)
        ));
    }

    #[test]
    fn test_release_mid_phase_change_ends_gesture() {
        let mut session = Session::new(2, 2).unwrap();
        session.press_cell(0, 0);
        session.advance(&DownSolver).unwrap();
        // Release after the phase flipped must still idle the tracker
        session.release();
        assert_eq!(session.gesture_mode(), GestureMode::Idle);
    }

    #[test]
    fn test_annotation_rejections() {
        let mut session = annotated_session();

        assert!(matches!(
            session.set_row_sum(0, 5, 3),
            Err(SessionError::UnknownSentence { .. })
        ));
        assert!(matches!(
            session.set_row_sum(0, 0, 10),
            Err(SessionError::SumOutOfRange { min: 1, max: 9, .. })
        ));
        // Sum out of range leaves the annotation untouched
        assert_eq!(session.row_sentences()[0][0].sum, Some(1));
    }

    #[test]
    fn test_annotation_outside_phase_is_refused() {
        let mut session = Session::new(2, 2).unwrap();
        session.press_cell(0, 0);
        session.release();
        assert!(matches!(
            session.set_row_sum(0, 0, 1),
            Err(SessionError::GridFrozen)
        ));
    }

    #[test]
    fn test_solve_success_enters_viewing() {
        let mut session = annotated_session();
        let solver = StubSolver::with_steps(vec![
            vec![vec!["X", "."], vec![".", "X"]],
            vec![vec!["X", "1"], vec!["2", "X"]],
        ]);

        session.advance(&solver).unwrap();
        assert_eq!(session.phase(), Phase::Viewing);
        assert!(session.has_solution());
        assert_eq!(session.step_count(), 2);
        assert_eq!(session.step_index(), 0);
        // First snapshot is displayed immediately
        assert_eq!(session.grid().cell(0, 1).value, None);
        assert!(session.grid().is_selected(0, 1));

        // Advancing from Viewing is a no-op
        session.advance(&solver).unwrap();
        assert_eq!(session.phase(), Phase::Viewing);
        assert_eq!(session.step_index(), 0);
    }

    #[test]
    fn test_missing_sums_block_solve() {
        let mut session = Session::new(1, 2).unwrap();
        session.press_cell(0, 0);
        session.enter_cell(0, 1);
        session.release();
        session.advance(&DownSolver).unwrap();

        let solver = StubSolver::with_steps(vec![vec![vec!["1", "2"]]]);
        match session.advance(&solver) {
            Err(SessionError::MissingSum { count }) => assert_eq!(count, 3),
            other => panic!("expected MissingSum, got {:?}", other.err()),
        }
        assert_eq!(session.phase(), Phase::Annotating);
    }

    #[test]
    fn test_solver_failure_stays_in_annotating() {
        let mut session = annotated_session();

        match session.advance(&StubSolver::failing("no combinations left")) {
            Err(SessionError::SolverFailed(message)) => {
                assert_eq!(message, "no combinations left");
            }
            other => panic!("expected SolverFailed, got {:?}", other.err()),
        }
        assert_eq!(session.phase(), Phase::Annotating);
        assert!(!session.has_solution());
    }

    #[test]
    fn test_empty_steps_is_a_failure() {
        let mut session = annotated_session();

        assert!(matches!(
            session.advance(&StubSolver::with_steps(vec![])),
            Err(SessionError::EmptySolution)
        ));
        assert_eq!(session.phase(), Phase::Annotating);
    }

    #[test]
    fn test_transport_failure_stays_in_annotating() {
        let mut session = annotated_session();
        assert!(matches!(
            session.advance(&DownSolver),
            Err(SessionError::Solve(_))
        ));
        assert_eq!(session.phase(), Phase::Annotating);
    }

    #[test]
    fn test_misshapen_step_aborts_cleanly() {
        let mut session = annotated_session();
        let solver = StubSolver::with_steps(vec![vec![vec!["X", "1"]]]);

        assert!(matches!(
            session.advance(&solver),
            Err(SessionError::ResponseShape { rows: 2, cols: 2 })
        ));
        assert_eq!(session.phase(), Phase::Annotating);
        assert!(!session.has_solution());
    }

    #[test]
    fn test_retreat_floors_and_clears_values() {
        let mut session = annotated_session();
        session
            .advance(&StubSolver::with_steps(vec![vec![
                vec!["X", "1"],
                vec!["2", "X"],
            ]]))
            .unwrap();
        assert_eq!(session.grid().cell(0, 1).value, Some(1));

        session.retreat();
        assert_eq!(session.phase(), Phase::Annotating);
        assert!(!session.has_solution());
        assert_eq!(session.grid().cell(0, 1).value, None);
        // Selection survives the retreat
        assert!(session.grid().is_selected(0, 1));

        session.retreat();
        assert_eq!(session.phase(), Phase::Selecting);
        session.retreat();
        session.retreat();
        assert_eq!(session.phase(), Phase::Selecting);
    }

    #[test]
    fn test_playback_navigation() {
        let mut session = annotated_session();
        session
            .advance(&StubSolver::with_steps(vec![
                vec![vec!["X", "."], vec![".", "X"]],
                vec![vec!["X", "1"], vec![".", "X"]],
                vec![vec!["X", "1"], vec!["2", "X"]],
            ]))
            .unwrap();

        // first then prev is a no-op
        assert!(!session.first_step());
        assert!(!session.prev_step());
        assert_eq!(session.step_index(), 0);

        assert!(session.next_step());
        assert_eq!(session.step_index(), 1);
        assert_eq!(session.grid().cell(0, 1).value, Some(1));

        assert!(session.last_step());
        assert_eq!(session.step_index(), 2);
        assert_eq!(session.grid().cell(1, 0).value, Some(2));

        // last then next is a no-op
        assert!(!session.next_step());
        assert_eq!(session.step_index(), 2);

        assert!(session.first_step());
        assert_eq!(session.step_index(), 0);

        session.jump_to_step(1).unwrap();
        assert_eq!(session.step_index(), 1);
        assert!(matches!(
            session.jump_to_step(3),
            Err(SessionError::StepOutOfRange { index: 3, len: 3 })
        ));
        assert_eq!(session.step_index(), 1);
    }

    #[test]
    fn test_playback_requires_solution() {
        let mut session = Session::new(1, 1).unwrap();
        assert!(!session.next_step());
        assert!(!session.first_step());
        assert!(matches!(
            session.jump_to_step(0),
            Err(SessionError::NoSolution)
        ));
    }
}
