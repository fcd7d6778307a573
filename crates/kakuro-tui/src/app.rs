use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use kakuro_core::{Axis, Phase, Sentence, Session, Solver};
use tracing::warn;

use crate::config::Config;
use crate::render::{CELL_H, CELL_W};
use crate::theme::Theme;

/// Result of handling an input event
pub enum AppAction {
    Continue,
    Quit,
}

/// One annotatable run, addressed for the annotation panel
#[derive(Debug, Clone, Copy)]
pub struct RunRef {
    pub axis: Axis,
    pub line: usize,
    pub index: usize,
    pub sentence: Sentence,
}

/// The main application state
pub struct App {
    /// The authoring session being driven
    pub session: Session,
    /// Solver the session advances against
    solver: Box<dyn Solver>,
    /// Color theme
    pub theme: Theme,
    theme_name: String,
    /// Persisted preferences
    config: Config,
    /// Keyboard cursor position on the grid
    pub cursor: (usize, usize),
    /// Position in the annotation panel
    pub run_cursor: usize,
    /// Digit buffer for sum entry and step jumps
    pub input: String,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Top-left of the rendered grid, for mouse hit testing
    grid_origin: (u16, u16),
}

impl App {
    pub fn new(
        rows: usize,
        cols: usize,
        solver: Box<dyn Solver>,
        config: Config,
    ) -> Result<Self, kakuro_core::SessionError> {
        let theme_name = config.theme.clone();
        let theme = Theme::from_name(&theme_name).unwrap_or_default();
        Ok(Self {
            session: Session::new(rows, cols)?,
            solver,
            theme,
            theme_name,
            config,
            cursor: (0, 0),
            run_cursor: 0,
            input: String::new(),
            message: None,
            message_timer: 0,
            grid_origin: (0, 0),
        })
    }

    /// Update timers (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Every annotatable run in panel order: rows first, then columns
    pub fn runs(&self) -> Vec<RunRef> {
        let rows = self.session.row_sentences().iter().enumerate().flat_map(|(line, runs)| {
            runs.iter().enumerate().map(move |(index, &sentence)| RunRef {
                axis: Axis::Row,
                line,
                index,
                sentence,
            })
        });
        let cols = self.session.col_sentences().iter().enumerate().flat_map(|(line, runs)| {
            runs.iter().enumerate().map(move |(index, &sentence)| RunRef {
                axis: Axis::Col,
                line,
                index,
                sentence,
            })
        });
        rows.chain(cols).collect()
    }

    /// Remember where the grid was drawn
    pub fn set_grid_origin(&mut self, x: u16, y: u16) {
        self.grid_origin = (x, y);
    }

    /// Map a terminal coordinate to the cell under it, if any. Border
    /// characters count toward the cell left/above them so drags do not
    /// skip cells while crossing separators.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        let (ox, oy) = self.grid_origin;
        if x <= ox || y <= oy {
            return None;
        }
        let col = ((x - ox - 1) / CELL_W) as usize;
        let row = ((y - oy - 1) / CELL_H) as usize;
        let grid = self.session.grid();
        (row < grid.rows() && col < grid.cols()).then_some((row, col))
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Char('t') => {
                self.cycle_theme();
                return AppAction::Continue;
            }
            KeyCode::Esc => {
                self.message = None;
                self.input.clear();
                return AppAction::Continue;
            }
            _ => {}
        }

        match self.session.phase() {
            Phase::Selecting => self.handle_selecting_key(key),
            Phase::Annotating => self.handle_annotating_key(key),
            Phase::Viewing => self.handle_viewing_key(key),
        }
        AppAction::Continue
    }

    fn handle_selecting_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),

            // Toggle the cell under the cursor: a one-cell gesture
            KeyCode::Char(' ') => {
                let (row, col) = self.cursor;
                self.session.press_cell(row, col);
                self.session.release();
            }

            // Resize
            KeyCode::Char('r') => self.resize_height(1),
            KeyCode::Char('R') => self.resize_height(-1),
            KeyCode::Char('c') => self.resize_width(1),
            KeyCode::Char('C') => self.resize_width(-1),

            KeyCode::Enter | KeyCode::Char('n') => self.advance(),
            _ => {}
        }
    }

    fn handle_annotating_key(&mut self, key: KeyEvent) {
        let run_count = self.runs().len();
        match key.code {
            KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
                self.run_cursor = self.run_cursor.saturating_sub(1);
                self.input.clear();
            }
            KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
                if self.run_cursor + 1 < run_count {
                    self.run_cursor += 1;
                }
                self.input.clear();
            }
            KeyCode::Char(c @ '0'..='9') => {
                if self.input.len() < 2 {
                    self.input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => self.commit_sum(),
            KeyCode::Char('n') => self.advance(),
            KeyCode::Char('b') => self.retreat(),
            _ => {}
        }
    }

    fn handle_viewing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.session.prev_step();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.session.next_step();
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.session.first_step();
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.session.last_step();
            }
            KeyCode::Char(c @ '0'..='9') => {
                if self.input.len() < 3 {
                    self.input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => self.jump_to_input(),
            KeyCode::Char('b') => self.retreat(),
            _ => {}
        }
    }

    /// Handle a mouse event. Releases are honored wherever the pointer
    /// is, so a drag ending outside the grid still ends the gesture.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((row, col)) = self.hit_test(event.column, event.row) {
                    self.cursor = (row, col);
                    self.session.press_cell(row, col);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((row, col)) = self.hit_test(event.column, event.row) {
                    self.cursor = (row, col);
                    self.session.enter_cell(row, col);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.session.release(),
            _ => {}
        }
    }

    fn move_cursor(&mut self, dr: isize, dc: isize) {
        let grid = self.session.grid();
        let row = self.cursor.0.saturating_add_signed(dr).min(grid.rows() - 1);
        let col = self.cursor.1.saturating_add_signed(dc).min(grid.cols() - 1);
        self.cursor = (row, col);
    }

    fn resize_height(&mut self, delta: isize) {
        let rows = self.session.grid().rows().saturating_add_signed(delta);
        if let Err(err) = self.session.set_height(rows) {
            self.show_message(&err.to_string());
        }
        self.clamp_cursor();
    }

    fn resize_width(&mut self, delta: isize) {
        let cols = self.session.grid().cols().saturating_add_signed(delta);
        if let Err(err) = self.session.set_width(cols) {
            self.show_message(&err.to_string());
        }
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let grid = self.session.grid();
        self.cursor.0 = self.cursor.0.min(grid.rows() - 1);
        self.cursor.1 = self.cursor.1.min(grid.cols() - 1);
    }

    /// Move to the next phase; segmentation from phase 1, the solve
    /// exchange from phase 2. Failures surface on the message line and
    /// leave the session where it was.
    fn advance(&mut self) {
        let before = self.session.phase();
        match self.session.advance(self.solver.as_ref()) {
            Ok(()) => match (before, self.session.phase()) {
                (Phase::Selecting, Phase::Annotating) => {
                    self.run_cursor = 0;
                    self.input.clear();
                    let runs = self.runs().len();
                    self.show_message(&format!("{} run(s) to annotate", runs));
                }
                (Phase::Annotating, Phase::Viewing) => {
                    self.input.clear();
                    self.show_message(&format!(
                        "Solved in {} step(s)",
                        self.session.step_count()
                    ));
                }
                _ => {}
            },
            Err(err) => {
                warn!(%err, "advance failed");
                self.show_message(&err.to_string());
            }
        }
    }

    fn retreat(&mut self) {
        self.session.retreat();
        self.input.clear();
        self.run_cursor = 0;
    }

    fn commit_sum(&mut self) {
        let Ok(sum) = self.input.parse::<u32>() else {
            return;
        };
        let runs = self.runs();
        let Some(run) = runs.get(self.run_cursor) else {
            return;
        };
        let result = match run.axis {
            Axis::Row => self.session.set_row_sum(run.line, run.index, sum),
            Axis::Col => self.session.set_col_sum(run.line, run.index, sum),
        };
        match result {
            Ok(()) => {
                self.input.clear();
                if self.run_cursor + 1 < runs.len() {
                    self.run_cursor += 1;
                }
            }
            Err(err) => self.show_message(&err.to_string()),
        }
    }

    fn jump_to_input(&mut self) {
        let Ok(step) = self.input.parse::<usize>() else {
            return;
        };
        self.input.clear();
        // Steps are displayed 1-based
        let result = step
            .checked_sub(1)
            .map(|index| self.session.jump_to_step(index));
        match result {
            Some(Ok(())) => {}
            Some(Err(err)) => self.show_message(&err.to_string()),
            None => self.show_message("Steps are numbered from 1"),
        }
    }

    fn cycle_theme(&mut self) {
        let next = Theme::next_name(&self.theme_name);
        self.theme_name = next.to_string();
        self.theme = Theme::from_name(next).unwrap_or_default();
        self.config.theme = next.to_string();
        self.config.save();
        self.show_message(&format!("{} theme", next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use kakuro_core::{SolveError, SolveRequest, SolveResponse};

    struct ScriptedSolver {
        response: SolveResponse,
    }

    impl Solver for ScriptedSolver {
        fn solve(&self, _request: &SolveRequest) -> Result<SolveResponse, SolveError> {
            Ok(self.response.clone())
        }
    }

    fn steps_response(steps: Vec<Vec<Vec<&str>>>) -> SolveResponse {
        SolveResponse {
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
        }
    }

    fn test_app(rows: usize, cols: usize, response: SolveResponse) -> App {
        App::new(
            rows,
            cols,
            Box::new(ScriptedSolver { response }),
            Config::default(),
        )
        .unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_keyboard_authoring_walk() {
        let mut app = test_app(
            2,
            2,
            steps_response(vec![vec![vec!["X", "1"], vec!["2", "X"]]]),
        );

        // Select the anti-diagonal with space
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.session.grid().is_selected(0, 1));
        assert!(app.session.grid().is_selected(1, 0));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.phase(), Phase::Annotating);
        assert_eq!(app.runs().len(), 4);

        // Annotate all four single-cell runs: rows 1, 2 then cols 2, 1
        for sum in ["1", "2", "2", "1"] {
            type_str(&mut app, sum);
            press(&mut app, KeyCode::Enter);
        }
        assert_eq!(app.session.missing_sums(), 0);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.session.phase(), Phase::Viewing);
        assert_eq!(app.session.grid().cell(1, 0).value, Some(2));
    }

    #[test]
    fn test_out_of_range_sum_shows_message() {
        let mut app = test_app(1, 1, steps_response(vec![]));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);

        type_str(&mut app, "99");
        press(&mut app, KeyCode::Enter);
        assert!(app.message.as_deref().unwrap_or("").contains("out of range"));
        assert_eq!(app.session.missing_sums(), 2);
    }

    #[test]
    fn test_resize_keys_clamp_cursor() {
        let mut app = test_app(3, 3, steps_response(vec![]));
        app.cursor = (2, 2);

        press(&mut app, KeyCode::Char('R'));
        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.session.grid().rows(), 2);
        assert_eq!(app.session.grid().cols(), 2);
        assert_eq!(app.cursor, (1, 1));

        // Shrinking a 1x1 board is refused with a message
        let mut app = test_app(1, 1, steps_response(vec![]));
        press(&mut app, KeyCode::Char('R'));
        assert_eq!(app.session.grid().rows(), 1);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_mouse_drag_selects_row() {
        let mut app = test_app(2, 3, steps_response(vec![]));
        app.set_grid_origin(10, 5);

        let down = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 12, // inside cell (0, 0)
            row: 6,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse(down);
        let drag = |column| MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            column,
            row: 6,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse(drag(12 + CELL_W));
        app.handle_mouse(drag(12 + 2 * CELL_W));
        // Release far outside the grid still ends the gesture
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });

        for col in 0..3 {
            assert!(app.session.grid().is_selected(0, col));
        }
        assert!(!app.session.grid().is_selected(1, 0));
    }

    #[test]
    fn test_hit_test_bounds() {
        let mut app = test_app(2, 2, steps_response(vec![]));
        app.set_grid_origin(4, 2);

        assert_eq!(app.hit_test(5, 3), Some((0, 0)));
        assert_eq!(app.hit_test(4 + CELL_W + 1, 2 + CELL_H + 1), Some((1, 1)));
        // On or before the top-left border
        assert_eq!(app.hit_test(4, 2), None);
        assert_eq!(app.hit_test(0, 0), None);
        // Past the bottom-right corner
        assert_eq!(app.hit_test(4 + 3 * CELL_W, 2 + 3 * CELL_H), None);
    }

    #[test]
    fn test_viewing_keys_navigate_steps() {
        let mut app = test_app(
            1,
            1,
            steps_response(vec![vec![vec!["."]], vec![vec!["5"]]]),
        );
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "5");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "5");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.session.phase(), Phase::Viewing);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.session.step_index(), 1);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.session.step_index(), 1);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.session.step_index(), 0);

        // 1-based jump
        type_str(&mut app, "2");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.step_index(), 1);
        type_str(&mut app, "9");
        press(&mut app, KeyCode::Enter);
        assert!(app.message.as_deref().unwrap_or("").contains("out of range"));
    }
}
