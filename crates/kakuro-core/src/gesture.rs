use tracing::debug;

use crate::grid::Grid;

/// What a press-drag-release interaction is currently doing. The two
/// polarities are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GestureMode {
    /// No gesture in progress
    #[default]
    Idle,
    /// Dragging selects every cell it touches
    Selecting,
    /// Dragging deselects every cell it touches
    Deselecting,
}

/// Tracks the single in-progress selection gesture.
///
/// The press decides the polarity for the whole drag: pressing an
/// unselected cell starts a selecting drag, pressing a selected cell a
/// deselecting one. Cells entered mid-drag are forced to the polarity
/// rather than toggled, so re-entering a cell (or reversing direction
/// over already-visited cells) is idempotent.
#[derive(Debug, Default)]
pub struct GestureTracker {
    mode: GestureMode,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gesture mode
    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    /// Whether a gesture is in progress
    pub fn is_active(&self) -> bool {
        self.mode != GestureMode::Idle
    }

    /// Pointer pressed on a cell: pick the polarity from the cell's
    /// current state and toggle it as the first action of the drag.
    pub fn press(&mut self, grid: &mut Grid, row: usize, col: usize) {
        let was_selected = grid.is_selected(row, col);
        self.mode = if was_selected {
            GestureMode::Deselecting
        } else {
            GestureMode::Selecting
        };
        grid.set_selected(row, col, !was_selected);
        debug!(mode = ?self.mode, row, col, "gesture started");
    }

    /// Pointer entered a cell while down: force the cell to the drag's
    /// polarity. No-op when idle.
    pub fn enter(&mut self, grid: &mut Grid, row: usize, col: usize) {
        match self.mode {
            GestureMode::Idle => {}
            GestureMode::Selecting => grid.set_selected(row, col, true),
            GestureMode::Deselecting => grid.set_selected(row, col, false),
        }
    }

    /// Pointer released anywhere: the gesture ends unconditionally.
    /// Callers wire this to a global release signal so drags ending
    /// outside the grid still terminate.
    pub fn release(&mut self) {
        if self.mode != GestureMode::Idle {
            debug!("gesture ended");
        }
        self.mode = GestureMode::Idle;
    }
}
