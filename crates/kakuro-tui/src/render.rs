use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use kakuro_core::{Axis, Phase};
use std::io;

use crate::app::{App, RunRef};

/// Horizontal span of one cell including its left border
pub const CELL_W: u16 = 4;
/// Vertical span of one cell including its top border
pub const CELL_H: u16 = 2;

/// How many runs the annotation panel shows at once
const PANEL_ROWS: usize = 14;

pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (term_width, _term_height) = terminal::size()?;

    execute!(stdout, Hide, SetBackgroundColor(app.theme.bg), Clear(ClearType::All))?;

    let grid_x: u16 = 2;
    let grid_y: u16 = 2;
    app.set_grid_origin(grid_x, grid_y);

    render_title(stdout, app)?;
    render_grid(stdout, app, grid_x, grid_y)?;

    let grid = app.session.grid();
    let panel_x = grid_x + grid.cols() as u16 * CELL_W + 4;
    render_panel(stdout, app, panel_x, grid_y)?;

    let below = grid_y + grid.rows() as u16 * CELL_H + 2;
    render_controls(stdout, app, grid_x, below)?;
    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, below + 2, term_width)?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_title(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let phase = app.session.phase();
    execute!(
        stdout,
        MoveTo(2, 0),
        SetForegroundColor(app.theme.fg),
        Print(format!("Kakuro - step {}/3: {}", phase.number(), phase)),
    )
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let grid = app.session.grid();
    let active = active_run(app);

    // Border rows and cell rows alternate; cells are 3 chars wide
    let border_line = format!("+{}", "---+".repeat(grid.cols()));
    for row in 0..grid.rows() {
        let border_y = y + row as u16 * CELL_H;
        execute!(
            stdout,
            MoveTo(x, border_y),
            SetForegroundColor(theme.border),
            Print(&border_line),
        )?;

        let cell_y = border_y + 1;
        execute!(stdout, MoveTo(x, cell_y), Print("|"))?;
        for col in 0..grid.cols() {
            render_cell(stdout, app, row, col, active)?;
            execute!(
                stdout,
                SetBackgroundColor(theme.bg),
                SetForegroundColor(theme.border),
                Print("|"),
            )?;
        }
    }
    let bottom = y + grid.rows() as u16 * CELL_H;
    execute!(
        stdout,
        MoveTo(x, bottom),
        SetForegroundColor(theme.border),
        Print(&border_line),
    )
}

fn render_cell(
    stdout: &mut io::Stdout,
    app: &App,
    row: usize,
    col: usize,
    active: Option<RunRef>,
) -> io::Result<()> {
    let theme = &app.theme;
    let cell = app.session.grid().cell(row, col);

    let in_active_run = active.is_some_and(|run| match run.axis {
        Axis::Row => run.line == row && run.sentence.contains(col),
        Axis::Col => run.line == col && run.sentence.contains(row),
    });
    let under_cursor = app.session.phase() == Phase::Selecting && app.cursor == (row, col);

    let bg = if under_cursor {
        theme.cursor_bg
    } else if in_active_run {
        theme.run_bg
    } else {
        theme.bg
    };

    if !cell.selected {
        execute!(
            stdout,
            SetBackgroundColor(bg),
            SetForegroundColor(theme.blocked),
            Print("\u{2591}\u{2591}\u{2591}"),
        )
    } else {
        let text = match cell.value {
            Some(v) => format!(" {} ", v),
            None => "   ".to_string(),
        };
        execute!(
            stdout,
            SetBackgroundColor(bg),
            SetForegroundColor(theme.value),
            Print(text),
        )
    }
}

fn active_run(app: &App) -> Option<RunRef> {
    if app.session.phase() != Phase::Annotating {
        return None;
    }
    app.runs().get(app.run_cursor).copied()
}

fn render_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    match app.session.phase() {
        Phase::Selecting => {
            let grid = app.session.grid();
            execute!(
                stdout,
                MoveTo(x, y),
                SetForegroundColor(theme.info),
                Print(format!("{} x {} board", grid.rows(), grid.cols())),
            )
        }
        Phase::Annotating => render_run_list(stdout, app, x, y),
        Phase::Viewing => {
            execute!(
                stdout,
                MoveTo(x, y),
                SetForegroundColor(theme.info),
                Print(format!(
                    "Step {} of {}",
                    app.session.step_index() + 1,
                    app.session.step_count(),
                )),
            )?;
            if !app.input.is_empty() {
                execute!(
                    stdout,
                    MoveTo(x, y + 2),
                    SetForegroundColor(theme.sum),
                    Print(format!("Go to step: {}_", app.input)),
                )?;
            }
            Ok(())
        }
    }
}

fn render_run_list(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let runs = app.runs();
    let missing = app.session.missing_sums();

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.info),
        Print(format!("{} run(s), {} without a sum", runs.len(), missing)),
    )?;

    let offset = app.run_cursor.saturating_sub(PANEL_ROWS - 1);
    for (slot, (i, run)) in runs.iter().enumerate().skip(offset).take(PANEL_ROWS).enumerate() {
        let is_current = i == app.run_cursor;
        let marker = if is_current { "> " } else { "  " };
        // Lines and cells are shown 1-based
        let label = match run.axis {
            Axis::Row => format!(
                "Row {} [{}-{}]",
                run.line + 1,
                run.sentence.start + 1,
                run.sentence.end + 1
            ),
            Axis::Col => format!(
                "Col {} [{}-{}]",
                run.line + 1,
                run.sentence.start + 1,
                run.sentence.end + 1
            ),
        };
        let sum = if is_current && !app.input.is_empty() {
            format!("= {}_", app.input)
        } else {
            match run.sentence.sum {
                Some(sum) => format!("= {}", sum),
                None => "= ?".to_string(),
            }
        };
        let color = if is_current {
            theme.fg
        } else if run.sentence.sum.is_none() {
            theme.info
        } else {
            theme.sum
        };
        execute!(
            stdout,
            MoveTo(x, y + 2 + slot as u16),
            SetForegroundColor(color),
            Print(format!("{}{} {}", marker, label, sum)),
        )?;
    }
    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let help = match app.session.phase() {
        Phase::Selecting => {
            "drag/space select  r/R c/C resize  enter next  t theme  q quit"
        }
        Phase::Annotating => {
            "tab/arrows pick run  digits+enter set sum  n solve  b back  q quit"
        }
        Phase::Viewing => {
            "arrows step  g/G first/last  digits+enter jump  b back  q quit"
        }
    };
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(app.theme.key),
        Print(help),
    )
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    y: u16,
    term_width: u16,
) -> io::Result<()> {
    let mut msg = msg.to_string();
    msg.truncate(term_width.saturating_sub(4) as usize);
    execute!(
        stdout,
        MoveTo(2, y),
        SetForegroundColor(app.theme.sum),
        Print(msg),
    )
}
