mod app;
mod client;
mod config;
mod render;
mod theme;

use anyhow::Context;
use app::{App, AppAction};
use clap::Parser;
use client::HttpSolver;
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Author a Kakuro board and watch it being solved
#[derive(Parser)]
#[command(name = "kakuro", version)]
struct Cli {
    /// Solver service endpoint (overrides the saved config)
    #[arg(long)]
    solver_url: Option<String>,
    /// Initial number of rows
    #[arg(long, default_value_t = 5)]
    rows: usize,
    /// Initial number of columns
    #[arg(long, default_value_t = 5)]
    cols: usize,
    /// Theme name: dark, light or high-contrast
    #[arg(long)]
    theme: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = Config::load();
    if let Some(url) = cli.solver_url {
        config.solver_url = url;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    let solver = HttpSolver::new(config.solver_url.clone());
    let mut app = App::new(cli.rows, cli.cols, Box::new(solver), config)
        .context("could not create the board")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Run the app
    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;

    result
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        // Render
        render::render(stdout, app)?;
        stdout.flush()?;

        // Handle input with a timeout so the message timer keeps ticking
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Handle Ctrl+C
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }
                    match app.handle_key(key) {
                        AppAction::Continue => {}
                        AppAction::Quit => break,
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        // Tick timers
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// Log to a file when RUST_LOG is set; stdout belongs to the alternate
/// screen.
fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let Some(dir) = dirs::data_dir().map(|dir| dir.join("kakuro")) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    if let Ok(file) = fs::File::create(dir.join("kakuro.log")) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .try_init();
    }
}
