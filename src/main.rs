//! TDRR - Terminal Daily Run Rate
//!
//! A terminal table for planning lead targets: each row holds a date range,
//! excluded dates and a lead count, and saving a row freezes its months,
//! net days and expected daily run rate.

use std::io;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use tdrr::application::{App, AppMode};
use tdrr::infrastructure::{init_logging, Config};
use tdrr::presentation::{render_ui, InputHandler};

/// Entry point for the TDRR terminal application.
///
/// Loads the configuration, sets up logging and the terminal, and runs the
/// event loop until the user quits.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, if the log file cannot
/// be opened, or if terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    if init_logging(&config)? {
        info!(config = %Config::config_file().display(), "tdrr starting");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    info!(rows = app.rows().len(), "tdrr exiting");
    Ok(())
}

/// Main application event loop.
///
/// Continues running until the user presses 'q' in normal mode.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if app.mode == AppMode::Normal => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
