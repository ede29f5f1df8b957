//! Terminal User Interface module for docq.
//!
//! Provides a single-screen TUI with a question input and a result area
//! using ratatui for rendering and crossterm for terminal management.

use std::io;
use std::panic;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::engine::QueryEngine;

mod app;
pub mod event;
mod ui;

pub use app::{APP_TITLE, App, QueryState};

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
/// Returns a configured Terminal instance.
///
/// # Errors
///
/// Returns an error if terminal initialization fails.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Disables raw mode and leaves the alternate screen.
/// This should always be called before exiting the TUI,
/// even in error cases, to prevent terminal corruption.
///
/// # Errors
///
/// Returns an error if terminal restoration fails.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for panic handler.
///
/// Does not require a Terminal reference, making it safe to call
/// from a panic hook where we may not have access to the Terminal.
/// Ignores errors since we're likely already in a bad state.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Initializes a panic hook that restores the terminal before panicking.
///
/// This ensures the terminal is restored even if a panic occurs anywhere
/// in the application, not just in the event loop. The original panic
/// hook is preserved and called after terminal restoration.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Runs the main event loop for the TUI.
///
/// Polls for keyboard events, updates app state, and re-renders. A queued
/// submission is dispatched synchronously between frames: the in-flight
/// frame is drawn first, then the engine call blocks the loop until it
/// returns or fails, so at most one query is ever in flight.
///
/// Exits when the user presses Esc (or Ctrl+C) or an error occurs.
///
/// # Errors
///
/// Returns an error if event polling, rendering, or terminal operations fail.
/// Terminal state is always restored, even on error.
pub fn run_event_loop(app: &mut App, engine: &QueryEngine) -> Result<()> {
    let mut terminal = init_terminal()?;

    // Ensure terminal is restored even if we panic or error
    let result = run_event_loop_internal(app, engine, &mut terminal);

    // Always restore terminal state
    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

/// Internal event loop implementation.
///
/// Separated from `run_event_loop` to ensure terminal restoration happens
/// in the outer function.
fn run_event_loop_internal(
    app: &mut App,
    engine: &QueryEngine,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        // Render the current state
        terminal.draw(|frame| {
            ui::draw(frame, app);
        })?;

        // Dispatch a queued submission. The frame above already showed the
        // in-flight state; this call blocks until the query resolves.
        if let Some(question) = app.take_pending_query() {
            let outcome = engine.answer(&question);
            app.apply_outcome(outcome);
            continue;
        }

        // Poll for events
        if crossterm_event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = crossterm_event::read()?
        {
            // Handle the key event
            let should_quit = event::handle_key_event(app, key);
            if should_quit {
                break;
            }
        }
    }

    Ok(())
}

/// Entry point for the TUI application.
///
/// Takes an already-built engine: configuration loading and index binding
/// happen before the terminal is put into raw mode, so startup failures
/// print normally instead of corrupting the screen.
///
/// # Errors
///
/// Returns an error if terminal initialization or the event loop fails.
pub fn run(engine: &QueryEngine) -> Result<()> {
    // Install panic hook to restore terminal on panic
    init_panic_hook();

    let mut app = App::new();
    run_event_loop(&mut app, engine).context("TUI event loop failed")?;

    Ok(())
}
