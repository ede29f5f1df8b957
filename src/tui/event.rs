//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes. The screen
//! has a single input field, so all printable keys edit the question buffer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::App;

/// Handles a keyboard event and updates the app state accordingly.
///
/// Returns `true` if the application should quit, `false` otherwise.
///
/// # Event Handling
///
/// - `Esc` / `Ctrl+C`: quit
/// - `Enter`: submit the current question (blank input is ignored)
/// - `Backspace`: delete the last input character
/// - `Ctrl+U`: clear the input
/// - `Up` / `Down`: scroll the result area
/// - Printable characters: append to the input buffer
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    // Global quit keys. Plain letters are reserved for typing the question.
    if key.code == KeyCode::Esc {
        return true;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match key.code {
        KeyCode::Enter => {
            app.submit();
        }
        KeyCode::Backspace => {
            app.pop_input_char();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_input();
        }
        KeyCode::Up => {
            app.scroll_result_up(1);
        }
        KeyCode::Down => {
            app.scroll_result_down(1);
        }
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            app.push_input_char(c);
        }
        _ => {
            // Ignore other keys
        }
    }

    false
}
