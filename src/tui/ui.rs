//! UI rendering functions for the TUI.
//!
//! Implements the single-screen layout: title heading, question input,
//! result area, and shortcut bar, using ratatui widgets and layout
//! management.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use time::format_description;

use super::app::{APP_TITLE, App, QueryState};

/// Main rendering function for the TUI.
///
/// Draws the title, the question input, the conditional result area, and the
/// shortcut bar.
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title heading
            Constraint::Length(3), // Question input
            Constraint::Min(0),    // Result area
            Constraint::Length(1), // Shortcut bar
        ])
        .split(size);

    render_title(frame, chunks[0]);
    render_input(frame, app, chunks[1]);
    render_result(frame, app, chunks[2]);
    render_shortcut_bar(frame, chunks[3]);
}

/// Renders the title heading.
fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        APP_TITLE,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, area);
}

/// Renders the question input with a cursor indicator.
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Ask a question:")
        .border_style(Style::default().fg(Color::Cyan));

    let mut content = app.input().to_string();
    content.push('█'); // Cursor indicator

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

/// Renders the result area according to the current query state.
fn render_result(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Result");

    let content = match app.state() {
        QueryState::Idle => Text::from(Line::from(Span::styled(
            "Type a question and press Enter to submit.",
            Style::default().fg(Color::DarkGray),
        ))),
        QueryState::InFlight { question } => Text::from(vec![
            Line::from("Querying index..."),
            Line::from(Span::styled(
                question.clone(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
        ]),
        QueryState::Answered(response) => {
            let mut text = Text::default();
            text.lines.push(Line::from(Span::styled(
                "Query successful!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            text.lines.push(Line::from(""));

            for line in response.answer().lines() {
                text.lines.push(Line::from(line));
            }

            if let Some(caption) = response.source_caption() {
                text.lines.push(Line::from(""));
                text.lines.push(Line::from(Span::styled(
                    caption,
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )));
            }

            if let Some(answered_at) = app.answered_at() {
                let time_format = format_description::parse("[hour]:[minute]:[second]")
                    .expect("valid time format");
                if let Ok(stamp) = answered_at.format(&time_format) {
                    text.lines.push(Line::from(""));
                    text.lines.push(Line::from(Span::styled(
                        format!("answered at {stamp} UTC"),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }

            text
        }
        QueryState::NoResults => Text::from(Line::from(Span::styled(
            "No results found.",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))),
        QueryState::Failed(message) => Text::from(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))),
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll(), 0));
    frame.render_widget(paragraph, area);
}

/// Renders the shortcut bar at the bottom of the screen.
fn render_shortcut_bar(frame: &mut Frame, area: Rect) {
    let bar = Paragraph::new(Line::from(Span::styled(
        "Enter Submit  |  Up/Down Scroll  |  Esc Quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(bar, area);
}
