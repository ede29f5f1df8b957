use time::OffsetDateTime;

use crate::engine::{QueryError, QueryResponse};

/// Title heading shown at the top of the screen.
pub const APP_TITLE: &str = "Document Query";

/// Outcome state of the most recent query cycle.
///
/// Every submission restarts the cycle: Idle -> InFlight -> (Answered |
/// NoResults | Failed), and the next submission overwrites whatever state
/// the previous cycle ended in.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    /// No query has been submitted yet
    Idle,
    /// A submission is being dispatched
    InFlight {
        /// The question being answered
        question: String,
    },
    /// The last query produced an answer
    Answered(QueryResponse),
    /// The last query matched nothing in the index
    NoResults,
    /// The last query failed; holds the rendered error message
    Failed(String),
}

/// Application state for the TUI.
///
/// Pure state, no I/O: the event loop owns the engine and applies outcomes
/// back onto the app, which keeps every transition unit-testable.
#[derive(Debug, Clone)]
pub struct App {
    /// Question input buffer
    input: String,
    /// Outcome of the most recent query cycle
    state: QueryState,
    /// Submitted question waiting to be dispatched by the event loop
    pending_query: Option<String>,
    /// When the last outcome was applied
    answered_at: Option<OffsetDateTime>,
    /// Scroll offset for the result area
    result_scroll: u16,
}

impl App {
    /// Creates a new App in the Idle state with an empty input buffer.
    pub fn new() -> Self {
        Self {
            input: String::new(),
            state: QueryState::Idle,
            pending_query: None,
            answered_at: None,
            result_scroll: 0,
        }
    }

    /// Returns the question input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the current query state.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Returns when the last outcome was applied, if any.
    pub fn answered_at(&self) -> Option<OffsetDateTime> {
        self.answered_at
    }

    /// Returns the result area scroll offset.
    pub fn result_scroll(&self) -> u16 {
        self.result_scroll
    }

    /// Appends a character to the input buffer.
    pub fn push_input_char(&mut self, c: char) {
        self.input.push(c);
    }

    /// Removes the last character from the input buffer.
    pub fn pop_input_char(&mut self) {
        self.input.pop();
    }

    /// Clears the input buffer.
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Submits the current input as a question.
    ///
    /// Blank input is ignored entirely: no state change, no pending query,
    /// and therefore no network call. A non-blank submission moves the state
    /// to `InFlight` and queues the question for the event loop to dispatch.
    pub fn submit(&mut self) {
        let question = self.input.trim();
        if question.is_empty() {
            return;
        }

        let question = question.to_string();
        self.state = QueryState::InFlight {
            question: question.clone(),
        };
        self.pending_query = Some(question);
        self.result_scroll = 0;
    }

    /// Takes the queued question, if any.
    ///
    /// Called by the event loop after drawing the in-flight frame.
    pub fn take_pending_query(&mut self) -> Option<String> {
        self.pending_query.take()
    }

    /// Returns true if a submission is waiting to be dispatched.
    pub fn has_pending_query(&self) -> bool {
        self.pending_query.is_some()
    }

    /// Applies a dispatch outcome, ending the current query cycle.
    ///
    /// The input buffer is left untouched so the question can be edited and
    /// resubmitted.
    pub fn apply_outcome(&mut self, outcome: Result<Option<QueryResponse>, QueryError>) {
        self.answered_at = Some(OffsetDateTime::now_utc());
        self.state = match outcome {
            Ok(Some(response)) => QueryState::Answered(response),
            Ok(None) => QueryState::NoResults,
            Err(e) => QueryState::Failed(format!("Error querying index: {e}")),
        };
    }

    /// Scrolls the result area down.
    pub fn scroll_result_down(&mut self, lines: u16) {
        self.result_scroll = self.result_scroll.saturating_add(lines);
    }

    /// Scrolls the result area up.
    pub fn scroll_result_up(&mut self, lines: u16) {
        self.result_scroll = self.result_scroll.saturating_sub(lines);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
