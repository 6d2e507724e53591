//! UI utilities for the client.

use std::{cell::RefCell, io::Write};

use rustyline::{
    Context, Helper, completion::Completer, highlight::Highlighter, hint::Hinter,
    validate::Validator,
};
use tokio::sync::mpsc;

use crate::domain::{InputEvent, KeystrokeTracker};

/// Redisplay the prompt after printing an event
pub fn redisplay_prompt(user_id: &str) {
    print!("{}> ", user_id);
    std::io::stdout().flush().ok();
}

/// Line editor helper that reports keystrokes to the session
///
/// The editor calls [`Hinter::hint`] after every edit of the line; no hint
/// is ever displayed.
pub struct KeystrokeNotifier {
    tracker: RefCell<KeystrokeTracker>,
    input_tx: mpsc::UnboundedSender<InputEvent>,
}

impl KeystrokeNotifier {
    pub fn new(input_tx: mpsc::UnboundedSender<InputEvent>) -> Self {
        Self {
            tracker: RefCell::new(KeystrokeTracker::new()),
            input_tx,
        }
    }

    pub fn reset(&self) {
        self.tracker.borrow_mut().reset();
    }

    /// Report that the line in progress was dropped
    pub fn abandon(&self) {
        if let Some(event) = self.tracker.borrow_mut().observe("") {
            self.input_tx.send(event).ok();
        }
    }
}

impl Hinter for KeystrokeNotifier {
    type Hint = String;

    fn hint(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if let Some(event) = self.tracker.borrow_mut().observe(line) {
            self.input_tx.send(event).ok();
        }
        None
    }
}

impl Completer for KeystrokeNotifier {
    type Candidate = String;
}

impl Highlighter for KeystrokeNotifier {}

impl Validator for KeystrokeNotifier {}

impl Helper for KeystrokeNotifier {}
