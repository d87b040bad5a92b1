//! Keyboard event mapping for the prompt row.
//!
//! Raw mode delivers keystrokes immediately with no local echo, so the input
//! reader assembles the line itself from these events.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

/// Input events the session cares about. Everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A printable character for the input line.
    Char(char),
    /// Delete the character before the cursor.
    Backspace,
    /// The line is complete.
    Submit,
    /// Ctrl+C: abort the session.
    Interrupt,
}

/// Polls for the next input event, blocking up to `timeout`.
///
/// Returns `Ok(None)` when the timeout elapses without a relevant event.
pub fn next_event(timeout: Duration) -> io::Result<Option<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            Ok(match (key.modifiers, key.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(InputEvent::Interrupt),
                (_, KeyCode::Char(c)) => Some(InputEvent::Char(c)),
                (_, KeyCode::Backspace) => Some(InputEvent::Backspace),
                (_, KeyCode::Enter) => Some(InputEvent::Submit),
                _ => None,
            })
        }
        _ => Ok(None),
    }
}
