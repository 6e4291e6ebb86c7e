//! Terminal input.

use crate::error::{DashError, Result};
use crossterm::event::{self, Event as TermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Input the dashboard reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// No input arrived before the poll timed out.
    Tick,
}

impl From<TermEvent> for Event {
    fn from(event: TermEvent) -> Self {
        match event {
            // Windows also reports key releases
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => Self::Key(key),
            TermEvent::Resize(width, height) => Self::Resize(width, height),
            _ => Self::Tick,
        }
    }
}

/// Blocks up to `timeout` for the next terminal event.
pub fn poll(timeout: Duration) -> Result<Event> {
    let input_error = |e: std::io::Error| DashError::internal(format!("Terminal input failed: {e}"));

    if event::poll(timeout).map_err(input_error)? {
        event::read().map(Event::from).map_err(input_error)
    } else {
        Ok(Event::Tick)
    }
}
