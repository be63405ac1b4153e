//! Event handling for the TUI
//!
//! Maps terminal events onto personal menu input.

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use std::time::Duration;

use crate::core::{Section, Viewport};
use crate::ui_backend::PanelInput;

/// TUI events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard event
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Tick for animations
    Tick,
}

/// Event handler for polling terminal events
pub struct EventHandler {
    /// Tick rate for animations (milliseconds)
    tick_rate: Duration,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(33))
    }
}

impl EventHandler {
    /// Create a new event handler with specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Poll for the next event
    pub fn next(&self) -> std::io::Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                CrosstermEvent::Resize(w, h) => Ok(Event::Resize(w, h)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Panel(PanelInput),
    /// Activate the tab at this position of the strip
    Jump(usize),
    /// Move the active tab by the given number of sections
    Step(i32),
}

/// Translate a key press
pub fn key_action(key: KeyEvent) -> Option<KeyAction> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(KeyAction::Quit),
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(KeyAction::Quit),
        (KeyCode::Char('p'), _) | (KeyCode::Enter, _) => {
            Some(KeyAction::Panel(PanelInput::Trigger))
        }
        (KeyCode::Char(c @ '1'..='9'), _) => Some(KeyAction::Jump(c as usize - '1' as usize)),
        (KeyCode::Left, _) => Some(KeyAction::Step(-1)),
        (KeyCode::Right, _) => Some(KeyAction::Step(1)),
        _ => None,
    }
}

/// Section `step` places away from `current` in `order`, clamped to its ends
pub fn stepped_section(order: &[Section], current: Option<Section>, step: i32) -> Option<Section> {
    let last = order.len().checked_sub(1)?;
    let current = current
        .and_then(|tab| order.iter().position(|s| *s == tab))
        .unwrap_or(0) as i64;
    let next = (current + step as i64).clamp(0, last as i64) as usize;
    order.get(next).copied()
}

/// Terminal size expressed as a viewport in logical pixels
pub fn viewport_for(cols: u16, rows: u16, px_per_column: u32, px_per_row: u32) -> Viewport {
    Viewport {
        width: cols as u32 * px_per_column,
        height: rows as u32 * px_per_row,
    }
}
