//! Terminal frontend for the personal menu
//!
//! Renders the shared state with ratatui and feeds keyboard and resize
//! events back into the panel controller.

pub mod app;
pub mod events;
pub mod markup;
pub mod renderer;
pub mod theme;

pub use app::TuiApp;
pub use events::{
    key_action, stepped_section, viewport_for, Event, EventHandler, KeyAction,
};
pub use markup::html_to_lines;
pub use renderer::{section_lines, MenuView, SectionLine};
pub use theme::Theme;
