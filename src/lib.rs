//! snap-pm: the Snap personal menu panel
//!
//! This library provides:
//! - A session-scoped widget cache over pluggable session storage
//! - A REST client and response classifier for the personal menu widgets
//! - The refresh orchestrator that repaints every widget when the panel opens
//! - Responsive paging of the panel sections on narrow viewports
//! - A terminal frontend (TUI) and one-shot CLI commands

pub mod config;
pub mod core;
pub mod storage;
pub mod transport;
pub mod tui;
pub mod ui_backend;

pub use config::Config;
pub use storage::CacheStore;
pub use ui_backend::{PanelController, PersonalMenu, SharedState};
