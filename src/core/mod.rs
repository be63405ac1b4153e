//! Core domain: personal menu types, errors and collaborator seams

pub mod errors;
pub mod traits;
pub mod types;

pub use errors::{ConfigError, FetchError, StorageFault};
pub use traits::{BadgeOverlay, CourseCards, Navigator, Notifier};
pub use types::{EventOutcome, PanelState, Section, Viewport, WidgetType};
