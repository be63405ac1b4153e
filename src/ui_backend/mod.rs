//! UI Backend - personal menu logic behind the frontends
//!
//! ## Architecture
//!
//! - **SharedState**: explicit panel, region and pager state; frontends render it
//! - **WidgetFetcher**: cached paint + one detached request per widget
//! - **RefreshOrchestrator**: one refresh cycle per panel open
//! - **ResponsivePager**: small-screen section paging
//! - **PanelController**: trigger/tab/resize input routing
//! - **PersonalMenu**: wiring from configuration

pub mod badge;
pub mod events;
pub mod fetcher;
pub mod orchestrator;
pub mod pager;
pub mod panel;
pub mod service;
pub mod shell;
pub mod state;

pub use badge::BadgeSlot;
pub use events::{EventBus, PanelEvent};
pub use fetcher::WidgetFetcher;
pub use orchestrator::{RefreshCycle, RefreshOrchestrator, SitePolicyGate};
pub use pager::{compute_layout, Easing, PagerSettings, ResponsivePager, SectionLayout, Transition};
pub use panel::{PanelController, PanelInput, TriggerOutcome};
pub use service::{Collaborators, PersonalMenu};
pub use state::{
    ErrorLevel, ErrorNotification, Geometry, PageLayout, PagerState, Region, SharedState,
    WidgetStatus,
};
