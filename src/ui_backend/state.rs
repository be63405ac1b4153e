//! Shared Personal Menu State
//!
//! Thread-safe state shared between the refresh tasks and the frontends.
//! Panel visibility, widget regions and the pager are held here explicitly;
//! renderers draw from this state and never act as the source of truth.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::core::{PanelState, Section, Viewport, WidgetType};

use super::pager::{SectionLayout, Transition};

/// Error notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
}

/// Notification displayed to the user
#[derive(Debug, Clone)]
pub struct ErrorNotification {
    pub message: String,
    pub level: ErrorLevel,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

/// Last known outcome of a widget fetch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WidgetStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Server answered with an error payload
    ServerError(String),
    /// Request never produced a usable response
    Failed(String),
}

/// A widget region on the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub content: String,
    /// Set once fresh content from the server has been applied
    pub content_loaded: bool,
    /// Content currently shown came from the cache
    pub from_cache: bool,
    pub status: WidgetStatus,
}

/// Badge region state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BadgeRegion {
    /// How many times the overlay has been initialized
    pub overlay_inits: u32,
}

/// Which widget regions and sections this page layout has
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub regions: Vec<WidgetType>,
    pub badges_region: bool,
    pub update_sections: Vec<Section>,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            regions: WidgetType::ALL.to_vec(),
            badges_region: true,
            update_sections: vec![
                Section::Deadlines,
                Section::Grading,
                Section::Messages,
                Section::Forumposts,
            ],
        }
    }
}

/// Measured page geometry used by the pager
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub viewport: Viewport,
    /// Rendered width of one section; defaults to the viewport width
    pub section_width: Option<u32>,
    /// Rendered height of each section
    pub section_heights: HashMap<Section, u32>,
    /// Update sections in page order
    pub update_sections: Vec<Section>,
}

impl Geometry {
    pub fn section_width(&self) -> u32 {
        self.section_width.unwrap_or(self.viewport.width)
    }

    /// Sections in strip order: courses first, then the update sections
    pub fn paged_sections(&self) -> Vec<Section> {
        std::iter::once(Section::Courses)
            .chain(
                self.update_sections
                    .iter()
                    .copied()
                    .filter(|s| *s != Section::Courses),
            )
            .collect()
    }
}

/// Small-screen paging state
#[derive(Debug, Clone, Default)]
pub struct PagerState {
    /// Tab currently selected; at most one
    pub active_tab: Option<Section>,
    /// Inline content offset/height; `None` means no inline styling
    pub content_style: Option<SectionLayout>,
    pub transition: Option<Transition>,
    pub scroll_top: u32,
}

/// Toasts kept for display
pub const MAX_NOTIFICATIONS: usize = 20;

/// Shared personal menu state (thread-safe)
#[derive(Debug, Clone)]
pub struct SharedState {
    inner: Arc<RwLock<StateInner>>,
}

#[derive(Debug)]
struct StateInner {
    should_quit: bool,
    panel: PanelState,
    panel_focused: bool,
    regions: BTreeMap<WidgetType, Region>,
    badges: Option<BadgeRegion>,
    geometry: Geometry,
    pager: PagerState,
    location: Option<String>,
    notifications: Vec<ErrorNotification>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new(PageLayout::default())
    }
}

impl SharedState {
    /// Create state for a page with the given layout
    pub fn new(layout: PageLayout) -> Self {
        let regions = layout
            .regions
            .iter()
            .map(|w| (*w, Region::default()))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(StateInner {
                should_quit: false,
                panel: PanelState::Closed,
                panel_focused: false,
                regions,
                badges: layout.badges_region.then(BadgeRegion::default),
                geometry: Geometry {
                    update_sections: layout.update_sections,
                    ..Geometry::default()
                },
                pager: PagerState::default(),
                location: None,
                notifications: Vec::new(),
            })),
        }
    }

    fn read_inner(&self) -> std::sync::RwLockReadGuard<'_, StateInner> {
        self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!("SharedState read lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_inner(&self) -> std::sync::RwLockWriteGuard<'_, StateInner> {
        self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!("SharedState write lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    // ========== Application ==========

    pub fn should_quit(&self) -> bool {
        self.read_inner().should_quit
    }

    pub fn set_should_quit(&self, quit: bool) {
        self.write_inner().should_quit = quit;
    }

    // ========== Panel ==========

    pub fn panel(&self) -> PanelState {
        self.read_inner().panel
    }

    /// Flip the panel and return the new state
    pub fn toggle_panel(&self) -> PanelState {
        let mut inner = self.write_inner();
        inner.panel = inner.panel.toggled();
        if !inner.panel.is_open() {
            inner.panel_focused = false;
        }
        inner.panel
    }

    pub fn panel_focused(&self) -> bool {
        self.read_inner().panel_focused
    }

    pub fn focus_panel(&self) {
        self.write_inner().panel_focused = true;
    }

    // ========== Widget regions ==========

    pub fn has_region(&self, widget: WidgetType) -> bool {
        self.read_inner().regions.contains_key(&widget)
    }

    pub fn region(&self, widget: WidgetType) -> Option<Region> {
        self.read_inner().regions.get(&widget).cloned()
    }

    pub fn regions(&self) -> Vec<(WidgetType, Region)> {
        self.read_inner()
            .regions
            .iter()
            .map(|(w, r)| (*w, r.clone()))
            .collect()
    }

    /// Show cached markup while the fresh copy loads
    pub fn paint_cached(&self, widget: WidgetType, html: String) {
        self.with_region(widget, |region| {
            region.content = html;
            region.from_cache = true;
        });
    }

    pub fn set_widget_status(&self, widget: WidgetType, status: WidgetStatus) {
        self.with_region(widget, |region| region.status = status);
    }

    /// Replace a region's content with fresh server markup
    pub fn apply_markup(&self, widget: WidgetType, html: String) {
        self.with_region(widget, |region| {
            region.content_loaded = true;
            region.content = html;
            region.from_cache = false;
            region.status = WidgetStatus::Loaded;
        });
    }

    /// Mark a region loaded without touching its content
    pub fn mark_content_loaded(&self, widget: WidgetType) {
        self.with_region(widget, |region| {
            region.content_loaded = true;
            region.status = WidgetStatus::Loaded;
        });
    }

    fn with_region<F: FnOnce(&mut Region)>(&self, widget: WidgetType, f: F) {
        if let Some(region) = self.write_inner().regions.get_mut(&widget) {
            f(region);
        }
    }

    // ========== Badges ==========

    pub fn has_badges_region(&self) -> bool {
        self.read_inner().badges.is_some()
    }

    pub fn badges(&self) -> Option<BadgeRegion> {
        self.read_inner().badges
    }

    pub fn record_badge_init(&self) {
        if let Some(badges) = self.write_inner().badges.as_mut() {
            badges.overlay_inits += 1;
        }
    }

    // ========== Geometry & pager ==========

    pub fn geometry(&self) -> Geometry {
        self.read_inner().geometry.clone()
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.write_inner().geometry.viewport = viewport;
    }

    pub fn set_section_width(&self, width: Option<u32>) {
        self.write_inner().geometry.section_width = width;
    }

    pub fn set_section_height(&self, section: Section, height: u32) {
        self.write_inner()
            .geometry
            .section_heights
            .insert(section, height);
    }

    pub fn pager(&self) -> PagerState {
        self.read_inner().pager.clone()
    }

    pub fn active_tab(&self) -> Option<Section> {
        self.read_inner().pager.active_tab
    }

    pub fn update_pager<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PagerState) -> R,
    {
        f(&mut self.write_inner().pager)
    }

    // ========== Navigation & notifications ==========

    pub fn location(&self) -> Option<String> {
        self.read_inner().location.clone()
    }

    pub fn set_location(&self, url: &str) {
        self.write_inner().location = Some(url.to_string());
    }

    /// Record a toast; only the most recent `MAX_NOTIFICATIONS` are kept
    pub fn push_notification(&self, message: &str, level: ErrorLevel) {
        let mut inner = self.write_inner();
        inner.notifications.push(ErrorNotification {
            message: message.to_string(),
            level,
            timestamp: chrono::Local::now(),
        });
        let overflow = inner.notifications.len().saturating_sub(MAX_NOTIFICATIONS);
        inner.notifications.drain(..overflow);
    }

    pub fn notifications(&self) -> Vec<ErrorNotification> {
        self.read_inner().notifications.clone()
    }

    pub fn latest_notification(&self) -> Option<ErrorNotification> {
        self.read_inner().notifications.last().cloned()
    }
}
