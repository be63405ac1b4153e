//! Responsive section pager
//!
//! Below the large breakpoint the panel's sections sit side by side and a tab
//! bar slides the content strip horizontally. At or above the breakpoint
//! paging is switched off and all inline layout is cleared.

use std::time::{Duration, Instant};

use crate::config::LayoutConfig;
use crate::core::{EventOutcome, Section};

use super::state::{Geometry, SharedState};

/// Horizontal offset and height of the content strip for one section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    /// Distance the strip is shifted left, in logical pixels
    pub offset_left: u32,
    pub height: u32,
}

/// Easing curves for the tab transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Slow start and end, `0.5 - cos(p·π) / 2`
    #[default]
    Swing,
    Linear,
}

impl Easing {
    pub fn apply(self, progress: f64) -> f64 {
        let p = progress.clamp(0.0, 1.0);
        match self {
            Easing::Swing => 0.5 - (p * std::f64::consts::PI).cos() / 2.0,
            Easing::Linear => p,
        }
    }
}

/// An in-flight tab transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: SectionLayout,
    pub to: SectionLayout,
    pub started: Instant,
    pub duration: Duration,
    pub easing: Easing,
}

impl Transition {
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Layout at `now`
    pub fn sample(&self, now: Instant) -> SectionLayout {
        let eased = self.easing.apply(self.progress(now));
        let lerp = |a: u32, b: u32| -> u32 {
            let value = a as f64 + (b as f64 - a as f64) * eased;
            value.round().max(0.0) as u32
        };
        SectionLayout {
            offset_left: lerp(self.from.offset_left, self.to.offset_left),
            height: lerp(self.from.height, self.to.height),
        }
    }
}

/// Pager tuning
#[derive(Debug, Clone, Copy)]
pub struct PagerSettings {
    pub breakpoint_px: u32,
    pub section_padding_px: u32,
    pub transition: Duration,
    pub easing: Easing,
}

impl Default for PagerSettings {
    fn default() -> Self {
        Self::from(&LayoutConfig::default())
    }
}

impl From<&LayoutConfig> for PagerSettings {
    fn from(layout: &LayoutConfig) -> Self {
        Self {
            breakpoint_px: layout.breakpoint_px,
            section_padding_px: layout.section_padding_px,
            transition: Duration::from_millis(layout.transition_ms),
            easing: Easing::Swing,
        }
    }
}

/// Layout of `target` for the given geometry
///
/// Courses is always the first page. Every other section is offset by its
/// 1-based position among the update sections; a section the page does not
/// list has position 0. The height never drops below the viewport.
pub fn compute_layout(geometry: &Geometry, target: Section, padding: u32) -> SectionLayout {
    let offset_left = if target == Section::Courses {
        0
    } else {
        let index = geometry
            .update_sections
            .iter()
            .position(|s| *s == target)
            .map(|i| i as u32 + 1)
            .unwrap_or(0);
        geometry.section_width().saturating_mul(index)
    };

    let rendered = geometry
        .section_heights
        .get(&target)
        .copied()
        .unwrap_or(0)
        .saturating_add(padding);

    SectionLayout {
        offset_left,
        height: rendered.max(geometry.viewport.height),
    }
}

/// Small-screen paging controller
#[derive(Debug, Clone)]
pub struct ResponsivePager {
    state: SharedState,
    settings: PagerSettings,
}

impl ResponsivePager {
    pub fn new(state: SharedState, settings: PagerSettings) -> Self {
        Self { state, settings }
    }

    pub fn settings(&self) -> &PagerSettings {
        &self.settings
    }

    pub fn compute_layout(&self, target: Section) -> SectionLayout {
        compute_layout(
            &self.state.geometry(),
            target,
            self.settings.section_padding_px,
        )
    }

    pub fn on_tab_activate(&self, target: Section) -> EventOutcome {
        self.on_tab_activate_at(target, Instant::now())
    }

    /// Jump to the top, slide the strip to `target` and make it the only
    /// active tab.
    pub fn on_tab_activate_at(&self, target: Section, now: Instant) -> EventOutcome {
        let layout = self.compute_layout(target);
        let viewport_height = self.state.geometry().viewport.height;
        let settings = self.settings;

        self.state.update_pager(|pager| {
            pager.scroll_top = 0;
            let from = pager
                .transition
                .as_ref()
                .map(|t| t.sample(now))
                .or(pager.content_style)
                .unwrap_or(SectionLayout {
                    offset_left: 0,
                    height: viewport_height,
                });
            pager.transition = Some(Transition {
                from,
                to: layout,
                started: now,
                duration: settings.transition,
                easing: settings.easing,
            });
            pager.active_tab = Some(target);
        });

        tracing::debug!(
            "paging to {} (left -{}px, height {}px)",
            target,
            layout.offset_left,
            layout.height
        );
        EventOutcome::DefaultPrevented
    }

    /// Resync after the viewport changed
    pub fn on_resize(&self) {
        let geometry = self.state.geometry();
        if geometry.viewport.width >= self.settings.breakpoint_px {
            self.state.update_pager(|pager| {
                pager.content_style = None;
                pager.transition = None;
            });
            return;
        }

        let Some(active) = self.state.active_tab() else {
            return;
        };
        let layout = compute_layout(&geometry, active, self.settings.section_padding_px);
        self.state.update_pager(|pager| {
            pager.transition = None;
            pager.content_style = Some(layout);
        });
    }

    /// Advance the running transition; returns true while it is still running
    pub fn tick(&self, now: Instant) -> bool {
        self.state.update_pager(|pager| {
            let Some(transition) = pager.transition.as_ref() else {
                return false;
            };
            if transition.is_finished(now) {
                pager.content_style = Some(transition.to);
                pager.transition = None;
                false
            } else {
                pager.content_style = Some(transition.sample(now));
                true
            }
        })
    }
}
