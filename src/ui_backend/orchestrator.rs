//! Refresh orchestrator
//!
//! One `update()` is one refresh cycle: course cards, focus, every widget in
//! enumeration order, the deferred badge overlay, then a single
//! `PersonalMenuUpdated` event. Nothing here waits for a fetch to finish.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::core::{CourseCards, Navigator, WidgetType};

use super::badge::BadgeSlot;
use super::events::{EventBus, PanelEvent};
use super::fetcher::WidgetFetcher;
use super::state::SharedState;

/// Site policy gate; once engaged it stays engaged
#[derive(Debug, Clone, Default)]
pub struct SitePolicyGate(Arc<AtomicBool>);

impl SitePolicyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engage the gate when acceptance is required; never releases it
    pub fn require(&self, accept_required: bool) {
        if accept_required {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handles of the work a refresh cycle started
///
/// Dropping it detaches the tasks; they keep running.
#[derive(Debug, Default)]
pub struct RefreshCycle {
    pub cycle: u64,
    /// Set when the cycle redirected to the site policy instead of refreshing
    pub redirected: bool,
    pub fetches: Vec<(WidgetType, JoinHandle<()>)>,
    pub badge_wait: Option<JoinHandle<()>>,
}

impl RefreshCycle {
    /// Widgets for which a request was issued, in invocation order
    pub fn widgets(&self) -> Vec<WidgetType> {
        self.fetches.iter().map(|(w, _)| *w).collect()
    }

    /// Wait for every widget fetch of this cycle (not the badge wait)
    pub async fn join_fetches(self) {
        let handles = self.fetches.into_iter().map(|(_, handle)| handle);
        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                tracing::warn!("widget task ended abnormally: {}", e);
            }
        }
    }
}

pub struct RefreshOrchestrator {
    state: SharedState,
    gate: SitePolicyGate,
    policy_url: String,
    fetcher: WidgetFetcher,
    course_cards: Arc<dyn CourseCards>,
    navigator: Arc<dyn Navigator>,
    badge: BadgeSlot,
    events: EventBus,
    cycles: AtomicU64,
}

impl RefreshOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: SharedState,
        gate: SitePolicyGate,
        policy_url: impl Into<String>,
        fetcher: WidgetFetcher,
        course_cards: Arc<dyn CourseCards>,
        navigator: Arc<dyn Navigator>,
        badge: BadgeSlot,
        events: EventBus,
    ) -> Self {
        Self {
            state,
            gate,
            policy_url: policy_url.into(),
            fetcher,
            course_cards,
            navigator,
            badge,
            events,
            cycles: AtomicU64::new(0),
        }
    }

    pub fn gate(&self) -> &SitePolicyGate {
        &self.gate
    }

    /// Number of refresh cycles started so far
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    /// Start a refresh cycle
    pub fn update(&self) -> RefreshCycle {
        if self.gate.is_engaged() {
            tracing::info!("site policy acceptance required, redirecting");
            self.navigator.redirect(&self.policy_url);
            return RefreshCycle {
                redirected: true,
                ..RefreshCycle::default()
            };
        }

        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;

        self.course_cards
            .request_course_info(&self.course_cards.course_ids());

        self.state.focus_panel();

        let fetches = WidgetType::ALL
            .into_iter()
            .filter_map(|widget| self.fetcher.load(widget).map(|handle| (widget, handle)))
            .collect();

        let badge_wait = if self.state.has_badges_region() {
            self.badge.init_when_ready(&self.state)
        } else {
            None
        };

        self.events.emit(PanelEvent::PersonalMenuUpdated { cycle });

        RefreshCycle {
            cycle,
            redirected: false,
            fetches,
            badge_wait,
        }
    }
}
