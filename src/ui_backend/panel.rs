//! Panel controller
//!
//! Owns the open/closed state of the personal menu and routes page input to
//! the orchestrator and the pager. Input arriving before `init` is ignored,
//! the same as events with no listener bound yet.

use std::sync::Arc;

use crate::core::{CourseCards, EventOutcome, PanelState, Section, Viewport};

use super::orchestrator::{RefreshCycle, RefreshOrchestrator};
use super::pager::ResponsivePager;
use super::state::SharedState;

/// Page input the personal menu listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelInput {
    /// Click on a `.js-snap-pm-trigger` element
    Trigger,
    /// Click on a tab of the small-screen menu
    Tab(Section),
    /// Window resized
    Resize(Viewport),
}

/// What handling a trigger click did
#[derive(Debug)]
pub struct TriggerOutcome {
    pub panel: PanelState,
    pub outcome: EventOutcome,
    /// Present when the click opened the panel
    pub refresh: Option<RefreshCycle>,
}

pub struct PanelController {
    state: SharedState,
    orchestrator: Arc<RefreshOrchestrator>,
    pager: ResponsivePager,
    course_cards: Arc<dyn CourseCards>,
    listening: bool,
}

impl PanelController {
    pub fn new(
        state: SharedState,
        orchestrator: Arc<RefreshOrchestrator>,
        pager: ResponsivePager,
        course_cards: Arc<dyn CourseCards>,
    ) -> Self {
        Self {
            state,
            orchestrator,
            pager,
            course_cards,
            listening: false,
        }
    }

    /// Set the site policy gate and start listening.
    ///
    /// Course cards are prepared only when no policy acceptance is pending;
    /// no refresh happens until the panel is opened.
    pub fn init(&mut self, site_policy_accept_reqd: bool) {
        self.orchestrator.gate().require(site_policy_accept_reqd);
        self.listening = true;
        if !self.orchestrator.gate().is_engaged() {
            self.course_cards.init();
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn pager(&self) -> &ResponsivePager {
        &self.pager
    }

    pub fn orchestrator(&self) -> &RefreshOrchestrator {
        &self.orchestrator
    }

    /// Toggle the panel; a closed→open transition starts one refresh cycle
    pub fn on_trigger_click(&self) -> TriggerOutcome {
        let panel = self.state.toggle_panel();
        tracing::debug!("personal menu {:?}", panel);
        let refresh = panel.is_open().then(|| self.orchestrator.update());
        TriggerOutcome {
            panel,
            outcome: EventOutcome::DefaultPrevented,
            refresh,
        }
    }

    /// Dispatch one page input
    pub fn handle(&self, input: PanelInput) -> (EventOutcome, Option<RefreshCycle>) {
        if !self.listening {
            return (EventOutcome::Ignored, None);
        }
        match input {
            PanelInput::Trigger => {
                let result = self.on_trigger_click();
                (result.outcome, result.refresh)
            }
            PanelInput::Tab(section) => (self.pager.on_tab_activate(section), None),
            PanelInput::Resize(viewport) => {
                self.state.set_viewport(viewport);
                self.pager.on_resize();
                (EventOutcome::Ignored, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui_backend::orchestrator::tests::{harness, Recorder, ScriptedSource};
    use crate::ui_backend::pager::PagerSettings;
    use crate::ui_backend::state::PageLayout;

    fn controller() -> (PanelController, Arc<Recorder>, Arc<ScriptedSource>) {
        let h = harness(PageLayout::default());
        let recorder = h.recorder.clone();
        let source = h.source.clone();
        let pager = ResponsivePager::new(h.state.clone(), PagerSettings::default());
        let controller = PanelController::new(
            h.state.clone(),
            Arc::new(h.orchestrator),
            pager,
            recorder.clone(),
        );
        (controller, recorder, source)
    }

    #[tokio::test]
    async fn test_input_before_init_is_ignored() {
        let (controller, _, _) = controller();
        let (outcome, refresh) = controller.handle(PanelInput::Trigger);
        assert_eq!(outcome, EventOutcome::Ignored);
        assert!(refresh.is_none());
        assert_eq!(controller.state().panel(), PanelState::Closed);
    }

    #[tokio::test]
    async fn test_open_refreshes_close_does_not() {
        let (mut controller, _, _) = controller();
        controller.init(false);

        let opened = controller.on_trigger_click();
        assert_eq!(opened.panel, PanelState::Open);
        assert_eq!(opened.outcome, EventOutcome::DefaultPrevented);
        let cycle = opened.refresh.expect("opening refreshes");
        assert_eq!(cycle.cycle, 1);
        cycle.join_fetches().await;

        let closed = controller.on_trigger_click();
        assert_eq!(closed.panel, PanelState::Closed);
        assert_eq!(closed.outcome, EventOutcome::DefaultPrevented);
        assert!(closed.refresh.is_none());
        assert_eq!(controller.orchestrator().cycles(), 1);

        let reopened = controller.on_trigger_click();
        assert!(reopened.refresh.is_some());
        assert_eq!(controller.orchestrator().cycles(), 2);
    }

    #[tokio::test]
    async fn test_gate_skips_course_cards_and_redirects_on_open() {
        let (mut controller, recorder, source) = controller();

        controller.init(true);
        assert_eq!(*recorder.inits.lock().unwrap(), 0);

        let opened = controller.on_trigger_click();
        let cycle = opened.refresh.unwrap();
        assert!(cycle.redirected);
        tokio::task::yield_now().await;
        assert!(source.calls.lock().unwrap().is_empty());
        assert_eq!(recorder.redirects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_init_without_gate_prepares_course_cards_only() {
        let (mut controller, recorder, _source) = controller();

        controller.init(false);
        assert!(controller.is_listening());
        assert_eq!(*recorder.inits.lock().unwrap(), 1);
        assert!(recorder.course_requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tab_and_resize_inputs_work_while_closed() {
        let (mut controller, _, _) = controller();
        controller.init(false);

        controller.handle(PanelInput::Resize(Viewport {
            width: 500,
            height: 900,
        }));
        let (outcome, _) = controller.handle(PanelInput::Tab(Section::Messages));
        assert_eq!(outcome, EventOutcome::DefaultPrevented);
        assert_eq!(controller.state().active_tab(), Some(Section::Messages));
        assert_eq!(controller.state().panel(), PanelState::Closed);

        controller.handle(PanelInput::Resize(Viewport {
            width: 1200,
            height: 900,
        }));
        assert!(controller.state().pager().content_style.is_none());
    }
}
