//! Personal menu service
//!
//! Wires the cache, the widget source, the collaborators and the controllers
//! into one initialized personal menu.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::Config;
use crate::core::{CourseCards, Navigator, Notifier};
use crate::storage::{CacheStore, FileStorage, MemoryStorage, SessionStorage};
use crate::transport::{RestClient, WidgetSource};

use super::badge::BadgeSlot;
use super::events::EventBus;
use super::fetcher::WidgetFetcher;
use super::orchestrator::{RefreshOrchestrator, SitePolicyGate};
use super::pager::{PagerSettings, ResponsivePager};
use super::panel::PanelController;
use super::shell::{ConfiguredCourseCards, ShellNavigator, ShellNotifier};
use super::state::{PageLayout, SharedState};

/// Collaborators a page provides to the personal menu
pub struct Collaborators {
    pub source: Arc<dyn WidgetSource>,
    pub course_cards: Arc<dyn CourseCards>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

/// An initialized personal menu
pub struct PersonalMenu {
    pub controller: PanelController,
    pub state: SharedState,
    pub cache: Arc<CacheStore>,
    pub badge: BadgeSlot,
    pub events: EventBus,
}

impl PersonalMenu {
    /// Build the menu for a configured site, talking to its REST endpoint
    pub fn from_config(config: &Config) -> Result<Self> {
        let state = SharedState::new(page_layout(config));
        let cache = Arc::new(open_cache(config)?);
        let source = RestClient::new(&config.site, &config.http)
            .context("Failed to create widget client")?;
        let collaborators = Collaborators {
            source: Arc::new(source),
            course_cards: Arc::new(ConfiguredCourseCards::new(
                config.layout.course_ids.clone(),
            )),
            navigator: Arc::new(ShellNavigator::new(state.clone())),
            notifier: Arc::new(ShellNotifier::new(state.clone())),
        };
        Ok(Self::assemble(config, state, cache, collaborators))
    }

    /// Build the menu from explicit parts and run `init`
    pub fn assemble(
        config: &Config,
        state: SharedState,
        cache: Arc<CacheStore>,
        collaborators: Collaborators,
    ) -> Self {
        let badge = BadgeSlot::new();
        let events = EventBus::default();
        let fetcher = WidgetFetcher::new(
            state.clone(),
            cache.clone(),
            collaborators.source,
            collaborators.notifier,
            config.site.sesskey.clone(),
        );
        let orchestrator = RefreshOrchestrator::new(
            state.clone(),
            SitePolicyGate::new(),
            config.site.policy_url(),
            fetcher,
            collaborators.course_cards.clone(),
            collaborators.navigator,
            badge.clone(),
            events.clone(),
        );
        let pager = ResponsivePager::new(state.clone(), PagerSettings::from(&config.layout));
        let mut controller = PanelController::new(
            state.clone(),
            Arc::new(orchestrator),
            pager,
            collaborators.course_cards,
        );
        controller.init(config.site.site_policy_accept_reqd);

        Self {
            controller,
            state,
            cache,
            badge,
            events,
        }
    }
}

/// Page layout described by the configuration
pub fn page_layout(config: &Config) -> PageLayout {
    PageLayout {
        regions: config.layout.regions.clone(),
        badges_region: config.layout.badges_region,
        update_sections: config.layout.update_sections.clone(),
    }
}

/// Open the session storage area for the configured site
pub fn open_cache(config: &Config) -> Result<CacheStore> {
    let backend: Box<dyn SessionStorage> = if config.cache.enabled {
        let origin = config.site.origin()?;
        Box::new(FileStorage::open(
            &config.cache_dir(),
            &origin,
            &config.site.sesskey,
        ))
    } else {
        Box::new(MemoryStorage::disabled())
    };
    Ok(CacheStore::new(backend))
}
