//! CLI entry points

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::sync::Arc;

use crate::config::Config;
use crate::tui::{html_to_lines, TuiApp};
use crate::ui_backend::service::open_cache;
use crate::ui_backend::shell::MessageBadge;
use crate::ui_backend::{PersonalMenu, SharedState, WidgetStatus};

/// Open the personal menu once, wait for every widget and print the result
pub async fn run_refresh(config: &Config) -> Result<()> {
    let menu = PersonalMenu::from_config(config)?;
    publish_badge(&menu);

    let outcome = menu.controller.on_trigger_click();
    if let Some(mut cycle) = outcome.refresh {
        let badge_wait = cycle.badge_wait.take();
        cycle.join_fetches().await;
        if let Some(handle) = badge_wait {
            handle.await.context("badge overlay task failed")?;
        }
    }

    for toast in menu.state.notifications() {
        eprintln!("error: {}", toast.message);
    }
    print!("{}", render_report(&menu.state));
    Ok(())
}

/// Run the terminal frontend
pub async fn run_tui(config: &Config) -> Result<()> {
    let menu = PersonalMenu::from_config(config)?;
    publish_badge(&menu);
    tracing::info!(wwwroot = %config.site.wwwroot, "starting personal menu TUI");

    let app = TuiApp::new(menu, config.layout.clone())?;
    app.run().await
}

/// Drop every cached widget for the configured site
pub fn run_cache_clear(config: &Config) -> Result<()> {
    let cache = open_cache(config)?;
    cache.clear();
    println!("Cleared widget cache in {}", config.cache_dir().display());
    Ok(())
}

/// The message badge becomes available once the runtime is up
fn publish_badge(menu: &PersonalMenu) {
    let badge = menu.badge.clone();
    tokio::spawn(async move {
        badge.publish(Arc::new(MessageBadge));
    });
}

fn status_label(status: &WidgetStatus) -> String {
    match status {
        WidgetStatus::Idle => "idle".to_string(),
        WidgetStatus::Loading => "loading".to_string(),
        WidgetStatus::Loaded => "loaded".to_string(),
        WidgetStatus::ServerError(message) => format!("server error: {}", message),
        WidgetStatus::Failed(reason) => format!("failed: {}", reason),
    }
}

/// Plain-text report of the page after a refresh
pub fn render_report(state: &SharedState) -> String {
    let mut out = String::new();
    if let Some(location) = state.location() {
        let _ = writeln!(out, "redirect: {}", location);
    }

    for (widget, region) in state.regions() {
        let source = if region.from_cache && !region.content_loaded {
            ", cached"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "== {} ({}{}) ==",
            widget.title(),
            status_label(&region.status),
            source
        );
        for line in html_to_lines(&region.content) {
            let _ = writeln!(out, "  {}", line);
        }
    }

    if let Some(badges) = state.badges() {
        let _ = writeln!(out, "badges: {} overlay init(s)", badges.overlay_inits);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WidgetType;
    use crate::ui_backend::PageLayout;

    #[test]
    fn test_report_lists_regions_and_redirect() {
        let state = SharedState::new(PageLayout {
            regions: vec![WidgetType::Deadlines, WidgetType::Messages],
            badges_region: false,
            update_sections: Vec::new(),
        });
        state.apply_markup(WidgetType::Deadlines, "<li>Quiz 1</li>".to_string());
        state.paint_cached(WidgetType::Messages, "<li>Old note</li>".to_string());
        state.set_widget_status(WidgetType::Messages, WidgetStatus::Failed("timeout".into()));
        state.set_location("https://moodle.test/user/policy.php");

        let report = render_report(&state);
        assert!(report.starts_with("redirect: https://moodle.test/user/policy.php\n"));
        assert!(report.contains("== Deadlines (loaded) ==\n  Quiz 1\n"));
        assert!(report.contains("(failed: timeout, cached)"));
        assert!(report.contains("  Old note"));
        assert!(!report.contains("badges:"));
    }
}
