//! Page shell adapters
//!
//! Concrete collaborators used by the terminal and headless frontends. They
//! report into [`SharedState`] so renderers can show redirects and toasts.

use crate::core::{BadgeOverlay, CourseCards, Navigator, Notifier};

use super::state::{ErrorLevel, SharedState};

/// Course cards for a fixed set of course ids
#[derive(Debug, Clone, Default)]
pub struct ConfiguredCourseCards {
    course_ids: Vec<u64>,
}

impl ConfiguredCourseCards {
    pub fn new(course_ids: Vec<u64>) -> Self {
        Self { course_ids }
    }
}

impl CourseCards for ConfiguredCourseCards {
    fn init(&self) {
        tracing::debug!("course cards ready for {} courses", self.course_ids.len());
    }

    fn course_ids(&self) -> Vec<u64> {
        self.course_ids.clone()
    }

    fn request_course_info(&self, course_ids: &[u64]) {
        if !course_ids.is_empty() {
            tracing::info!("requesting course info for {:?}", course_ids);
        }
    }
}

/// Records navigations in the shared state
#[derive(Debug, Clone)]
pub struct ShellNavigator {
    state: SharedState,
}

impl ShellNavigator {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl Navigator for ShellNavigator {
    fn redirect(&self, url: &str) {
        tracing::info!("redirecting to {}", url);
        self.state.set_location(url);
    }
}

/// Error toasts, kept in the shared state
#[derive(Debug, Clone)]
pub struct ShellNotifier {
    state: SharedState,
}

impl ShellNotifier {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl Notifier for ShellNotifier {
    fn show_error(&self, message: &str) {
        tracing::warn!("personal menu error: {}", message);
        self.state.push_notification(message, ErrorLevel::Error);
    }
}

/// Message badge overlay
#[derive(Debug, Clone, Default)]
pub struct MessageBadge;

impl BadgeOverlay for MessageBadge {
    fn init_overlay(&self) {
        tracing::debug!("message badge overlay initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_and_notifier_report_into_state() {
        let state = SharedState::default();
        ShellNavigator::new(state.clone()).redirect("https://moodle.test/user/policy.php");
        ShellNotifier::new(state.clone()).show_error("Forum unavailable");

        assert_eq!(
            state.location().as_deref(),
            Some("https://moodle.test/user/policy.php")
        );
        let toast = state.latest_notification().unwrap();
        assert_eq!(toast.message, "Forum unavailable");
        assert_eq!(toast.level, ErrorLevel::Error);
    }
}
