//! Collaborator traits
//!
//! The personal menu coordinates a handful of page services it does not own.
//! Each one is injected as a trait object so the orchestrator can be driven by
//! the terminal frontend, the headless CLI, or a test double.

/// Course card subsystem shown in the courses section
pub trait CourseCards: Send + Sync {
    /// Prepare the cards; called once at init when the site policy is accepted
    fn init(&self);

    /// Course ids currently known to the page
    fn course_ids(&self) -> Vec<u64>;

    /// Ask for fresh card data for the given courses (fire-and-forget)
    fn request_course_info(&self, course_ids: &[u64]);
}

/// Full page navigation
pub trait Navigator: Send + Sync {
    fn redirect(&self, url: &str);
}

/// Toast-style error display
pub trait Notifier: Send + Sync {
    fn show_error(&self, message: &str);
}

/// Message badge overlay; may become available after the panel initializes
pub trait BadgeOverlay: Send + Sync {
    fn init_overlay(&self);
}
