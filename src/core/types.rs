//! Core personal menu types
//!
//! Widget identities, panel sections and the small value types shared by the
//! refresh orchestrator, the pager and the frontends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix shared by every widget region id on the page.
pub const REGION_PREFIX: &str = "snap-personal-menu-";

/// Namespace inserted between the session key and the widget name in cache keys.
pub const CACHE_NAMESPACE: &str = "personal-menu-";

/// One independently fetched content block of the personal menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Deadlines,
    Graded,
    Grading,
    Messages,
    Forumposts,
}

impl WidgetType {
    /// Every widget, in the order a refresh cycle invokes them.
    pub const ALL: [WidgetType; 5] = [
        WidgetType::Deadlines,
        WidgetType::Graded,
        WidgetType::Grading,
        WidgetType::Messages,
        WidgetType::Forumposts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deadlines => "deadlines",
            Self::Graded => "graded",
            Self::Grading => "grading",
            Self::Messages => "messages",
            Self::Forumposts => "forumposts",
        }
    }

    /// Value of the `action` query parameter for this widget's endpoint
    pub fn action(self) -> String {
        format!("get_{}", self.as_str())
    }

    /// Id of the page region this widget paints into
    pub fn region_id(self) -> String {
        format!("{}{}", REGION_PREFIX, self.as_str())
    }

    /// Cache key for this widget within the given session
    pub fn cache_key(self, sesskey: &str) -> String {
        format!("{}{}{}", sesskey, CACHE_NAMESPACE, self.as_str())
    }

    /// Human readable title used by the terminal view
    pub fn title(self) -> &'static str {
        match self {
            Self::Deadlines => "Deadlines",
            Self::Graded => "Feedback",
            Self::Grading => "Grading",
            Self::Messages => "Messages",
            Self::Forumposts => "Forum posts",
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(REGION_PREFIX).unwrap_or(s);
        WidgetType::ALL
            .into_iter()
            .find(|w| w.as_str() == name)
            .ok_or_else(|| format!("unknown widget type: {}", s))
    }
}

/// A pageable section of the panel, addressed by its anchor (`#snap-pm-...`).
///
/// The courses section is always first; the rest are the "updates" sections
/// whose order on the page determines their paging offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Courses,
    Deadlines,
    Grading,
    Messages,
    Forumposts,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Courses,
        Section::Deadlines,
        Section::Grading,
        Section::Messages,
        Section::Forumposts,
    ];

    pub fn anchor(self) -> &'static str {
        match self {
            Self::Courses => "#snap-pm-courses",
            Self::Deadlines => "#snap-pm-deadlines",
            Self::Grading => "#snap-pm-grading",
            Self::Messages => "#snap-pm-messages",
            Self::Forumposts => "#snap-pm-forumposts",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Courses => "Courses",
            Self::Deadlines => "Deadlines",
            Self::Grading => "Grading",
            Self::Messages => "Messages",
            Self::Forumposts => "Forums",
        }
    }

    /// Widgets rendered inside this section
    pub fn widgets(self) -> &'static [WidgetType] {
        match self {
            Self::Courses => &[],
            Self::Deadlines => &[WidgetType::Deadlines],
            Self::Grading => &[WidgetType::Graded, WidgetType::Grading],
            Self::Messages => &[WidgetType::Messages],
            Self::Forumposts => &[WidgetType::Forumposts],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.anchor())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let anchor = if s.starts_with('#') {
            s.to_string()
        } else {
            format!("#snap-pm-{}", s)
        };
        Section::ALL
            .into_iter()
            .find(|section| section.anchor() == anchor)
            .ok_or_else(|| format!("unknown section: {}", s))
    }
}

/// Whether the personal menu is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

impl PanelState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Viewport size in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}

/// Result of an input handler; every personal menu handler swallows the
/// default link navigation of the element it is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    DefaultPrevented,
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_order_is_fixed() {
        let names: Vec<&str> = WidgetType::ALL.iter().map(|w| w.as_str()).collect();
        assert_eq!(
            names,
            vec!["deadlines", "graded", "grading", "messages", "forumposts"]
        );
    }

    #[test]
    fn test_widget_identifiers() {
        assert_eq!(WidgetType::Grading.action(), "get_grading");
        assert_eq!(
            WidgetType::Messages.region_id(),
            "snap-personal-menu-messages"
        );
        assert_eq!(
            WidgetType::Deadlines.cache_key("abc123"),
            "abc123personal-menu-deadlines"
        );
    }

    #[test]
    fn test_widget_from_str_accepts_region_ids() {
        assert_eq!(
            "snap-personal-menu-forumposts".parse::<WidgetType>(),
            Ok(WidgetType::Forumposts)
        );
        assert_eq!("graded".parse::<WidgetType>(), Ok(WidgetType::Graded));
        assert!("badges".parse::<WidgetType>().is_err());
    }

    #[test]
    fn test_section_from_anchor_or_name() {
        assert_eq!("#snap-pm-courses".parse::<Section>(), Ok(Section::Courses));
        assert_eq!("messages".parse::<Section>(), Ok(Section::Messages));
        assert!("#snap-pm-nowhere".parse::<Section>().is_err());
    }

    #[test]
    fn test_panel_state_toggle() {
        let state = PanelState::default();
        assert!(!state.is_open());
        assert!(state.toggled().is_open());
        assert_eq!(state.toggled().toggled(), PanelState::Closed);
    }
}
