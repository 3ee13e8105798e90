use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of a single element as the driver sees it at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    pub text: String,
    pub visible: bool,
    pub enabled: bool,
}

impl ElementState {
    pub fn new(text: impl Into<String>, visible: bool, enabled: bool) -> Self {
        Self {
            text: text.into(),
            visible,
            enabled,
        }
    }

    /// Visible and enabled, i.e. a click would land.
    pub fn is_actionable(&self) -> bool {
        self.visible && self.enabled
    }
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "text={:?} visible={} enabled={}",
            self.text, self.visible, self.enabled
        )
    }
}
