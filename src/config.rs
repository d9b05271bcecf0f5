//! Engine configuration.

use crate::error::Result;
use crate::presentation::{CountPosition, ShowCount};
use serde::{Deserialize, Serialize};

/// Presentation options for a [`DataFilter`](crate::DataFilter).
///
/// Every field is optional when deserializing; JSON keys are camelCase to
/// match the props of list screens.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Count visibility policy.
    /// Default: auto
    pub show_count: ShowCount,

    /// Where the count is placed.
    /// Default: top
    pub count_position: CountPosition,

    /// Render the summary strip even when nothing is active.
    pub always_visible: bool,

    /// Denser presentation. No effect on filtering or sorting.
    pub compact: bool,

    /// Passed through to consumers untouched.
    pub class_name: String,
}

impl EngineConfig {
    /// Parse from a JSON object; absent keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn show_count(mut self, show_count: ShowCount) -> Self {
        self.show_count = show_count;
        self
    }

    pub fn count_position(mut self, count_position: CountPosition) -> Self {
        self.count_position = count_position;
        self
    }

    pub fn always_visible(mut self, always_visible: bool) -> Self {
        self.always_visible = always_visible;
        self
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }
}
