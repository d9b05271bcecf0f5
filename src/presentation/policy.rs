//! Count visibility policy.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When to show the "N/M" count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowCount {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ShowCount {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(ShowCount::Auto),
            "always" => Ok(ShowCount::Always),
            "never" => Ok(ShowCount::Never),
            other => Err(EngineError::UnknownOption {
                kind: "showCount",
                value: other.to_string(),
            }),
        }
    }
}

/// Where the count indicator is placed around the consumer output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountPosition {
    #[default]
    Top,
    Bottom,
    Both,
}

impl CountPosition {
    pub fn shows_top(self) -> bool {
        matches!(self, CountPosition::Top | CountPosition::Both)
    }

    pub fn shows_bottom(self) -> bool {
        matches!(self, CountPosition::Bottom | CountPosition::Both)
    }
}

impl FromStr for CountPosition {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "top" => Ok(CountPosition::Top),
            "bottom" => Ok(CountPosition::Bottom),
            "both" => Ok(CountPosition::Both),
            other => Err(EngineError::UnknownOption {
                kind: "countPosition",
                value: other.to_string(),
            }),
        }
    }
}

/// Decide whether the count is shown.
///
/// Under `Auto` the count appears while anything is active, or whenever the
/// derived length differs from the raw length.
pub fn should_show_count(
    show_count: ShowCount,
    has_active_filters: bool,
    has_active_sorting: bool,
    derived_len: usize,
    raw_len: usize,
) -> bool {
    match show_count {
        ShowCount::Always => true,
        ShowCount::Never => false,
        ShowCount::Auto => has_active_filters || has_active_sorting || derived_len != raw_len,
    }
}

/// The "N/M" count of visible rows over total rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountIndicator {
    pub shown: usize,
    pub total: usize,
}

impl CountIndicator {
    pub fn new(shown: usize, total: usize) -> Self {
        Self { shown, total }
    }

    pub fn is_filtered(&self) -> bool {
        self.shown != self.total
    }

    /// Long form, e.g. "Showing 3 of 10".
    pub fn label(&self) -> String {
        format!("Showing {} of {}", self.shown, self.total)
    }
}

impl fmt::Display for CountIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.shown, self.total)
    }
}
