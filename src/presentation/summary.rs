//! Active-filter summary strip.

use crate::columns::Columns;
use crate::state::StateSnapshot;
use crate::types::SortDirection;
use serde::Serialize;
use std::fmt;

/// One active filter, with the key its quick-clear control removes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SummaryChip {
    pub key: String,
    pub header: String,
    pub value: String,
}

impl fmt::Display for SummaryChip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.header, self.value)
    }
}

/// The active sort, shown next to the filter chips.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SortChip {
    pub field: String,
    pub header: String,
    pub direction: SortDirection,
}

impl fmt::Display for SortChip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.direction {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
            SortDirection::None => "",
        };
        write!(f, "{} {}", self.header, arrow)
    }
}

/// Human-readable summary of what is narrowing or ordering the view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    /// Active filters on known, filterable columns, in schema order.
    pub chips: Vec<SummaryChip>,
    pub sort: Option<SortChip>,
    /// False when nothing is active; the clear button renders disabled.
    pub clear_all_enabled: bool,
    /// Rendered only because the strip is always visible.
    pub is_placeholder: bool,
    pub compact: bool,
}

impl FilterSummary {
    /// Build the strip for the current state, or `None` when it is hidden.
    pub fn build(
        columns: &Columns,
        state: &StateSnapshot,
        always_visible: bool,
        compact: bool,
    ) -> Option<Self> {
        let has_active_filters = state.has_active_filters();
        let has_active_sorting = state.has_active_sorting();
        let active = has_active_filters || has_active_sorting;
        if !active && !always_visible {
            return None;
        }

        let chips = columns
            .iter()
            .filter(|c| c.filterable && state.filters.is_active(&c.key))
            .filter_map(|c| {
                state.filters.get(&c.key).map(|value| SummaryChip {
                    key: c.key.clone(),
                    header: c.header.clone(),
                    value: value.trim().to_string(),
                })
            })
            .collect();

        let sort = has_active_sorting.then(|| SortChip {
            field: state.sort.field.clone(),
            header: columns
                .find(&state.sort.field)
                .map(|c| c.header.clone())
                .unwrap_or_else(|| state.sort.field.clone()),
            direction: state.sort.direction,
        });

        Some(Self {
            chips,
            sort,
            clear_all_enabled: active,
            is_placeholder: !active,
            compact,
        })
    }

    /// Text of the strip, e.g. "Status: paid · Name ↑", or the placeholder.
    pub fn describe(&self) -> String {
        if self.is_placeholder {
            return "No active filters".to_string();
        }
        let mut parts: Vec<String> = self.chips.iter().map(ToString::to_string).collect();
        if let Some(sort) = &self.sort {
            parts.push(sort.to_string());
        }
        parts.join(" · ")
    }
}
