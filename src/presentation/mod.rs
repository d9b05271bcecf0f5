//! Presentation policy: when to show the count, and what the active-filter
//! summary strip says. Purely descriptive; nothing here affects filtering
//! or sorting.

mod policy;
mod summary;

pub use policy::{should_show_count, CountIndicator, CountPosition, ShowCount};
pub use summary::{FilterSummary, SortChip, SummaryChip};
