//! # listlens
//!
//! A generic filtering, sorting and summary engine for list screens. It
//! takes an in-memory collection plus a declarative column schema, keeps
//! per-column filter state and a single sort descriptor, and hands a
//! derived view to whatever renders the table.
//!
//! ## Core Concepts
//!
//! - **Columns**: Schema entries describing how each field filters and sorts
//! - **State**: Filter values and sort descriptor, observable through subscriptions
//! - **Derivation**: Pure filter-then-sort pipeline, memoized on input identity
//! - **Presentation**: Count visibility and the active-filter summary strip
//! - **Engine**: The render-prop boundary tying it all together
//!
//! ## Example
//!
//! ```ignore
//! use listlens::{Children, ColumnDescriptor, DataFilter, SortSpec};
//! use serde_json::json;
//!
//! let engine = DataFilter::new(
//!     vec![json!({"name": "Alice", "active": true}), json!({"name": "bob", "active": false})],
//!     vec![
//!         ColumnDescriptor::text("name", "Name").sortable(),
//!         ColumnDescriptor::select("active", "Active", ["Sí", "No"]),
//!     ],
//! );
//!
//! engine.set_filter("active", "Sí");
//! engine.set_sort(SortSpec::asc("name"));
//!
//! let rendered = engine.render(Children::render_prop(|bag| {
//!     bag.filtered_data.iter().map(|row| row["name"].to_string()).collect::<Vec<_>>()
//! }));
//! ```

pub mod columns;
pub mod config;
pub mod derive;
pub mod engine;
pub mod error;
pub mod presentation;
pub mod state;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use columns::{Accessor, BooleanLabels, ColumnDescriptor, Columns, FilterType};
pub use config::EngineConfig;
pub use derive::{derive, DerivationCache, DerivationKey};
pub use engine::{
    Children, ClearAllFn, DataFilter, FilterChangeFn, RenderBag, Rendered, SortChangeFn,
};
pub use error::{EngineError, Result};
pub use presentation::{
    should_show_count, CountIndicator, CountPosition, FilterSummary, ShowCount, SortChip,
    SummaryChip,
};
pub use state::{StateSnapshot, StateStore};
pub use subscriptions::{
    DropReason, StateEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::*;
