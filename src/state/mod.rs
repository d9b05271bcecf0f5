//! State store for filter and sort selections.
//!
//! Consumers mutate state only through `set_filter`, `set_sort` and
//! `clear_all` (plus the quick-clear helpers). Each mutation bumps a
//! revision that the derivation cache keys on.

mod store;

pub use store::{StateSnapshot, StateStore};
