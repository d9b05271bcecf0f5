//! Derivation pipeline: raw rows plus filter and sort state in, a fresh
//! filtered-and-sorted collection out.
//!
//! The pipeline is pure. It never mutates the input and always returns a
//! new vector, even when nothing is active.

mod cache;
mod filter;
mod sort;
pub mod value;

pub use cache::{DerivationCache, DerivationKey};
pub use filter::{apply_filters, distinct_values};
pub use sort::{apply_sort, compare_with_nulls, sort_column};

use crate::columns::Columns;
use crate::types::{FilterState, Row, SortSpec};

/// Apply filter state, then sort state, to `rows`.
pub fn derive(rows: &[Row], columns: &Columns, filters: &FilterState, sort: &SortSpec) -> Vec<Row> {
    let mut kept = apply_filters(rows, columns, filters);
    apply_sort(&mut kept, columns, sort);
    kept.into_iter().cloned().collect()
}
