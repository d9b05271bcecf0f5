//! Single-column sort with nulls last.

use crate::columns::{ColumnDescriptor, Columns};
use crate::derive::value::compare_values;
use crate::types::{Row, SortDirection, SortSpec};
use serde_json::Value;
use std::cmp::Ordering;

/// Resolve the column a sort spec applies to. Inactive specs, unknown
/// fields and non-sortable columns resolve to nothing.
pub fn sort_column<'c>(columns: &'c Columns, sort: &SortSpec) -> Option<&'c ColumnDescriptor> {
    if !sort.is_active() {
        return None;
    }
    columns.find(&sort.field).filter(|c| c.sortable)
}

/// Sort rows in place. Stable: rows with equal keys keep input order.
pub fn apply_sort(rows: &mut [&Row], columns: &Columns, sort: &SortSpec) {
    let Some(column) = sort_column(columns, sort) else {
        return;
    };

    // Resolve keys once; accessors may allocate.
    let mut keyed: Vec<(Value, &Row)> = rows
        .iter()
        .map(|row| (column.sort_value(row).into_owned(), *row))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_with_nulls(a, b, sort.direction));

    for (slot, (_, row)) in rows.iter_mut().zip(keyed) {
        *slot = row;
    }
}

/// Nulls sort last whatever the direction; the direction only flips the
/// ordering of non-null values.
pub fn compare_with_nulls(a: &Value, b: &Value, direction: SortDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = compare_values(a, b);
            match direction {
                SortDirection::Desc => ord.reverse(),
                _ => ord,
            }
        }
    }
}
