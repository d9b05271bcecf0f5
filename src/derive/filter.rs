//! Filter predicate.

use crate::columns::{ColumnDescriptor, Columns, FilterType};
use crate::derive::value::{display_string, locale_compare};
use crate::types::{FilterState, Row};
use serde_json::Value;

/// A resolved active filter: the column it reads and the expected value.
struct ActiveFilter<'a> {
    column: &'a ColumnDescriptor,
    needle: &'a str,
    /// Lowercased needle for text columns.
    needle_lower: String,
}

/// Keep rows matching every active filter. Entries whose key is not in the
/// schema are inert.
pub fn apply_filters<'r>(rows: &'r [Row], columns: &Columns, filters: &FilterState) -> Vec<&'r Row> {
    let active: Vec<ActiveFilter<'_>> = filters
        .active()
        .filter_map(|(key, needle)| {
            columns.find(key).map(|column| ActiveFilter {
                column,
                needle,
                needle_lower: needle.to_lowercase(),
            })
        })
        .collect();

    rows.iter()
        .filter(|row| active.iter().all(|f| matches(f, row)))
        .collect()
}

fn matches(filter: &ActiveFilter<'_>, row: &Row) -> bool {
    let value = filter.column.filter_value(row);
    if value.is_null() {
        return false;
    }

    match filter.column.filter_type {
        FilterType::Text => display_string(&value)
            .to_lowercase()
            .contains(&filter.needle_lower),
        FilterType::Select | FilterType::Boolean(_) => {
            match (filter.column.boolean_labels(), value.as_ref()) {
                (Some(labels), Value::Bool(b)) => labels.label(*b) == filter.needle,
                _ => display_string(&value) == filter.needle,
            }
        }
    }
}

/// Sorted distinct display values of a column's filter value, nulls skipped.
pub fn distinct_values(rows: &[Row], column: &ColumnDescriptor) -> Vec<String> {
    let mut values: Vec<String> = rows
        .iter()
        .map(|row| column.filter_value(row))
        .filter(|v| !v.is_null())
        .map(|v| display_string(&v))
        .collect();
    values.sort_by(|a, b| locale_compare(a, b));
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::BooleanLabels;
    use serde_json::json;

    fn keys<'a>(rows: &[&'a Row], key: &str) -> Vec<&'a Value> {
        rows.iter().map(|&r| &r[key]).collect()
    }

    #[test]
    fn test_text_filter_case_insensitive() {
        let rows = vec![json!({"name": "Alice"}), json!({"name": "bob"})];
        let columns = Columns::new(vec![ColumnDescriptor::text("name", "Name")]);
        let filters: FilterState = [("name", "AL")].into_iter().collect();

        let out = apply_filters(&rows, &columns, &filters);
        assert_eq!(keys(&out, "name"), vec![&json!("Alice")]);
    }

    #[test]
    fn test_text_filter_on_numbers() {
        let rows = vec![json!({"amount": 1250}), json!({"amount": 99})];
        let columns = Columns::new(vec![ColumnDescriptor::text("amount", "Amount")]);
        let filters: FilterState = [("amount", "25")].into_iter().collect();

        let out = apply_filters(&rows, &columns, &filters);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["amount"], 1250);
    }

    #[test]
    fn test_select_exact_match() {
        let rows = vec![
            json!({"status": "completed"}),
            json!({"status": "completed-late"}),
            json!({"status": "Completed"}),
        ];
        let columns = Columns::new(vec![ColumnDescriptor::select(
            "status",
            "Status",
            ["completed", "pending"],
        )]);
        let filters: FilterState = [("status", "completed")].into_iter().collect();

        let out = apply_filters(&rows, &columns, &filters);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["status"], "completed");
    }

    #[test]
    fn test_select_boolean_coercion() {
        let rows = vec![json!({"id": 1, "active": true}), json!({"id": 2, "active": false})];
        let columns = Columns::new(vec![ColumnDescriptor::select(
            "active",
            "Activo",
            ["Sí", "No"],
        )]);

        let yes: FilterState = [("active", "Sí")].into_iter().collect();
        let out = apply_filters(&rows, &columns, &yes);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["id"], 1);

        let no: FilterState = [("active", "No")].into_iter().collect();
        let out = apply_filters(&rows, &columns, &no);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["id"], 2);

        // Raw boolean strings do not match a labelled column.
        let raw: FilterState = [("active", "true")].into_iter().collect();
        assert!(apply_filters(&rows, &columns, &raw).is_empty());
    }

    #[test]
    fn test_explicit_boolean_column() {
        let rows = vec![json!({"on": true}), json!({"on": false}), json!({"on": "Enabled"})];
        let columns = Columns::new(vec![ColumnDescriptor::boolean(
            "on",
            "On",
            BooleanLabels::new("Enabled", "Disabled"),
        )]);
        let filters: FilterState = [("on", "Enabled")].into_iter().collect();

        // Non-boolean values fall back to string equality.
        assert_eq!(apply_filters(&rows, &columns, &filters).len(), 2);
    }

    #[test]
    fn test_null_never_matches() {
        let rows = vec![json!({"name": null}), json!({}), json!({"name": "null"})];
        let columns = Columns::new(vec![ColumnDescriptor::text("name", "Name")]);
        let filters: FilterState = [("name", "nu")].into_iter().collect();

        let out = apply_filters(&rows, &columns, &filters);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["name"], "null");
    }

    #[test]
    fn test_unknown_key_and_blank_value_are_inert() {
        let rows = vec![json!({"name": "Alice"}), json!({"name": "Bob"})];
        let columns = Columns::new(vec![ColumnDescriptor::text("name", "Name")]);
        let filters: FilterState = [("email", "x@y"), ("name", "   ")].into_iter().collect();

        assert_eq!(apply_filters(&rows, &columns, &filters).len(), 2);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let rows = vec![
            json!({"name": "Alice", "role": "admin"}),
            json!({"name": "Alicia", "role": "viewer"}),
            json!({"name": "Bob", "role": "admin"}),
        ];
        let columns = Columns::new(vec![
            ColumnDescriptor::text("name", "Name"),
            ColumnDescriptor::select("role", "Role", ["admin", "viewer"]),
        ]);
        let filters: FilterState = [("name", "ali"), ("role", "admin")].into_iter().collect();

        let out = apply_filters(&rows, &columns, &filters);
        assert_eq!(keys(&out, "name"), vec![&json!("Alice")]);
    }

    #[test]
    fn test_filter_accessor_reads_nested() {
        let rows = vec![
            json!({"customer": {"name": "Acme Corp"}}),
            json!({"customer": {"name": "Globex"}}),
            json!({"customer": null}),
        ];
        let columns = Columns::new(vec![ColumnDescriptor::text("customer", "Customer")
            .filter_accessor(|row| row["customer"]["name"].clone())]);
        let filters: FilterState = [("customer", "acme")].into_iter().collect();

        assert_eq!(apply_filters(&rows, &columns, &filters).len(), 1);
    }

    #[test]
    fn test_distinct_values() {
        let rows = vec![
            json!({"status": "pending"}),
            json!({"status": "completed"}),
            json!({"status": null}),
            json!({"status": "pending"}),
        ];
        let column = ColumnDescriptor::select("status", "Status", Vec::<String>::new());
        assert_eq!(distinct_values(&rows, &column), vec!["completed", "pending"]);
    }
}
