//! Declarative column schema.
//!
//! A schema is an ordered list of [`ColumnDescriptor`]s shared behind an
//! `Arc`, so the engine can detect schema changes by identity.

mod descriptor;

pub use descriptor::{Accessor, BooleanLabels, ColumnDescriptor, FilterType, BOOLEAN_OPTION_PAIRS};

use crate::error::{EngineError, Result};
use std::collections::HashSet;
use std::sync::Arc;

/// Shared, immutable column schema.
#[derive(Clone, Debug)]
pub struct Columns(Arc<[ColumnDescriptor]>);

impl Columns {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self(columns.into())
    }

    /// Look up a column by key. The first match wins.
    pub fn find(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.0.iter().find(|c| c.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDescriptor> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ColumnDescriptor] {
        &self.0
    }

    /// Whether both handles share the same schema allocation.
    pub fn ptr_eq(&self, other: &Columns) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Minimal shape check: non-empty unique keys, and select columns that
    /// carry options. Opt-in; the engine itself tolerates a bad schema.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for column in self.iter() {
            if column.key.is_empty() {
                return Err(EngineError::InvalidSchema(format!(
                    "column {:?} has an empty key",
                    column.header
                )));
            }
            if !seen.insert(column.key.as_str()) {
                return Err(EngineError::InvalidSchema(format!(
                    "duplicate column key {:?}",
                    column.key
                )));
            }
            if column.filter_type == FilterType::Select && column.filter_options.is_empty() {
                return Err(EngineError::InvalidSchema(format!(
                    "select column {:?} has no options",
                    column.key
                )));
            }
        }
        Ok(())
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<ColumnDescriptor>> for Columns {
    fn from(columns: Vec<ColumnDescriptor>) -> Self {
        Self::new(columns)
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a ColumnDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_match() {
        let columns = Columns::new(vec![
            ColumnDescriptor::text("name", "Name"),
            ColumnDescriptor::text("name", "Shadowed"),
        ]);
        assert_eq!(columns.find("name").unwrap().header, "Name");
        assert!(columns.find("email").is_none());
    }

    #[test]
    fn test_validate_ok() {
        let columns = Columns::new(vec![
            ColumnDescriptor::text("name", "Name"),
            ColumnDescriptor::select("status", "Status", ["paid", "pending"]),
        ]);
        assert!(columns.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let dup = Columns::new(vec![
            ColumnDescriptor::text("name", "Name"),
            ColumnDescriptor::text("name", "Again"),
        ]);
        assert!(matches!(dup.validate(), Err(EngineError::InvalidSchema(_))));

        let empty_key = Columns::new(vec![ColumnDescriptor::text("", "Nameless")]);
        assert!(matches!(empty_key.validate(), Err(EngineError::InvalidSchema(_))));

        let no_options = Columns::new(vec![ColumnDescriptor::select(
            "status",
            "Status",
            Vec::<String>::new(),
        )]);
        assert!(matches!(no_options.validate(), Err(EngineError::InvalidSchema(_))));
    }

    #[test]
    fn test_clone_shares_schema() {
        let a = Columns::new(vec![ColumnDescriptor::text("name", "Name")]);
        let b = a.clone();
        let c = Columns::new(vec![ColumnDescriptor::text("name", "Name")]);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }
}
