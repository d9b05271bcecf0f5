//! Column descriptors.

use crate::derive::value;
use crate::types::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Reads a derived value from a row, superseding `row[key]`.
pub type Accessor = Arc<dyn Fn(&Row) -> Value + Send + Sync>;

/// Select option pairs that mark a column as boolean. Order matters.
pub const BOOLEAN_OPTION_PAIRS: &[(&str, &str)] =
    &[("Sí", "No"), ("Si", "No"), ("Yes", "No"), ("True", "False")];

/// Labels a boolean row value is coerced to before comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanLabels {
    pub truthy: String,
    pub falsy: String,
}

impl BooleanLabels {
    pub fn new(truthy: impl Into<String>, falsy: impl Into<String>) -> Self {
        Self {
            truthy: truthy.into(),
            falsy: falsy.into(),
        }
    }

    pub fn label(&self, value: bool) -> &str {
        if value {
            &self.truthy
        } else {
            &self.falsy
        }
    }

    /// Recognize a select option list that is exactly a known yes/no pair.
    pub fn from_options(options: &[String]) -> Option<Self> {
        match options {
            [first, second] => BOOLEAN_OPTION_PAIRS
                .iter()
                .find(|(t, f)| first == t && second == f)
                .map(|(t, f)| Self::new(*t, *f)),
            _ => None,
        }
    }
}

impl Default for BooleanLabels {
    fn default() -> Self {
        Self::new("Sí", "No")
    }
}

/// Comparison semantics of a column filter.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum FilterType {
    /// Case-insensitive substring match.
    #[default]
    Text,
    /// Exact match against a closed option set.
    Select,
    /// Exact match after coercing booleans to labels.
    Boolean(BooleanLabels),
}

/// Describes one filterable/sortable field of the row type.
#[derive(Clone)]
pub struct ColumnDescriptor {
    pub key: String,
    pub header: String,
    pub filterable: bool,
    pub filter_type: FilterType,
    pub filter_options: Vec<String>,
    pub sortable: bool,
    pub sort_accessor: Option<Accessor>,
    pub filter_accessor: Option<Accessor>,
}

impl ColumnDescriptor {
    /// A filterable text column.
    pub fn text(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            filterable: true,
            filter_type: FilterType::Text,
            filter_options: Vec::new(),
            sortable: false,
            sort_accessor: None,
            filter_accessor: None,
        }
    }

    /// A filterable select column with its allowed values.
    pub fn select<I, S>(key: impl Into<String>, header: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter_type: FilterType::Select,
            filter_options: options.into_iter().map(Into::into).collect(),
            ..Self::text(key, header)
        }
    }

    /// A filterable boolean column with explicit labels.
    pub fn boolean(
        key: impl Into<String>,
        header: impl Into<String>,
        labels: BooleanLabels,
    ) -> Self {
        Self {
            filter_options: vec![labels.truthy.clone(), labels.falsy.clone()],
            filter_type: FilterType::Boolean(labels),
            ..Self::text(key, header)
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn not_filterable(mut self) -> Self {
        self.filterable = false;
        self
    }

    pub fn sort_accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&Row) -> Value + Send + Sync + 'static,
    {
        self.sort_accessor = Some(Arc::new(accessor));
        self
    }

    pub fn filter_accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&Row) -> Value + Send + Sync + 'static,
    {
        self.filter_accessor = Some(Arc::new(accessor));
        self
    }

    /// Value the filter predicate compares against.
    pub fn filter_value<'a>(&self, row: &'a Row) -> Cow<'a, Value> {
        match &self.filter_accessor {
            Some(accessor) => Cow::Owned(accessor(row)),
            None => Cow::Borrowed(value::field(row, &self.key)),
        }
    }

    /// Value the sort comparator orders by.
    pub fn sort_value<'a>(&self, row: &'a Row) -> Cow<'a, Value> {
        match &self.sort_accessor {
            Some(accessor) => Cow::Owned(accessor(row)),
            None => Cow::Borrowed(value::field(row, &self.key)),
        }
    }

    /// Labels for boolean coercion, either explicit or sniffed from the
    /// select options.
    pub fn boolean_labels(&self) -> Option<Cow<'_, BooleanLabels>> {
        match &self.filter_type {
            FilterType::Boolean(labels) => Some(Cow::Borrowed(labels)),
            FilterType::Select => BooleanLabels::from_options(&self.filter_options).map(Cow::Owned),
            FilterType::Text => None,
        }
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("filterable", &self.filterable)
            .field("filter_type", &self.filter_type)
            .field("filter_options", &self.filter_options)
            .field("sortable", &self.sortable)
            .field("sort_accessor", &self.sort_accessor.is_some())
            .field("filter_accessor", &self.filter_accessor.is_some())
            .finish()
    }
}
