//! Core types shared by the state store, derivation pipeline and engine.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A single row of the raw collection.
///
/// Rows are normally JSON objects; `row[key]` is a member lookup.
pub type Row = serde_json::Value;

/// Sort direction. `None` means unsorted regardless of the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
    #[default]
    #[serde(rename = "")]
    None,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
            SortDirection::None => "",
        }
    }

    /// Next direction in the header-click cycle: asc, desc, unsorted.
    pub fn cycle(self) -> Self {
        match self {
            SortDirection::None => SortDirection::Asc,
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            "" => Ok(SortDirection::None),
            other => Err(EngineError::UnknownSortDirection(other.to_string())),
        }
    }
}

/// The single active sort descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// `{field: "", direction: ""}`.
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// True only with a non-empty field and a real direction.
    pub fn is_active(&self) -> bool {
        !self.field.is_empty() && self.direction != SortDirection::None
    }
}

/// Column key to filter input value.
///
/// Entries whose value is blank after trimming are kept but inactive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FilterState(HashMap<String, String>);

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Insert or replace the entry for `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `key` carries a non-blank value.
    pub fn is_active(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_active_value)
    }

    /// Entries with a non-blank value.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, v)| is_active_value(v))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn has_active(&self) -> bool {
        self.active().next().is_some()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn is_active_value(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_spec_activity() {
        assert!(!SortSpec::unsorted().is_active());
        assert!(!SortSpec::new("amount", SortDirection::None).is_active());
        assert!(!SortSpec::new("", SortDirection::Asc).is_active());
        assert!(SortSpec::desc("amount").is_active());
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("".parse::<SortDirection>().unwrap(), SortDirection::None);
        assert!(matches!(
            "up".parse::<SortDirection>(),
            Err(EngineError::UnknownSortDirection(_))
        ));
    }

    #[test]
    fn test_sort_spec_serde_shape() {
        let spec: SortSpec =
            serde_json::from_str(r#"{"field":"createdAt","direction":"desc"}"#).unwrap();
        assert_eq!(spec, SortSpec::desc("createdAt"));

        let json = serde_json::to_value(SortSpec::unsorted()).unwrap();
        assert_eq!(json, serde_json::json!({"field": "", "direction": ""}));
    }

    #[test]
    fn test_blank_filters_are_inactive() {
        let filters: FilterState = [("name", "  "), ("status", "paid"), ("role", "")]
            .into_iter()
            .collect();

        assert_eq!(filters.len(), 3);
        assert!(filters.is_active("status"));
        assert!(!filters.is_active("name"));
        assert!(!filters.is_active("missing"));
        assert_eq!(filters.active().count(), 1);
        assert!(filters.has_active());
    }
}
