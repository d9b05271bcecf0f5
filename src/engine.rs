//! The filter engine and its render-prop composition boundary.

use crate::columns::Columns;
use crate::config::EngineConfig;
use crate::derive::{self, DerivationCache, DerivationKey};
use crate::presentation::{should_show_count, CountIndicator, FilterSummary};
use crate::state::{StateSnapshot, StateStore};
use crate::subscriptions::{SubscriptionConfig, SubscriptionHandle};
use crate::types::{FilterState, Row, SortSpec};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// `on_filter_change(key, value)`.
pub type FilterChangeFn = Arc<dyn Fn(&str, &str) + Send + Sync>;
/// `on_sort_change(spec)`.
pub type SortChangeFn = Arc<dyn Fn(SortSpec) + Send + Sync>;
/// `on_clear_all()`.
pub type ClearAllFn = Arc<dyn Fn() + Send + Sync>;

/// Everything a consumer gets to render the derived view.
///
/// The callbacks write through to the engine's state store. Calling them
/// while rendering is allowed; the change shows up on the next render.
#[derive(Clone)]
pub struct RenderBag {
    pub filtered_data: Arc<Vec<Row>>,
    pub original_data: Arc<Vec<Row>>,
    pub filters: FilterState,
    pub sorting: SortSpec,
    pub on_filter_change: FilterChangeFn,
    pub on_sort_change: SortChangeFn,
    pub on_clear_all: ClearAllFn,
    pub has_active_filters: bool,
    pub has_active_sorting: bool,
    pub has_active_items: bool,
    pub columns: Columns,
}

impl fmt::Debug for RenderBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderBag")
            .field("filtered_data", &self.filtered_data.len())
            .field("original_data", &self.original_data.len())
            .field("filters", &self.filters)
            .field("sorting", &self.sorting)
            .field("has_active_filters", &self.has_active_filters)
            .field("has_active_sorting", &self.has_active_sorting)
            .field("has_active_items", &self.has_active_items)
            .field("columns", &self.columns.len())
            .finish_non_exhaustive()
    }
}

/// What the engine renders its consumer with.
pub enum Children<'a, R> {
    /// Called with the render bag.
    RenderProp(Box<dyn FnOnce(&RenderBag) -> R + 'a>),
    /// Rendered unchanged; the consumer reads the data elsewhere.
    Static(R),
}

impl<'a, R> Children<'a, R> {
    pub fn render_prop<F>(f: F) -> Self
    where
        F: FnOnce(&RenderBag) -> R + 'a,
    {
        Children::RenderProp(Box::new(f))
    }
}

/// Engine output: the optional count and summary strip around the
/// consumer's own output.
#[derive(Debug)]
pub struct Rendered<R> {
    pub top_count: Option<CountIndicator>,
    pub summary: Option<FilterSummary>,
    pub content: R,
    pub bottom_count: Option<CountIndicator>,
    pub class_name: String,
    pub compact: bool,
}

/// Filtering, sorting and summary engine over an in-memory collection.
///
/// # Example
///
/// ```ignore
/// let engine = DataFilter::new(rows, columns);
/// engine.set_filter("status", "completed");
/// engine.set_sort(SortSpec::desc("createdAt"));
///
/// let rendered = engine.render(Children::render_prop(|bag| bag.filtered_data.len()));
/// ```
pub struct DataFilter {
    data: Arc<Vec<Row>>,
    columns: Columns,
    config: EngineConfig,
    store: Arc<StateStore>,
    cache: DerivationCache,
}

impl DataFilter {
    /// Mount the engine on a collection with empty filter and sort state.
    pub fn new(rows: Vec<Row>, columns: impl Into<Columns>) -> Self {
        Self {
            data: Arc::new(rows),
            columns: columns.into(),
            config: EngineConfig::default(),
            store: Arc::new(StateStore::new()),
            cache: DerivationCache::new(),
        }
    }

    /// Mount the engine on untyped data. Anything but an array is reported
    /// and treated as empty.
    pub fn from_json(data: Value, columns: impl Into<Columns>) -> Self {
        Self::new(rows_from_json(data), columns)
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Replace the raw collection. Filter and sort state are kept.
    pub fn set_data(&mut self, rows: Vec<Row>) {
        self.data = Arc::new(rows);
    }

    pub fn set_data_json(&mut self, data: Value) {
        self.set_data(rows_from_json(data));
    }

    pub fn set_columns(&mut self, columns: impl Into<Columns>) {
        self.columns = columns.into();
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// The shared state store behind the bag callbacks.
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub fn state(&self) -> StateSnapshot {
        self.store.get()
    }

    // --- Mutators ---

    pub fn set_filter(&self, key: impl Into<String>, value: impl Into<String>) {
        self.store.set_filter(key, value);
    }

    pub fn set_sort(&self, sort: SortSpec) {
        self.store.set_sort(sort);
    }

    pub fn clear_all(&self) {
        self.store.clear_all();
    }

    /// Quick-clear for a single summary chip.
    pub fn clear_filter(&self, key: &str) {
        self.store.clear_filter(key);
    }

    pub fn clear_sort(&self) {
        self.store.clear_sort();
    }

    pub fn toggle_sort(&self, field: &str) -> SortSpec {
        self.store.toggle_sort(field)
    }

    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.store.subscribe(config)
    }

    // --- Derived view ---

    pub fn original_data(&self) -> Arc<Vec<Row>> {
        Arc::clone(&self.data)
    }

    /// The filtered-and-sorted collection for the current state.
    pub fn filtered_data(&self) -> Arc<Vec<Row>> {
        self.view().1
    }

    pub fn has_active_filters(&self) -> bool {
        self.store.get().has_active_filters()
    }

    pub fn has_active_sorting(&self) -> bool {
        self.store.get().has_active_sorting()
    }

    pub fn count(&self) -> CountIndicator {
        CountIndicator::new(self.filtered_data().len(), self.data.len())
    }

    pub fn should_show_count(&self) -> bool {
        let (state, derived) = self.view();
        self.show_count_for(&state, &derived)
    }

    /// Summary strip for the current state, if it is visible.
    pub fn summary(&self) -> Option<FilterSummary> {
        FilterSummary::build(
            &self.columns,
            &self.store.get(),
            self.config.always_visible,
            self.config.compact,
        )
    }

    /// Distinct values of a column, for populating select options.
    pub fn distinct_values(&self, key: &str) -> Vec<String> {
        self.columns
            .find(key)
            .map(|column| derive::distinct_values(&self.data, column))
            .unwrap_or_default()
    }

    /// Cache statistics: (hits, recomputations).
    pub fn cache_stats(&self) -> (u64, u64) {
        (self.cache.hits(), self.cache.misses())
    }

    // --- Composition boundary ---

    /// Build the render bag for the current state.
    pub fn bag(&self) -> RenderBag {
        let (state, derived) = self.view();
        self.bag_for(state, derived)
    }

    /// Hand the render bag to `consumer` and return what it produces.
    pub fn with_derived_view<R, F>(&self, consumer: F) -> R
    where
        F: FnOnce(&RenderBag) -> R,
    {
        consumer(&self.bag())
    }

    /// Render the count, the summary strip and the consumer.
    pub fn render<R>(&self, children: Children<'_, R>) -> Rendered<R> {
        let (state, derived) = self.view();

        let count = self
            .show_count_for(&state, &derived)
            .then(|| CountIndicator::new(derived.len(), self.data.len()));
        let position = self.config.count_position;
        let summary = FilterSummary::build(
            &self.columns,
            &state,
            self.config.always_visible,
            self.config.compact,
        );

        let content = match children {
            Children::RenderProp(render) => render(&self.bag_for(state, derived)),
            Children::Static(node) => node,
        };

        Rendered {
            top_count: count.filter(|_| position.shows_top()),
            summary,
            content,
            bottom_count: count.filter(|_| position.shows_bottom()),
            class_name: self.config.class_name.clone(),
            compact: self.config.compact,
        }
    }

    /// One consistent read of the state with its derived collection.
    fn view(&self) -> (StateSnapshot, Arc<Vec<Row>>) {
        let state = self.store.get();
        let key = DerivationKey::new(Arc::clone(&self.data), self.columns.clone(), state.revision);
        let derived = self.cache.get_or_derive(key, |rows, columns| {
            derive::derive(rows, columns, &state.filters, &state.sort)
        });
        (state, derived)
    }

    fn show_count_for(&self, state: &StateSnapshot, derived: &[Row]) -> bool {
        should_show_count(
            self.config.show_count,
            state.has_active_filters(),
            state.has_active_sorting(),
            derived.len(),
            self.data.len(),
        )
    }

    fn bag_for(&self, state: StateSnapshot, derived: Arc<Vec<Row>>) -> RenderBag {
        let has_active_filters = state.has_active_filters();
        let has_active_sorting = state.has_active_sorting();

        let store = Arc::clone(&self.store);
        let on_filter_change: FilterChangeFn =
            Arc::new(move |key: &str, value: &str| store.set_filter(key, value));
        let store = Arc::clone(&self.store);
        let on_sort_change: SortChangeFn = Arc::new(move |sort: SortSpec| store.set_sort(sort));
        let store = Arc::clone(&self.store);
        let on_clear_all: ClearAllFn = Arc::new(move || store.clear_all());

        RenderBag {
            filtered_data: derived,
            original_data: Arc::clone(&self.data),
            filters: state.filters,
            sorting: state.sort,
            on_filter_change,
            on_sort_change,
            on_clear_all,
            has_active_filters,
            has_active_sorting,
            has_active_items: has_active_filters || has_active_sorting,
            columns: self.columns.clone(),
        }
    }
}

/// Accept an array as rows. `null` means no data; anything else is a
/// caller mistake that is logged and treated as empty.
fn rows_from_json(data: Value) -> Vec<Row> {
    match data {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(
                kind = json_kind(&other),
                "data filter expected an array of rows; treating input as empty"
            );
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::ColumnDescriptor;
    use crate::presentation::{CountPosition, ShowCount};
    use serde_json::json;

    fn people() -> DataFilter {
        DataFilter::new(
            vec![
                json!({"name": "Alice", "role": "admin"}),
                json!({"name": "bob", "role": "viewer"}),
                json!({"name": "Carol", "role": "admin"}),
            ],
            vec![
                ColumnDescriptor::text("name", "Name").sortable(),
                ColumnDescriptor::select("role", "Role", ["admin", "viewer"]),
            ],
        )
    }

    #[test]
    fn test_initial_bag() {
        let engine = people();
        let bag = engine.bag();

        assert_eq!(bag.filtered_data.len(), 3);
        assert_eq!(bag.filtered_data, bag.original_data);
        assert!(!Arc::ptr_eq(&bag.filtered_data, &bag.original_data));
        assert!(!bag.has_active_filters);
        assert!(!bag.has_active_sorting);
        assert!(!bag.has_active_items);
        assert_eq!(bag.columns.len(), 2);
        assert!(!engine.should_show_count());
    }

    #[test]
    fn test_callbacks_write_through() {
        let engine = people();
        let bag = engine.bag();

        (bag.on_filter_change)("role", "admin");
        (bag.on_sort_change)(SortSpec::desc("name"));

        let bag = engine.bag();
        let names: Vec<&str> = bag
            .filtered_data
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Carol", "Alice"]);
        assert!(bag.has_active_items);

        (bag.on_clear_all)();
        assert_eq!(engine.filtered_data().len(), 3);
        assert!(!engine.bag().has_active_items);
    }

    #[test]
    fn test_static_children_still_derive() {
        let engine = people().with_config(EngineConfig::default().show_count(ShowCount::Always));
        engine.set_filter("name", "o");

        let rendered = engine.render(Children::Static("table"));
        assert_eq!(rendered.content, "table");
        assert_eq!(rendered.top_count, Some(CountIndicator::new(2, 3)));
        assert_eq!(engine.filtered_data().len(), 2);
    }

    #[test]
    fn test_count_position() {
        let engine = people().with_config(
            EngineConfig::default()
                .show_count(ShowCount::Always)
                .count_position(CountPosition::Both),
        );
        let rendered = engine.render(Children::render_prop(|bag| bag.filtered_data.len()));
        assert_eq!(rendered.content, 3);
        assert_eq!(rendered.top_count, rendered.bottom_count);
        assert!(rendered.top_count.is_some());

        let engine = people().with_config(
            EngineConfig::default()
                .show_count(ShowCount::Always)
                .count_position(CountPosition::Bottom),
        );
        let rendered = engine.render(Children::Static(()));
        assert!(rendered.top_count.is_none());
        assert_eq!(rendered.bottom_count, Some(CountIndicator::new(3, 3)));
    }

    #[test]
    fn test_reentrant_mutation_applies_next_render() {
        let engine = people();

        let first = engine.render(Children::render_prop(|bag| {
            (bag.on_filter_change)("name", "carol");
            bag.filtered_data.len()
        }));
        assert_eq!(first.content, 3);

        let second = engine.render(Children::render_prop(|bag| bag.filtered_data.len()));
        assert_eq!(second.content, 1);
        assert!(second.summary.is_some());
    }

    #[test]
    fn test_memoized_between_renders() {
        let engine = people();
        let a = engine.filtered_data();
        let b = engine.filtered_data();
        assert!(Arc::ptr_eq(&a, &b));

        engine.set_filter("name", "a");
        let c = engine.filtered_data();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(engine.cache_stats(), (1, 2));
    }

    #[test]
    fn test_set_data_keeps_state() {
        let mut engine = people();
        engine.set_filter("role", "viewer");
        engine.set_data(vec![json!({"name": "Dan", "role": "viewer"}), json!({"role": "admin"})]);

        assert_eq!(engine.filtered_data().len(), 1);
        assert_eq!(engine.count(), CountIndicator::new(1, 2));
    }

    #[test]
    fn test_non_array_data_is_empty() {
        let engine = DataFilter::from_json(json!({"rows": []}), Columns::default());
        assert!(engine.original_data().is_empty());
        assert!(engine.filtered_data().is_empty());

        let engine = DataFilter::from_json(Value::Null, Columns::default());
        assert!(engine.original_data().is_empty());
    }

    #[test]
    fn test_distinct_values() {
        let engine = people();
        assert_eq!(engine.distinct_values("role"), vec!["admin", "viewer"]);
        assert!(engine.distinct_values("missing").is_empty());
    }
}
