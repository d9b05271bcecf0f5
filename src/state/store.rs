//! Observable filter and sort state.

use crate::subscriptions::{
    StateEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
use crate::types::{FilterState, SortDirection, SortSpec};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Point-in-time copy of the store.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub filters: FilterState,
    pub sort: SortSpec,
    /// Bumped on every mutation.
    pub revision: u64,
}

impl StateSnapshot {
    /// At least one filter entry has a non-blank value.
    pub fn has_active_filters(&self) -> bool {
        self.filters.has_active()
    }

    /// Sort has both a field and a direction.
    pub fn has_active_sorting(&self) -> bool {
        self.sort.is_active()
    }
}

/// Holds filter state and sort state, and notifies subscribers of changes.
///
/// Mutations never fail and never validate keys against a schema. Events are
/// broadcast after the state lock is released, so a subscriber may mutate the
/// store again in response.
pub struct StateStore {
    state: RwLock<StateSnapshot>,
    subscriptions: SubscriptionManager,
}

impl StateStore {
    /// Create a store with no filters and no sort.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StateSnapshot::default()),
            subscriptions: SubscriptionManager::new(),
        }
    }

    /// Current state.
    pub fn get(&self) -> StateSnapshot {
        self.state.read().clone()
    }

    pub fn filters(&self) -> FilterState {
        self.state.read().filters.clone()
    }

    pub fn sort(&self) -> SortSpec {
        self.state.read().sort.clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    /// Insert or replace the filter entry for `key`.
    pub fn set_filter(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        let event = self.mutate(|state, revision| {
            state.filters.set(key.clone(), value.clone());
            StateEvent::FilterChanged {
                key,
                value,
                revision,
            }
        });
        self.subscriptions.broadcast(event);
    }

    /// Remove the filter entry for `key`.
    pub fn clear_filter(&self, key: &str) {
        let event = self.mutate(|state, revision| {
            state.filters.remove(key);
            StateEvent::FilterCleared {
                key: key.to_string(),
                revision,
            }
        });
        self.subscriptions.broadcast(event);
    }

    /// Replace the whole sort descriptor.
    pub fn set_sort(&self, sort: SortSpec) {
        let event = self.mutate(|state, revision| {
            state.sort = sort.clone();
            StateEvent::SortChanged { sort, revision }
        });
        self.subscriptions.broadcast(event);
    }

    /// Reset the sort descriptor to unsorted.
    pub fn clear_sort(&self) {
        self.set_sort(SortSpec::unsorted());
    }

    /// Cycle `field` through asc, desc and unsorted. Switching to a
    /// different field starts at asc.
    pub fn toggle_sort(&self, field: &str) -> SortSpec {
        let event = self.mutate(|state, revision| {
            let direction = if state.sort.field == field {
                state.sort.direction.cycle()
            } else {
                SortDirection::Asc
            };
            state.sort = match direction {
                SortDirection::None => SortSpec::unsorted(),
                direction => SortSpec::new(field, direction),
            };
            StateEvent::SortChanged {
                sort: state.sort.clone(),
                revision,
            }
        });
        let sort = match &event {
            StateEvent::SortChanged { sort, .. } => sort.clone(),
            _ => SortSpec::unsorted(),
        };
        self.subscriptions.broadcast(event);
        sort
    }

    /// Reset filters to empty and sort to unsorted in one update.
    pub fn clear_all(&self) {
        let event = self.mutate(|state, revision| {
            state.filters.clear();
            state.sort = SortSpec::unsorted();
            StateEvent::Cleared { revision }
        });
        self.subscriptions.broadcast(event);
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let emit_snapshot = config.emit_snapshot;
        let handle = self.subscriptions.subscribe(config);
        if emit_snapshot {
            let snapshot = self.get();
            self.subscriptions.send_to(
                handle.id,
                StateEvent::Snapshot {
                    filters: snapshot.filters,
                    sort: snapshot.sort,
                    revision: snapshot.revision,
                },
            );
        }
        handle
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.subscription_count()
    }

    /// Apply `f` under the write lock with the next revision and return the
    /// event it produced.
    fn mutate<F>(&self, f: F) -> StateEvent
    where
        F: FnOnce(&mut StateSnapshot, u64) -> StateEvent,
    {
        let mut state = self.state.write();
        state.revision += 1;
        let revision = state.revision;
        f(&mut *state, revision)
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
