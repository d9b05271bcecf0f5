//! Subscription types for filter and sort state changes.

use crate::types::{FilterState, SortSpec};
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 256
    pub buffer_size: usize,

    /// Send the current state as the first event.
    pub emit_snapshot: bool,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 256,
            emit_snapshot: false,
            filter: SubscriptionFilter::all(),
        }
    }
}

/// Filter criteria for subscriptions.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Only filter events for these column keys (None = all keys).
    pub keys: Option<Vec<String>>,

    /// Include filter value changes.
    pub include_filters: bool,

    /// Include sort changes.
    pub include_sort: bool,

    /// Include clear-all resets.
    pub include_clears: bool,
}

impl SubscriptionFilter {
    /// Filter changes on any column.
    pub fn filters() -> Self {
        Self {
            include_filters: true,
            ..Default::default()
        }
    }

    /// Filter changes on specific columns.
    pub fn keys(keys: Vec<String>) -> Self {
        Self {
            keys: Some(keys),
            include_filters: true,
            ..Default::default()
        }
    }

    /// Sort changes only.
    pub fn sort() -> Self {
        Self {
            include_sort: true,
            ..Default::default()
        }
    }

    /// Everything.
    pub fn all() -> Self {
        Self {
            keys: None,
            include_filters: true,
            include_sort: true,
            include_clears: true,
        }
    }
}

/// Events emitted by subscriptions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateEvent {
    /// A filter entry was set (possibly to a blank value).
    FilterChanged {
        key: String,
        value: String,
        revision: u64,
    },

    /// A filter entry was removed by a quick-clear control.
    FilterCleared { key: String, revision: u64 },

    /// The sort descriptor was replaced.
    SortChanged { sort: SortSpec, revision: u64 },

    /// Filters and sort were reset together.
    Cleared { revision: u64 },

    /// Current state, sent on subscribe when requested.
    Snapshot {
        filters: FilterState,
        sort: SortSpec,
        revision: u64,
    },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

impl StateEvent {
    pub fn revision(&self) -> Option<u64> {
        match self {
            StateEvent::FilterChanged { revision, .. }
            | StateEvent::FilterCleared { revision, .. }
            | StateEvent::SortChanged { revision, .. }
            | StateEvent::Cleared { revision }
            | StateEvent::Snapshot { revision, .. } => Some(*revision),
            StateEvent::Dropped { .. } => None,
        }
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiver was dropped.
    Disconnected,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<StateEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<StateEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StateEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StateEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain every event currently buffered.
    pub fn drain(&self) -> Vec<StateEvent> {
        self.receiver.try_iter().collect()
    }
}
