//! Subscription manager for broadcasting state events.

use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::types::{
    DropReason, StateEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId,
};

/// Internal subscription state.
struct Subscription {
    config: SubscriptionConfig,
    sender: Sender<StateEvent>,
}

impl Subscription {
    /// Try to send an event. Returns the drop reason if the subscriber
    /// can no longer receive.
    fn try_send(&self, event: StateEvent) -> Option<DropReason> {
        match self.sender.try_send(event) {
            Ok(()) => None,
            Err(TrySendError::Full(_)) => Some(DropReason::BufferOverflow),
            Err(TrySendError::Disconnected(_)) => Some(DropReason::Disconnected),
        }
    }

    /// Check if this subscription wants an event.
    fn wants(&self, event: &StateEvent) -> bool {
        let filter = &self.config.filter;
        match event {
            StateEvent::FilterChanged { key, .. } | StateEvent::FilterCleared { key, .. } => {
                if !filter.include_filters {
                    return false;
                }
                match filter.keys {
                    Some(ref keys) => keys.iter().any(|k| k == key),
                    None => true,
                }
            }
            StateEvent::SortChanged { .. } => filter.include_sort,
            StateEvent::Cleared { .. } => filter.include_clears,
            StateEvent::Snapshot { .. } | StateEvent::Dropped { .. } => true,
        }
    }
}

/// Manages subscriptions and broadcasts events.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size.max(1));

        self.subscriptions
            .write()
            .insert(id, Subscription { config, sender });

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscriptions.write();
        if let Some(sub) = subs.remove(&id) {
            // Best effort
            let _ = sub.sender.try_send(StateEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Send an event directly to one subscription.
    /// Returns false if the subscription was dropped.
    pub fn send_to(&self, id: SubscriptionId, event: StateEvent) -> bool {
        let reason = {
            let subs = self.subscriptions.read();
            match subs.get(&id) {
                Some(sub) => sub.try_send(event),
                None => return false,
            }
        };

        match reason {
            None => true,
            Some(reason) => {
                self.drop_subscriptions(vec![(id, reason)]);
                false
            }
        }
    }

    /// Broadcast an event to every interested subscription. Subscribers
    /// that fail to receive are dropped.
    pub fn broadcast(&self, event: StateEvent) {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if sub.wants(&event) {
                    if let Some(reason) = sub.try_send(event.clone()) {
                        to_remove.push((*id, reason));
                    }
                }
            }
        }

        if !to_remove.is_empty() {
            self.drop_subscriptions(to_remove);
        }
    }

    fn drop_subscriptions(&self, dropped: Vec<(SubscriptionId, DropReason)>) {
        let mut subs = self.subscriptions.write();
        for (id, reason) in dropped {
            if let Some(sub) = subs.remove(&id) {
                tracing::debug!(subscription = id.0, ?reason, "dropping subscriber");
                // Might fail, that's ok
                let _ = sub.sender.try_send(StateEvent::Dropped { reason });
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriptions::SubscriptionFilter;
    use std::time::Duration;

    fn filter_event(key: &str, revision: u64) -> StateEvent {
        StateEvent::FilterChanged {
            key: key.to_string(),
            value: "x".to_string(),
            revision,
        }
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let manager = SubscriptionManager::new();

        let handle = manager.subscribe(SubscriptionConfig::default());
        assert_eq!(manager.subscription_count(), 1);

        manager.unsubscribe(handle.id);
        assert_eq!(manager.subscription_count(), 0);

        let event = handle.recv_timeout(Duration::from_millis(100)).unwrap();
        assert_eq!(
            event,
            StateEvent::Dropped {
                reason: DropReason::Unsubscribed
            }
        );
    }

    #[test]
    fn test_broadcast_to_matching_keys() {
        let manager = SubscriptionManager::new();
        let config = SubscriptionConfig {
            filter: SubscriptionFilter::keys(vec!["status".to_string()]),
            ..Default::default()
        };
        let handle = manager.subscribe(config);

        manager.broadcast(filter_event("name", 1));
        manager.broadcast(filter_event("status", 2));
        manager.broadcast(StateEvent::Cleared { revision: 3 });

        let events = handle.drain();
        assert_eq!(events, vec![filter_event("status", 2)]);
    }

    #[test]
    fn test_sort_only_subscription() {
        let manager = SubscriptionManager::new();
        let handle = manager.subscribe(SubscriptionConfig {
            filter: SubscriptionFilter::sort(),
            ..Default::default()
        });

        manager.broadcast(filter_event("name", 1));
        manager.broadcast(StateEvent::SortChanged {
            sort: crate::types::SortSpec::asc("name"),
            revision: 2,
        });

        let events = handle.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], StateEvent::SortChanged { revision: 2, .. }));
    }

    #[test]
    fn test_drop_slow_subscriber() {
        let manager = SubscriptionManager::new();
        let _handle = manager.subscribe(SubscriptionConfig {
            buffer_size: 2,
            ..Default::default()
        });

        for i in 0..10 {
            manager.broadcast(filter_event("name", i));
        }

        assert_eq!(manager.subscription_count(), 0);
    }

    #[test]
    fn test_drop_disconnected_subscriber() {
        let manager = SubscriptionManager::new();
        let handle = manager.subscribe(SubscriptionConfig::default());
        drop(handle);

        manager.broadcast(filter_event("name", 1));
        assert_eq!(manager.subscription_count(), 0);
    }

    #[test]
    fn test_send_to_unknown() {
        let manager = SubscriptionManager::new();
        assert!(!manager.send_to(SubscriptionId(42), StateEvent::Cleared { revision: 0 }));
    }
}
