//! Change notifications for filter and sort state.
//!
//! Every mutation of the [`StateStore`](crate::state::StateStore) is
//! broadcast to subscribers as a [`StateEvent`]:
//! - Filter entries set or cleared
//! - Sort descriptor replaced
//! - Clear-all resets
//!
//! Subscriptions support:
//! - Filtering by event kind and column key
//! - An initial snapshot of the current state
//! - Bounded buffers with slow-subscriber dropping
//!
//! # Example
//!
//! ```ignore
//! let store = StateStore::new();
//! let handle = store.subscribe(SubscriptionConfig {
//!     filter: SubscriptionFilter::keys(vec!["status".to_string()]),
//!     ..Default::default()
//! });
//!
//! store.set_filter("status", "completed");
//!
//! for event in handle.drain() {
//!     println!("{:?}", event);
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, StateEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
