//! One-entry memo for the derived collection.

use crate::columns::Columns;
use crate::types::Row;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identity of the four derivation inputs. Data and schema compare by
/// allocation; filter and sort state compare by store revision.
#[derive(Clone, Debug)]
pub struct DerivationKey {
    data: Arc<Vec<Row>>,
    columns: Columns,
    revision: u64,
}

impl DerivationKey {
    pub fn new(data: Arc<Vec<Row>>, columns: Columns, revision: u64) -> Self {
        Self {
            data,
            columns,
            revision,
        }
    }

    fn same_inputs(&self, other: &DerivationKey) -> bool {
        self.revision == other.revision
            && Arc::ptr_eq(&self.data, &other.data)
            && self.columns.ptr_eq(&other.columns)
    }
}

/// Caches the last derived collection and recomputes only when an input
/// changed identity.
pub struct DerivationCache {
    entry: Mutex<Option<(DerivationKey, Arc<Vec<Row>>)>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DerivationCache {
    pub fn new() -> Self {
        Self {
            entry: Mutex::new(None),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached result for `key`, or run `derive` and cache it.
    ///
    /// The lock is not held while deriving.
    pub fn get_or_derive<F>(&self, key: DerivationKey, derive: F) -> Arc<Vec<Row>>
    where
        F: FnOnce(&[Row], &Columns) -> Vec<Row>,
    {
        if let Some((cached_key, rows)) = self.entry.lock().as_ref() {
            if cached_key.same_inputs(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(revision = key.revision, "derived view cache hit");
                return Arc::clone(rows);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let derived = Arc::new(derive(key.data.as_slice(), &key.columns));
        tracing::debug!(
            revision = key.revision,
            input = key.data.len(),
            output = derived.len(),
            "recomputed derived view"
        );

        *self.entry.lock() = Some((key, Arc::clone(&derived)));
        derived
    }

    /// Drop the cached entry.
    pub fn invalidate(&self) {
        *self.entry.lock() = None;
    }

    /// Number of lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of recomputations.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl Default for DerivationCache {
    fn default() -> Self {
        Self::new()
    }
}
