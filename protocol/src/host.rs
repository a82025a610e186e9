//! # Transition Host
//!
//! Runs state transitions against a committed store with all-or-nothing
//! semantics.
//!
//! ```text
//!   committed store ──branch──► CacheStore ──f(&mut cache)──► Ok  ─► apply_batch
//!                                                        └──► Err ─► drop (no writes)
//! ```
//!
//! [`run_transition`] is the primitive; [`Ledger`] wraps a store in a
//! shared lock so that transitions run one at a time while queries read
//! committed state concurrently.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::storage::{CacheStore, KvStore, ReadStore, StoreError};

/// Runs `f` against a write cache over `store` and commits the cache only if
/// `f` succeeds. On failure the store is left untouched and `f`'s error is
/// returned.
pub fn run_transition<S, T, E, F>(store: &mut S, label: &str, f: F) -> Result<T, E>
where
    S: KvStore,
    E: From<StoreError>,
    F: FnOnce(&mut CacheStore<'_, S>) -> Result<T, E>,
{
    let (output, writes) = {
        let mut cache = CacheStore::new(&*store);
        match f(&mut cache) {
            Ok(output) => (output, cache.into_writes()),
            Err(err) => {
                warn!(transition = label, discarded = cache.pending(), "transition rolled back");
                return Err(err);
            }
        }
    };

    let count = writes.len();
    store.apply_batch(writes)?;
    debug!(transition = label, writes = count, "transition committed");
    Ok(output)
}

/// A store shared between one writer at a time and any number of readers.
///
/// Cloning is cheap and every clone refers to the same store.
#[derive(Debug, Default)]
pub struct Ledger<S> {
    store: Arc<RwLock<S>>,
}

impl<S> Clone for Ledger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KvStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Runs a transition under the write lock. See [`run_transition`].
    pub fn apply<T, E, F>(&self, label: &str, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut CacheStore<'_, S>) -> Result<T, E>,
    {
        let mut store = self.store.write();
        run_transition(&mut *store, label, f)
    }

    /// Runs a read-only closure against committed state.
    pub fn query<R>(&self, f: impl FnOnce(&S) -> R) -> R
    where
        S: ReadStore,
    {
        let store = self.store.read();
        f(&*store)
    }
}
