//! Byte-keyed store traits and the in-memory reference store.
//!
//! Every store in the workspace (in-memory, sled-backed, prefix views and
//! write caches) speaks the same two traits:
//!
//! - [`ReadStore`] — point `get`/`has` and an ordered scan from a resumable
//!   position.
//! - [`KvStore`] — adds point `set` and batched apply.
//!
//! There is no delete. Scans always return keys in ascending byte order; the
//! pagination layer depends on it.

use std::collections::BTreeMap;
use std::ops::Bound;

use thiserror::Error;

use crate::error::{RegisteredError, CODE_INTERNAL, ROOT_CODESPACE};

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// A stored value could not be decoded into the expected type.
    #[error("corrupt value under key {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

impl StoreError {
    /// Builds a [`StoreError::Corrupt`] for `key`, hex-encoding the key.
    pub fn corrupt(key: &[u8], reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            key: hex::encode(key),
            reason: reason.into(),
        }
    }
}

impl RegisteredError for StoreError {
    fn codespace(&self) -> &'static str {
        ROOT_CODESPACE
    }

    fn code(&self) -> u32 {
        CODE_INTERNAL
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A key/value pair as returned by a scan.
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Pending writes, ordered by key so that applying them is deterministic.
pub type WriteBatch = BTreeMap<Vec<u8>, Vec<u8>>;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Read access to a byte-keyed store.
pub trait ReadStore {
    /// Point lookup.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Point existence check.
    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Returns up to `limit` entries whose key is `>= start`, in ascending
    /// byte order of the key. An empty `start` scans from the beginning.
    fn scan_from(&self, start: &[u8], limit: usize) -> StoreResult<Vec<KvPair>>;
}

/// Read-write access to a byte-keyed store.
pub trait KvStore: ReadStore {
    /// Insert-or-overwrite.
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Applies every write in `batch`. Stores with native batching override
    /// this to make the apply atomic.
    fn apply_batch(&mut self, batch: WriteBatch) -> StoreResult<()> {
        for (key, value) in batch {
            self.set(&key, &value)?;
        }
        Ok(())
    }
}

impl<S: ReadStore + ?Sized> ReadStore for &S {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        (**self).has(key)
    }

    fn scan_from(&self, start: &[u8], limit: usize) -> StoreResult<Vec<KvPair>> {
        (**self).scan_from(start, limit)
    }
}

impl<S: ReadStore + ?Sized> ReadStore for &mut S {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        (**self).has(key)
    }

    fn scan_from(&self, start: &[u8], limit: usize) -> StoreResult<Vec<KvPair>> {
        (**self).scan_from(start, limit)
    }
}

impl<S: KvStore + ?Sized> KvStore for &mut S {
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn apply_batch(&mut self, batch: WriteBatch) -> StoreResult<()> {
        (**self).apply_batch(batch)
    }
}

// ---------------------------------------------------------------------------
// MemStore
// ---------------------------------------------------------------------------

/// In-memory store over a `BTreeMap`. Used by tests and as the backing store
/// of throwaway ledgers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReadStore for MemStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.entries.contains_key(key))
    }

    fn scan_from(&self, start: &[u8], limit: usize) -> StoreResult<Vec<KvPair>> {
        Ok(self
            .entries
            .range::<[u8], _>((Bound::Included(start), Bound::Unbounded))
            .take(limit)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

impl KvStore for MemStore {
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
