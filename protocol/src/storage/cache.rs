//! Write-buffering branch over a parent store.
//!
//! A [`CacheStore`] reads through to its parent and keeps every write in a
//! private, ordered buffer. Nothing reaches the parent until the owner takes
//! the buffer with [`CacheStore::into_writes`] and applies it; dropping the
//! cache discards every buffered write. This is the rollback primitive for
//! state transitions: run the transition against a cache, flush on success,
//! drop on failure.
//!
//! Caches nest. A module can branch the transition's cache again to make a
//! group of steps all-or-nothing inside a larger transition.

use std::cmp::Ordering;
use std::ops::Bound;

use super::kv::{KvPair, KvStore, ReadStore, StoreResult, WriteBatch};

/// Read-through, write-buffering view over `parent`.
#[derive(Debug)]
pub struct CacheStore<'a, S: ?Sized> {
    parent: &'a S,
    writes: WriteBatch,
}

impl<'a, S: ReadStore + ?Sized> CacheStore<'a, S> {
    pub fn new(parent: &'a S) -> Self {
        Self {
            parent,
            writes: WriteBatch::new(),
        }
    }

    /// Number of buffered writes.
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    pub fn is_dirty(&self) -> bool {
        !self.writes.is_empty()
    }

    /// Consumes the cache, yielding the buffered writes in key order.
    pub fn into_writes(self) -> WriteBatch {
        self.writes
    }
}

impl<S: ReadStore + ?Sized> ReadStore for CacheStore<'_, S> {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        match self.writes.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.parent.get(key),
        }
    }

    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        if self.writes.contains_key(key) {
            return Ok(true);
        }
        self.parent.has(key)
    }

    fn scan_from(&self, start: &[u8], limit: usize) -> StoreResult<Vec<KvPair>> {
        // The first `limit` keys of the merged view are always drawn from the
        // first `limit` keys of each side, so bounding both scans is enough.
        let base = self.parent.scan_from(start, limit)?;
        let mut base = base.into_iter().peekable();
        let mut overlay = self
            .writes
            .range::<[u8], _>((Bound::Included(start), Bound::Unbounded))
            .peekable();

        let mut merged = Vec::new();
        while merged.len() < limit {
            let order = match (base.peek(), overlay.peek()) {
                (None, None) => break,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some((bk, _)), Some((ok, _))) => bk.as_slice().cmp(ok.as_slice()),
            };

            match order {
                Ordering::Less => merged.extend(base.next()),
                Ordering::Greater => {
                    merged.extend(overlay.next().map(|(k, v)| (k.clone(), v.clone())))
                }
                Ordering::Equal => {
                    // Buffered write shadows the parent's value.
                    base.next();
                    merged.extend(overlay.next().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        Ok(merged)
    }
}

impl<S: ReadStore + ?Sized> KvStore for CacheStore<'_, S> {
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.writes.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn apply_batch(&mut self, batch: WriteBatch) -> StoreResult<()> {
        self.writes.extend(batch);
        Ok(())
    }
}
