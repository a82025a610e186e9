//! Prefix-scoped view over a parent store.
//!
//! Each module owns a namespace inside the shared state store. A
//! [`PrefixStore`] prepends the namespace on the way in and strips it on the
//! way out, so a module can neither see nor clobber another module's keys.

use super::kv::{KvPair, KvStore, ReadStore, StoreResult};

/// A store that transparently prefixes every key.
#[derive(Debug)]
pub struct PrefixStore<S> {
    inner: S,
    prefix: Vec<u8>,
}

impl<S> PrefixStore<S> {
    pub fn new(inner: S, prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    fn full_key(&self, key: &[u8]) -> Vec<u8> {
        let mut full = Vec::with_capacity(self.prefix.len() + key.len());
        full.extend_from_slice(&self.prefix);
        full.extend_from_slice(key);
        full
    }
}

impl<S: ReadStore> ReadStore for PrefixStore<S> {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get(&self.full_key(key))
    }

    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        self.inner.has(&self.full_key(key))
    }

    fn scan_from(&self, start: &[u8], limit: usize) -> StoreResult<Vec<KvPair>> {
        // Keys sharing the prefix are contiguous in byte order, so the first
        // key outside the namespace ends the scan.
        let entries = self.inner.scan_from(&self.full_key(start), limit)?;
        Ok(entries
            .into_iter()
            .take_while(|(k, _)| k.starts_with(&self.prefix))
            .map(|(k, v)| (k[self.prefix.len()..].to_vec(), v))
            .collect())
    }
}

impl<S: KvStore> KvStore for PrefixStore<S> {
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let full = self.full_key(key);
        self.inner.set(&full, value)
    }
}
