//! # LedgerDb — Persistent Storage Engine
//!
//! The on-disk store for the Doctorium host, built on sled's embedded
//! key-value store.
//!
//! ## Tree Layout
//!
//! | Tree       | Key                          | Value                 |
//! |------------|------------------------------|-----------------------|
//! | `state`    | `<store_key>/<module key>`   | module-defined bytes  |
//! | `metadata` | key (UTF-8)                  | value (bytes)         |
//!
//! All consensus state shares the `state` tree; modules are isolated by
//! their store-key prefix (see [`PrefixStore`](super::PrefixStore)). sled
//! orders keys lexicographically by bytes, which is exactly the order the
//! pagination layer relies on.
//!
//! ## Atomicity
//!
//! A committed transition arrives as one [`WriteBatch`] and is applied with
//! a single sled `Batch`: either every write lands or none does.

use sled::{Batch, Db, Tree};
use std::path::Path;

use super::kv::{KvPair, KvStore, ReadStore, StoreError, StoreResult, WriteBatch};
use crate::config::{METADATA_TREE, STATE_TREE};

// ---------------------------------------------------------------------------
// Metadata Keys
// ---------------------------------------------------------------------------

/// Height of the last committed transition.
const META_LATEST_HEIGHT: &[u8] = b"latest_height";

/// Chain identifier recorded when genesis was loaded.
const META_CHAIN_ID: &[u8] = b"chain_id";

// ---------------------------------------------------------------------------
// LedgerDb
// ---------------------------------------------------------------------------

/// Persistent storage engine for the Doctorium ledger host.
///
/// Cloning is cheap: sled handles are reference counted and every clone
/// sees the same data.
#[derive(Debug, Clone)]
pub struct LedgerDb {
    db: Db,
    /// Consensus state for every module.
    state: Tree,
    /// Host bookkeeping: chain id, latest height.
    metadata: Tree,
}

impl LedgerDb {
    /// Open or create a database at the given filesystem path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Create a temporary database that is removed when the last handle is
    /// dropped. Ideal for tests.
    pub fn open_temporary() -> StoreResult<Self> {
        let config = sled::Config::new().temporary(true);
        let db = config.open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> StoreResult<Self> {
        let state = db.open_tree(STATE_TREE)?;
        let metadata = db.open_tree(METADATA_TREE)?;
        Ok(Self {
            db,
            state,
            metadata,
        })
    }

    // -- Metadata -----------------------------------------------------------

    /// The chain id recorded at genesis, or `None` if genesis never ran.
    pub fn chain_id(&self) -> StoreResult<Option<String>> {
        match self.metadata.get(META_CHAIN_ID)? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|e| StoreError::corrupt(META_CHAIN_ID, e.to_string())),
            None => Ok(None),
        }
    }

    /// Records the chain id. Called once, right after genesis is committed.
    pub fn set_chain_id(&self, chain_id: &str) -> StoreResult<()> {
        self.metadata.insert(META_CHAIN_ID, chain_id.as_bytes())?;
        Ok(())
    }

    /// Height of the last committed transition, or `None` before genesis.
    pub fn latest_height(&self) -> StoreResult<Option<u64>> {
        match self.metadata.get(META_LATEST_HEIGHT)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes
                    .as_ref()
                    .try_into()
                    .map_err(|_| StoreError::corrupt(META_LATEST_HEIGHT, "invalid height bytes"))?;
                Ok(Some(u64::from_be_bytes(raw)))
            }
            None => Ok(None),
        }
    }

    pub fn set_latest_height(&self, height: u64) -> StoreResult<()> {
        self.metadata
            .insert(META_LATEST_HEIGHT, height.to_be_bytes().to_vec())?;
        Ok(())
    }

    // -- Utility ------------------------------------------------------------

    /// Number of keys in the state tree, across all modules.
    pub fn state_len(&self) -> usize {
        self.state.len()
    }

    /// Block until every pending write is durable.
    pub fn flush(&self) -> StoreResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl ReadStore for LedgerDb {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.state.get(key)?.map(|v| v.to_vec()))
    }

    fn has(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.state.contains_key(key)?)
    }

    fn scan_from(&self, start: &[u8], limit: usize) -> StoreResult<Vec<KvPair>> {
        let mut entries = Vec::new();
        for result in self.state.range(start..).take(limit) {
            let (key, value) = result?;
            entries.push((key.to_vec(), value.to_vec()));
        }
        Ok(entries)
    }
}

impl KvStore for LedgerDb {
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.state.insert(key, value)?;
        Ok(())
    }

    fn apply_batch(&mut self, writes: WriteBatch) -> StoreResult<()> {
        if writes.is_empty() {
            return Ok(());
        }
        let mut batch = Batch::default();
        for (key, value) in writes {
            batch.insert(key, value);
        }
        self.state.apply_batch(batch)?;
        self.db.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
