//! # Storage Module
//!
//! Byte-keyed state storage for the ledger host.
//!
//! ## Architecture
//!
//! ```text
//! kv.rs     — ReadStore / KvStore traits, StoreError, in-memory MemStore
//! prefix.rs — PrefixStore: per-module namespace over a parent store
//! cache.rs  — CacheStore: write buffer with commit-or-discard semantics
//! db.rs     — LedgerDb: sled persistence, atomic batch apply
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! transition ─► CacheStore ─► PrefixStore("filehash/") ─► module keys
//!                   │
//!                   └─(commit: one WriteBatch)─► LedgerDb / MemStore
//! ```
//!
//! ## Design Decisions
//!
//! 1. **No delete.** Nothing in the ledger removes state, so the traits do
//!    not offer it.
//! 2. **Scans return owned, bounded pages.** `scan_from(start, limit)`
//!    costs O(limit) regardless of how large the store is.
//! 3. **Byte order is the only order.** Every implementation returns keys
//!    ascending by raw bytes.

pub mod cache;
pub mod db;
pub mod kv;
pub mod prefix;

pub use cache::CacheStore;
pub use db::LedgerDb;
pub use kv::{KvPair, KvStore, MemStore, ReadStore, StoreError, StoreResult, WriteBatch};
pub use prefix::PrefixStore;
