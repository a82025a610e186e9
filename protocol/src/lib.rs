// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Doctorium Protocol — Host Primitives
//!
//! Everything a state-machine module needs from the ledger host, and
//! nothing it doesn't: byte-keyed stores with commit-or-discard branches,
//! bech32 account addresses, registered error codes, and a token ledger
//! that modules reach through a narrow capability.
//!
//! ## Architecture
//!
//! - **config** — Host-wide constants: address format, pagination bounds,
//!   store layout.
//! - **error** — `(codespace, code)` registration for errors that leave a
//!   module.
//! - **identity** — Bech32 account addresses and module account derivation.
//! - **storage** — Store traits, prefix namespaces, write caches, sled
//!   persistence.
//! - **bank** — Coins, supply, balances, and the `TokenLedger` capability.
//! - **host** — Transition runner: branch, execute, commit on success.
//!
//! ## Determinism
//!
//! Everything reachable from a state transition is deterministic: ordered
//! maps only, no clocks, no randomness, integer arithmetic with explicit
//! overflow checks.

pub mod bank;
pub mod config;
pub mod error;
pub mod host;
pub mod identity;
pub mod storage;

pub use error::{ErrorInfo, RegisteredError};
