//! # Protocol Configuration & Constants
//!
//! Every host-wide constant lives here. Module-specific constants (store
//! prefixes, reward amounts) live with their module; this file only holds
//! what every module on the ledger has to agree on.
//!
//! Changing any of these after the chain has produced state means a state
//! migration, so treat them as frozen once a network is live.

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Bech32 human-readable prefix for account addresses.
///
/// The chain never overrode the SDK default, so existing addresses carry the
/// `cosmos` prefix and we keep it for compatibility with exported state.
pub const ACCOUNT_HRP: &str = "cosmos";

/// Length of a regular account address payload (truncated SHA-256).
pub const ADDRESS_LENGTH: usize = 20;

/// Length of a long-form address payload (full 32-byte digest).
pub const LONG_ADDRESS_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Page size used when a request leaves `limit` at zero.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Hard ceiling on page size. Larger requests are clamped, not rejected.
pub const MAX_PAGE_LIMIT: u64 = 1_000;

/// Version tag prefixed to every pagination cursor. Bump it if the cursor
/// layout ever changes so stale tokens fail loudly instead of silently
/// scanning from the wrong place.
pub const CURSOR_VERSION: u8 = 0x01;

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Name of the sled tree that holds consensus state for every module.
pub const STATE_TREE: &str = "state";

/// Name of the sled tree that holds host bookkeeping (not consensus state).
pub const METADATA_TREE: &str = "metadata";

/// Separator between a module's store key and the keys it writes.
pub const STORE_KEY_SEPARATOR: u8 = b'/';

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Normalizes a requested page size: zero means "use the default", anything
/// above [`MAX_PAGE_LIMIT`] is clamped.
pub fn normalize_page_limit(limit: u64) -> u64 {
    match limit {
        0 => DEFAULT_PAGE_LIMIT,
        l if l > MAX_PAGE_LIMIT => MAX_PAGE_LIMIT,
        l => l,
    }
}

/// Builds the namespace prefix (`<store_key>/`) a module's keys live under.
pub fn store_prefix(store_key: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(store_key.len() + 1);
    prefix.extend_from_slice(store_key.as_bytes());
    prefix.push(STORE_KEY_SEPARATOR);
    prefix
}
