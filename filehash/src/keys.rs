//! Module identifiers, store layout and reward parameters.

use doctorium_protocol::config::store_prefix;

/// Name of the module; also the name of its module account.
pub const MODULE_NAME: &str = "filehash";

/// Namespace of the module inside the shared state store.
pub const STORE_KEY: &str = MODULE_NAME;

/// Route messages are dispatched on.
pub const ROUTER_KEY: &str = MODULE_NAME;

/// Route queries are dispatched on.
pub const QUERIER_ROUTE: &str = MODULE_NAME;

/// Registered type name of [`MsgUploadFile`](crate::types::MsgUploadFile).
pub const TYPE_URL: &str = "doctorium/filehash/MsgUploadFile";

/// Prefix of registry entries inside the module namespace.
pub const FILE_KEY_PREFIX: &[u8] = &[0x01];

/// Denomination of the upload reward.
pub const REWARD_DENOM: &str = "drt";

/// Units of [`REWARD_DENOM`] paid per successful registration.
pub const REWARD_AMOUNT: u64 = 10;

/// Full prefix of registry entries in the shared store:
/// `filehash/ ‖ 0x01`. Below it, the key is the raw bytes of the hash.
pub fn registry_prefix() -> Vec<u8> {
    let mut prefix = store_prefix(STORE_KEY);
    prefix.extend_from_slice(FILE_KEY_PREFIX);
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_prefix_layout() {
        assert_eq!(registry_prefix(), b"filehash/\x01".to_vec());
    }

    #[test]
    fn routes_share_module_name() {
        assert_eq!(STORE_KEY, MODULE_NAME);
        assert_eq!(ROUTER_KEY, MODULE_NAME);
        assert_eq!(QUERIER_ROUTE, MODULE_NAME);
        assert!(TYPE_URL.ends_with("MsgUploadFile"));
    }
}
