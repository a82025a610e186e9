//! # Keeper — Registry Access and Registration
//!
//! The keeper owns the module's slice of state (`filehash/0x01 ‖ hash →
//! creator`) and the reward policy. It never holds a store: every call is
//! handed the store of the transition (or query) it runs in.
//!
//! ## Registration
//!
//! ```text
//! validate ─► exists? ─► branch ─┬─ mint reward into module pool
//!                                ├─ send reward to creator
//!                                └─ write hash → creator
//!                                      │
//!                         all ok ─► flush branch ─► Receipt
//!                         any err ─► drop branch (store unchanged)
//! ```
//!
//! Reward issuance runs before the registry write and all three steps share
//! one write cache, so a failed mint or transfer leaves neither a record nor
//! minted supply behind.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use doctorium_protocol::bank::{Coins, TokenLedger};
use doctorium_protocol::storage::{CacheStore, KvStore, PrefixStore, ReadStore, StoreError};

use crate::errors::FileHashError;
use crate::keys::{registry_prefix, MODULE_NAME, REWARD_AMOUNT, REWARD_DENOM};
use crate::types::{FileRecord, MsgUploadFile, MsgUploadFileResponse};

// ---------------------------------------------------------------------------
// Params
// ---------------------------------------------------------------------------

/// Module parameters fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Paid to the creator of every successful registration.
    pub reward: Coins,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            reward: Coins::single(REWARD_DENOM, REWARD_AMOUNT).expect("static reward is valid"),
        }
    }
}

// ---------------------------------------------------------------------------
// Keeper
// ---------------------------------------------------------------------------

/// Registry access and the registration state machine, generic over the
/// token ledger capability it pays rewards through.
#[derive(Debug, Clone)]
pub struct Keeper<L> {
    ledger: L,
    params: Params,
}

/// View of the registry inside `store`, keyed by raw hash bytes.
pub(crate) fn registry<S: ReadStore>(store: S) -> PrefixStore<S> {
    PrefixStore::new(store, registry_prefix())
}

/// Decodes a raw registry entry.
pub(crate) fn decode_record(key: Vec<u8>, value: Vec<u8>) -> Result<FileRecord, StoreError> {
    let file_hash = String::from_utf8(key)
        .map_err(|e| StoreError::corrupt(e.as_bytes(), "file hash is not utf-8"))?;
    let creator = String::from_utf8(value)
        .map_err(|_| StoreError::corrupt(file_hash.as_bytes(), "creator is not utf-8"))?;
    Ok(FileRecord { creator, file_hash })
}

impl<L> Keeper<L> {
    pub fn new(ledger: L, params: Params) -> Self {
        Self { ledger, params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Whether `file_hash` is registered.
    pub fn has_file<S: ReadStore + ?Sized>(
        &self,
        store: &S,
        file_hash: &str,
    ) -> Result<bool, FileHashError> {
        Ok(registry(store).has(file_hash.as_bytes())?)
    }

    /// The record registered under `file_hash`, if any.
    pub fn get_file<S: ReadStore + ?Sized>(
        &self,
        store: &S,
        file_hash: &str,
    ) -> Result<Option<FileRecord>, FileHashError> {
        let found = registry(store).get(file_hash.as_bytes())?;
        debug!(file_hash, found = found.is_some(), "registry lookup");
        match found {
            Some(creator) => Ok(Some(decode_record(file_hash.as_bytes().to_vec(), creator)?)),
            None => Ok(None),
        }
    }

    /// Writes `record` unconditionally. Callers check uniqueness first.
    pub(crate) fn set_file<S: KvStore + ?Sized>(
        &self,
        store: &mut S,
        record: &FileRecord,
    ) -> Result<(), FileHashError> {
        registry(store).set(record.file_hash.as_bytes(), record.creator.as_bytes())?;
        Ok(())
    }
}

impl<L: TokenLedger> Keeper<L> {
    /// Registers `msg.file_hash` for `msg.creator` and pays the reward.
    ///
    /// # Errors
    ///
    /// - [`FileHashError::EmptyHash`] / [`FileHashError::InvalidAddress`] on
    ///   malformed input, before anything is read.
    /// - [`FileHashError::AlreadyExists`] if the hash is registered.
    /// - [`FileHashError::Mint`] / [`FileHashError::Transfer`] if the token
    ///   ledger refuses the reward.
    ///
    /// On every error `store` is left exactly as it was.
    pub fn upload_file<S: KvStore + ?Sized>(
        &self,
        store: &mut S,
        msg: &MsgUploadFile,
    ) -> Result<MsgUploadFileResponse, FileHashError> {
        msg.validate_basic()?;
        let creator = msg.creator_address()?;

        if self.has_file(&*store, &msg.file_hash)? {
            warn!(file_hash = %msg.file_hash, "rejected duplicate registration");
            return Err(FileHashError::AlreadyExists(msg.file_hash.clone()));
        }

        let writes = {
            let mut branch = CacheStore::new(&*store);
            self.ledger
                .mint_coins(&mut branch, MODULE_NAME, &self.params.reward)
                .map_err(FileHashError::Mint)?;
            self.ledger
                .send_coins_from_module_to_account(
                    &mut branch,
                    MODULE_NAME,
                    &creator,
                    &self.params.reward,
                )
                .map_err(FileHashError::Transfer)?;
            let record = FileRecord::new(msg.creator.as_str(), msg.file_hash.as_str());
            self.set_file(&mut branch, &record)?;
            branch.into_writes()
        };
        store.apply_batch(writes)?;

        info!(
            file_hash = %msg.file_hash,
            creator = %msg.creator,
            reward = %self.params.reward,
            "file registered"
        );
        Ok(MsgUploadFileResponse { success: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctorium_protocol::bank::{Bank, Permission};
    use doctorium_protocol::identity::AccAddress;
    use doctorium_protocol::storage::MemStore;

    fn keeper() -> Keeper<Bank> {
        let bank = Bank::new()
            .with_module_account(MODULE_NAME, [Permission::Minter, Permission::Burner]);
        Keeper::new(bank, Params::default())
    }

    fn creator() -> AccAddress {
        AccAddress::from_bytes(vec![9u8; 20]).unwrap()
    }

    #[test]
    fn default_reward_is_ten_drt() {
        assert_eq!(Params::default().reward.to_string(), "10drt");
    }

    #[test]
    fn upload_then_lookup() {
        let keeper = keeper();
        let mut store = MemStore::new();
        let msg = MsgUploadFile::new(creator().to_bech32(), "deadbeef");

        assert!(!keeper.has_file(&store, "deadbeef").unwrap());
        let receipt = keeper.upload_file(&mut store, &msg).unwrap();
        assert!(receipt.success);

        assert!(keeper.has_file(&store, "deadbeef").unwrap());
        let record = keeper.get_file(&store, "deadbeef").unwrap().unwrap();
        assert_eq!(record.creator, msg.creator);
        assert_eq!(keeper.ledger().balance(&store, &creator(), "drt").unwrap(), 10);
    }

    #[test]
    fn registry_entry_layout() {
        let keeper = keeper();
        let mut store = MemStore::new();
        let msg = MsgUploadFile::new(creator().to_bech32(), "aa");
        keeper.upload_file(&mut store, &msg).unwrap();

        let value = store.get(b"filehash/\x01aa").unwrap().unwrap();
        assert_eq!(value, msg.creator.as_bytes());
    }

    #[test]
    fn unknown_hash_is_none() {
        let keeper = keeper();
        let store = MemStore::new();
        assert!(keeper.get_file(&store, "nope").unwrap().is_none());
    }

    #[test]
    fn corrupt_creator_surfaces_as_store_error() {
        let keeper = keeper();
        let mut store = MemStore::new();
        store.set(b"filehash/\x01aa", &[0xff, 0xfe]).unwrap();
        let err = keeper.get_file(&store, "aa").unwrap_err();
        assert!(matches!(
            err,
            FileHashError::Store(StoreError::Corrupt { .. })
        ));
    }
}
