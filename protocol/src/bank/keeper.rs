//! # Store-backed Bank
//!
//! Tracks per-denomination supply and per-account balances inside the
//! `bank/` namespace of the state store, and implements [`TokenLedger`] for
//! the modules that hold a module account.
//!
//! ## Key Layout (inside `bank/`)
//!
//! | Key                                        | Value          |
//! |--------------------------------------------|----------------|
//! | `0x00 ‖ denom`                             | supply, u64 BE |
//! | `0x02 ‖ len(addr) ‖ addr ‖ denom`          | balance, u64 BE|
//!
//! Every operation reads and checks everything it needs before its first
//! write, so a rejected call never leaves half an update behind even when
//! it runs directly against a committed store.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::coin::{CoinError, Coins};
use super::TokenLedger;
use crate::config::store_prefix;
use crate::error::{RegisteredError, CODE_INTERNAL, ROOT_CODESPACE};
use crate::identity::AccAddress;
use crate::storage::{KvStore, PrefixStore, ReadStore, StoreError};

/// Store key of the bank's namespace.
pub const BANK_STORE_KEY: &str = "bank";

const SUPPLY_PREFIX: u8 = 0x00;
const BALANCE_PREFIX: u8 = 0x02;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by bank operations. Registered in the root codespace.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("module account {module} lacks {permission:?} permission")]
    Unauthorized {
        module: String,
        permission: Permission,
    },

    #[error("{address} is not allowed to receive funds")]
    BlockedRecipient { address: String },

    #[error("module account {0} does not exist")]
    UnknownModule(String),

    #[error("insufficient funds: {address} holds {available}{denom}, needs {requested}{denom}")]
    InsufficientFunds {
        address: String,
        denom: String,
        available: u64,
        requested: u64,
    },

    #[error("invalid coins: {0}")]
    InvalidCoins(#[from] CoinError),

    #[error("amount overflow for {denom}")]
    Overflow { denom: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegisteredError for BankError {
    fn codespace(&self) -> &'static str {
        ROOT_CODESPACE
    }

    fn code(&self) -> u32 {
        match self {
            BankError::Unauthorized { .. } | BankError::BlockedRecipient { .. } => 4,
            BankError::InsufficientFunds { .. } => 5,
            BankError::UnknownModule(_) => 9,
            BankError::InvalidCoins(_) => 10,
            BankError::Overflow { .. } | BankError::Store(_) => CODE_INTERNAL,
        }
    }
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

/// What a module account may do with the token supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    Minter,
    Burner,
}

// ---------------------------------------------------------------------------
// Bank
// ---------------------------------------------------------------------------

/// Supply and balance bookkeeping, configured with the module accounts the
/// host registered at startup.
#[derive(Debug, Clone, Default)]
pub struct Bank {
    permissions: BTreeMap<String, BTreeSet<Permission>>,
    blocked: BTreeSet<AccAddress>,
}

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module account with its permissions. Module accounts
    /// cannot receive funds from other modules.
    pub fn with_module_account(
        mut self,
        module: impl Into<String>,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        let module = module.into();
        self.blocked.insert(AccAddress::for_module(&module));
        self.permissions
            .insert(module, permissions.into_iter().collect());
        self
    }

    pub fn has_permission(&self, module: &str, permission: Permission) -> bool {
        self.permissions
            .get(module)
            .is_some_and(|perms| perms.contains(&permission))
    }

    pub fn is_blocked(&self, address: &AccAddress) -> bool {
        self.blocked.contains(address)
    }

    /// Balance of `address` in `denom`; zero if never credited.
    pub fn balance<S: ReadStore + ?Sized>(
        &self,
        store: &S,
        address: &AccAddress,
        denom: &str,
    ) -> Result<u64, BankError> {
        let bank = PrefixStore::new(store, store_prefix(BANK_STORE_KEY));
        read_amount(&bank, &balance_key(address, denom))
    }

    /// Total minted supply of `denom`.
    pub fn supply<S: ReadStore + ?Sized>(&self, store: &S, denom: &str) -> Result<u64, BankError> {
        let bank = PrefixStore::new(store, store_prefix(BANK_STORE_KEY));
        read_amount(&bank, &supply_key(denom))
    }

    fn module_address(&self, module: &str) -> Result<AccAddress, BankError> {
        if self.permissions.contains_key(module) {
            Ok(AccAddress::for_module(module))
        } else {
            Err(BankError::UnknownModule(module.to_string()))
        }
    }
}

impl TokenLedger for Bank {
    fn mint_coins(
        &self,
        store: &mut dyn KvStore,
        module: &str,
        amount: &Coins,
    ) -> Result<(), BankError> {
        let pool = self.module_address(module)?;
        if !self.has_permission(module, Permission::Minter) {
            return Err(BankError::Unauthorized {
                module: module.to_string(),
                permission: Permission::Minter,
            });
        }

        let mut bank = PrefixStore::new(store, store_prefix(BANK_STORE_KEY));
        let mut writes = Vec::new();
        for coin in amount.iter() {
            let supply_key = supply_key(&coin.denom);
            let pool_key = balance_key(&pool, &coin.denom);
            let supply = checked_credit(&bank, &supply_key, coin.amount, &coin.denom)?;
            let balance = checked_credit(&bank, &pool_key, coin.amount, &coin.denom)?;
            writes.push((supply_key, supply));
            writes.push((pool_key, balance));
        }
        for (key, value) in writes {
            bank.set(&key, &value.to_be_bytes())?;
        }

        debug!(module, amount = %amount, "minted coins");
        Ok(())
    }

    fn send_coins_from_module_to_account(
        &self,
        store: &mut dyn KvStore,
        module: &str,
        recipient: &AccAddress,
        amount: &Coins,
    ) -> Result<(), BankError> {
        let pool = self.module_address(module)?;
        if self.is_blocked(recipient) {
            return Err(BankError::BlockedRecipient {
                address: recipient.to_string(),
            });
        }

        let mut bank = PrefixStore::new(store, store_prefix(BANK_STORE_KEY));
        let mut writes = Vec::new();
        for coin in amount.iter() {
            let from_key = balance_key(&pool, &coin.denom);
            let to_key = balance_key(recipient, &coin.denom);

            let available = read_amount(&bank, &from_key)?;
            let remaining =
                available
                    .checked_sub(coin.amount)
                    .ok_or_else(|| BankError::InsufficientFunds {
                        address: pool.to_string(),
                        denom: coin.denom.clone(),
                        available,
                        requested: coin.amount,
                    })?;
            let credited = checked_credit(&bank, &to_key, coin.amount, &coin.denom)?;
            writes.push((from_key, remaining));
            writes.push((to_key, credited));
        }
        for (key, value) in writes {
            bank.set(&key, &value.to_be_bytes())?;
        }

        debug!(module, recipient = %recipient, amount = %amount, "sent coins from module");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Key and value encoding
// ---------------------------------------------------------------------------

fn supply_key(denom: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + denom.len());
    key.push(SUPPLY_PREFIX);
    key.extend_from_slice(denom.as_bytes());
    key
}

fn balance_key(address: &AccAddress, denom: &str) -> Vec<u8> {
    let addr = address.as_bytes();
    let mut key = Vec::with_capacity(2 + addr.len() + denom.len());
    key.push(BALANCE_PREFIX);
    // Address length is 20 or 32, always fits a byte.
    key.push(addr.len() as u8);
    key.extend_from_slice(addr);
    key.extend_from_slice(denom.as_bytes());
    key
}

fn read_amount<S: ReadStore>(store: &S, key: &[u8]) -> Result<u64, BankError> {
    match store.get(key)? {
        Some(bytes) => {
            let raw: [u8; 8] = bytes
                .as_slice()
                .try_into()
                .map_err(|_| StoreError::corrupt(key, "amount is not 8 bytes"))?;
            Ok(u64::from_be_bytes(raw))
        }
        None => Ok(0),
    }
}

/// Current value under `key` plus `amount`, or [`BankError::Overflow`].
fn checked_credit<S: ReadStore>(
    store: &S,
    key: &[u8],
    amount: u64,
    denom: &str,
) -> Result<u64, BankError> {
    read_amount(store, key)?
        .checked_add(amount)
        .ok_or_else(|| BankError::Overflow {
            denom: denom.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
