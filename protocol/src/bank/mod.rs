//! # Bank Module
//!
//! Token supply and account balances.
//!
//! Modules never touch balances directly. They receive a [`TokenLedger`]
//! capability and ask it to mint into their own module pool or to pay out
//! of it; the ledger enforces permissions and bookkeeping. [`Bank`] is the
//! store-backed implementation the host wires in.
//!
//! Both capability calls take the transition's store explicitly, so every
//! balance and supply write lands in the same write cache as the caller's
//! own state and rolls back with it.

pub mod coin;
pub mod keeper;

pub use coin::{Coin, CoinError, Coins};
pub use keeper::{Bank, BankError, Permission};

use crate::identity::AccAddress;
use crate::storage::KvStore;

/// Capability a module uses to issue and pay out tokens.
pub trait TokenLedger {
    /// Creates `amount` new tokens in the pool of module account `module`.
    fn mint_coins(
        &self,
        store: &mut dyn KvStore,
        module: &str,
        amount: &Coins,
    ) -> Result<(), BankError>;

    /// Moves `amount` from the pool of module account `module` to
    /// `recipient`.
    fn send_coins_from_module_to_account(
        &self,
        store: &mut dyn KvStore,
        module: &str,
        recipient: &AccAddress,
        amount: &Coins,
    ) -> Result<(), BankError>;
}

impl<T: TokenLedger + ?Sized> TokenLedger for &T {
    fn mint_coins(
        &self,
        store: &mut dyn KvStore,
        module: &str,
        amount: &Coins,
    ) -> Result<(), BankError> {
        (**self).mint_coins(store, module, amount)
    }

    fn send_coins_from_module_to_account(
        &self,
        store: &mut dyn KvStore,
        module: &str,
        recipient: &AccAddress,
        amount: &Coins,
    ) -> Result<(), BankError> {
        (**self).send_coins_from_module_to_account(store, module, recipient, amount)
    }
}
