//! End-to-end tests for the host primitives.
//!
//! These compose the store stack the way a running host does: a sled-backed
//! ledger, transitions through write caches, and the bank paying out of a
//! module pool. Each test opens its own temporary database.

use std::thread;

use doctorium_protocol::bank::{Bank, BankError, Coins, Permission, TokenLedger};
use doctorium_protocol::host::Ledger;
use doctorium_protocol::identity::AccAddress;
use doctorium_protocol::storage::{KvStore, LedgerDb, PrefixStore, ReadStore, StoreError};
use doctorium_protocol::RegisteredError;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn bank() -> Bank {
    Bank::new().with_module_account("rewards", [Permission::Minter])
}

fn account(seed: u8) -> AccAddress {
    AccAddress::from_bytes(vec![seed; 20]).expect("20-byte payload")
}

fn coins(amount: u64) -> Coins {
    Coins::single("drt", amount).expect("valid coins")
}

/// Mints `amount` into the pool and pays it to `to`, as one transition.
fn pay(
    ledger: &Ledger<LedgerDb>,
    bank: &Bank,
    to: &AccAddress,
    amount: u64,
) -> Result<(), BankError> {
    ledger.apply("pay", |cache| {
        bank.mint_coins(cache, "rewards", &coins(amount))?;
        bank.send_coins_from_module_to_account(cache, "rewards", to, &coins(amount))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn committed_transitions_reach_sled() {
    let db = LedgerDb::open_temporary().expect("temp db");
    let ledger = Ledger::new(db.clone());
    let bank = bank();

    pay(&ledger, &bank, &account(1), 10).unwrap();
    pay(&ledger, &bank, &account(2), 5).unwrap();

    assert_eq!(bank.balance(&db, &account(1), "drt").unwrap(), 10);
    assert_eq!(bank.balance(&db, &account(2), "drt").unwrap(), 5);
    assert_eq!(bank.supply(&db, "drt").unwrap(), 15);
}

#[test]
fn rejected_transition_writes_nothing() {
    let db = LedgerDb::open_temporary().expect("temp db");
    let ledger = Ledger::new(db.clone());
    let bank = bank();

    // Minting succeeds inside the branch; paying a module account does not.
    let err = pay(&ledger, &bank, &AccAddress::for_module("rewards"), 10).unwrap_err();
    assert!(matches!(err, BankError::BlockedRecipient { .. }));
    assert_eq!(err.code(), 4);
    assert_eq!(db.state_len(), 0);
    assert_eq!(bank.supply(&db, "drt").unwrap(), 0);
}

#[test]
fn modules_are_isolated_by_prefix() {
    let db = LedgerDb::open_temporary().expect("temp db");
    let ledger = Ledger::new(db.clone());

    ledger
        .apply("two-modules", |cache| -> Result<(), StoreError> {
            PrefixStore::new(&mut *cache, b"alpha/".to_vec()).set(b"k", b"a")?;
            PrefixStore::new(&mut *cache, b"beta/".to_vec()).set(b"k", b"b")?;
            Ok(())
        })
        .unwrap();

    let alpha = PrefixStore::new(&db, b"alpha/".to_vec());
    let beta = PrefixStore::new(&db, b"beta/".to_vec());
    assert_eq!(alpha.get(b"k").unwrap(), Some(b"a".to_vec()));
    assert_eq!(beta.get(b"k").unwrap(), Some(b"b".to_vec()));
    assert_eq!(alpha.scan_from(b"", 10).unwrap().len(), 1);
}

#[test]
fn concurrent_payouts_are_serialized() {
    let db = LedgerDb::open_temporary().expect("temp db");
    let ledger = Ledger::new(db.clone());
    let bank = bank();

    let handles: Vec<_> = (1..=8u8)
        .map(|seed| {
            let ledger = ledger.clone();
            let bank = bank.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    pay(&ledger, &bank, &account(seed), 1).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("payout thread panicked");
    }

    assert_eq!(bank.supply(&db, "drt").unwrap(), 80);
    for seed in 1..=8u8 {
        assert_eq!(bank.balance(&db, &account(seed), "drt").unwrap(), 10);
    }
}

#[test]
fn ledger_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bank = bank();
    {
        let db = LedgerDb::open(dir.path()).expect("open db");
        let ledger = Ledger::new(db.clone());
        pay(&ledger, &bank, &account(3), 7).unwrap();
        db.set_latest_height(1).unwrap();
        db.flush().unwrap();
    }

    let db = LedgerDb::open(dir.path()).expect("reopen db");
    assert_eq!(db.latest_height().unwrap(), Some(1));
    assert_eq!(bank.balance(&db, &account(3), "drt").unwrap(), 7);
}
