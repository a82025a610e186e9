//! Integration tests for file registration.
//!
//! These drive the module the way the host does: through the transition
//! runner, against a real bank, with token ledgers that fail part-way to
//! check that a rejected registration leaves no trace.

use doctorium_filehash::keys::{MODULE_NAME, REWARD_DENOM};
use doctorium_filehash::{
    FileHashError, FileHashModule, Msg, MsgUploadFile, Params, QueryFileListRequest,
    MODULE_ACCOUNT_PERMISSIONS,
};
use doctorium_protocol::bank::{Bank, BankError, Coins, Permission, TokenLedger};
use doctorium_protocol::error::RegisteredError;
use doctorium_protocol::host::{run_transition, Ledger};
use doctorium_protocol::identity::AccAddress;
use doctorium_protocol::storage::{KvStore, LedgerDb, MemStore, ReadStore};

/// Helper: a bank with the module account registered.
fn bank() -> Bank {
    Bank::new().with_module_account(MODULE_NAME, MODULE_ACCOUNT_PERMISSIONS)
}

fn module() -> FileHashModule<Bank> {
    FileHashModule::new(Params::default(), bank())
}

/// Helper: a well-formed uploader address.
fn uploader(seed: u8) -> AccAddress {
    AccAddress::from_bytes(vec![seed; 20]).unwrap()
}

fn upload(creator: &AccAddress, file_hash: &str) -> Msg {
    Msg::UploadFile(MsgUploadFile::new(creator.to_bech32(), file_hash))
}

fn registry_len<S: ReadStore>(module: &FileHashModule<Bank>, store: &S) -> usize {
    module
        .keeper()
        .file_list(store, &QueryFileListRequest::default())
        .unwrap()
        .files
        .len()
}

// ---------------------------------------------------------------------------
// Ledgers that fail part-way
// ---------------------------------------------------------------------------

/// Writes into the bank namespace, then refuses to mint.
struct BrokenMint;

impl TokenLedger for BrokenMint {
    fn mint_coins(
        &self,
        store: &mut dyn KvStore,
        module: &str,
        _amount: &Coins,
    ) -> Result<(), BankError> {
        store.set(b"bank/half-written", b"1")?;
        Err(BankError::Unauthorized {
            module: module.to_string(),
            permission: Permission::Minter,
        })
    }

    fn send_coins_from_module_to_account(
        &self,
        _store: &mut dyn KvStore,
        _module: &str,
        _recipient: &AccAddress,
        _amount: &Coins,
    ) -> Result<(), BankError> {
        unreachable!("mint fails first")
    }
}

/// Mints for real, then fails the payout after touching the recipient.
struct BrokenTransfer(Bank);

impl TokenLedger for BrokenTransfer {
    fn mint_coins(
        &self,
        store: &mut dyn KvStore,
        module: &str,
        amount: &Coins,
    ) -> Result<(), BankError> {
        self.0.mint_coins(store, module, amount)
    }

    fn send_coins_from_module_to_account(
        &self,
        store: &mut dyn KvStore,
        _module: &str,
        recipient: &AccAddress,
        amount: &Coins,
    ) -> Result<(), BankError> {
        store.set(recipient.as_bytes(), b"partial")?;
        Err(BankError::InsufficientFunds {
            address: recipient.to_string(),
            denom: REWARD_DENOM.to_string(),
            available: 0,
            requested: amount.amount_of(REWARD_DENOM),
        })
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn first_upload_succeeds_and_pays_reward() {
    let module = module();
    let mut store = MemStore::new();
    let alice = uploader(1);

    let resp = module.handle_msg(&mut store, &upload(&alice, "deadbeef")).unwrap();
    assert_eq!(
        resp,
        doctorium_filehash::MsgResponse::UploadFile(doctorium_filehash::MsgUploadFileResponse {
            success: true
        })
    );

    assert_eq!(registry_len(&module, &store), 1);
    let bank = module.keeper().ledger();
    assert_eq!(bank.balance(&store, &alice, "drt").unwrap(), 10);
    assert_eq!(bank.supply(&store, "drt").unwrap(), 10);
    assert_eq!(
        bank.balance(&store, &AccAddress::for_module(MODULE_NAME), "drt")
            .unwrap(),
        0
    );
}

#[test]
fn duplicate_upload_rejected_and_nothing_changes() {
    let module = module();
    let mut store = MemStore::new();
    let alice = uploader(1);
    let bob = uploader(2);

    module.handle_msg(&mut store, &upload(&alice, "deadbeef")).unwrap();
    let before = store.clone();

    let err = module
        .handle_msg(&mut store, &upload(&bob, "deadbeef"))
        .unwrap_err();
    assert!(matches!(err, FileHashError::AlreadyExists(ref h) if h == "deadbeef"));
    assert_eq!((err.codespace(), err.code()), ("filehash", 1));

    assert_eq!(store, before);
    assert_eq!(registry_len(&module, &store), 1);
    assert_eq!(module.keeper().ledger().balance(&store, &bob, "drt").unwrap(), 0);
    let owner = module.keeper().get_file(&store, "deadbeef").unwrap().unwrap();
    assert_eq!(owner.creator, alice.to_bech32());
}

#[test]
fn empty_hash_rejected() {
    let module = module();
    let mut store = MemStore::new();

    let err = module.handle_msg(&mut store, &upload(&uploader(1), "")).unwrap_err();
    assert!(matches!(err, FileHashError::EmptyHash));
    assert_eq!(err.code(), 3);
    assert!(store.is_empty());
}

#[test]
fn malformed_creator_rejected() {
    let module = module();
    let mut store = MemStore::new();
    let msg = MsgUploadFile::new("addr1", "deadbeef");

    let err = module.keeper().upload_file(&mut store, &msg).unwrap_err();
    assert!(matches!(err, FileHashError::InvalidAddress { .. }));
    assert_eq!(err.code(), 2);
    assert!(store.is_empty());
}

#[test]
fn many_uploads_keep_hashes_unique() {
    let module = module();
    let mut store = MemStore::new();
    let hashes = ["aa", "bb", "aa", "cc", "bb", "dd"];

    let mut accepted = 0;
    for (i, hash) in hashes.iter().enumerate() {
        let creator = uploader(i as u8 + 1);
        if module.handle_msg(&mut store, &upload(&creator, hash)).is_ok() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 4);
    assert_eq!(registry_len(&module, &store), 4);
    assert_eq!(module.keeper().ledger().supply(&store, "drt").unwrap(), 40);
}

// ---------------------------------------------------------------------------
// Atomicity
// ---------------------------------------------------------------------------

#[test]
fn failed_mint_leaves_store_untouched() {
    let module = FileHashModule::new(Params::default(), BrokenMint);
    let mut store = MemStore::new();

    let err = module
        .handle_msg(&mut store, &upload(&uploader(1), "deadbeef"))
        .unwrap_err();
    assert!(matches!(err, FileHashError::Mint(_)));
    assert_eq!((err.codespace(), err.code()), ("sdk", 4));
    assert!(store.is_empty());
    assert!(!module.keeper().has_file(&store, "deadbeef").unwrap());
}

#[test]
fn failed_transfer_rolls_back_mint_and_record() {
    let module = FileHashModule::new(Params::default(), BrokenTransfer(bank()));
    let mut store = MemStore::new();

    let err = module
        .handle_msg(&mut store, &upload(&uploader(1), "deadbeef"))
        .unwrap_err();
    assert!(matches!(err, FileHashError::Transfer(_)));
    assert_eq!(err.code(), 5);

    assert!(store.is_empty(), "no supply, balance or record may survive");
    assert!(!module.keeper().has_file(&store, "deadbeef").unwrap());
}

#[test]
fn rejected_upload_inside_transition_does_not_disturb_earlier_state() {
    let module = FileHashModule::new(Params::default(), BrokenTransfer(bank()));
    let mut store = MemStore::new();
    store.set(b"other/key", b"value").unwrap();
    let before = store.clone();

    let result = run_transition(&mut store, "upload", |cache| {
        module.handle_msg(cache, &upload(&uploader(1), "deadbeef"))
    });
    assert!(result.is_err());
    assert_eq!(store, before);
}

// ---------------------------------------------------------------------------
// Against the host ledger and sled
// ---------------------------------------------------------------------------

#[test]
fn uploads_through_ledger_persist_in_sled() {
    let dir = tempfile::tempdir().expect("tempdir");
    let module = module();
    let alice = uploader(7);

    {
        let ledger = Ledger::new(LedgerDb::open(dir.path()).unwrap());
        ledger
            .apply("upload", |cache| module.handle_msg(cache, &upload(&alice, "cafe")))
            .unwrap();
        let err = ledger
            .apply("upload", |cache| module.handle_msg(cache, &upload(&alice, "cafe")))
            .unwrap_err();
        assert!(matches!(err, FileHashError::AlreadyExists(_)));
    }

    let db = LedgerDb::open(dir.path()).unwrap();
    let record = module.keeper().get_file(&db, "cafe").unwrap().unwrap();
    assert_eq!(record.creator, alice.to_bech32());
    assert_eq!(module.keeper().ledger().balance(&db, &alice, "drt").unwrap(), 10);
}
