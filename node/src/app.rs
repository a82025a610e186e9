//! # Application Wiring
//!
//! Builds the ledger the binary drives: one sled database, the bank with
//! the file-hash module account registered, and the file-hash module. Every
//! state change goes through [`Ledger::apply`], so a rejected message never
//! reaches disk.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::Path;

use doctorium_filehash::keys::MODULE_NAME;
use doctorium_filehash::{
    FileHashError, FileHashModule, Msg, MsgResponse, Params, Query, QueryResponse,
    MODULE_ACCOUNT_PERMISSIONS,
};
use doctorium_protocol::bank::Bank;
use doctorium_protocol::host::Ledger;
use doctorium_protocol::identity::AccAddress;
use doctorium_protocol::storage::LedgerDb;
use doctorium_protocol::RegisteredError;

/// Outcome of one delivered message, in the shape operators expect from a
/// transaction result. `code == 0` means success.
#[derive(Debug, Clone, Serialize)]
pub struct TxResult {
    pub height: u64,
    pub code: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub codespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<MsgResponse>,
}

impl TxResult {
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// Bank with every module account the application runs.
pub fn bank() -> Bank {
    Bank::new().with_module_account(MODULE_NAME, MODULE_ACCOUNT_PERMISSIONS)
}

pub struct App {
    db: LedgerDb,
    ledger: Ledger<LedgerDb>,
    filehash: FileHashModule<Bank>,
}

impl App {
    /// Opens (or creates) the ledger under `home`.
    pub fn open(home: &Path) -> Result<Self> {
        let data_dir = home.join("data");
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory: {}", data_dir.display()))?;
        let db = LedgerDb::open(&data_dir)
            .with_context(|| format!("failed to open database at {}", data_dir.display()))?;
        tracing::debug!(path = %data_dir.display(), "database opened");
        Ok(Self::with_db(db))
    }

    /// Wraps an already open database.
    pub fn with_db(db: LedgerDb) -> Self {
        Self {
            ledger: Ledger::new(db.clone()),
            db,
            filehash: FileHashModule::new(Params::default(), bank()),
        }
    }

    pub fn chain_id(&self) -> Result<Option<String>> {
        Ok(self.db.chain_id()?)
    }

    pub fn height(&self) -> Result<u64> {
        Ok(self.db.latest_height()?.unwrap_or(0))
    }

    /// Loads the module genesis and marks the ledger initialized at height 0.
    pub fn init_chain(&self, chain_id: &str, genesis_json: &[u8]) -> Result<usize> {
        if let Some(existing) = self.chain_id()? {
            bail!("ledger already initialized for chain {existing}");
        }

        let loaded = self
            .ledger
            .apply("init_genesis", |cache| {
                self.filehash.init_genesis(cache, genesis_json)
            })
            .context("genesis rejected")?;
        self.db.set_chain_id(chain_id)?;
        self.db.set_latest_height(0)?;
        self.db.flush()?;

        tracing::info!(chain_id, files = loaded, "chain initialized");
        Ok(loaded)
    }

    /// Applies one message as its own block. Module rejections are reported
    /// in the result; only host failures are errors.
    pub fn deliver(&self, msg: &Msg) -> Result<TxResult> {
        let Some(chain_id) = self.chain_id()? else {
            bail!("ledger is not initialized; run `doctoriumd init` first");
        };

        let outcome = self
            .ledger
            .apply("deliver", |cache| self.filehash.handle_msg(cache, msg));

        match outcome {
            Ok(response) => {
                let height = self.height()? + 1;
                self.db.set_latest_height(height)?;
                self.db.flush()?;
                tracing::info!(chain_id = %chain_id, height, "message committed");
                Ok(TxResult {
                    height,
                    code: 0,
                    codespace: String::new(),
                    log: String::new(),
                    response: Some(response),
                })
            }
            Err(err) => {
                let info = err.to_info();
                tracing::warn!(
                    codespace = %info.codespace,
                    code = info.code,
                    error = %info.log,
                    "message rejected"
                );
                Ok(TxResult {
                    height: self.height()?,
                    code: info.code,
                    codespace: info.codespace,
                    log: info.log,
                    response: None,
                })
            }
        }
    }

    /// Answers a module query against committed state.
    pub fn query(&self, query: &Query) -> Result<QueryResponse, FileHashError> {
        self.ledger
            .query(|store| self.filehash.handle_query(store, query))
    }

    pub fn balance(&self, address: &AccAddress, denom: &str) -> Result<u64> {
        let bank = self.filehash.keeper().ledger();
        Ok(self.ledger.query(|store| bank.balance(store, address, denom))?)
    }

    /// The registry as a pretty-printed genesis document.
    pub fn export(&self) -> Result<Vec<u8>> {
        Ok(self
            .ledger
            .query(|store| self.filehash.export_genesis(store))?)
    }
}
