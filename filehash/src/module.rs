//! # FileHashModule — Host Entry Point
//!
//! The single value the host builds at startup to run this module. It owns
//! the keeper (and through it the token ledger capability and the reward
//! parameters) and dispatches messages, queries and genesis calls. There is
//! no global registration step: constructing the module is the whole setup.

use doctorium_protocol::bank::{Permission, TokenLedger};
use doctorium_protocol::storage::{KvStore, ReadStore};

use crate::errors::{FileHashError, GenesisError};
use crate::genesis::{default_genesis, validate_genesis_json};
use crate::keeper::{Keeper, Params};
use crate::keys::{MODULE_NAME, QUERIER_ROUTE, ROUTER_KEY};
use crate::types::{GenesisState, Msg, MsgResponse, Query, QueryResponse};

/// Permissions the module account needs in the bank.
pub const MODULE_ACCOUNT_PERMISSIONS: [Permission; 2] = [Permission::Minter, Permission::Burner];

#[derive(Debug, Clone)]
pub struct FileHashModule<L> {
    keeper: Keeper<L>,
}

impl<L> FileHashModule<L> {
    pub fn new(params: Params, ledger: L) -> Self {
        Self {
            keeper: Keeper::new(ledger, params),
        }
    }

    pub fn name(&self) -> &'static str {
        MODULE_NAME
    }

    pub fn router_key(&self) -> &'static str {
        ROUTER_KEY
    }

    pub fn querier_route(&self) -> &'static str {
        QUERIER_ROUTE
    }

    pub fn keeper(&self) -> &Keeper<L> {
        &self.keeper
    }

    /// Routes a query to its handler. Queries never write.
    pub fn handle_query<S: ReadStore + ?Sized>(
        &self,
        store: &S,
        query: &Query,
    ) -> Result<QueryResponse, FileHashError> {
        match query {
            Query::FileList(req) => self.keeper.file_list(store, req).map(QueryResponse::FileList),
            Query::GetFile(req) => self.keeper.file(store, req).map(QueryResponse::GetFile),
        }
    }

    pub fn default_genesis(&self) -> GenesisState {
        default_genesis()
    }

    /// Parses and validates a JSON genesis document.
    pub fn validate_genesis(&self, bytes: &[u8]) -> Result<GenesisState, GenesisError> {
        validate_genesis_json(bytes)
    }

    /// Validates and loads a JSON genesis document.
    pub fn init_genesis<S: KvStore + ?Sized>(
        &self,
        store: &mut S,
        bytes: &[u8],
    ) -> Result<usize, GenesisError> {
        let genesis = validate_genesis_json(bytes)?;
        self.keeper.init_genesis(store, &genesis)
    }

    /// Exports the registry as a JSON genesis document.
    pub fn export_genesis<S: ReadStore + ?Sized>(
        &self,
        store: &S,
    ) -> Result<Vec<u8>, GenesisError> {
        let genesis = self.keeper.export_genesis(store)?;
        Ok(serde_json::to_vec_pretty(&genesis)?)
    }
}

impl<L: TokenLedger> FileHashModule<L> {
    /// Routes a message to its handler after stateless validation.
    pub fn handle_msg<S: KvStore + ?Sized>(
        &self,
        store: &mut S,
        msg: &Msg,
    ) -> Result<MsgResponse, FileHashError> {
        match msg {
            Msg::UploadFile(msg) => {
                msg.validate_basic()?;
                self.keeper
                    .upload_file(store, msg)
                    .map(MsgResponse::UploadFile)
            }
        }
    }
}
