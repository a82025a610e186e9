//! Errors returned by the file-hash module.
//!
//! Codes 1–4 are registered in the `filehash` codespace and never change.
//! Reward failures keep the bank's own codespace and code so callers see
//! the root cause.

use thiserror::Error;

use doctorium_protocol::bank::BankError;
use doctorium_protocol::error::RegisteredError;
use doctorium_protocol::identity::AddressError;
use doctorium_protocol::storage::StoreError;

use crate::keys::MODULE_NAME;

pub const CODE_FILE_ALREADY_EXISTS: u32 = 1;
pub const CODE_INVALID_ADDRESS: u32 = 2;
pub const CODE_EMPTY_HASH: u32 = 3;
pub const CODE_INVALID_PAGINATION_TOKEN: u32 = 4;

// ---------------------------------------------------------------------------
// FileHashError
// ---------------------------------------------------------------------------

/// Failure of a registration or a listing.
#[derive(Debug, Error)]
pub enum FileHashError {
    /// The hash is already registered. The current owner is deliberately
    /// not part of the error.
    #[error("file already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("empty file hash")]
    EmptyHash,

    #[error("invalid pagination token: {0}")]
    InvalidPaginationToken(String),

    #[error("reward mint failed: {0}")]
    Mint(#[source] BankError),

    #[error("reward transfer failed: {0}")]
    Transfer(#[source] BankError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FileHashError {
    pub(crate) fn invalid_address(address: &str, source: AddressError) -> Self {
        FileHashError::InvalidAddress {
            address: address.to_string(),
            source,
        }
    }
}

impl RegisteredError for FileHashError {
    fn codespace(&self) -> &'static str {
        match self {
            FileHashError::Mint(inner) | FileHashError::Transfer(inner) => inner.codespace(),
            FileHashError::Store(inner) => inner.codespace(),
            _ => MODULE_NAME,
        }
    }

    fn code(&self) -> u32 {
        match self {
            FileHashError::AlreadyExists(_) => CODE_FILE_ALREADY_EXISTS,
            FileHashError::InvalidAddress { .. } => CODE_INVALID_ADDRESS,
            FileHashError::EmptyHash => CODE_EMPTY_HASH,
            FileHashError::InvalidPaginationToken(_) => CODE_INVALID_PAGINATION_TOKEN,
            FileHashError::Mint(inner) | FileHashError::Transfer(inner) => inner.code(),
            FileHashError::Store(inner) => inner.code(),
        }
    }
}

// ---------------------------------------------------------------------------
// GenesisError
// ---------------------------------------------------------------------------

/// Rejection of a genesis snapshot.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("duplicate file hash in genesis: {0}")]
    DuplicateHash(String),

    #[error("invalid genesis record #{index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: FileHashError,
    },

    #[error("file hash {0} is already present in the store")]
    AlreadyInStore(String),

    #[error("malformed genesis json: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the registry failed.
    #[error(transparent)]
    Registry(#[from] FileHashError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
