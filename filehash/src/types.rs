//! Wire types: messages, queries, pagination and genesis.

use serde::{Deserialize, Serialize};

use doctorium_protocol::identity::AccAddress;

use crate::errors::FileHashError;
use crate::keys::ROUTER_KEY;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One registry entry: a content hash and the account that registered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub creator: String,
    pub file_hash: String,
}

impl FileRecord {
    pub fn new(creator: impl Into<String>, file_hash: impl Into<String>) -> Self {
        Self {
            creator: creator.into(),
            file_hash: file_hash.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Registers `file_hash` on behalf of `creator`, who is paid the upload
/// reward on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUploadFile {
    pub creator: String,
    pub file_hash: String,
}

impl MsgUploadFile {
    pub fn new(creator: impl Into<String>, file_hash: impl Into<String>) -> Self {
        Self {
            creator: creator.into(),
            file_hash: file_hash.into(),
        }
    }

    pub fn route(&self) -> &'static str {
        ROUTER_KEY
    }

    pub fn msg_type(&self) -> &'static str {
        "UploadFile"
    }

    /// Stateless checks: a non-empty hash and a well-formed bech32 creator.
    pub fn validate_basic(&self) -> Result<(), FileHashError> {
        if self.file_hash.is_empty() {
            return Err(FileHashError::EmptyHash);
        }
        self.creator_address().map(|_| ())
    }

    /// The decoded creator address.
    pub fn creator_address(&self) -> Result<AccAddress, FileHashError> {
        AccAddress::from_bech32(&self.creator)
            .map_err(|e| FileHashError::invalid_address(&self.creator, e))
    }

    /// Accounts that must have signed the message.
    pub fn get_signers(&self) -> Result<Vec<AccAddress>, FileHashError> {
        Ok(vec![self.creator_address()?])
    }

    /// Canonical JSON of the message with keys sorted, as signed by the
    /// creator.
    pub fn get_sign_bytes(&self) -> Vec<u8> {
        // serde_json::Value keeps object keys in a BTreeMap, so going
        // through it sorts them.
        serde_json::to_value(self)
            .and_then(|value| serde_json::to_vec(&value))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUploadFileResponse {
    pub success: bool,
}

/// Every message the module accepts, tagged with its registered type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Msg {
    #[serde(rename = "doctorium/filehash/MsgUploadFile")]
    UploadFile(MsgUploadFile),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MsgResponse {
    UploadFile(MsgUploadFileResponse),
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Page selector. `cursor` is the `next_cursor` of a previous page, or
/// absent for the first page. A zero `limit` selects the default page size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default, with = "opt_hex", skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Vec<u8>>,
    #[serde(default)]
    pub limit: u64,
}

impl PageRequest {
    pub fn first(limit: u64) -> Self {
        Self {
            cursor: None,
            limit,
        }
    }

    pub fn after(cursor: Vec<u8>, limit: u64) -> Self {
        Self {
            cursor: Some(cursor),
            limit,
        }
    }
}

/// `next_cursor` is absent exactly when the listing reached the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    #[serde(default, with = "opt_hex")]
    pub next_cursor: Option<Vec<u8>>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFileListRequest {
    #[serde(default)]
    pub pagination: PageRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFileListResponse {
    pub files: Vec<FileRecord>,
    pub pagination: PageResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGetFileRequest {
    pub file_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGetFileResponse {
    pub file: Option<FileRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    FileList(QueryFileListRequest),
    GetFile(QueryGetFileRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    FileList(QueryFileListResponse),
    GetFile(QueryGetFileResponse),
}

// ---------------------------------------------------------------------------
// Genesis
// ---------------------------------------------------------------------------

/// Initial (or exported) registry contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

/// Hex encoding for optional byte strings in JSON.
mod opt_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => s.serialize_some(&hex::encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
