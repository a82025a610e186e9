// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Doctorium File-Hash Registry
//!
//! A state-machine module that records content hashes against the account
//! that uploaded them, and pays the uploader a fixed reward.
//!
//! - **keys** — Module names, store layout, reward constants.
//! - **types** — Messages, queries, pagination, genesis state.
//! - **errors** — Registered error codes.
//! - **keeper** — Registry access and the registration state machine.
//! - **query** — Cursor pagination over the registry.
//! - **genesis** — Snapshot validation, import and export.
//! - **module** — The value a host constructs to run all of the above.
//!
//! The registry is append-only: a hash is registered at most once and a
//! record is never changed or removed. Registration is atomic with its
//! reward; either the record and the payout both land or neither does.

pub mod errors;
pub mod genesis;
pub mod keeper;
pub mod keys;
pub mod module;
pub mod query;
pub mod types;

pub use errors::{FileHashError, GenesisError};
pub use keeper::{Keeper, Params};
pub use module::{FileHashModule, MODULE_ACCOUNT_PERMISSIONS};
pub use types::{
    FileRecord, GenesisState, Msg, MsgResponse, MsgUploadFile, MsgUploadFileResponse,
    PageRequest, PageResponse, Query, QueryFileListRequest, QueryFileListResponse,
    QueryGetFileRequest, QueryGetFileResponse, QueryResponse,
};
