//! Genesis import and export.
//!
//! [`validate_genesis`] is the pure gate the host runs before loading a
//! snapshot: it only checks that hashes are pairwise distinct. Loading
//! ([`Keeper::init_genesis`]) additionally rejects records that could never
//! have been produced by a registration, and refuses to overwrite anything
//! already in the store. Genesis issues no rewards.

use std::collections::BTreeSet;

use tracing::info;

use doctorium_protocol::config::MAX_PAGE_LIMIT;
use doctorium_protocol::storage::{CacheStore, KvStore, ReadStore};

use crate::errors::GenesisError;
use crate::keeper::Keeper;
use crate::query::list_files;
use crate::types::{GenesisState, MsgUploadFile, PageRequest, QueryFileListRequest};

/// Genesis state of a fresh chain: no files.
pub fn default_genesis() -> GenesisState {
    GenesisState::default()
}

/// Fails with the first hash that appears twice, in sequence order.
pub fn validate_genesis(genesis: &GenesisState) -> Result<(), GenesisError> {
    let mut seen = BTreeSet::new();
    for record in &genesis.files {
        if !seen.insert(record.file_hash.as_str()) {
            return Err(GenesisError::DuplicateHash(record.file_hash.clone()));
        }
    }
    Ok(())
}

/// Parses a JSON genesis document and validates it.
pub fn validate_genesis_json(bytes: &[u8]) -> Result<GenesisState, GenesisError> {
    let genesis: GenesisState = serde_json::from_slice(bytes)?;
    validate_genesis(&genesis)?;
    Ok(genesis)
}

impl<L> Keeper<L> {
    /// Loads `genesis` into `store`. All records land or none do.
    ///
    /// Returns the number of records written.
    pub fn init_genesis<S: KvStore + ?Sized>(
        &self,
        store: &mut S,
        genesis: &GenesisState,
    ) -> Result<usize, GenesisError> {
        validate_genesis(genesis)?;

        let writes = {
            let mut branch = CacheStore::new(&*store);
            for (index, record) in genesis.files.iter().enumerate() {
                MsgUploadFile::new(record.creator.as_str(), record.file_hash.as_str())
                    .validate_basic()
                    .map_err(|source| GenesisError::InvalidRecord { index, source })?;
                if self.has_file(&branch, &record.file_hash)? {
                    return Err(GenesisError::AlreadyInStore(record.file_hash.clone()));
                }
                self.set_file(&mut branch, record)?;
            }
            branch.into_writes()
        };
        store.apply_batch(writes)?;

        info!(files = genesis.files.len(), "initialized file registry from genesis");
        Ok(genesis.files.len())
    }

    /// Dumps the whole registry in ascending hash order.
    pub fn export_genesis<S: ReadStore + ?Sized>(
        &self,
        store: &S,
    ) -> Result<GenesisState, GenesisError> {
        let mut files = Vec::new();
        let mut page = PageRequest::first(MAX_PAGE_LIMIT);
        loop {
            let req = QueryFileListRequest { pagination: page };
            let resp = list_files(store, &req)?;
            files.extend(resp.files);
            match resp.pagination.next_cursor {
                Some(cursor) => page = PageRequest::after(cursor, MAX_PAGE_LIMIT),
                None => break,
            }
        }
        Ok(GenesisState { files })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileRecord;

    #[test]
    fn default_is_empty_and_valid() {
        let genesis = default_genesis();
        assert!(genesis.files.is_empty());
        assert!(validate_genesis(&genesis).is_ok());
    }

    #[test]
    fn first_duplicate_is_reported() {
        let genesis = GenesisState {
            files: vec![
                FileRecord::new("a", "x"),
                FileRecord::new("b", "y"),
                FileRecord::new("c", "y"),
                FileRecord::new("d", "x"),
            ],
        };
        let err = validate_genesis(&genesis).unwrap_err();
        assert!(matches!(err, GenesisError::DuplicateHash(ref h) if h == "y"));
        assert_eq!(err.to_string(), "duplicate file hash in genesis: y");
    }

    #[test]
    fn same_creator_different_hashes_is_fine() {
        let genesis = GenesisState {
            files: vec![FileRecord::new("a", "x"), FileRecord::new("a", "y")],
        };
        assert!(validate_genesis(&genesis).is_ok());
    }

    #[test]
    fn json_validation() {
        assert!(validate_genesis_json(br#"{"files":[]}"#).is_ok());
        assert!(validate_genesis_json(b"{}").is_ok());
        assert!(matches!(
            validate_genesis_json(b"not json"),
            Err(GenesisError::Json(_))
        ));
        let dup = br#"{"files":[{"creator":"a","file_hash":"h"},{"creator":"b","file_hash":"h"}]}"#;
        assert!(matches!(
            validate_genesis_json(dup),
            Err(GenesisError::DuplicateHash(_))
        ));
    }
}
