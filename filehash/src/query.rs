//! # Query Service
//!
//! Cursor-paginated listing of the registry and point lookup.
//!
//! A cursor is `CURSOR_VERSION ‖ key`, where `key` is the raw hash of the
//! first record of the next page. Resuming is a single ordered scan from
//! that key, so a page costs O(limit) no matter how deep into the registry
//! it starts. The scan asks for one record more than the page holds; that
//! extra record, if present, becomes the next cursor.

use tracing::debug;

use doctorium_protocol::config::{normalize_page_limit, CURSOR_VERSION};
use doctorium_protocol::storage::ReadStore;

use crate::errors::FileHashError;
use crate::keeper::{decode_record, registry, Keeper};
use crate::types::{
    PageResponse, QueryFileListRequest, QueryFileListResponse, QueryGetFileRequest,
    QueryGetFileResponse,
};

/// Wraps a registry key into an opaque cursor.
pub fn encode_cursor(key: &[u8]) -> Vec<u8> {
    let mut cursor = Vec::with_capacity(1 + key.len());
    cursor.push(CURSOR_VERSION);
    cursor.extend_from_slice(key);
    cursor
}

/// Extracts the resume key from a cursor produced by [`encode_cursor`].
pub fn decode_cursor(cursor: &[u8]) -> Result<&[u8], FileHashError> {
    match cursor.split_first() {
        None => Err(FileHashError::InvalidPaginationToken("empty cursor".into())),
        Some((&version, _)) if version != CURSOR_VERSION => Err(
            FileHashError::InvalidPaginationToken(format!("unknown cursor version {version:#04x}")),
        ),
        Some((_, [])) => Err(FileHashError::InvalidPaginationToken(
            "cursor has no position".into(),
        )),
        Some((_, key)) => Ok(key),
    }
}

/// One page of the registry in ascending hash byte order.
pub fn list_files<S: ReadStore + ?Sized>(
    store: &S,
    req: &QueryFileListRequest,
) -> Result<QueryFileListResponse, FileHashError> {
    let start: &[u8] = match &req.pagination.cursor {
        Some(cursor) => decode_cursor(cursor)?,
        None => &[],
    };
    let limit = normalize_page_limit(req.pagination.limit) as usize;

    let mut entries = registry(store).scan_from(start, limit + 1)?;
    let next_cursor = if entries.len() > limit {
        let cursor = encode_cursor(&entries[limit].0);
        entries.truncate(limit);
        Some(cursor)
    } else {
        None
    };

    let files = entries
        .into_iter()
        .map(|(key, value)| decode_record(key, value))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        returned = files.len(),
        limit,
        more = next_cursor.is_some(),
        "listed files"
    );
    Ok(QueryFileListResponse {
        files,
        pagination: PageResponse { next_cursor },
    })
}

impl<L> Keeper<L> {
    /// `FileList` query handler.
    pub fn file_list<S: ReadStore + ?Sized>(
        &self,
        store: &S,
        req: &QueryFileListRequest,
    ) -> Result<QueryFileListResponse, FileHashError> {
        list_files(store, req)
    }

    /// `GetFile` query handler.
    pub fn file<S: ReadStore + ?Sized>(
        &self,
        store: &S,
        req: &QueryGetFileRequest,
    ) -> Result<QueryGetFileResponse, FileHashError> {
        Ok(QueryGetFileResponse {
            file: self.get_file(store, &req.file_hash)?,
        })
    }
}
