use std::fmt::{Debug, Display};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::canonical::EncodingError;
use crate::content_id::{ContentId, ContentIdError};

/// A stored registry row, as a provider sees it. The document is kept in
/// its serialized form; decoding back into a typed document happens above
/// this seam.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow {
    pub id: ContentId,
    pub document: String,
    pub created_at: OffsetDateTime,
    pub last_used_at: Option<OffsetDateTime>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError<T> {
    #[error("unhandled registry provider error: {0}")]
    Provider(#[from] T),
    #[error("invalid content id: {0}")]
    InvalidIdentifier(ContentIdError),
    #[error("no record for content id")]
    NotFound,
    #[error("stored document no longer decodes: {0}")]
    InvalidRecord(serde_json::Error),
    #[error("insert reported success but the read-back found no row")]
    StorageInvariant,
    #[error("failed to canonicalize document: {0}")]
    Encoding(EncodingError),
}

/// Storage backend for the client registry.
///
/// Providers only move rows in and out of storage; deduplication by
/// content id is expressed through `insert`'s conflict semantics, and all
/// freshness and decode logic lives in the registry above.
#[async_trait]
pub trait RegistryProvider: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync;

    /// Insert a row unless its id is already present, then return the row
    /// stored under that id. The flag is true when this call created the
    /// row. Insert and read-back must be one atomic unit: concurrent
    /// inserts of the same id converge on exactly one row, and every
    /// caller sees a fully formed one.
    async fn insert(&self, row: RecordRow)
        -> Result<(RecordRow, bool), RegistryError<Self::Error>>;

    /// Fetch the row for an id, if one exists.
    async fn fetch(&self, id: &ContentId) -> Result<Option<RecordRow>, RegistryError<Self::Error>>;

    /// Persist a new last-used timestamp for an id. Touching an absent id
    /// is a no-op, not an error.
    async fn touch(
        &self,
        id: &ContentId,
        last_used_at: OffsetDateTime,
    ) -> Result<(), RegistryError<Self::Error>>;
}
