/**
 * Deterministic encoding of metadata documents.
 *  Normalizes JSON values into the IPLD data model
 *  and encodes them as DAG-CBOR, so that equivalent
 *  documents always produce the same bytes.
 */
pub mod canonical;
/**
 * Self-describing content identifiers derived from
 *  canonical document bytes. Thin wrapper around a
 *  CIDv1 with parsing and sqlite-friendly display.
 */
pub mod content_id;
/**
 * The client metadata document shape: what submitters
 *  are allowed to say about themselves, and the
 *  validation rules we hold them to.
 */
pub mod metadata;
/**
 * The client registry: content-addressed, deduplicating
 *  storage of metadata documents with freshness
 *  bookkeeping. Defined against a provider trait so
 *  storage backends are swappable.
 */
pub mod registry;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::canonical::EncodingError;
    pub use crate::content_id::{ContentId, ContentIdError};
    pub use crate::metadata::{ClientMetadata, MetadataError, TokenEndpointAuthMethod};
    pub use crate::registry::{
        FreshnessPolicy, Record, RecordRow, Registry, RegistryError, RegistryProvider,
        DEFAULT_EXPIRY_INTERVAL, DEFAULT_TOUCH_INTERVAL,
    };
    pub use crate::version::build_info;
}
