use time::OffsetDateTime;

use super::freshness::FreshnessPolicy;
use super::provider::{RecordRow, RegistryError, RegistryProvider};
use crate::canonical;
use crate::content_id::ContentId;
use crate::metadata::ClientMetadata;

/// A registered client metadata document.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: ContentId,
    pub document: ClientMetadata,
    /// Set on first insertion, immutable afterwards.
    pub created_at: OffsetDateTime,
    /// None until the first touch.
    pub last_used_at: Option<OffsetDateTime>,
}

/// Content-addressed registry of client metadata documents.
///
/// A document's id is a pure function of its canonical encoding, so
/// registering the same document twice always lands on the same row.
/// Rows are never deleted; the freshness policy only ever moves
/// `last_used_at` and computes advisory expiries.
#[derive(Debug, Clone)]
pub struct Registry<P> {
    provider: P,
    policy: FreshnessPolicy,
}

impl<P: RegistryProvider> Registry<P> {
    pub fn new(provider: P, policy: FreshnessPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> &FreshnessPolicy {
        &self.policy
    }

    /// Register a document and return its record.
    ///
    /// The returned flag is true when this call created the row. A
    /// resubmission of a known document returns the existing record and
    /// counts as renewed use, so it runs through the freshness policy
    /// exactly like a lookup.
    pub async fn create(
        &self,
        document: &ClientMetadata,
    ) -> Result<(Record, bool), RegistryError<P::Error>> {
        let canonical_bytes = canonical::encode(document).map_err(RegistryError::Encoding)?;
        let id = ContentId::derive(&canonical_bytes);
        let serialized =
            serde_json::to_string(document).map_err(|e| RegistryError::Encoding(e.into()))?;

        let row = RecordRow {
            id,
            document: serialized,
            created_at: OffsetDateTime::now_utc(),
            last_used_at: None,
        };
        let (stored, is_new) = self.provider.insert(row).await?;
        let record = decode_row(stored)?;

        if is_new {
            tracing::info!("registered client {}", record.id);
            return Ok((record, true));
        }
        tracing::debug!("client {} resubmitted", record.id);
        Ok((self.refresh(record).await, false))
    }

    /// Look up a record by the string form of its id. Malformed ids are
    /// rejected before storage is consulted.
    pub async fn resolve(&self, id: &str) -> Result<Record, RegistryError<P::Error>> {
        let id = ContentId::parse(id).map_err(RegistryError::InvalidIdentifier)?;
        self.resolve_id(&id).await
    }

    /// Look up a record by id, refreshing its last-used timestamp when
    /// the freshness policy calls for it.
    pub async fn resolve_id(&self, id: &ContentId) -> Result<Record, RegistryError<P::Error>> {
        let row = self
            .provider
            .fetch(id)
            .await?
            .ok_or(RegistryError::NotFound)?;
        let record = decode_row(row)?;
        Ok(self.refresh(record).await)
    }

    /// Advisory expiry of a record under this registry's policy.
    pub fn expires_at(&self, record: &Record) -> OffsetDateTime {
        self.policy
            .expires_at(record.created_at, record.last_used_at)
    }

    /// Stamp a fresh `last_used_at` if the policy considers the record
    /// stale. The write is best-effort: a failure goes to the log and the
    /// returned record still carries the intended timestamp, leaving the
    /// persisted row to catch up on a later successful touch.
    async fn refresh(&self, mut record: Record) -> Record {
        let now = OffsetDateTime::now_utc();
        if !self.policy.should_touch(record.last_used_at, now) {
            return record;
        }
        if let Err(e) = self.provider.touch(&record.id, now).await {
            tracing::warn!("failed to touch client {}: {}", record.id, e);
        }
        record.last_used_at = Some(now);
        record
    }
}

fn decode_row<E>(row: RecordRow) -> Result<Record, RegistryError<E>> {
    let document = serde_json::from_str(&row.document).map_err(RegistryError::InvalidRecord)?;
    Ok(Record {
        id: row.id,
        document,
        created_at: row.created_at,
        last_used_at: row.last_used_at,
    })
}
