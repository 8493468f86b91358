use async_trait::async_trait;
use common::prelude::{ContentId, RecordRow, RegistryError, RegistryProvider};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::database::{DContentId, Database};

/// Row shape of the `clients` table.
#[derive(Debug, FromRow)]
struct ClientRow {
    cid: DContentId,
    metadata: String,
    created_at: OffsetDateTime,
    last_used_at: Option<OffsetDateTime>,
}

impl From<ClientRow> for RecordRow {
    fn from(value: ClientRow) -> Self {
        RecordRow {
            id: value.cid.into(),
            document: value.metadata,
            created_at: value.created_at,
            last_used_at: value.last_used_at,
        }
    }
}

#[async_trait]
impl RegistryProvider for Database {
    type Error = sqlx::Error;

    async fn insert(
        &self,
        row: RecordRow,
    ) -> Result<(RecordRow, bool), RegistryError<Self::Error>> {
        let id = DContentId::from(row.id);

        // The insert and the read-back share one transaction so concurrent
        // submissions of the same document converge on a single row and the
        // read-back always observes it.
        let mut tx = self.begin().await.map_err(RegistryError::Provider)?;

        let inserted = sqlx::query(
            "INSERT INTO clients (cid, metadata, created_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (cid) DO NOTHING",
        )
        .bind(id)
        .bind(&row.document)
        .bind(row.created_at)
        .execute(&mut *tx)
        .await
        .map_err(RegistryError::Provider)?
        .rows_affected()
            == 1;

        let stored = sqlx::query_as::<_, ClientRow>(
            "SELECT cid, metadata, created_at, last_used_at
             FROM clients
             WHERE cid = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RegistryError::Provider)?;

        // Dropping the transaction without committing rolls it back, leaving
        // no partial row behind.
        let Some(stored) = stored else {
            return Err(RegistryError::StorageInvariant);
        };

        tx.commit().await.map_err(RegistryError::Provider)?;

        Ok((stored.into(), inserted))
    }

    async fn fetch(&self, id: &ContentId) -> Result<Option<RecordRow>, RegistryError<Self::Error>> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT cid, metadata, created_at, last_used_at
             FROM clients
             WHERE cid = $1",
        )
        .bind(DContentId::from(*id))
        .fetch_optional(&**self)
        .await
        .map_err(RegistryError::Provider)?;

        Ok(row.map(RecordRow::from))
    }

    async fn touch(
        &self,
        id: &ContentId,
        last_used_at: OffsetDateTime,
    ) -> Result<(), RegistryError<Self::Error>> {
        sqlx::query("UPDATE clients SET last_used_at = $1 WHERE cid = $2")
            .bind(last_used_at)
            .bind(DContentId::from(*id))
            .execute(&**self)
            .await
            .map_err(RegistryError::Provider)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn sample_row(document: &str) -> RecordRow {
        RecordRow {
            id: ContentId::derive(document.as_bytes()),
            document: document.to_string(),
            created_at: OffsetDateTime::now_utc(),
            last_used_at: None,
        }
    }

    fn close_to(left: OffsetDateTime, right: OffsetDateTime) -> bool {
        let delta = if left > right { left - right } else { right - left };
        delta < Duration::from_secs(2)
    }

    #[tokio::test]
    async fn test_insert_returns_new_row() {
        let database = Database::memory().await;
        let row = sample_row("{\"client_name\":\"first\"}");

        let (stored, is_new) = database.insert(row.clone()).await.unwrap();

        assert!(is_new);
        assert_eq!(stored.id, row.id);
        assert_eq!(stored.document, row.document);
        assert!(close_to(stored.created_at, row.created_at));
        assert!(stored.last_used_at.is_none());
        assert_eq!(database.client_count().await, 1);
    }

    #[tokio::test]
    async fn test_insert_conflict_keeps_original_row() {
        let database = Database::memory().await;
        let original = sample_row("{\"client_name\":\"kept\"}");
        database.insert(original.clone()).await.unwrap();

        let mut resubmission = original.clone();
        resubmission.created_at = original.created_at + Duration::from_secs(600);
        let (stored, is_new) = database.insert(resubmission).await.unwrap();

        assert!(!is_new);
        assert!(close_to(stored.created_at, original.created_at));
        assert_eq!(database.client_count().await, 1);
    }

    #[tokio::test]
    async fn test_fetch_unknown_is_none() {
        let database = Database::memory().await;
        let absent = ContentId::derive(b"missing");

        assert!(database.fetch(&absent).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_touch_persists_timestamp() {
        let database = Database::memory().await;
        let row = sample_row("{\"client_name\":\"touched\"}");
        database.insert(row.clone()).await.unwrap();

        let used_at = OffsetDateTime::now_utc() + Duration::from_secs(30);
        database.touch(&row.id, used_at).await.unwrap();

        let stored = database.fetch(&row.id).await.unwrap().unwrap();
        assert!(close_to(stored.last_used_at.unwrap(), used_at));
    }

    #[tokio::test]
    async fn test_touch_unknown_id_is_a_noop() {
        let database = Database::memory().await;
        let absent = ContentId::derive(b"never-inserted");

        database
            .touch(&absent, OffsetDateTime::now_utc())
            .await
            .unwrap();

        assert_eq!(database.client_count().await, 0);
    }
}
