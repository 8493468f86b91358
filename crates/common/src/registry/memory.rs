use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::provider::{RecordRow, RegistryError, RegistryProvider};
use crate::content_id::ContentId;

/// In-memory registry provider backed by a HashMap. Used in tests and
/// anywhere a throwaway registry is handy.
#[derive(Debug, Clone)]
pub struct MemoryRegistryProvider {
    inner: Arc<RwLock<MemoryRegistryProviderInner>>,
}

#[derive(Debug, Default)]
struct MemoryRegistryProviderInner {
    rows: HashMap<ContentId, RecordRow>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryRegistryProviderError {
    #[error("memory provider error: {0}")]
    Internal(String),
}

impl MemoryRegistryProvider {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryRegistryProviderInner::default())),
        }
    }

    /// Number of rows currently held.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryRegistryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryProvider for MemoryRegistryProvider {
    type Error = MemoryRegistryProviderError;

    async fn insert(
        &self,
        row: RecordRow,
    ) -> Result<(RecordRow, bool), RegistryError<Self::Error>> {
        let mut inner = self.inner.write().map_err(|e| {
            RegistryError::Provider(MemoryRegistryProviderError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })?;

        if let Some(existing) = inner.rows.get(&row.id) {
            return Ok((existing.clone(), false));
        }

        inner.rows.insert(row.id, row.clone());
        Ok((row, true))
    }

    async fn fetch(&self, id: &ContentId) -> Result<Option<RecordRow>, RegistryError<Self::Error>> {
        let inner = self.inner.read().map_err(|e| {
            RegistryError::Provider(MemoryRegistryProviderError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })?;

        Ok(inner.rows.get(id).cloned())
    }

    async fn touch(
        &self,
        id: &ContentId,
        last_used_at: OffsetDateTime,
    ) -> Result<(), RegistryError<Self::Error>> {
        let mut inner = self.inner.write().map_err(|e| {
            RegistryError::Provider(MemoryRegistryProviderError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })?;

        if let Some(row) = inner.rows.get_mut(id) {
            row.last_used_at = Some(last_used_at);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(document: &str) -> RecordRow {
        let bytes = document.as_bytes();
        RecordRow {
            id: ContentId::derive(bytes),
            document: document.to_string(),
            created_at: OffsetDateTime::now_utc(),
            last_used_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let provider = MemoryRegistryProvider::new();
        let row = sample_row("{\"client_name\":\"app\"}");

        let (stored, is_new) = provider.insert(row.clone()).await.unwrap();
        assert!(is_new);
        assert_eq!(stored, row);

        let fetched = provider.fetch(&row.id).await.unwrap();
        assert_eq!(fetched, Some(row));
    }

    #[tokio::test]
    async fn test_insert_conflict_returns_existing() {
        let provider = MemoryRegistryProvider::new();
        let row = sample_row("{\"client_name\":\"app\"}");

        provider.insert(row.clone()).await.unwrap();

        let mut resubmitted = row.clone();
        resubmitted.created_at = row.created_at + std::time::Duration::from_secs(60);
        let (stored, is_new) = provider.insert(resubmitted).await.unwrap();
        assert!(!is_new);
        // the original row wins; the later created_at never lands
        assert_eq!(stored, row);
        assert_eq!(provider.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_unknown_id() {
        let provider = MemoryRegistryProvider::new();
        let id = ContentId::derive(b"never inserted");
        assert_eq!(provider.fetch(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_touch_updates_last_used_at() {
        let provider = MemoryRegistryProvider::new();
        let row = sample_row("{\"client_name\":\"app\"}");
        provider.insert(row.clone()).await.unwrap();

        let at = OffsetDateTime::now_utc();
        provider.touch(&row.id, at).await.unwrap();

        let fetched = provider.fetch(&row.id).await.unwrap().unwrap();
        assert_eq!(fetched.last_used_at, Some(at));
    }

    #[tokio::test]
    async fn test_touch_unknown_id_is_noop() {
        let provider = MemoryRegistryProvider::new();
        let id = ContentId::derive(b"never inserted");
        provider
            .touch(&id, OffsetDateTime::now_utc())
            .await
            .unwrap();
        assert!(provider.is_empty());
    }
}
